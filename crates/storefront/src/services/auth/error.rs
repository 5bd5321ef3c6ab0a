//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during sign-in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password left blank.
    #[error("Por favor ingresa correo y contraseña.")]
    MissingCredentials,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mi_catalogo_core::EmailError),
}
