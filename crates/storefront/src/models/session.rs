//! Session-related types.
//!
//! Types kept in local storage for the signed-in user.

use serde::{Deserialize, Serialize};

use mi_catalogo_core::{Email, Role};

/// The signed-in user.
///
/// Persisted as `{"name", "email", "role"}` under [`keys::CURRENT_USER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Local part of the email, shown in the user badge.
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl SessionUser {
    /// Build the session user for `email`, deriving the role from its domain.
    #[must_use]
    pub fn for_email(email: Email, admin_domain: &str) -> Self {
        let role = Role::for_email(&email, admin_domain);
        Self {
            name: email.local_part().to_string(),
            email,
            role,
        }
    }

    /// Whether catalog management controls should be shown.
    ///
    /// This only decides what is rendered. It is not an authorization check.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Local storage keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "currentUser";
}
