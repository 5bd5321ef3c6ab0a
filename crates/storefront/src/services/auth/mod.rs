//! Sign-in service.
//!
//! There is no credential store: any non-empty password is accepted and the
//! role is derived from the email domain. The resulting role only changes
//! what the storefront renders; the product API must enforce authorization
//! on its own.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};

use mi_catalogo_core::Email;

use crate::models::{SessionUser, keys};
use crate::storage::LocalStorage;

/// Sign-in and sign-out against local storage.
pub struct AuthService<'a> {
    storage: &'a dyn LocalStorage,
    admin_domain: &'a str,
}

impl<'a> AuthService<'a> {
    /// Create a new sign-in service.
    #[must_use]
    pub const fn new(storage: &'a dyn LocalStorage, admin_domain: &'a str) -> Self {
        Self {
            storage,
            admin_domain,
        }
    }

    /// Sign in and persist the session user.
    ///
    /// A failure to persist is logged; the sign-in itself still succeeds for
    /// the running instance.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::InvalidEmail` if the email cannot be parsed.
    pub fn login(&self, email: &str, password: &SecretString) -> Result<SessionUser, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = SessionUser::for_email(Email::parse(email)?, self.admin_domain);

        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.storage.set_item(keys::CURRENT_USER, &json) {
                    tracing::warn!(error = %e, "Failed to persist session user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize session user"),
        }

        tracing::info!(name = %user.name, role = %user.role, "User signed in");
        Ok(user)
    }

    /// Forget the persisted session user.
    pub fn logout(&self) {
        if let Err(e) = self.storage.remove_item(keys::CURRENT_USER) {
            tracing::warn!(error = %e, "Failed to remove persisted session user");
        }
        tracing::info!("User signed out");
    }

    /// The persisted session user, if any.
    ///
    /// Missing or unreadable entries mean nobody is signed in.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        let raw = match self.storage.get_item(keys::CURRENT_USER) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session user");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(error = %e, "Stored session user is invalid, ignoring"))
            .ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mi_catalogo_core::Role;

    use super::*;
    use crate::storage::MemoryStorage;

    const ADMIN_DOMAIN: &str = "tecmilenio.mx";

    fn password(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_login_requires_both_fields() {
        let storage = MemoryStorage::new();
        let auth = AuthService::new(&storage, ADMIN_DOMAIN);

        assert_eq!(
            auth.login("  ", &password("x")),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            auth.login("ana@gmail.com", &password("")),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            AuthError::MissingCredentials.to_string(),
            "Por favor ingresa correo y contraseña."
        );
        assert_eq!(storage.writes(), 0);
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        let storage = MemoryStorage::new();
        let auth = AuthService::new(&storage, ADMIN_DOMAIN);
        assert!(matches!(
            auth.login("ana", &password("x")),
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_login_derives_role_and_persists() {
        let storage = MemoryStorage::new();
        let auth = AuthService::new(&storage, ADMIN_DOMAIN);

        let admin = auth.login("profe@tecmilenio.mx", &password("x")).unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.name, "profe");
        assert_eq!(auth.current_user(), Some(admin));

        let user = auth.login("ana@gmail.com", &password("x")).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(auth.current_user(), Some(user));
    }

    #[test]
    fn test_logout_clears_persisted_user() {
        let storage = MemoryStorage::new();
        let auth = AuthService::new(&storage, ADMIN_DOMAIN);
        auth.login("ana@gmail.com", &password("x")).unwrap();

        auth.logout();
        assert_eq!(auth.current_user(), None);
    }

    #[test]
    fn test_corrupt_user_is_ignored() {
        let storage = MemoryStorage::new().with_item(keys::CURRENT_USER, "{\"name\":");
        let auth = AuthService::new(&storage, ADMIN_DOMAIN);
        assert_eq!(auth.current_user(), None);
    }

    #[test]
    fn test_login_survives_storage_failure() {
        let storage = MemoryStorage::read_only();
        let auth = AuthService::new(&storage, ADMIN_DOMAIN);
        let user = auth.login("ana@gmail.com", &password("x")).unwrap();
        assert_eq!(user.name, "ana");
    }
}
