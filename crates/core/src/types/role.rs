//! User roles.
//!
//! Roles only drive what the storefront *shows*. They are derived on the
//! client side from the email domain and are trivially spoofable, so every
//! real authorization decision belongs to the product API.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Email;

/// Role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May create, edit, and delete catalog products.
    Admin,
    /// Regular shopper.
    #[default]
    User,
}

impl Role {
    /// Derive the role from an email address: addresses in `admin_domain` are admins.
    ///
    /// ```
    /// use mi_catalogo_core::{Email, Role};
    ///
    /// let staff = Email::parse("ana@tecmilenio.mx").unwrap();
    /// let shopper = Email::parse("ana@gmail.com").unwrap();
    /// assert_eq!(Role::for_email(&staff, "tecmilenio.mx"), Role::Admin);
    /// assert_eq!(Role::for_email(&shopper, "tecmilenio.mx"), Role::User);
    /// ```
    #[must_use]
    pub fn for_email(email: &Email, admin_domain: &str) -> Self {
        if email.has_domain(admin_domain) {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// Whether this role may manage the catalog.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Lowercase name as shown in the user badge.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
