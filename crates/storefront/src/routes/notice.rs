//! One-shot messages shown after a redirect.
//!
//! POST handlers redirect to `/?notice=<code>`; the catalog page turns the
//! code back into a message. Unknown codes are ignored.

use axum::response::Redirect;

/// A message the catalog page can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyCart,
    Checkout,
    WelcomeAdmin,
    WelcomeUser,
    SignedOut,
    AdminOnlySave,
    AdminOnlyEdit,
    AdminOnlyDelete,
    ProductSaved,
    ProductDeleted,
    DeleteFailed,
}

const CODES: &[(Notice, &str)] = &[
    (Notice::EmptyCart, "empty-cart"),
    (Notice::Checkout, "checkout"),
    (Notice::WelcomeAdmin, "welcome-admin"),
    (Notice::WelcomeUser, "welcome-user"),
    (Notice::SignedOut, "signed-out"),
    (Notice::AdminOnlySave, "admin-only-save"),
    (Notice::AdminOnlyEdit, "admin-only-edit"),
    (Notice::AdminOnlyDelete, "admin-only-delete"),
    (Notice::ProductSaved, "product-saved"),
    (Notice::ProductDeleted, "product-deleted"),
    (Notice::DeleteFailed, "delete-failed"),
];

impl Notice {
    /// Code used in the `notice` query parameter.
    #[must_use]
    pub fn code(self) -> &'static str {
        CODES
            .iter()
            .find(|(notice, _)| *notice == self)
            .map_or("", |(_, code)| code)
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(notice, _)| *notice)
    }

    /// Display data. `total` is the formatted cart total for [`Notice::Checkout`].
    #[must_use]
    pub fn view(self, total: Option<&str>) -> NoticeView {
        let (kind, message) = match self {
            Self::EmptyCart => ("error", "El carrito está vacío.".to_string()),
            Self::Checkout => (
                "info",
                format!(
                    "Ejemplo demo: total {}. Implementa tu flujo de pago en el backend.",
                    total.unwrap_or("$0.00")
                ),
            ),
            Self::WelcomeAdmin => ("info", "Bienvenido administrador".to_string()),
            Self::WelcomeUser => ("info", "Bienvenido usuario".to_string()),
            Self::SignedOut => ("info", "Sesión cerrada.".to_string()),
            Self::AdminOnlySave => (
                "error",
                "Acceso denegado. Debes ser administrador para guardar productos.".to_string(),
            ),
            Self::AdminOnlyEdit => (
                "error",
                "Solo administradores pueden editar productos.".to_string(),
            ),
            Self::AdminOnlyDelete => (
                "error",
                "Solo administradores pueden eliminar productos.".to_string(),
            ),
            Self::ProductSaved => ("info", "Producto guardado.".to_string()),
            Self::ProductDeleted => ("info", "Producto eliminado.".to_string()),
            Self::DeleteFailed => ("error", "No se pudo eliminar el producto.".to_string()),
        };
        NoticeView { kind, message }
    }

    /// Redirect to the catalog page showing this notice.
    #[must_use]
    pub fn redirect(self) -> Redirect {
        Redirect::to(&format!("/?notice={}", self.code()))
    }
}

/// Notice display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    /// `"info"` or `"error"`.
    pub kind: &'static str,
    pub message: String,
}

impl NoticeView {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == "error"
    }
}
