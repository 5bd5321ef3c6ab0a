//! Cart display data and templates.
//!
//! The view is derived from a [`Cart`] in one place ([`CartView::from_cart`]);
//! nothing else builds cart markup. Templates rely on askama's HTML escaping
//! for every user-supplied string (names, image URLs).

use askama::Template;
use askama_web::WebTemplate;
use mi_catalogo_core::{Cart, CartSummary, LineItem};

/// Visibility of the cart drawer. Starts closed; only the floating toggle changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

impl DrawerState {
    /// The opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Cart line display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    /// Formatted unit price (e.g. `"$9.50"`).
    pub unit_price: String,
    pub line_price: String,
    pub image_url: String,
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.display(),
            line_price: mi_catalogo_core::format_currency(line.line_total()),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Formatted total (e.g. `"$28.50"`).
    pub total: String,
    /// Sum of quantities, shown on the toggle and in the drawer header.
    pub item_count: u32,
    pub open: bool,
}

impl CartView {
    /// Build the view for `cart` with the drawer in `drawer` state.
    #[must_use]
    pub fn from_cart(cart: &Cart, drawer: DrawerState) -> Self {
        let summary: CartSummary = cart.summary();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: summary.total_display(),
            item_count: summary.item_count,
            open: drawer.is_open(),
        }
    }

    /// An empty, closed cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_cart(&Cart::new(), DrawerState::Closed)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Drawer fragment: header with the item count, the line list, total and actions.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Floating toggle button showing the aggregate quantity.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_toggle.html")]
pub struct CartToggleTemplate {
    pub cart: CartView,
}
