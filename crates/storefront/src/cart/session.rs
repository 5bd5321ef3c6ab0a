//! The live cart: operations, write-through rendering, drawer state, checkout.

use mi_catalogo_core::{Cart, CartSummary, LineItemId, NewLineItem};

use super::store::CartStore;
use super::view::{CartView, DrawerState};

/// Result of pressing the checkout button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    /// Nothing to pay for; shown as a blocking notice.
    EmptyCart,
    /// Placeholder acknowledgment; no payment happens.
    Acknowledged { total: String },
}

/// The cart as the running storefront sees it.
///
/// Every mutation goes through one of the four operations below and ends in
/// [`CartSession::render`], which rebuilds the view and persists the cart.
/// A mutation that has not been rendered is not committed.
pub struct CartSession {
    cart: Cart,
    store: CartStore,
    drawer: DrawerState,
}

impl CartSession {
    /// Load the persisted cart (empty if missing or corrupt) with the drawer closed.
    #[must_use]
    pub fn load(store: CartStore) -> Self {
        let cart = store.load();
        tracing::info!(lines = cart.len(), "Cart loaded");
        Self {
            cart,
            store,
            drawer: DrawerState::Closed,
        }
    }

    /// Add one unit of a product and render.
    pub fn add_or_increment(&mut self, item: NewLineItem) -> CartView {
        let id = self.cart.add_or_increment(item);
        tracing::debug!(%id, "Added to cart");
        self.render()
    }

    /// Change an item's quantity by `delta` (removing it at zero) and render.
    pub fn change_quantity(&mut self, id: &LineItemId, delta: i64) -> CartView {
        match self.cart.change_quantity(id, delta) {
            Some(0) => tracing::debug!(%id, "Quantity reached zero, item removed"),
            Some(quantity) => tracing::debug!(%id, quantity, "Quantity changed"),
            None => tracing::debug!(%id, "Quantity change for unknown item ignored"),
        }
        self.render()
    }

    /// Remove an item and render.
    pub fn remove(&mut self, id: &LineItemId) -> CartView {
        self.cart.remove(id);
        self.render()
    }

    /// Empty the cart and render.
    pub fn clear(&mut self) -> CartView {
        self.cart.clear();
        self.render()
    }

    /// Build the view and persist the cart.
    ///
    /// Persistence failures are logged and otherwise ignored: the in-memory
    /// cart stays authoritative and the view is still returned.
    pub fn render(&mut self) -> CartView {
        let view = self.view();
        if let Err(e) = self.store.save(&self.cart) {
            tracing::warn!(error = %e, "Failed to persist cart, keeping in-memory state");
        }
        view
    }

    /// Build the view without persisting.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::from_cart(&self.cart, self.drawer)
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    /// Open or close the drawer.
    pub fn toggle_drawer(&mut self) -> DrawerState {
        self.drawer = self.drawer.toggled();
        self.drawer
    }

    #[must_use]
    pub const fn drawer(&self) -> DrawerState {
        self.drawer
    }

    /// Checkout placeholder. Never mutates or persists the cart.
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        if self.cart.is_empty() {
            tracing::info!("Checkout attempted with an empty cart");
            return Checkout::EmptyCart;
        }

        let total = self.cart.summary().total_display();
        tracing::info!(%total, "Checkout acknowledged");
        Checkout::Acknowledged { total }
    }

    /// Deep copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }
}
