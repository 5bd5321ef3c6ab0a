//! The cart subsystem as the storefront runs it.
//!
//! - [`store`] loads and saves the cart in local storage.
//! - [`session`] owns the live cart, applies operations and renders.
//! - [`view`] turns a cart into display data and templates.
//!
//! [`CartHandle`] is the surface other code drives the cart through: add a
//! product by card reference, take a snapshot, clear.

pub mod session;
pub mod store;
pub mod view;

use std::sync::{Arc, Mutex, PoisonError};

use mi_catalogo_core::Cart;

use crate::bridge::{BridgeError, CardBridge};

pub use session::{CartSession, Checkout};
pub use store::{CART_KEY, CartStore};
pub use view::{CartDrawerTemplate, CartItemView, CartToggleTemplate, CartView, DrawerState};

/// Shared access to the cart session.
///
/// Operations are serialized by a mutex that is never held across an
/// `.await`.
#[derive(Clone)]
pub struct CartHandle {
    session: Arc<Mutex<CartSession>>,
    bridge: Arc<CardBridge>,
}

impl CartHandle {
    #[must_use]
    pub fn new(session: CartSession, bridge: Arc<CardBridge>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            bridge,
        }
    }

    /// Add the product shown on the card referenced by `card` in the last
    /// rendered grid.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownCard`] if the grid had no such card.
    pub fn add_by_card_reference(&self, card: &str) -> Result<CartView, BridgeError> {
        let item = self.bridge.line_item(card)?;
        Ok(self.with_session(|session| session.add_or_increment(item)))
    }

    /// Deep copy of the current cart.
    #[must_use]
    pub fn cart_snapshot(&self) -> Cart {
        self.with_session(|session| session.snapshot())
    }

    /// Empty the cart.
    pub fn clear_cart(&self) -> CartView {
        self.with_session(CartSession::clear)
    }

    /// Run `f` with exclusive access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut CartSession) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}
