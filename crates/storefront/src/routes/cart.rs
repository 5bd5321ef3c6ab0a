//! Cart route handlers.
//!
//! Each action applies one cart operation (which persists the cart) and
//! redirects back to the catalog page, where the drawer and toggle are
//! rendered from the updated cart.

use axum::{
    Form, Json,
    extract::State,
    response::Redirect,
};
use mi_catalogo_core::{Cart, LineItemId};
use serde::Deserialize;
use tracing::instrument;

use super::Notice;
use crate::cart::Checkout;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Form data for the add button on a product card.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    /// Reference of the card in the rendered grid, its product id.
    pub card: String,
}

/// Form data for actions on an existing cart line.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub id: LineItemId,
}

/// Add the product shown on a grid card.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Result<Redirect> {
    let view = state.cart().add_by_card_reference(&form.card)?;
    let count = view.item_count.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("items", count.as_str())]));
    Ok(Redirect::to("/"))
}

#[instrument(skip(state))]
pub async fn increment(State(state): State<AppState>, Form(form): Form<LineForm>) -> Redirect {
    state
        .cart()
        .with_session(|session| session.change_quantity(&form.id, 1));
    Redirect::to("/")
}

/// Remove one unit; the line disappears when it reaches zero.
#[instrument(skip(state))]
pub async fn decrement(State(state): State<AppState>, Form(form): Form<LineForm>) -> Redirect {
    state
        .cart()
        .with_session(|session| session.change_quantity(&form.id, -1));
    Redirect::to("/")
}

#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<LineForm>) -> Redirect {
    state.cart().with_session(|session| session.remove(&form.id));
    add_breadcrumb("cart", "Removed from cart", Some(&[("id", form.id.as_str())]));
    Redirect::to("/")
}

#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Redirect {
    state.cart().clear_cart();
    add_breadcrumb("cart", "Cart cleared", None);
    Redirect::to("/")
}

/// Open or close the drawer.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>) -> Redirect {
    let drawer = state.cart().with_session(|session| session.toggle_drawer());
    tracing::debug!(open = drawer.is_open(), "Cart drawer toggled");
    Redirect::to("/")
}

/// Checkout placeholder: shows the total, leaves the cart as it is.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Redirect {
    match state.cart().with_session(|session| session.checkout()) {
        Checkout::EmptyCart => Notice::EmptyCart.redirect(),
        Checkout::Acknowledged { total } => {
            add_breadcrumb("cart", "Checkout", Some(&[("total", total.as_str())]));
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("notice", Notice::Checkout.code())
                .append_pair("total", &total)
                .finish();
            Redirect::to(&format!("/?{query}"))
        }
    }
}

/// Deep copy of the cart as JSON.
#[instrument(skip(state))]
pub async fn snapshot(State(state): State<AppState>) -> Json<Cart> {
    Json(state.cart().cart_snapshot())
}

/// Aggregate quantity, as shown on the toggle.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> String {
    state
        .cart()
        .with_session(|session| session.summary().item_count)
        .to_string()
}
