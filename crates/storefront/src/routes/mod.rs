//! HTTP route handlers for the storefront.
//!
//! Every page is server-rendered. Actions are plain form posts that redirect
//! back to a page (post/redirect/get); one-shot messages travel in the
//! `notice` query parameter.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Catalog page (?categoria=, ?notice=)
//! GET  /health                  - Health check
//!
//! # Cart
//! POST /cart/add                - Add the product on a grid card
//! POST /cart/increment          - +1 on a line
//! POST /cart/decrement          - -1 on a line (removes at zero)
//! POST /cart/remove             - Remove a line
//! POST /cart/clear              - Empty the cart
//! POST /cart/toggle             - Open or close the drawer
//! POST /cart/checkout           - Checkout placeholder
//! GET  /cart/snapshot           - Cart as JSON
//! GET  /cart/count              - Aggregate quantity
//!
//! # Products (admin controls)
//! GET  /products/new            - New product form
//! POST /products                - Create
//! GET  /products/{id}/edit      - Edit form
//! POST /products/{id}           - Update
//! POST /products/{id}/delete    - Delete
//!
//! # Auth
//! GET  /auth/login              - Sign-in page
//! POST /auth/login              - Sign in
//! POST /auth/logout             - Sign out
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod notice;
pub mod products;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use sentry_tower::{NewSentryLayer, SentryHttpLayer};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cart::CartView;
use crate::catalog::CATEGORIES;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::models::SessionUser;
use crate::state::AppState;

pub use notice::{Notice, NoticeView};

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/toggle", post(cart::toggle))
        .route("/checkout", post(cart::checkout))
        .route("/snapshot", get(cart::snapshot))
        .route("/count", get(cart::count))
}

/// Create the product management routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create))
        .route("/new", get(products::new_page))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_page))
        .route("/{id}/delete", post(products::delete))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all page and action routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/cart", cart_routes())
        .nest("/products", product_routes())
        .nest("/auth", auth_routes())
}

/// Build the complete application with middleware and static files.
pub fn app(state: AppState) -> Router {
    routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(NewSentryLayer::new_from_top())
        .layer(SentryHttpLayer::new().enable_transaction())
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Sidebar or select option.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Sidebar filters with `selected` marked.
#[must_use]
pub fn category_options(selected: &str) -> Vec<CategoryOption> {
    CATEGORIES
        .iter()
        .map(|(value, label)| CategoryOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
            selected: *value == selected,
        })
        .collect()
}

/// What every full page shows around its content: the user area and the cart.
pub(crate) struct PageChrome {
    pub user: Option<SessionUser>,
    pub cart: CartView,
}

impl PageChrome {
    pub(crate) fn load(state: &AppState) -> Self {
        Self {
            user: state.current_user(),
            cart: state.cart().with_session(|session| session.view()),
        }
    }
}
