//! Catalog page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use super::{CategoryOption, Notice, NoticeView, PageChrome, category_options};
use crate::cart::CartView;
use crate::catalog::{category_filter, count_label};
use crate::error::Result;
use crate::filters;
use crate::models::SessionUser;
use crate::state::AppState;

/// Catalog page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub categoria: Option<String>,
    pub notice: Option<String>,
    /// Cart total at checkout time, for the checkout notice.
    pub total: Option<String>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<SessionUser>,
    pub cart: CartView,
    pub notice: Option<NoticeView>,
    pub is_admin: bool,
    pub categories: Vec<CategoryOption>,
    pub count_label: String,
    /// Rendered product grid, already escaped by its own template.
    pub grid_html: String,
}

/// Display the catalog page.
///
/// Rendering the grid republishes it to the cart bridge, so the add buttons
/// on this page refer to these cards.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<HomeTemplate> {
    let filter = category_filter(query.categoria.as_deref());
    let grid_html = state.render_grid(filter)?;
    let count_label = count_label(state.catalog().visible_count(filter));
    let notice = query
        .notice
        .as_deref()
        .and_then(Notice::from_code)
        .map(|notice| notice.view(query.total.as_deref()));
    let PageChrome { user, cart } = PageChrome::load(&state);

    Ok(HomeTemplate {
        is_admin: user.as_ref().is_some_and(SessionUser::is_admin),
        user,
        cart,
        notice,
        categories: category_options(filter),
        count_label,
        grid_html,
    })
}
