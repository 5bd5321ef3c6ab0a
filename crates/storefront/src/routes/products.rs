//! Product management route handlers.
//!
//! The admin controls on the catalog page are display-only; every handler
//! here re-checks the role before touching the catalog. With a product API
//! configured each change is sent there first and only applied locally once
//! the API accepts it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use mi_catalogo_core::ProductId;
use tracing::instrument;

use super::{CategoryOption, Notice, NoticeView, PageChrome};
use crate::cart::CartView;
use crate::catalog::{CATEGORIES, CatalogError, DEFAULT_CATEGORY, ProductForm, ProductInput};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::SessionUser;
use crate::state::AppState;

/// Create and edit form page.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub user: Option<SessionUser>,
    pub cart: CartView,
    pub notice: Option<NoticeView>,
    pub title: &'static str,
    /// Form target.
    pub action: String,
    pub form: ProductForm,
    pub categories: Vec<CategoryOption>,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn new(state: &AppState, title: &'static str, action: String, form: ProductForm) -> Self {
        let PageChrome { user, cart } = PageChrome::load(state);
        Self {
            user,
            cart,
            notice: None,
            title,
            action,
            categories: form_categories(&form.categoria),
            form,
            error: None,
        }
    }

    fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Category select options: the default category, the sidebar categories
/// except `all`, and the product's own category if it is none of those.
fn form_categories(selected: &str) -> Vec<CategoryOption> {
    let selected = if selected.trim().is_empty() {
        DEFAULT_CATEGORY
    } else {
        selected
    };

    let mut options: Vec<CategoryOption> = std::iter::once((DEFAULT_CATEGORY, "General"))
        .chain(CATEGORIES.iter().copied().filter(|(value, _)| *value != "all"))
        .map(|(value, label)| CategoryOption {
            value: value.to_string(),
            label: label.to_string(),
            selected: value == selected,
        })
        .collect();

    if !options.iter().any(|o| o.selected) {
        options.push(CategoryOption {
            value: selected.to_string(),
            label: selected.to_string(),
            selected: true,
        });
    }
    options
}

/// Message shown when the product API refuses or cannot be reached.
fn api_failure_message(error: &CatalogError, fallback: &str) -> String {
    match error {
        CatalogError::Rejected(msg) => msg.clone(),
        CatalogError::Http(_) => "No se pudo conectar al servidor".to_string(),
        _ => fallback.to_string(),
    }
}

/// Republish the full grid so card references match the changed catalog.
fn refresh_grid(state: &AppState) {
    if let Err(e) = state.render_grid("all") {
        tracing::warn!(error = %e, "Product grid render failed");
    }
}

/// Display the new product form.
#[instrument(skip(state))]
pub async fn new_page(State(state): State<AppState>) -> Response {
    if !state.is_admin() {
        return Notice::AdminOnlySave.redirect().into_response();
    }

    let form = ProductForm {
        categoria: DEFAULT_CATEGORY.to_string(),
        ..ProductForm::default()
    };
    ProductFormTemplate::new(&state, "Agregar producto", "/products".to_string(), form)
        .into_response()
}

/// Create a product.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Response {
    if !state.is_admin() {
        tracing::warn!("Product create attempted without admin role");
        return Notice::AdminOnlySave.redirect().into_response();
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            return ProductFormTemplate::new(&state, "Agregar producto", "/products".to_string(), form)
                .with_error(e.to_string())
                .into_response();
        }
    };

    let product = match state.products_api() {
        Some(api) => match api.create(input).await {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(error = %e, "Product API refused the new product");
                return ProductFormTemplate::new(&state, "Agregar producto", "/products".to_string(), form)
                    .with_error(api_failure_message(&e, "No se pudo guardar"))
                    .into_response();
            }
        },
        None => {
            let id = state.catalog().next_id();
            input.into_product(id)
        }
    };

    tracing::info!(id = %product.id, name = %product.name, "Product created");
    add_breadcrumb("catalog", "Product created", Some(&[("name", product.name.as_str())]));
    state.catalog_mut().prepend(product);
    refresh_grid(&state);
    Notice::ProductSaved.redirect().into_response()
}

/// Display the edit form for an existing product.
#[instrument(skip(state))]
pub async fn edit_page(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    if !state.is_admin() {
        return Ok(Notice::AdminOnlyEdit.redirect().into_response());
    }

    let id = ProductId::new(id);
    let form = state
        .catalog()
        .get(id)
        .map(ProductForm::from_product)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(
        ProductFormTemplate::new(&state, "Editar producto", format!("/products/{id}"), form)
            .into_response(),
    )
}

/// Update an existing product.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    if !state.is_admin() {
        tracing::warn!(id, "Product update attempted without admin role");
        return Ok(Notice::AdminOnlyEdit.redirect().into_response());
    }

    let id = ProductId::new(id);
    let action = format!("/products/{id}");
    if state.products_api().is_none() && state.catalog().get(id).is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    let input: ProductInput = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            return Ok(ProductFormTemplate::new(&state, "Editar producto", action, form)
                .with_error(e.to_string())
                .into_response());
        }
    };

    if let Some(api) = state.products_api()
        && let Err(e) = api.update(id, &input).await
    {
        tracing::warn!(error = %e, %id, "Product API refused the update");
        return Ok(ProductFormTemplate::new(&state, "Editar producto", action, form)
            .with_error(api_failure_message(&e, "No se pudo guardar"))
            .into_response());
    }

    if state.catalog_mut().update(id, input) {
        tracing::info!(%id, "Product updated");
    } else {
        tracing::warn!(%id, "Updated product is not in the local catalog");
    }
    refresh_grid(&state);
    Ok(Notice::ProductSaved.redirect().into_response())
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    if !state.is_admin() {
        tracing::warn!(id, "Product delete attempted without admin role");
        return Notice::AdminOnlyDelete.redirect();
    }

    let id = ProductId::new(id);
    if let Some(api) = state.products_api()
        && let Err(e) = api.delete(id).await
    {
        tracing::warn!(error = %e, %id, "Product API refused the delete");
        return Notice::DeleteFailed.redirect();
    }

    if state.catalog_mut().remove(id) {
        tracing::info!(%id, "Product deleted");
        add_breadcrumb("catalog", "Product deleted", None);
        refresh_grid(&state);
    }
    Notice::ProductDeleted.redirect()
}
