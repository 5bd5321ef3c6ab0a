//! Product API commands.

use mi_catalogo_core::format_currency;
use mi_catalogo_storefront::catalog::{CatalogError, ProductApiClient, count_label};

/// Log every product the API returns.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the API call fails.
pub async fn list(api_base: &str) -> Result<(), CatalogError> {
    let client = ProductApiClient::new(api_base)?;
    tracing::info!(api_base, "Fetching products...");

    let products = client.list().await?;
    for product in &products {
        tracing::info!(
            id = %product.id,
            category = %product.category,
            "{} {}",
            format_currency(product.price),
            product.name
        );
    }
    tracing::info!("{}", count_label(products.len()));
    Ok(())
}
