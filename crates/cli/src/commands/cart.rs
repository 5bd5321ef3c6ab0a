//! Stored cart commands.
//!
//! These read and write the same `mi_catalogo_cart_v1` entry the storefront
//! uses. Run them while the storefront is stopped: a running storefront
//! overwrites the entry on its next cart change.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use mi_catalogo_core::Cart;
use mi_catalogo_storefront::cart::CartStore;
use mi_catalogo_storefront::storage::{FileStorage, StorageError};
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Local storage could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn open_store(data_dir: &Path) -> Result<CartStore, CartCommandError> {
    let storage = FileStorage::open(data_dir.to_path_buf())?;
    Ok(CartStore::new(Arc::new(storage)))
}

/// Load the stored cart. Missing or corrupt entries load as an empty cart.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
pub fn load(data_dir: &Path) -> Result<Cart, CartCommandError> {
    Ok(open_store(data_dir)?.load())
}

/// Log every cart line and the total.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be opened.
pub fn show(data_dir: &Path) -> Result<(), CartCommandError> {
    let cart = load(data_dir)?;
    if cart.is_empty() {
        tracing::info!("El carrito está vacío.");
        return Ok(());
    }

    for line in cart.items() {
        tracing::info!(
            id = %line.id,
            "{} × {} {}",
            line.quantity,
            line.unit_price.display(),
            line.name
        );
    }
    let summary = cart.summary();
    tracing::info!(
        items = summary.item_count,
        "Total: {}",
        summary.total_display()
    );
    Ok(())
}

/// Write the cart as pretty JSON to `output`, or stdout.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the output cannot be written.
pub fn export(data_dir: &Path, output: Option<&Path>) -> Result<(), CartCommandError> {
    let cart = load(data_dir)?;
    let json = serde_json::to_string_pretty(&cart)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), lines = cart.len(), "Cart exported");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Replace the stored cart with an empty one.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or written.
pub fn clear(data_dir: &Path) -> Result<(), CartCommandError> {
    open_store(data_dir)?.save(&Cart::new())?;
    tracing::info!("Stored cart cleared");
    Ok(())
}
