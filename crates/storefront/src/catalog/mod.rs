//! Product catalog.
//!
//! The catalog is an in-memory list of products, newest first. When a remote
//! product API is configured ([`client::ProductApiClient`]) it is loaded from
//! there at startup and every change is sent to the API before being applied
//! locally.

pub mod client;
pub mod grid;

use mi_catalogo_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::{CatalogError, ProductApiClient};
pub use grid::{GridRenderer, ProductCardView, ProductGridTemplate};

/// Image used when a product is saved without one.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x240?text=Sin+imagen";

/// Category used when a product is saved without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Highest price the product form accepts, in whole currency units.
pub const MAX_PRICE: u64 = 1_000_000_000;

/// Sidebar filter values and their labels. `all` shows every product.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("all", "Todos"),
    ("ropa", "Ropa"),
    ("electronicos", "Electrónicos"),
    ("hogar", "Hogar"),
    ("cocina", "Cocina"),
    ("entretenimiento", "Entretenimiento"),
];

/// A catalog product, with the product API's field names on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "imagen", default)]
    pub image_url: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "categoria", default = "default_category")]
    pub category: String,
}

impl Product {
    /// Whether the sidebar filter `category_filter` shows this product.
    #[must_use]
    pub fn in_category(&self, category_filter: &str) -> bool {
        category_filter == "all" || self.category == category_filter
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A validated product without an id, as sent to the product API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "imagen")]
    pub image_url: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: String,
}

impl ProductInput {
    /// Attach an id.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
            description: self.description,
            category: self.category,
        }
    }
}

/// Product form validation failures. The messages are shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductFormError {
    #[error("Completa nombre y precio.")]
    MissingFields,
    #[error("Precio inválido.")]
    InvalidPrice,
}

/// Raw product form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub precio: String,
    #[serde(default)]
    pub imagen: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub categoria: String,
}

impl ProductForm {
    /// Prefill the form from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            nombre: product.name.clone(),
            precio: product.price.normalize().to_string(),
            imagen: product.image_url.clone(),
            descripcion: product.description.clone(),
            categoria: product.category.clone(),
        }
    }

    /// Validate and normalize the form.
    ///
    /// # Errors
    ///
    /// Returns [`ProductFormError::MissingFields`] if the name or price is
    /// blank, and [`ProductFormError::InvalidPrice`] if the price is not a
    /// number between zero and [`MAX_PRICE`].
    pub fn validate(&self) -> Result<ProductInput, ProductFormError> {
        let name = self.nombre.trim();
        let price = self.precio.trim();
        if name.is_empty() || price.is_empty() {
            return Err(ProductFormError::MissingFields);
        }

        let price: Decimal = price.parse().map_err(|_| ProductFormError::InvalidPrice)?;
        if (price.is_sign_negative() && !price.is_zero()) || price > Decimal::from(MAX_PRICE) {
            return Err(ProductFormError::InvalidPrice);
        }

        let image = self.imagen.trim();
        let category = self.categoria.trim();

        Ok(ProductInput {
            name: name.to_string(),
            price,
            image_url: if image.is_empty() {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                image.to_string()
            },
            description: self.descripcion.trim().to_string(),
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_lowercase()
            },
        })
    }
}

/// The product list shown on the catalog page.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Next id for a product created without a product API.
    #[must_use]
    pub fn next_id(&self) -> ProductId {
        let max = self.products.iter().map(|p| p.id.as_i64()).max().unwrap_or(0);
        ProductId::new(max + 1)
    }

    /// Insert a new product at the front.
    pub fn prepend(&mut self, product: Product) {
        self.products.insert(0, product);
    }

    /// Overwrite the editable fields of an existing product.
    ///
    /// Returns `false` if no product has that id.
    pub fn update(&mut self, id: ProductId, input: ProductInput) -> bool {
        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        *product = input.into_product(id);
        true
    }

    /// Returns `false` if no product has that id.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }

    /// Number of products the sidebar filter `category_filter` shows.
    #[must_use]
    pub fn visible_count(&self, category_filter: &str) -> usize {
        self.products
            .iter()
            .filter(|p| p.in_category(category_filter))
            .count()
    }
}

/// `"1 producto"`, `"N productos"`.
#[must_use]
pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 producto".to_string()
    } else {
        format!("{n} productos")
    }
}

/// Normalize a category filter value. Unknown or empty values mean `all`.
#[must_use]
pub fn category_filter(raw: Option<&str>) -> &'static str {
    let raw = raw.map(str::trim).unwrap_or_default().to_lowercase();
    CATEGORIES
        .iter()
        .map(|(value, _)| *value)
        .find(|value| *value == raw)
        .unwrap_or("all")
}
