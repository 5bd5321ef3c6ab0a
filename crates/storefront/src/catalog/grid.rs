//! Product grid rendering.

use std::sync::Arc;

use askama::Template;
use mi_catalogo_core::format_currency;

use super::{Catalog, Product};
use crate::bridge::GridListener;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    /// Formatted price (e.g. `"$9.50"`).
    pub price: String,
    pub image_url: String,
    pub description: String,
    pub category: String,
    /// Filtered out by the category sidebar.
    pub hidden: bool,
}

impl ProductCardView {
    fn new(product: &Product, category_filter: &str) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: format_currency(product.price),
            image_url: product.image_url.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            hidden: !product.in_category(category_filter),
        }
    }
}

/// The `#productsGrid` container with one card per product.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub cards: Vec<ProductCardView>,
    /// Cards the filter leaves visible. The placeholder shows when this is zero.
    pub visible: usize,
    /// Shows edit/delete controls. Display only; handlers re-check.
    pub is_admin: bool,
}

/// Renders the product grid and hands every render pass to its listeners.
#[derive(Default, Clone)]
pub struct GridRenderer {
    listeners: Vec<Arc<dyn GridListener>>,
}

impl GridRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in registration order, each one
    /// receiving the previous one's output.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn GridListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Render every product of `catalog`, hiding cards outside `category_filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(
        &self,
        catalog: &Catalog,
        category_filter: &str,
        is_admin: bool,
    ) -> Result<String, askama::Error> {
        let cards: Vec<ProductCardView> = catalog
            .products()
            .iter()
            .map(|product| ProductCardView::new(product, category_filter))
            .collect();
        let template = ProductGridTemplate {
            visible: cards.iter().filter(|card| !card.hidden).count(),
            cards,
            is_admin,
        };
        let html = template.render()?;

        Ok(self
            .listeners
            .iter()
            .fold(html, |html, listener| listener.grid_rendered(&html)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use mi_catalogo_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;

    struct Recorder(Mutex<Vec<String>>);

    impl GridListener for Recorder {
        fn grid_rendered(&self, grid_html: &str) -> String {
            self.0.lock().unwrap().push(grid_html.to_string());
            format!("{grid_html}<!-- seen -->")
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Product {
                id: ProductId::new(2),
                name: "Taza <grande>".to_string(),
                price: Decimal::new(125, 1),
                image_url: "https://img.example.com/taza.png".to_string(),
                description: "Cerámica".to_string(),
                category: "cocina".to_string(),
            },
            Product {
                id: ProductId::new(1),
                name: "Playera".to_string(),
                price: Decimal::new(99, 0),
                image_url: String::new(),
                description: String::new(),
                category: "ropa".to_string(),
            },
        ])
    }

    #[test]
    fn test_renders_cards_in_catalog_order() {
        let html = GridRenderer::new().render(&catalog(), "all", false).unwrap();

        assert_eq!(html.matches("<article class=\"product-card\"").count(), 2);
        assert!(html.contains("<div class=\"price\">$12.50</div>"));
        assert!(html.contains("<div class=\"price\">$99.00</div>"));
        assert!(html.contains("Taza &lt;grande&gt;"));
        assert!(html.find("Taza").unwrap() < html.find("Playera").unwrap());
        assert!(!html.contains(" hidden"));
        assert!(!html.contains("edit-btn"));
    }

    #[test]
    fn test_category_filter_hides_other_cards() {
        let html = GridRenderer::new().render(&catalog(), "ropa", false).unwrap();
        assert!(html.contains("data-categoria=\"cocina\" hidden"));
        assert!(html.contains("data-categoria=\"ropa\">"));
    }

    #[test]
    fn test_admin_sees_edit_controls() {
        let html = GridRenderer::new().render(&catalog(), "all", true).unwrap();
        assert!(html.contains("href=\"/products/2/edit\""));
        assert!(html.contains("action=\"/products/1/delete\""));
    }

    #[test]
    fn test_empty_catalog_message() {
        let html = GridRenderer::new()
            .render(&Catalog::default(), "all", false)
            .unwrap();
        assert!(html.contains("No hay productos todavía."));
        assert!(html.contains("id=\"productsGrid\""));
    }

    #[test]
    fn test_empty_category_shows_placeholder() {
        let html = GridRenderer::new()
            .render(&catalog(), "hogar", false)
            .unwrap();
        assert!(html.contains("No hay productos todavía."));
        assert_eq!(html.matches(" hidden>").count(), 2);

        let html = GridRenderer::new().render(&catalog(), "ropa", false).unwrap();
        assert!(!html.contains("No hay productos todavía."));
    }

    #[test]
    fn test_listeners_see_every_pass() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let renderer = GridRenderer::new().with_listener(recorder.clone());

        let first = renderer.render(&catalog(), "all", false).unwrap();
        renderer.render(&Catalog::default(), "all", false).unwrap();

        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(first.ends_with("<!-- seen -->"));
        assert!(!seen[0].contains("<!-- seen -->"));
    }

    #[test]
    fn test_bridge_listener_adds_controls() {
        let bridge = Arc::new(crate::bridge::CardBridge::new(
            url::Url::parse("http://127.0.0.1:5000").unwrap(),
        ));
        let renderer = GridRenderer::new().with_listener(bridge.clone());

        let html = renderer.render(&catalog(), "all", false).unwrap();
        assert_eq!(html.matches("class=\"add-to-cart\"").count(), 2);

        let item = bridge.line_item("2").unwrap();
        assert_eq!(item.name, "Taza <grande>");
        assert_eq!(item.unit_price.as_str(), "12.50");
        assert_eq!(item.image_url, "https://img.example.com/taza.png");
    }
}
