//! Product surface bridge.
//!
//! Connects the product grid to the cart. After every grid render the bridge
//! makes sure each product card carries an "add to cart" control and records
//! the cards, so that an add action can later be resolved back to the card's
//! name, price and image.
//!
//! Cards are referenced by their `data-id` attribute, so a page rendered
//! before the catalog changed still adds the product the shopper clicked, or
//! nothing if that product is gone. Cards without a `data-id` fall back to
//! their position in the grid.

pub mod extract;

use std::sync::{LazyLock, PoisonError, RwLock};

use mi_catalogo_core::NewLineItem;
use regex::Regex;
use thiserror::Error;
use url::Url;

pub use extract::{DEFAULT_PRODUCT_NAME, line_item_from_card};

/// A whole `article.product-card` element.
static CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<article\b[^>]*\bclass="(?:[^"]*\s)?product-card(?:\s[^"]*)?"[^>]*>.*?</article>"#,
    )
    .expect("Invalid regex")
});

/// An element carrying the `add-to-cart` class.
static ADD_CONTROL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bclass="(?:[^"]*\s)?add-to-cart(?:\s[^"]*)?""#).expect("Invalid regex")
});

/// The `data-id` attribute of a card's opening tag.
static DATA_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<article\b[^>]*\bdata-id="([^"]*)""#).expect("Invalid regex"));

const CARD_CLOSE: &str = "</article>";

/// Bridge errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The referenced card is not in the last rendered grid.
    #[error("no product card {0:?}")]
    UnknownCard(String),
}

/// Receives the product grid after each render pass.
///
/// Returns the markup to publish, which may differ from the input. The
/// returned markup is never fed back to listeners.
pub trait GridListener: Send + Sync {
    fn grid_rendered(&self, grid_html: &str) -> String;
}

/// A product card as published, with the reference its add control posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCard {
    pub reference: String,
    pub html: String,
}

/// Grid markup with add controls in place, and the cards it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedGrid {
    pub html: String,
    pub cards: Vec<GridCard>,
}

/// The card's `data-id`, or its position when it has none.
fn card_reference(card_html: &str, index: usize) -> String {
    DATA_ID_RE
        .captures(card_html)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| index.to_string(), |id| id.as_str().to_string())
}

/// Give every product card exactly one add-to-cart control.
///
/// Cards that already have one are left as they are, so running this on its
/// own output changes nothing. A grid without cards is returned unchanged.
#[must_use]
pub fn ensure_add_controls(grid_html: &str) -> AugmentedGrid {
    let mut html = String::with_capacity(grid_html.len());
    let mut cards = Vec::new();
    let mut last = 0;

    for (index, card) in CARD_RE.find_iter(grid_html).enumerate() {
        html.push_str(&grid_html[last..card.start()]);

        let card_html = card.as_str();
        let reference = card_reference(card_html, index);
        let card_html = if ADD_CONTROL_RE.is_match(card_html) {
            card_html.to_string()
        } else {
            let body = &card_html[..card_html.len() - CARD_CLOSE.len()];
            format!("{body}{}{CARD_CLOSE}", add_control(&reference))
        };

        html.push_str(&card_html);
        cards.push(GridCard {
            reference,
            html: card_html,
        });
        last = card.end();
    }
    html.push_str(&grid_html[last..]);

    AugmentedGrid { html, cards }
}

fn add_control(card: &str) -> String {
    format!(
        r#"<form class="add-to-cart" method="post" action="/cart/add"><input type="hidden" name="card" value="{card}"><button type="submit">➕ Agregar</button></form>"#
    )
}

/// Remembers the cards of the last rendered grid and resolves add actions.
pub struct CardBridge {
    base_url: Url,
    cards: RwLock<Vec<GridCard>>,
}

impl CardBridge {
    /// Create a bridge that resolves relative image URLs against `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            cards: RwLock::new(Vec::new()),
        }
    }

    /// Number of cards in the last rendered grid.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Extract the line item for the card whose reference is `card`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownCard`] if the last rendered grid has no
    /// such card.
    pub fn line_item(&self, card: &str) -> Result<NewLineItem, BridgeError> {
        let cards = self.cards.read().unwrap_or_else(PoisonError::into_inner);
        let found = cards
            .iter()
            .find(|c| c.reference == card)
            .ok_or_else(|| BridgeError::UnknownCard(card.to_string()))?;
        Ok(line_item_from_card(&found.html, &self.base_url))
    }
}

impl GridListener for CardBridge {
    fn grid_rendered(&self, grid_html: &str) -> String {
        let AugmentedGrid { html, cards } = ensure_add_controls(grid_html);
        tracing::debug!(cards = cards.len(), "Product grid observed");
        *self.cards.write().unwrap_or_else(PoisonError::into_inner) = cards;
        html
    }
}
