//! Line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItemId;
use crate::types::UnitPrice;

/// One distinct product entry in the cart.
///
/// Serialized with camelCase keys, which is the persisted schema:
/// `{"id", "name", "unitPrice", "quantity", "imageUrl"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Derived from `name` and `unit_price`.
    pub id: LineItemId,
    pub name: String,
    pub unit_price: UnitPrice,
    /// Never zero while the item is in a [`Cart`](super::Cart).
    pub quantity: u32,
    /// May be empty.
    #[serde(default)]
    pub image_url: String,
}

impl LineItem {
    /// `unit_price × quantity`, with an unparseable price counting as zero.
    ///
    /// Saturates at [`Decimal::MAX`] instead of overflowing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .amount()
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// What a product card contributes when it is added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub name: String,
    pub unit_price: UnitPrice,
    pub image_url: String,
}

impl NewLineItem {
    /// The id this item will be stored under.
    #[must_use]
    pub fn id(&self) -> LineItemId {
        LineItemId::derive(&self.name, self.unit_price.as_str())
    }
}
