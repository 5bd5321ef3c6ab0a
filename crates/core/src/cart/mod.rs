//! The shopping cart.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, unique by [`LineItemId`].
//! Insertion order is display order; mutations never re-sort. The cart is
//! changed only through four operations:
//!
//! - [`Cart::add_or_increment`]
//! - [`Cart::change_quantity`]
//! - [`Cart::remove`]
//! - [`Cart::clear`]
//!
//! Every operation is total and leaves the cart with unique ids and no
//! zero-quantity items.

mod identity;
mod line_item;

pub use identity::LineItemId;
pub use line_item::{LineItem, NewLineItem};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::format_currency;

/// Ordered collection of line items.
///
/// Serializes as a plain JSON array of line items. Deserialization restores the
/// invariants even for hand-edited data: zero-quantity entries are dropped and
/// duplicate ids are merged into the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

/// Numeric summary shown next to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    /// Sum of all quantities (the badge number).
    pub item_count: u32,
    /// Sum of `unit_price × quantity`.
    pub total: Decimal,
}

impl CartSummary {
    /// Total formatted with the currency symbol and two decimals.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_currency(self.total)
    }
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by id.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Add one unit of a product.
    ///
    /// If an item with the same derived id exists its quantity grows by one;
    /// otherwise a new item with quantity 1 is appended at the end.
    /// Returns the id the item is stored under.
    pub fn add_or_increment(&mut self, item: NewLineItem) -> LineItemId {
        let id = item.id();

        if let Some(existing) = self.items.iter_mut().find(|line| line.id == id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem {
                id: id.clone(),
                name: item.name,
                unit_price: item.unit_price,
                quantity: 1,
                image_url: item.image_url,
            });
        }

        id
    }

    /// Change the quantity of an item by `delta`.
    ///
    /// The new quantity is `max(0, current + delta)`; reaching zero removes the
    /// item. Returns the new quantity, or `None` if no item has this id.
    pub fn change_quantity(&mut self, id: &LineItemId, delta: i64) -> Option<u32> {
        let index = self.items.iter().position(|line| &line.id == id)?;
        let line = self.items.get_mut(index)?;

        let updated = (i64::from(line.quantity) + delta).max(0);
        let quantity = u32::try_from(updated).unwrap_or(u32::MAX);

        if quantity == 0 {
            self.items.remove(index);
        } else {
            line.quantity = quantity;
        }

        Some(quantity)
    }

    /// Drop the item with this id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != id);
        self.items.len() != before
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Sum of line totals; unparseable unit prices count as zero.
    ///
    /// Saturates at [`Decimal::MAX`] instead of overflowing.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.total_quantity(),
            total: self.total(),
        }
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items.into_iter().filter(|item| item.quantity > 0) {
            if let Some(existing) = cart.items.iter_mut().find(|line| line.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                cart.items.push(item);
            }
        }
        cart
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
