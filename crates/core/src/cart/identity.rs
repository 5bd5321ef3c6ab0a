//! Stable line item identities.
//!
//! A line item is identified by what the shopper saw on the product card: its
//! name and its price. The same pair always maps to the same id, across calls,
//! processes, and restarts, which is what lets the cart merge repeated adds.

use core::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Separator placed between name and price before encoding.
const SEPARATOR: &str = "||";

/// Deduplication key of a line item.
///
/// The id is the standard base64 encoding of `name||price`. Encoding UTF-8
/// bytes cannot fail, and prices are normalised decimal text, so distinct
/// (name, price) pairs never share an id.
///
/// ```
/// use mi_catalogo_core::LineItemId;
///
/// let a = LineItemId::derive("Mug", "9.50");
/// let b = LineItemId::derive("Mug", "9.50");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "TXVnfHw5LjUw");
/// assert_ne!(a, LineItemId::derive("Mug", "9.00"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Derive the id for a (name, price) pair.
    #[must_use]
    pub fn derive(name: &str, price: &str) -> Self {
        Self(STANDARD.encode(format!("{name}{SEPARATOR}{price}")))
    }

    /// Wrap an id received from a form or another component without re-deriving it.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LineItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let first = LineItemId::derive("Taza grande", "120.00");
        for _ in 0..10 {
            assert_eq!(LineItemId::derive("Taza grande", "120.00"), first);
        }
    }

    #[test]
    fn test_derive_distinguishes_name_and_price() {
        let mug = LineItemId::derive("Mug", "9.50");
        assert_ne!(mug, LineItemId::derive("Pen", "9.50"));
        assert_ne!(mug, LineItemId::derive("Mug", "1.20"));
        assert_ne!(mug, LineItemId::derive("mug", "9.50"));
    }

    #[test]
    fn test_derive_handles_non_latin_text() {
        let id = LineItemId::derive("Café ☕ orgánico", "85.00");
        assert_eq!(id, LineItemId::derive("Café ☕ orgánico", "85.00"));
        assert!(id.as_str().is_ascii());
    }

    #[test]
    fn test_from_raw_matches_derived() {
        let derived = LineItemId::derive("Mug", "9.50");
        assert_eq!(LineItemId::from_raw(derived.as_str()), derived);
    }
}
