//! Prices as they travel through the cart.
//!
//! Line items keep their unit price as fixed two-decimal text (e.g. `"9.50"`),
//! exactly as it was shown when the item was added. Arithmetic happens on
//! [`Decimal`]; text that does not parse counts as zero.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency symbol used for every displayed amount.
pub const CURRENCY_SYMBOL: &str = "$";

/// A unit price stored as fixed two-decimal text.
///
/// ```
/// use mi_catalogo_core::UnitPrice;
/// use rust_decimal::Decimal;
///
/// let price = UnitPrice::from_amount(Decimal::new(95, 1));
/// assert_eq!(price.as_str(), "9.50");
/// assert_eq!(price.display(), "$9.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitPrice(String);

impl UnitPrice {
    /// Format an amount as two-decimal text, rounding half away from zero.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self(format_two_decimals(amount))
    }

    /// Returns the price text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the price; text that does not parse is zero.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::from_str(self.0.trim()).unwrap_or(Decimal::ZERO)
    }

    /// Currency-formatted price (e.g. `"$9.50"`).
    #[must_use]
    pub fn display(&self) -> String {
        format_currency(self.amount())
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Decimal> for UnitPrice {
    fn from(amount: Decimal) -> Self {
        Self::from_amount(amount)
    }
}

/// Format an amount with the currency symbol and exactly two decimals.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{}", format_two_decimals(amount))
}

fn format_two_decimals(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Parse a price out of loosely formatted display text such as `"$1,50"`.
///
/// Everything except digits, `.`, `,` and `-` is stripped, the first `,` is
/// treated as the decimal separator, and the result is parsed. Unparseable
/// text yields zero and negative amounts are clamped to zero.
///
/// ```
/// use mi_catalogo_core::parse_price_text;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price_text("$9.50"), Decimal::new(95, 1));
/// assert_eq!(parse_price_text("1,20 MXN"), Decimal::new(12, 1));
/// assert_eq!(parse_price_text("gratis"), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_price_text(text: &str) -> Decimal {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    let normalized = kept.replacen(',', ".", 1);

    Decimal::from_str(normalized.trim())
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_amount_pads_and_rounds() {
        assert_eq!(UnitPrice::from_amount(Decimal::new(95, 1)).as_str(), "9.50");
        assert_eq!(UnitPrice::from_amount(Decimal::new(12, 0)).as_str(), "12.00");
        assert_eq!(UnitPrice::from_amount(Decimal::new(1005, 3)).as_str(), "1.01");
        assert_eq!(UnitPrice::from_amount(Decimal::ZERO).as_str(), "0.00");
    }

    #[test]
    fn test_amount_treats_garbage_as_zero() {
        let price: UnitPrice = serde_json::from_str("\"not a number\"").unwrap();
        assert_eq!(price.amount(), Decimal::ZERO);
        assert_eq!(price.display(), "$0.00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::new(2850, 2)), "$28.50");
        assert_eq!(format_currency(Decimal::new(107, 1)), "$10.70");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_parse_price_text_strips_currency() {
        assert_eq!(parse_price_text("$9.50"), Decimal::new(95, 1));
        assert_eq!(parse_price_text("  $ 12 "), Decimal::new(12, 0));
    }

    #[test]
    fn test_parse_price_text_comma_decimal_separator() {
        assert_eq!(parse_price_text("$1,20"), Decimal::new(12, 1));
    }

    #[test]
    fn test_parse_price_text_only_first_comma_is_normalized() {
        // "1,234,5" becomes "1.234,5", which does not parse.
        assert_eq!(parse_price_text("1,234,5"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_price_text_failures_default_to_zero() {
        assert_eq!(parse_price_text(""), Decimal::ZERO);
        assert_eq!(parse_price_text("sin precio"), Decimal::ZERO);
        assert_eq!(parse_price_text("1.2.3"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_price_text_clamps_negative() {
        assert_eq!(parse_price_text("-5.00"), Decimal::ZERO);
    }
}
