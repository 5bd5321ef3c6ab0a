//! Reading product data back out of rendered card markup.
//!
//! Cards are produced by the grid renderer, so the markup is well-formed and
//! uses double-quoted attributes. These helpers only need to find elements by
//! class token and read their text, not parse arbitrary HTML.

use std::sync::LazyLock;

use mi_catalogo_core::{NewLineItem, UnitPrice, parse_price_text};
use regex::Regex;
use url::Url;

/// Name used when a card has no (or an empty) `.name` element.
pub const DEFAULT_PRODUCT_NAME: &str = "Producto";

/// Opening tag of an element whose class list contains `name`.
static NAME_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*\bclass="(?:[^"]*\s)?name(?:\s[^"]*)?"[^>]*>"#)
        .expect("Invalid regex")
});

/// Opening tag of an element whose class list contains `price`.
static PRICE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*\bclass="(?:[^"]*\s)?price(?:\s[^"]*)?"[^>]*>"#)
        .expect("Invalid regex")
});

/// `src` of the first `<img>`.
static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img\b[^>]*\bsrc="([^"]*)""#).expect("Invalid regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|nbsp);").expect("Invalid regex")
});

/// Extract the `(name, price, image)` triple from one card.
#[must_use]
pub fn line_item_from_card(card_html: &str, base_url: &Url) -> NewLineItem {
    NewLineItem {
        name: card_name(card_html),
        unit_price: UnitPrice::from_amount(card_price(card_html)),
        image_url: card_image(card_html, base_url),
    }
}

/// Trimmed text of the card's `.name`, or [`DEFAULT_PRODUCT_NAME`].
#[must_use]
pub fn card_name(card_html: &str) -> String {
    element_text(card_html, &NAME_OPEN_RE)
        .map(|text| text.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string())
}

/// Lenient numeric value of the card's `.price` text. Zero when absent.
#[must_use]
pub fn card_price(card_html: &str) -> rust_decimal::Decimal {
    let text = element_text(card_html, &PRICE_OPEN_RE).unwrap_or_default();
    parse_price_text(&text)
}

/// First image source resolved against `base_url`; empty when there is none.
#[must_use]
pub fn card_image(card_html: &str, base_url: &Url) -> String {
    let Some(caps) = IMG_SRC_RE.captures(card_html) else {
        return String::new();
    };

    let src = decode_entities(&caps[1]);
    let src = src.trim();
    if src.is_empty() {
        return String::new();
    }

    match base_url.join(src) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::debug!(src, error = %e, "Card image source does not resolve");
            String::new()
        }
    }
}

/// Text content (tags stripped, entities decoded) of the first element whose
/// opening tag matches `open_re`.
fn element_text(html: &str, open_re: &Regex) -> Option<String> {
    let caps = open_re.captures(html)?;
    let open = caps.get(0)?;
    let tag = caps.get(1)?.as_str();

    let inner = &html[open.end()..];
    let end = closing_tag_offset(inner, tag).unwrap_or(inner.len());
    let text = TAG_RE.replace_all(&inner[..end], "");
    Some(decode_entities(&text))
}

/// Offset of the `</tag>` that closes an element whose content starts at
/// the beginning of `inner`, accounting for nested elements of the same tag.
fn closing_tag_offset(inner: &str, tag: &str) -> Option<usize> {
    let lower = inner.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut depth = 0usize;
    let mut pos = 0usize;
    loop {
        let next_close = lower[pos..].find(&close).map(|i| pos + i)?;
        let next_open = lower[pos..]
            .match_indices(&open)
            .map(|(i, _)| pos + i)
            .find(|&i| is_tag_boundary(&lower, i + open.len()));

        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                pos = o + open.len();
            }
            _ if depth == 0 => return Some(next_close),
            _ => {
                depth -= 1;
                pos = next_close + close.len();
            }
        }
    }
}

/// `<div` must be followed by whitespace, `>` or `/` to open a `div`.
fn is_tag_boundary(html: &str, at: usize) -> bool {
    html[at..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_whitespace() || c == '>' || c == '/')
}

/// Decode the character references askama and hand-written markup produce.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => {
                    let code = if let Some(hex) = entity
                        .strip_prefix("#x")
                        .or_else(|| entity.strip_prefix("#X"))
                    {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity[1..].parse().ok()
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
