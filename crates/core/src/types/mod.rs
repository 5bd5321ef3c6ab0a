//! Core types for Mi Catálogo.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{UnitPrice, format_currency, parse_price_text};
pub use role::Role;
