//! Mi Catálogo Core - Shared types library.
//!
//! This crate provides the domain types used across all Mi Catálogo components:
//! - `storefront` - The catalog site with the floating cart drawer
//! - `cli` - Command-line tools for inspecting the stored cart and catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and roles
//! - [`cart`] - Line items, the cart, and its mutation operations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartSummary, LineItem, LineItemId, NewLineItem};
pub use types::*;
