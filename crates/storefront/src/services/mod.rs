//! Business logic services for storefront.
//!
//! - `auth` - Sign-in with role derived from the email domain

pub mod auth;
