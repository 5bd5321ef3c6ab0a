//! Mi Catálogo storefront library.
//!
//! A server-rendered product catalog with a floating cart drawer. The cart
//! lives in memory and is written through to local storage on every change;
//! the catalog comes from an optional remote product API.
//!
//! # Layout
//!
//! - [`storage`] - local key-value storage (files or memory)
//! - [`cart`] - cart session, persistence, drawer and toggle views
//! - [`bridge`] - reads rendered product cards and adds their products to the cart
//! - [`catalog`] - products, the product API client, grid rendering
//! - [`services::auth`] - email sign-in and role derivation
//! - [`routes`] - HTTP handlers and the application router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bridge;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
