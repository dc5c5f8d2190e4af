// storefront/src/lib.rs

//! Storefront backend: order placement, the order status lifecycle, cart
//! reads and item reviews, plus the client-side optimistic update controller.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use errors::{AppError, Result};
pub use state::AppState;
