//! Marigold Core - Shared types library.
//!
//! This crate provides common types used across all Marigold Books components:
//! - `shop` - Storefront/admin domain layer (catalog, cart, orders, analytics)
//! - `cli` - Command-line tools for seeding and store management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   the order status state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
