//! Marigold Books domain layer.
//!
//! The storefront and admin dashboard are thin consumers of this crate:
//!
//! - [`catalog`] - book reads with a built-in fallback dataset, admin
//!   mutations, atomic stock adjustment, seeding
//! - [`cart`] - the session-scoped cart store
//! - [`orders`] - checkout, order feeds (with flagged demo data), status
//!   changes
//! - [`analytics`] - pure reducers deriving the dashboard views from the
//!   full order list
//! - [`store`] - the document-store boundary (Firestore REST client plus an
//!   in-memory test double)
//! - [`auth`] - the auth provider client and auth-state subscription
//!
//! # Error policy
//!
//! Read paths never surface a raw store error: they substitute fallback or
//! demo data so a consumer always has something to render. Write paths
//! propagate, and the non-transactional checkout sequence reports partial
//! stock failures explicitly rather than losing them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod orders;
pub mod state;
pub mod store;

pub use cart::{Cart, CartLine};
pub use config::{ShippingPolicy, ShopConfig};
pub use error::{Result, ShopError};
pub use state::Shop;
