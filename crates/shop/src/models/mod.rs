//! Domain entities persisted in the document store.
//!
//! Entities have an explicit schema: every field is typed, optional fields
//! are true optionals, and drafts are validated before they cross the store
//! boundary. Store documents carry the entity fields; the document ID is
//! injected as `id` on read and stripped on write.

pub mod book;
pub mod order;

pub use book::{Book, BookDraft, BookPatch};
pub use order::{Customer, Order, OrderItem, PaymentDetails, PaymentMethod, PaymentSummary};

use thiserror::Error;

/// A draft entity failed validation at the store boundary.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Price must be strictly positive.
    #[error("price must be greater than zero")]
    NonPositivePrice,

    /// A strike-through price must exceed the selling price.
    #[error("original price must be greater than the selling price")]
    OriginalPriceNotAbovePrice,

    /// Ratings live on a five-star scale.
    #[error("rating must be between 0 and 5, got {0}")]
    RatingOutOfRange(f64),

    /// Stock counts cannot go negative.
    #[error("stock must not be negative, got {0}")]
    NegativeStock(i64),

    /// A required text field is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
