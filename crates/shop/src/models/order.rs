//! Order entity and its frozen line-item snapshots.

use chrono::{DateTime, Utc};
use marigold_core::{BookId, Email, OrderId, OrderStatus, Price};
use serde::{Deserialize, Serialize};

use super::book::Book;

/// A customer order.
///
/// Created atomically from cart contents at checkout and immutable
/// afterwards except for admin-triggered status changes. Invariant:
/// `total == subtotal + shipping` at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub customer: Customer,
    pub payment: PaymentSummary,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Revenue contribution: the order's grand total.
    #[must_use]
    pub const fn revenue(&self) -> Price {
        self.total
    }
}

/// A line item frozen at checkout time.
///
/// Snapshots copy the book fields instead of referencing the catalog, so a
/// later price change or deletion never rewrites order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    /// Absent on records written before categories were denormalized onto
    /// line items; analytics fall back to a title lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: Price,
    pub quantity: u32,
    pub cover: String,
}

impl OrderItem {
    /// Snapshot a book at a given quantity.
    #[must_use]
    pub fn snapshot(book: &Book, quantity: u32) -> Self {
        let category = if book.category.is_empty() {
            "General".to_owned()
        } else {
            book.category.clone()
        };
        Self {
            book_id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: Some(category),
            price: book.price,
            quantity,
            cover: book.cover.clone(),
        }
    }

    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Shipping and contact details captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub zip: String,
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
}

/// The payment record persisted with an order.
///
/// Only the method and last four card digits are stored; the full card
/// number never reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub method: PaymentMethod,
    pub last4: String,
}

impl PaymentSummary {
    /// Placeholder summary for records without payment details.
    #[must_use]
    pub fn redacted() -> Self {
        Self {
            method: PaymentMethod::Card,
            last4: "****".to_owned(),
        }
    }
}

/// Raw payment input from the checkout form.
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    pub card_number: String,
}

impl PaymentDetails {
    /// Reduce the raw details to the persistable summary.
    #[must_use]
    pub fn summarize(&self) -> PaymentSummary {
        let digits: String = self.card_number.chars().filter(char::is_ascii_digit).collect();
        if digits.len() >= 4 {
            PaymentSummary {
                method: PaymentMethod::Card,
                last4: digits.chars().skip(digits.len() - 4).collect(),
            }
        } else {
            PaymentSummary::redacted()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_summarize_last4() {
        let details = PaymentDetails {
            card_number: "4111 1111 1111 1234".to_owned(),
        };
        let summary = details.summarize();
        assert_eq!(summary.method, PaymentMethod::Card);
        assert_eq!(summary.last4, "1234");
    }

    #[test]
    fn test_payment_summarize_short_input_redacts() {
        let details = PaymentDetails {
            card_number: "12".to_owned(),
        };
        assert_eq!(details.summarize().last4, "****");
    }

    #[test]
    fn test_snapshot_defaults_empty_category() {
        let mut book = Book {
            id: BookId::new("1"),
            title: "Wings of Fire".to_owned(),
            author: "Dr. A.P.J. Abdul Kalam".to_owned(),
            category: String::new(),
            price: Price::from_rupees(199),
            original_price: None,
            rating: None,
            stock: 100,
            cover: "https://covers.example.com/4.jpg".to_owned(),
            author_image: None,
            description: String::new(),
        };

        let item = OrderItem::snapshot(&book, 3);
        assert_eq!(item.category.as_deref(), Some("General"));
        assert_eq!(item.line_total(), Price::from_rupees(597));

        book.category = "Biography".to_owned();
        let item = OrderItem::snapshot(&book, 1);
        assert_eq!(item.category.as_deref(), Some("Biography"));
    }
}
