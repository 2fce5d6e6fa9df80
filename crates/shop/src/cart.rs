//! Session-scoped shopping cart.
//!
//! The cart belongs to one active session and has a single writer, so it is
//! plain mutable state with no interior locking. It holds book snapshots,
//! not catalog references, and deliberately performs no stock check - stock
//! is enforced at order time by the external store, if at all.
//!
//! Invariants: at most one line per book ID; no line with quantity zero
//! (decrementing to zero removes the line). Totals are recomputed on every
//! read, so there is no cached value to fall out of sync.

use marigold_core::{BookId, Price};
use serde::{Deserialize, Serialize};

use crate::models::Book;

/// One cart line: a book snapshot at a quantity of at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub book: Book,
    pub quantity: u32,
}

impl CartLine {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.book.price * self.quantity
    }
}

/// The shopping cart for the active session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` copies of a book, merging into an existing line.
    ///
    /// Adding zero copies is a no-op rather than an empty line.
    pub fn add(&mut self, book: Book, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| line.book.id == book.id) {
            line.quantity += quantity;
        } else {
            self.lines.push(CartLine { book, quantity });
        }
    }

    /// Remove a line; removing an absent book is not an error.
    pub fn remove(&mut self, book_id: &BookId) {
        self.lines.retain(|line| line.book.id != *book_id);
    }

    /// Overwrite a line's quantity; zero or below removes the line.
    pub fn set_quantity(&mut self, book_id: &BookId, quantity: i64) {
        let Ok(quantity @ 1..) = u32::try_from(quantity) else {
            self.remove(book_id);
            return;
        };
        if let Some(line) = self.lines.iter_mut().find(|line| line.book.id == *book_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart; called after successful checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn book(id: &str, rupees: i64) -> Book {
        Book {
            id: BookId::new(id),
            title: format!("Book {id}"),
            author: "Author".to_owned(),
            category: "Fiction".to_owned(),
            price: Price::from_rupees(rupees),
            original_price: None,
            rating: None,
            stock: 10,
            cover: String::new(),
            description: String::new(),
            author_image: None,
        }
    }

    #[test]
    fn test_add_merges_by_book_id() {
        let mut cart = Cart::new();
        cart.add(book("1", 399), 1);
        cart.add(book("1", 399), 2);
        cart.add(book("2", 350), 1);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.count(), 4);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add(book("1", 399), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(book("1", 399), 2);

        cart.set_quantity(&BookId::new("1"), 0);
        assert!(cart.is_empty());

        // Negative quantities behave like zero
        cart.add(book("1", 399), 1);
        cart.set_quantity(&BookId::new("1"), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::new();
        cart.add(book("1", 399), 2);
        cart.set_quantity(&BookId::new("1"), 5);
        assert_eq!(cart.count(), 5);

        // Setting an absent book does nothing
        cart.set_quantity(&BookId::new("9"), 5);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_absent_book_is_noop() {
        let mut cart = Cart::new();
        cart.add(book("1", 399), 1);
        cart.remove(&BookId::new("9"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_matches_reference_scenario() {
        // Book A at 399 x2 plus book B at 350 x1
        let mut cart = Cart::new();
        cart.add(book("1", 399), 2);
        cart.add(book("2", 350), 1);
        assert_eq!(cart.total(), Price::from_rupees(1148));
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut cart = Cart::new();
        cart.add(book("1", 399), 2);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.count(), 0);
    }
}
