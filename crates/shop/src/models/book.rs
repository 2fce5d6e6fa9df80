//! Book catalog entity.

use marigold_core::{BookId, Price};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ValidationError;

/// A book in the catalog.
///
/// Books are created by catalog seeding or admin create, mutated by admin
/// edits and by the stock decrement that order creation issues. Deleting a
/// book has no cascading effect on historical orders - orders hold frozen
/// snapshots of the fields they need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: Price,
    /// Strike-through price shown next to a discounted `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Average rating on a 0-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub stock: i64,
    /// Cover image URL.
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    pub description: String,
}

/// Payload for creating a new book; the store assigns or receives the ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub stock: i64,
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    pub description: String,
}

impl BookDraft {
    /// Validate the draft's invariants before it reaches the store.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: positive price, original price
    /// above selling price, rating within [0, 5], non-negative stock, and
    /// non-empty title/author.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::EmptyField("author"));
        }
        if !self.price.is_positive() {
            return Err(ValidationError::NonPositivePrice);
        }
        if let Some(original) = self.original_price
            && original <= self.price
        {
            return Err(ValidationError::OriginalPriceNotAbovePrice);
        }
        if let Some(rating) = self.rating
            && !(0.0..=5.0).contains(&rating)
        {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        if self.stock < 0 {
            return Err(ValidationError::NegativeStock(self.stock));
        }
        Ok(())
    }

    /// Attach a store-assigned ID, producing the full entity.
    #[must_use]
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            category: self.category,
            price: self.price,
            original_price: self.original_price,
            rating: self.rating,
            stock: self.stock,
            cover: self.cover,
            author_image: self.author_image,
            description: self.description,
        }
    }
}

/// Partial update for an existing book; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookPatch {
    /// Validate the fields the patch actually sets.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant among the set fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(price) = self.price
            && !price.is_positive()
        {
            return Err(ValidationError::NonPositivePrice);
        }
        if let (Some(original), Some(price)) = (self.original_price, self.price)
            && original <= price
        {
            return Err(ValidationError::OriginalPriceNotAbovePrice);
        }
        if let Some(rating) = self.rating
            && !(0.0..=5.0).contains(&rating)
        {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err(ValidationError::NegativeStock(stock));
        }
        Ok(())
    }

    /// The set fields as a field-name -> value map for a masked update.
    ///
    /// # Panics
    ///
    /// Does not panic: the patch serializes to a JSON object by construction.
    #[must_use]
    pub fn fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Whether the patch sets no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> BookDraft {
        BookDraft {
            title: "The Palace of Illusions".to_owned(),
            author: "Chitra Banerjee Divakaruni".to_owned(),
            category: "Fiction".to_owned(),
            price: Price::from_rupees(399),
            original_price: Some(Price::from_rupees(499)),
            rating: Some(4.8),
            stock: 25,
            cover: "https://covers.example.com/1.jpg".to_owned(),
            author_image: None,
            description: "The Mahabharata reimagined.".to_owned(),
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_draft_rejects_non_positive_price() {
        let mut d = draft();
        d.price = Price::ZERO;
        d.original_price = None;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::NonPositivePrice)
        ));
    }

    #[test]
    fn test_draft_rejects_original_price_below_price() {
        let mut d = draft();
        d.original_price = Some(Price::from_rupees(399));
        assert!(matches!(
            d.validate(),
            Err(ValidationError::OriginalPriceNotAbovePrice)
        ));
    }

    #[test]
    fn test_draft_rejects_out_of_range_rating() {
        let mut d = draft();
        d.rating = Some(5.1);
        assert!(matches!(
            d.validate(),
            Err(ValidationError::RatingOutOfRange(_))
        ));
    }

    #[test]
    fn test_draft_rejects_negative_stock() {
        let mut d = draft();
        d.stock = -1;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::NegativeStock(-1))
        ));
    }

    #[test]
    fn test_patch_fields_only_include_set_values() {
        let patch = BookPatch {
            price: Some(Price::from_rupees(450)),
            stock: Some(12),
            ..BookPatch::default()
        };

        let fields = patch.fields();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("stock"));
        assert!(!patch.is_empty());
        assert!(BookPatch::default().is_empty());
    }

    #[test]
    fn test_book_serde_roundtrip_keeps_optionals() {
        let book = draft().into_book(BookId::new("1"));
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["originalPrice"], "499");
        // Unset optionals are omitted entirely, not serialized as null
        assert!(json.get("authorImage").is_none());

        let back: Book = serde_json::from_value(json).unwrap();
        assert_eq!(back, book);
    }
}
