//! Document store boundary.
//!
//! # Architecture
//!
//! All persistence is delegated to an external managed document store.
//! [`DocumentStore`] captures the handful of operations the accessors need
//! (get-all, get-by-id, equality queries, insert, masked update, atomic
//! increment, batched writes, delete) behind explicit `Result` returns -
//! there is no thrown-exception control flow, and the accessor layer decides
//! per call whether a read error degrades to fallback data.
//!
//! Implementations:
//!
//! - [`FirestoreClient`] - Firestore REST v1, with a short-TTL read cache
//! - [`MemoryStore`] - in-memory test double with fault injection

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreClient;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum number of writes in a single batch.
///
/// The store's own limit is higher; staying at 400 leaves headroom for
/// bookkeeping writes the backend may add per batch.
pub const MAX_BATCH_SIZE: usize = 400;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned {code}: {message}")]
    Status { code: u16, message: String },

    /// A document did not decode into the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A batch exceeded [`MAX_BATCH_SIZE`]; the caller chunks, not the store.
    #[error("batch of {len} writes exceeds the {MAX_BATCH_SIZE}-write limit")]
    BatchTooLarge { len: usize },

    /// The store is unreachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the error is the store's way of saying "no such document".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { code: 404, .. })
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A raw document: its store-assigned ID plus its fields as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc {
    pub id: String,
    pub data: Value,
}

impl Doc {
    /// Decode into an entity, injecting the document ID as the `id` field.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Decode` if the fields are not an object or do
    /// not match the entity schema.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let Value::Object(mut fields) = self.data else {
            return Err(StoreError::Decode(serde::de::Error::custom(
                "document fields are not an object",
            )));
        };
        fields.insert("id".to_owned(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Serialize an entity to document fields, dropping its `id` field.
///
/// The ID lives in the document name, not in the fields, mirroring how the
/// reading side injects it back in [`Doc::decode`].
///
/// # Errors
///
/// Returns `StoreError::Decode` if the entity does not serialize to a JSON
/// object.
pub fn encode<T: Serialize>(entity: &T) -> Result<Value, StoreError> {
    match serde_json::to_value(entity)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(Value::Object(fields))
        }
        _ => Err(StoreError::Decode(serde::de::Error::custom(
            "entity did not serialize to an object",
        ))),
    }
}

/// The operations the accessors need from the external document store.
///
/// Field paths use dotted notation for nested fields (`customer.email`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection, in store order.
    async fn get_all(&self, collection: &str) -> Result<Vec<Doc>, StoreError>;

    /// All documents in a collection, ordered by a field.
    async fn get_all_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Doc>, StoreError>;

    /// A single document, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Doc>, StoreError>;

    /// Documents whose `field` equals `value`, ordered by `order_by`.
    async fn query_eq_ordered(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Doc>, StoreError>;

    /// Insert a document with a store-generated ID; returns the ID.
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Create or fully replace a document under a caller-chosen ID.
    async fn upsert(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Update only the named fields of an existing document.
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Atomically add `delta` to a numeric field of an existing document.
    ///
    /// This is the store's server-side increment primitive, not a client
    /// read-modify-write, so concurrent adjustments never lose updates.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError>;

    /// Create or replace up to [`MAX_BATCH_SIZE`] documents in one round trip.
    async fn batch_upsert(
        &self,
        collection: &str,
        docs: &[(String, Value)],
    ) -> Result<(), StoreError>;

    /// Delete up to [`MAX_BATCH_SIZE`] documents in one round trip.
    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<(), StoreError>;

    /// Delete a single document; deleting an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: String,
        name: String,
    }

    #[test]
    fn test_decode_injects_id() {
        let doc = Doc {
            id: "abc".to_owned(),
            data: serde_json::json!({ "name": "Ikigai" }),
        };
        let sample: Sample = doc.decode().unwrap();
        assert_eq!(sample.id, "abc");
        assert_eq!(sample.name, "Ikigai");
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let doc = Doc {
            id: "abc".to_owned(),
            data: Value::String("not fields".to_owned()),
        };
        assert!(doc.decode::<Sample>().is_err());
    }

    #[test]
    fn test_encode_strips_id() {
        let sample = Sample {
            id: "abc".to_owned(),
            name: "Ikigai".to_owned(),
        };
        let data = encode(&sample).unwrap();
        assert_eq!(data, serde_json::json!({ "name": "Ikigai" }));
    }
}
