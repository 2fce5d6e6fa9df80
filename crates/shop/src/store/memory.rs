//! In-memory document store.
//!
//! Test double for the external store. Collections live in a mutex-guarded
//! map, so the increment operation is genuinely atomic - two concurrent
//! adjustments both land, which is exactly the contract the accessors rely
//! on from the real store's increment transform.
//!
//! Fault injection (`set_offline`, `fail_next`) lets tests drive the
//! degraded read paths and partial-write scenarios without a network.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Doc, DocumentStore, MAX_BATCH_SIZE, SortDirection, StoreError};

type Collections = HashMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Default)]
struct FaultState {
    offline: bool,
    fail_next: u32,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    collections: Mutex<Collections>,
    faults: Mutex<FaultState>,
}

/// An in-memory [`DocumentStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        lock(&self.inner.faults).offline = offline;
    }

    /// Make the next `n` operations fail with `Unavailable`, then recover.
    pub fn fail_next(&self, n: u32) {
        lock(&self.inner.faults).fail_next = n;
    }

    /// Number of documents currently in a collection.
    #[must_use]
    pub fn document_count(&self, collection: &str) -> usize {
        lock(&self.inner.collections)
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn check_faults(&self) -> Result<(), StoreError> {
        let mut faults = lock(&self.inner.faults);
        if faults.offline {
            return Err(StoreError::Unavailable("store offline".to_owned()));
        }
        if faults.fail_next > 0 {
            faults.fail_next -= 1;
            return Err(StoreError::Unavailable("injected fault".to_owned()));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Look up a possibly-dotted field path inside a document.
fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(data, |value, segment| value.get(segment))
}

/// Total order over JSON values: kind rank first, then value.
fn cmp_json(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    const fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn sort_docs(docs: &mut [Doc], order_by: &str, direction: SortDirection) {
    use std::cmp::Ordering;

    docs.sort_by(|a, b| {
        let ordering = match (lookup(&a.data, order_by), lookup(&b.data, order_by)) {
            (Some(left), Some(right)) => cmp_json(left, right),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Doc>, StoreError> {
        self.check_faults()?;
        let collections = lock(&self.inner.collections);
        Ok(collections.get(collection).map_or_else(Vec::new, |docs| {
            docs.iter()
                .map(|(id, data)| Doc {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect()
        }))
    }

    async fn get_all_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Doc>, StoreError> {
        let mut docs = self.get_all(collection).await?;
        sort_docs(&mut docs, order_by, direction);
        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Doc>, StoreError> {
        self.check_faults()?;
        let collections = lock(&self.inner.collections);
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Doc {
                id: id.to_owned(),
                data: data.clone(),
            }))
    }

    async fn query_eq_ordered(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Doc>, StoreError> {
        let mut docs = self.get_all(collection).await?;
        docs.retain(|doc| lookup(&doc.data, field) == Some(&value));
        sort_docs(&mut docs, order_by, direction);
        Ok(docs)
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        self.check_faults()?;
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = lock(&self.inner.collections);
        collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn upsert(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.check_faults()?;
        let mut collections = lock(&self.inner.collections);
        collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), data);
        Ok(())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.check_faults()?;
        let mut collections = lock(&self.inner.collections);
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::Status {
                code: 404,
                message: format!("no document {collection}/{id}"),
            })?;

        if let Value::Object(existing) = doc {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
        Ok(())
    }

    // Stock counts stay far below f64's integer-safe range (2^52)
    #[allow(clippy::cast_precision_loss)]
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        self.check_faults()?;
        let mut collections = lock(&self.inner.collections);
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::Status {
                code: 404,
                message: format!("no document {collection}/{id}"),
            })?;

        let Some(Value::Number(current)) = doc.get(field) else {
            return Err(StoreError::Status {
                code: 400,
                message: format!("field {field} of {collection}/{id} is not numeric"),
            });
        };

        let updated = current.as_i64().map_or_else(
            || Value::from(current.as_f64().unwrap_or(0.0) + delta as f64),
            |n| Value::from(n + delta),
        );
        if let Value::Object(fields) = doc {
            fields.insert(field.to_owned(), updated);
        }
        Ok(())
    }

    async fn batch_upsert(
        &self,
        collection: &str,
        docs: &[(String, Value)],
    ) -> Result<(), StoreError> {
        self.check_faults()?;
        if docs.len() > MAX_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge { len: docs.len() });
        }
        let mut collections = lock(&self.inner.collections);
        let target = collections.entry(collection.to_owned()).or_default();
        for (id, data) in docs {
            target.insert(id.clone(), data.clone());
        }
        Ok(())
    }

    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<(), StoreError> {
        self.check_faults()?;
        if ids.len() > MAX_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge { len: ids.len() });
        }
        let mut collections = lock(&self.inner.collections);
        if let Some(docs) = collections.get_mut(collection) {
            for id in ids {
                docs.remove(id);
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_faults()?;
        let mut collections = lock(&self.inner.collections);
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_get_roundtrip() {
        let store = MemoryStore::new();
        let id = store
            .insert("books", json!({ "title": "Ikigai" }))
            .await
            .unwrap();

        let doc = store.get("books", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["title"], "Ikigai");
        assert!(store.get("books", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_is_atomic_under_concurrency() {
        let store = MemoryStore::new();
        store
            .upsert("books", "1", json!({ "stock": 25 }))
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            store.increment("books", "1", "stock", -1),
            store.increment("books", "1", "stock", -1),
        );
        a.unwrap();
        b.unwrap();

        let doc = store.get("books", "1").await.unwrap().unwrap();
        assert_eq!(doc.data["stock"], 23);
    }

    #[tokio::test]
    async fn test_increment_missing_document_is_an_error() {
        let store = MemoryStore::new();
        let err = store
            .increment("books", "ghost", "stock", 1)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_query_eq_ordered_with_nested_path() {
        let store = MemoryStore::new();
        for (id, email, created) in [
            ("a", "x@example.com", "2026-08-01T00:00:00Z"),
            ("b", "y@example.com", "2026-08-02T00:00:00Z"),
            ("c", "x@example.com", "2026-08-03T00:00:00Z"),
        ] {
            store
                .upsert(
                    "orders",
                    id,
                    json!({ "customer": { "email": email }, "createdAt": created }),
                )
                .await
                .unwrap();
        }

        let docs = store
            .query_eq_ordered(
                "orders",
                "customer.email",
                json!("x@example.com"),
                "createdAt",
                SortDirection::Descending,
            )
            .await
            .unwrap();

        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
    }

    #[tokio::test]
    async fn test_batch_limits() {
        let store = MemoryStore::new();
        let too_many: Vec<_> = (0..=MAX_BATCH_SIZE)
            .map(|i| (i.to_string(), json!({})))
            .collect();
        assert!(matches!(
            store.batch_upsert("books", &too_many).await,
            Err(StoreError::BatchTooLarge { .. })
        ));

        let ids: Vec<_> = (0..=MAX_BATCH_SIZE).map(|i| i.to_string()).collect();
        assert!(matches!(
            store.batch_delete("books", &ids).await,
            Err(StoreError::BatchTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let store = MemoryStore::new();
        store.fail_next(1);
        assert!(store.get_all("books").await.is_err());
        assert!(store.get_all("books").await.is_ok());

        store.set_offline(true);
        assert!(matches!(
            store.get_all("books").await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
