//! Firestore REST client implementation.
//!
//! Uses the Firestore REST v1 surface with `reqwest`, speaking the enveloped
//! value encoding from [`value`]. Whole-collection reads and single-document
//! reads are cached with `moka` (5-minute TTL) and invalidated by every
//! write to the affected collection.

pub mod value;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::config::FirestoreConfig;

use super::{Doc, DocumentStore, MAX_BATCH_SIZE, SortDirection, StoreError};
use value::{from_document_fields, to_document_fields, to_firestore_value};

const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
const CACHE_CAPACITY: u64 = 1000;
const PAGE_SIZE: i64 = 300;

/// Client for the Firestore REST API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    http: reqwest::Client,
    /// `https://firestore.googleapis.com/v1/<root>`
    documents_url: String,
    /// `projects/<p>/databases/<db>/documents`, the prefix of document names.
    root: String,
    api_key: SecretString,
    cache: Cache<String, CacheValue>,
}

#[derive(Clone)]
enum CacheValue {
    One(Doc),
    All(Vec<Doc>),
}

const fn direction_str(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "ASCENDING",
        SortDirection::Descending => "DESCENDING",
    }
}

impl FirestoreClient {
    /// Create a new client for the configured project.
    #[must_use]
    pub fn new(config: &FirestoreConfig) -> Self {
        let root = format!(
            "projects/{}/databases/{}/documents",
            config.project_id, config.database
        );
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(FirestoreClientInner {
                http: reqwest::Client::new(),
                documents_url: format!("https://firestore.googleapis.com/v1/{root}"),
                root,
                api_key: config.api_key.clone(),
                cache,
            }),
        }
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.inner.documents_url)
    }

    fn doc_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.inner.root)
    }

    /// Send one request and decode the response body.
    ///
    /// Non-success statuses become `StoreError::Status` with the message the
    /// store put in its error payload.
    async fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, StoreError> {
        let mut request = self
            .inner
            .http
            .request(method, url)
            .query(&[("key", self.inner.api_key.expose_secret())])
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(payload);
        }

        let message = payload
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("no error details")
            .to_owned();
        Err(StoreError::Status {
            code: status.as_u16(),
            message,
        })
    }

    /// Parse a `{name, fields}` document resource.
    fn parse_doc(resource: &Value) -> Option<Doc> {
        let name = resource.get("name")?.as_str()?;
        let id = name.rsplit('/').next()?.to_owned();
        let data = from_document_fields(resource.get("fields").unwrap_or(&json!({})));
        Some(Doc { id, data })
    }

    async fn run_query(&self, structured_query: Value) -> Result<Vec<Doc>, StoreError> {
        let url = format!("{}:runQuery", self.inner.documents_url);
        let payload = self
            .request(
                reqwest::Method::POST,
                &url,
                &[],
                Some(json!({ "structuredQuery": structured_query })),
            )
            .await?;

        // The response is a stream of result envelopes; entries without a
        // `document` key carry read metadata only.
        let docs = payload
            .as_array()
            .map_or_else(Vec::new, |results| {
                results
                    .iter()
                    .filter_map(|entry| entry.get("document"))
                    .filter_map(Self::parse_doc)
                    .collect()
            });
        Ok(docs)
    }

    async fn invalidate(&self, collection: &str, ids: &[&str]) {
        self.inner.cache.invalidate(&format!("all:{collection}")).await;
        for id in ids {
            self.inner
                .cache
                .invalidate(&format!("doc:{collection}/{id}"))
                .await;
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self))]
    async fn get_all(&self, collection: &str) -> Result<Vec<Doc>, StoreError> {
        let cache_key = format!("all:{collection}");
        if let Some(CacheValue::All(docs)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for collection");
            return Ok(docs);
        }

        let url = format!("{}/{collection}", self.inner.documents_url);
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let payload = self
                .request(reqwest::Method::GET, &url, &query, None)
                .await?;

            if let Some(page) = payload.get("documents").and_then(Value::as_array) {
                docs.extend(page.iter().filter_map(Self::parse_doc));
            }

            match payload.get("nextPageToken").and_then(Value::as_str) {
                Some(token) => page_token = Some(token.to_owned()),
                None => break,
            }
        }

        self.inner
            .cache
            .insert(cache_key, CacheValue::All(docs.clone()))
            .await;
        Ok(docs)
    }

    #[instrument(skip(self))]
    async fn get_all_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Doc>, StoreError> {
        self.run_query(json!({
            "from": [{ "collectionId": collection }],
            "orderBy": [{
                "field": { "fieldPath": order_by },
                "direction": direction_str(direction),
            }],
        }))
        .await
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Doc>, StoreError> {
        let cache_key = format!("doc:{collection}/{id}");
        if let Some(CacheValue::One(doc)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for document");
            return Ok(Some(doc));
        }

        let url = self.doc_url(collection, id);
        match self.request(reqwest::Method::GET, &url, &[], None).await {
            Ok(payload) => {
                let doc = Self::parse_doc(&payload);
                if let Some(doc) = &doc {
                    self.inner
                        .cache
                        .insert(cache_key, CacheValue::One(doc.clone()))
                        .await;
                }
                Ok(doc)
            }
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self, value))]
    async fn query_eq_ordered(
        &self,
        collection: &str,
        field: &str,
        value: Value,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Doc>, StoreError> {
        self.run_query(json!({
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": to_firestore_value(&value),
                }
            },
            "orderBy": [{
                "field": { "fieldPath": order_by },
                "direction": direction_str(direction),
            }],
        }))
        .await
    }

    #[instrument(skip(self, data))]
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let url = format!("{}/{collection}", self.inner.documents_url);
        let payload = self
            .request(
                reqwest::Method::POST,
                &url,
                &[],
                Some(json!({ "fields": to_document_fields(&data) })),
            )
            .await?;

        let doc = Self::parse_doc(&payload).ok_or(StoreError::Status {
            code: 500,
            message: "created document has no name".to_owned(),
        })?;
        self.invalidate(collection, &[&doc.id]).await;
        Ok(doc.id)
    }

    #[instrument(skip(self, data))]
    async fn upsert(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let url = self.doc_url(collection, id);
        self.request(
            reqwest::Method::PATCH,
            &url,
            &[],
            Some(json!({ "fields": to_document_fields(&data) })),
        )
        .await?;
        self.invalidate(collection, &[id]).await;
        Ok(())
    }

    #[instrument(skip(self, fields))]
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let url = self.doc_url(collection, id);
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.clone()))
            .collect();
        // Fail instead of creating a new document when the target is gone
        query.push(("currentDocument.exists", "true".to_owned()));

        self.request(
            reqwest::Method::PATCH,
            &url,
            &query,
            Some(json!({ "fields": to_document_fields(&Value::Object(fields)) })),
        )
        .await?;
        self.invalidate(collection, &[id]).await;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        let url = format!("{}:commit", self.inner.documents_url);
        self.request(
            reqwest::Method::POST,
            &url,
            &[],
            Some(json!({
                "writes": [{
                    "transform": {
                        "document": self.doc_name(collection, id),
                        "fieldTransforms": [{
                            "fieldPath": field,
                            "increment": { "integerValue": delta.to_string() },
                        }],
                    },
                    "currentDocument": { "exists": true },
                }],
            })),
        )
        .await?;
        self.invalidate(collection, &[id]).await;
        Ok(())
    }

    #[instrument(skip(self, docs), fields(count = docs.len()))]
    async fn batch_upsert(
        &self,
        collection: &str,
        docs: &[(String, Value)],
    ) -> Result<(), StoreError> {
        if docs.len() > MAX_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge { len: docs.len() });
        }

        let writes: Vec<Value> = docs
            .iter()
            .map(|(id, data)| {
                json!({
                    "update": {
                        "name": self.doc_name(collection, id),
                        "fields": to_document_fields(data),
                    }
                })
            })
            .collect();

        let url = format!("{}:batchWrite", self.inner.documents_url);
        let payload = self
            .request(reqwest::Method::POST, &url, &[], Some(json!({ "writes": writes })))
            .await?;
        check_batch_status(&payload)?;

        let ids: Vec<&str> = docs.iter().map(|(id, _)| id.as_str()).collect();
        self.invalidate(collection, &ids).await;
        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<(), StoreError> {
        if ids.len() > MAX_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge { len: ids.len() });
        }

        let writes: Vec<Value> = ids
            .iter()
            .map(|id| json!({ "delete": self.doc_name(collection, id) }))
            .collect();

        let url = format!("{}:batchWrite", self.inner.documents_url);
        let payload = self
            .request(reqwest::Method::POST, &url, &[], Some(json!({ "writes": writes })))
            .await?;
        check_batch_status(&payload)?;

        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        self.invalidate(collection, &ids).await;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.doc_url(collection, id);
        match self.request(reqwest::Method::DELETE, &url, &[], None).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
        self.invalidate(collection, &[id]).await;
        Ok(())
    }
}

/// Surface the first failed write in a `:batchWrite` response.
fn check_batch_status(payload: &Value) -> Result<(), StoreError> {
    let Some(statuses) = payload.get("status").and_then(Value::as_array) else {
        return Ok(());
    };
    for status in statuses {
        let code = status.get("code").and_then(Value::as_i64).unwrap_or(0);
        if code != 0 {
            return Err(StoreError::Status {
                code: u16::try_from(code).unwrap_or(500),
                message: status
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("batch write failed")
                    .to_owned(),
            });
        }
    }
    Ok(())
}
