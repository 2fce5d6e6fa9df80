//! Catalog accessor: books, related titles, stock, and seeding.
//!
//! Reads degrade, writes propagate. Every read operation resolves with data
//! even when the external store is missing or failing - the built-in
//! [`fallback`] dataset stands in, and the substitution is logged, never
//! thrown. Admin mutations (`create_book`, `update_book`, `delete_book`)
//! have no fallback path: the built-in dataset is read-only, so they fail
//! with [`CatalogError::NotConfigured`] instead.

pub mod fallback;

use marigold_core::BookId;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::models::{Book, BookDraft, BookPatch, ValidationError};
use crate::store::{Doc, DocumentStore, MAX_BATCH_SIZE, SortDirection, StoreError, encode};

use fallback::fallback_books;

/// Store collection holding the catalog.
pub const BOOKS_COLLECTION: &str = "books";

/// Default result size for related-title lookups.
pub const RELATED_LIMIT: usize = 4;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No store client is configured; admin mutations cannot proceed.
    #[error("catalog store is not configured")]
    NotConfigured,

    /// The book exists neither in the store nor in the fallback dataset.
    #[error("book not found: {0}")]
    NotFound(BookId),

    /// A draft or patch failed validation at the store boundary.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The store failed on a write path (reads degrade instead).
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Accessor for the book catalog.
#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: Option<S>,
}

impl<S: DocumentStore> CatalogService<S> {
    /// Create an accessor over an optional store client.
    ///
    /// `None` runs the catalog in fallback mode: reads serve the built-in
    /// dataset, mutations fail with `NotConfigured`.
    pub const fn new(store: Option<S>) -> Self {
        Self { store }
    }

    /// Whether a store client is present.
    pub const fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// All books.
    ///
    /// Serves the store when reachable; an unreachable or failing store
    /// degrades to the fallback dataset. A reachable but empty store is
    /// seeded from the fallback dataset before returning it.
    #[instrument(skip(self))]
    pub async fn list_books(&self) -> Vec<Book> {
        let Some(store) = &self.store else {
            debug!("no store configured, serving fallback catalog");
            return fallback_books().to_vec();
        };

        match store.get_all(BOOKS_COLLECTION).await {
            Ok(docs) if docs.is_empty() => {
                info!("store catalog is empty, seeding from fallback dataset");
                if let Err(err) = self.seed_catalog().await {
                    warn!(error = %err, "catalog seeding failed");
                }
                fallback_books().to_vec()
            }
            Ok(docs) => decode_books(docs),
            Err(err) => {
                warn!(error = %err, "listing books failed, serving fallback catalog");
                fallback_books().to_vec()
            }
        }
    }

    /// One book by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the book is absent from both the store and
    /// the fallback dataset; a store failure is surfaced only when the
    /// fallback dataset cannot answer either.
    #[instrument(skip(self))]
    pub async fn get_book(&self, id: &BookId) -> Result<Book, CatalogError> {
        let Some(store) = &self.store else {
            return fallback_find(id).ok_or_else(|| CatalogError::NotFound(id.clone()));
        };

        match store.get(BOOKS_COLLECTION, id.as_str()).await {
            Ok(Some(doc)) => match doc.decode() {
                Ok(book) => Ok(book),
                Err(err) => {
                    warn!(error = %err, "stored book failed to decode, trying fallback");
                    fallback_find(id).ok_or(CatalogError::Store(err))
                }
            },
            Ok(None) => fallback_find(id).ok_or_else(|| CatalogError::NotFound(id.clone())),
            Err(err) => {
                warn!(error = %err, "fetching book failed, trying fallback");
                fallback_find(id).ok_or(CatalogError::Store(err))
            }
        }
    }

    /// Up to `limit` books sharing a category, excluding the current one.
    ///
    /// Store results come first (highest rated first); fallback titles fill
    /// any remaining slots, de-duplicated by ID.
    #[instrument(skip(self))]
    pub async fn related_books(
        &self,
        current: &BookId,
        category: &str,
        limit: usize,
    ) -> Vec<Book> {
        let fallback_related = || {
            fallback_books()
                .iter()
                .filter(|book| book.category == category && book.id != *current)
                .cloned()
        };

        let Some(store) = &self.store else {
            return fallback_related().take(limit).collect();
        };

        match store
            .query_eq_ordered(
                BOOKS_COLLECTION,
                "category",
                json!(category),
                "rating",
                SortDirection::Descending,
            )
            .await
        {
            Ok(docs) => {
                let mut related: Vec<Book> = decode_books(docs)
                    .into_iter()
                    .filter(|book| book.id != *current)
                    .collect();

                for book in fallback_related() {
                    if related.len() >= limit {
                        break;
                    }
                    if !related.iter().any(|existing| existing.id == book.id) {
                        related.push(book);
                    }
                }
                related.truncate(limit);
                related
            }
            Err(err) => {
                warn!(error = %err, "related query failed, serving fallback titles");
                fallback_related().take(limit).collect()
            }
        }
    }

    /// Admin: add a new book.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a store, `Invalid` on a bad draft, `Store`
    /// on write failure.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_book(&self, draft: BookDraft) -> Result<Book, CatalogError> {
        let store = self.store.as_ref().ok_or(CatalogError::NotConfigured)?;
        draft.validate()?;

        let data = encode(&draft)?;
        let id = store.insert(BOOKS_COLLECTION, data).await?;
        Ok(draft.into_book(BookId::new(id)))
    }

    /// Admin: update fields of an existing book.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a store, `Invalid` on a bad patch,
    /// `NotFound` when the book is absent, `Store` on write failure.
    #[instrument(skip(self, patch))]
    pub async fn update_book(&self, id: &BookId, patch: &BookPatch) -> Result<(), CatalogError> {
        let store = self.store.as_ref().ok_or(CatalogError::NotConfigured)?;
        patch.validate()?;

        let fields = patch.fields();
        if fields.is_empty() {
            return Ok(());
        }

        store
            .update_fields(BOOKS_COLLECTION, id.as_str(), fields)
            .await
            .map_err(|err| not_found_as(err, id))
    }

    /// Admin: delete a book.
    ///
    /// Historical orders keep their snapshots; nothing cascades.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a store, `Store` on write failure.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: &BookId) -> Result<(), CatalogError> {
        let store = self.store.as_ref().ok_or(CatalogError::NotConfigured)?;
        store.delete(BOOKS_COLLECTION, id.as_str()).await?;
        Ok(())
    }

    /// Apply a signed delta to a book's stock count.
    ///
    /// Uses the store's atomic increment so concurrent orders never lose an
    /// update. Without a store this is a logged no-op, matching the
    /// fallback checkout flow where nothing is persisted.
    ///
    /// # Errors
    ///
    /// `NotFound` when the book is absent, `Store` on write failure.
    #[instrument(skip(self))]
    pub async fn adjust_stock(&self, id: &BookId, delta: i64) -> Result<(), CatalogError> {
        let Some(store) = &self.store else {
            debug!("no store configured, stock adjustment skipped");
            return Ok(());
        };

        store
            .increment(BOOKS_COLLECTION, id.as_str(), "stock", delta)
            .await
            .map_err(|err| not_found_as(err, id))
    }

    /// Write the fallback dataset into the store in bounded batches.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a store, `Store` when a batch fails.
    #[instrument(skip(self))]
    pub async fn seed_catalog(&self) -> Result<usize, CatalogError> {
        let store = self.store.as_ref().ok_or(CatalogError::NotConfigured)?;

        let books = fallback_books();
        info!(
            total = books.len(),
            batches = books.len().div_ceil(MAX_BATCH_SIZE),
            "seeding catalog"
        );

        let mut seeded = 0;
        for chunk in books.chunks(MAX_BATCH_SIZE) {
            let docs = chunk
                .iter()
                .map(|book| Ok((book.id.as_str().to_owned(), encode(book)?)))
                .collect::<Result<Vec<_>, StoreError>>()?;

            store.batch_upsert(BOOKS_COLLECTION, &docs).await?;
            seeded += chunk.len();
            info!(seeded, "seeded batch");
        }
        Ok(seeded)
    }

    /// Wipe the catalog collection and reseed it from the fallback dataset.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a store, `Store` when a delete or seed batch
    /// fails.
    #[instrument(skip(self))]
    pub async fn reset_catalog(&self) -> Result<usize, CatalogError> {
        let store = self.store.as_ref().ok_or(CatalogError::NotConfigured)?;

        let existing = store.get_all(BOOKS_COLLECTION).await?;
        if existing.is_empty() {
            info!("catalog already empty, reseeding");
            return self.seed_catalog().await;
        }

        let ids: Vec<String> = existing.into_iter().map(|doc| doc.id).collect();
        info!(total = ids.len(), "clearing catalog");
        for chunk in ids.chunks(MAX_BATCH_SIZE) {
            store.batch_delete(BOOKS_COLLECTION, chunk).await?;
        }

        self.seed_catalog().await
    }
}

/// Decode documents into books, dropping (and logging) corrupt records.
fn decode_books(docs: Vec<Doc>) -> Vec<Book> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match doc.decode::<Book>() {
                Ok(book) => Some(book),
                Err(err) => {
                    warn!(id = %id, error = %err, "skipping book that failed to decode");
                    None
                }
            }
        })
        .collect()
}

fn fallback_find(id: &BookId) -> Option<Book> {
    fallback_books().iter().find(|book| book.id == *id).cloned()
}

fn not_found_as(err: StoreError, id: &BookId) -> CatalogError {
    if err.is_not_found() {
        CatalogError::NotFound(id.clone())
    } else {
        CatalogError::Store(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use marigold_core::Price;

    fn unconfigured() -> CatalogService<MemoryStore> {
        CatalogService::new(None)
    }

    #[tokio::test]
    async fn test_fallback_mode_serves_reads() {
        let catalog = unconfigured();
        let books = catalog.list_books().await;
        assert!(!books.is_empty());

        let book = catalog.get_book(&BookId::new("1")).await.unwrap();
        assert_eq!(book.price, Price::from_rupees(399));
    }

    #[tokio::test]
    async fn test_fallback_mode_rejects_mutations() {
        let catalog = unconfigured();
        let draft = BookDraft {
            title: "New Title".to_owned(),
            author: "Someone".to_owned(),
            category: "Fiction".to_owned(),
            price: Price::from_rupees(100),
            original_price: None,
            rating: None,
            stock: 1,
            cover: String::new(),
            author_image: None,
            description: String::new(),
        };

        assert!(matches!(
            catalog.create_book(draft).await,
            Err(CatalogError::NotConfigured)
        ));
        assert!(matches!(
            catalog.seed_catalog().await,
            Err(CatalogError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_adjust_stock_without_store_is_noop() {
        let catalog = unconfigured();
        assert!(catalog.adjust_stock(&BookId::new("1"), -3).await.is_ok());
    }
}
