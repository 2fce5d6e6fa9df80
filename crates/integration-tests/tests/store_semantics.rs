//! Store boundary semantics: atomic increments and bounded batches.

#![allow(clippy::unwrap_used)]

use marigold_core::BookId;
use marigold_integration_tests::{book, store_backed_shop};
use marigold_shop::catalog::fallback::fallback_books;
use marigold_shop::store::{DocumentStore, MAX_BATCH_SIZE, encode};

#[tokio::test]
async fn adjust_stock_applies_signed_delta() {
    let (shop, store) = store_backed_shop();
    store
        .upsert(
            "books",
            "1",
            encode(&book("1", "The Palace of Illusions", 399, 25)).unwrap(),
        )
        .await
        .unwrap();

    shop.catalog().adjust_stock(&BookId::new("1"), -3).await.unwrap();

    let doc = store.get("books", "1").await.unwrap().unwrap();
    assert_eq!(doc.data["stock"], 22);
}

#[tokio::test]
async fn concurrent_decrements_never_lose_updates() {
    let (shop, store) = store_backed_shop();
    store
        .upsert(
            "books",
            "1",
            encode(&book("1", "The Palace of Illusions", 399, 25)).unwrap(),
        )
        .await
        .unwrap();

    // Two concurrent checkouts each take one copy
    let id = BookId::new("1");
    let (a, b) = tokio::join!(
        shop.catalog().adjust_stock(&id, -1),
        shop.catalog().adjust_stock(&id, -1),
    );
    a.unwrap();
    b.unwrap();

    let doc = store.get("books", "1").await.unwrap().unwrap();
    assert_eq!(doc.data["stock"], 23);
}

#[tokio::test]
async fn seeding_chunks_batches_under_the_store_limit() {
    let (shop, store) = store_backed_shop();

    // The dataset is larger than one batch, so seeding must chunk
    assert!(fallback_books().len() > MAX_BATCH_SIZE);

    let seeded = shop.catalog().seed_catalog().await.unwrap();
    assert_eq!(seeded, fallback_books().len());
    assert_eq!(store.document_count("books"), fallback_books().len());
}

#[tokio::test]
async fn reset_replaces_whatever_was_there() {
    let (shop, store) = store_backed_shop();
    store
        .upsert("books", "stale", encode(&book("stale", "Stale", 100, 1)).unwrap())
        .await
        .unwrap();

    let seeded = shop.catalog().reset_catalog().await.unwrap();
    assert_eq!(seeded, fallback_books().len());
    assert_eq!(store.document_count("books"), fallback_books().len());
    assert!(store.get("books", "stale").await.unwrap().is_none());
}
