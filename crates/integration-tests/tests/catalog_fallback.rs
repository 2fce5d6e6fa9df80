//! Catalog accessor: degraded reads, seeding, and admin mutations.

#![allow(clippy::unwrap_used)]

use marigold_core::{BookId, Price};
use marigold_integration_tests::{book, offline_shop, store_backed_shop};
use marigold_shop::catalog::{CatalogError, RELATED_LIMIT};
use marigold_shop::catalog::fallback::fallback_books;
use marigold_shop::models::{BookDraft, BookPatch};
use marigold_shop::store::{DocumentStore, encode};

#[tokio::test]
async fn unreachable_store_degrades_list_to_fallback() {
    let (shop, store) = store_backed_shop();
    store.set_offline(true);

    let books = shop.catalog().list_books().await;
    assert_eq!(books.len(), fallback_books().len());
}

#[tokio::test]
async fn offline_shop_serves_fallback_reads_and_rejects_writes() {
    let shop = offline_shop();

    let books = shop.catalog().list_books().await;
    assert_eq!(books.len(), fallback_books().len());

    let draft = BookDraft {
        title: "Midnight's Children".to_owned(),
        author: "Salman Rushdie".to_owned(),
        category: "Fiction".to_owned(),
        price: Price::from_rupees(420),
        original_price: None,
        rating: None,
        stock: 10,
        cover: String::new(),
        author_image: None,
        description: String::new(),
    };
    assert!(matches!(
        shop.catalog().create_book(draft).await,
        Err(CatalogError::NotConfigured)
    ));
    assert!(matches!(
        shop.catalog()
            .update_book(&BookId::new("1"), &BookPatch::default())
            .await,
        Err(CatalogError::NotConfigured)
    ));
    assert!(matches!(
        shop.catalog().delete_book(&BookId::new("1")).await,
        Err(CatalogError::NotConfigured)
    ));
}

#[tokio::test]
async fn empty_store_is_seeded_once_on_first_list() {
    let (shop, store) = store_backed_shop();
    assert_eq!(store.document_count("books"), 0);

    let books = shop.catalog().list_books().await;
    // The empty-store read serves the fallback list after triggering a seed
    assert_eq!(books.len(), fallback_books().len());
    assert_eq!(store.document_count("books"), fallback_books().len());

    // The next read comes from the store itself
    let books = shop.catalog().list_books().await;
    assert_eq!(books.len(), fallback_books().len());
}

#[tokio::test]
async fn get_book_prefers_store_then_fallback_then_not_found() {
    let (shop, store) = store_backed_shop();

    // Stored copy of "1" differs from the fallback copy
    let mut stored = book("1", "The Palace of Illusions", 399, 25);
    stored.stock = 7;
    store
        .upsert("books", "1", encode(&stored).unwrap())
        .await
        .unwrap();

    let fetched = shop.catalog().get_book(&BookId::new("1")).await.unwrap();
    assert_eq!(fetched.stock, 7);

    // "2" is absent from the store but present in the fallback dataset
    let fetched = shop.catalog().get_book(&BookId::new("2")).await.unwrap();
    assert_eq!(fetched.price, Price::from_rupees(350));

    // Absent everywhere
    assert!(matches!(
        shop.catalog().get_book(&BookId::new("no-such-book")).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
async fn related_books_prioritize_store_and_fill_from_fallback() {
    let (shop, store) = store_backed_shop();

    // Two store books in the category; "mist" outranks "echo" on rating
    let mut echo = book("echo", "Echo Chamber", 300, 5);
    echo.rating = Some(3.9);
    let mut mist = book("mist", "Mist Garden", 310, 5);
    mist.rating = Some(4.9);
    for b in [&echo, &mist] {
        store
            .upsert("books", b.id.as_str(), encode(b).unwrap())
            .await
            .unwrap();
    }

    let related = shop
        .catalog()
        .related_books(&BookId::new("1"), "Fiction", RELATED_LIMIT)
        .await;

    assert_eq!(related.len(), RELATED_LIMIT);
    // Store results first, rating descending
    assert_eq!(related[0].id, BookId::new("mist"));
    assert_eq!(related[1].id, BookId::new("echo"));
    // Remaining slots filled from the fallback dataset, current book excluded
    assert!(related.iter().all(|b| b.id != BookId::new("1")));
    assert!(related.iter().all(|b| b.category == "Fiction"));

    // No duplicates by ID
    let mut ids: Vec<_> = related.iter().map(|b| b.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), RELATED_LIMIT);
}

#[tokio::test]
async fn related_books_exclude_current_even_when_stored() {
    let (shop, store) = store_backed_shop();
    let current = book("self", "Self Reference", 300, 5);
    store
        .upsert("books", "self", encode(&current).unwrap())
        .await
        .unwrap();

    let related = shop
        .catalog()
        .related_books(&BookId::new("self"), "Fiction", 10)
        .await;
    assert!(related.iter().all(|b| b.id != BookId::new("self")));
}

#[tokio::test]
async fn admin_mutations_write_through() {
    let (shop, store) = store_backed_shop();

    let draft = BookDraft {
        title: "Midnight's Children".to_owned(),
        author: "Salman Rushdie".to_owned(),
        category: "Fiction".to_owned(),
        price: Price::from_rupees(420),
        original_price: Some(Price::from_rupees(500)),
        rating: Some(4.4),
        stock: 10,
        cover: String::new(),
        author_image: None,
        description: "Saleem Sinai and the midnight hour.".to_owned(),
    };
    let created = shop.catalog().create_book(draft).await.unwrap();
    assert!(!created.id.is_empty());

    let patch = BookPatch {
        price: Some(Price::from_rupees(450)),
        ..BookPatch::default()
    };
    shop.catalog().update_book(&created.id, &patch).await.unwrap();

    let fetched = shop.catalog().get_book(&created.id).await.unwrap();
    assert_eq!(fetched.price, Price::from_rupees(450));
    // Unpatched fields survive the masked update
    assert_eq!(fetched.title, "Midnight's Children");
    assert_eq!(fetched.stock, 10);

    shop.catalog().delete_book(&created.id).await.unwrap();
    assert!(store.get("books", created.id.as_str()).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_the_store() {
    let (shop, store) = store_backed_shop();

    let draft = BookDraft {
        title: "Bad Price".to_owned(),
        author: "Nobody".to_owned(),
        category: "Fiction".to_owned(),
        price: Price::ZERO,
        original_price: None,
        rating: None,
        stock: 0,
        cover: String::new(),
        author_image: None,
        description: String::new(),
    };
    assert!(matches!(
        shop.catalog().create_book(draft).await,
        Err(CatalogError::Invalid(_))
    ));
    assert_eq!(store.document_count("books"), 0);
}
