//! Shared fixtures for the integration tests.
//!
//! Everything runs against [`MemoryStore`], the in-memory double of the
//! external document store, wired through the same `Shop` assembly the
//! production entry points use.

#![cfg_attr(not(test), forbid(unsafe_code))]

use marigold_core::{BookId, Email, Price};
use marigold_shop::config::{ShippingPolicy, ShopConfig};
use marigold_shop::models::{Book, Customer, PaymentDetails};
use marigold_shop::store::MemoryStore;
use marigold_shop::{Cart, Shop};

/// Config with default shipping and no external services.
#[must_use]
pub fn test_config() -> ShopConfig {
    ShopConfig {
        firestore: None,
        auth: None,
        shipping: ShippingPolicy::default(),
    }
}

/// A shop over a fresh in-memory store, plus the store handle for direct
/// assertions and fault injection.
#[must_use]
pub fn store_backed_shop() -> (Shop<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let shop = Shop::with_store(Some(store.clone()), &test_config());
    (shop, store)
}

/// A shop with no store at all (fallback mode).
#[must_use]
pub fn offline_shop() -> Shop<MemoryStore> {
    Shop::with_store(None, &test_config())
}

/// A minimal book for cart and order scenarios.
#[must_use]
pub fn book(id: &str, title: &str, rupees: i64, stock: i64) -> Book {
    Book {
        id: BookId::new(id),
        title: title.to_owned(),
        author: format!("Author of {title}"),
        category: "Fiction".to_owned(),
        price: Price::from_rupees(rupees),
        original_price: None,
        rating: Some(4.2),
        stock,
        cover: format!("https://covers.example.com/{id}.jpg"),
        author_image: None,
        description: String::new(),
    }
}

/// A checkout customer.
///
/// # Panics
///
/// Panics if the literal email is malformed, which it is not.
#[must_use]
pub fn customer(email: &str, city: &str) -> Customer {
    Customer {
        name: "Test Customer".to_owned(),
        email: Email::parse(email).expect("fixture email is valid"),
        address: "42 Test Lane".to_owned(),
        city: city.to_owned(),
        zip: "400001".to_owned(),
    }
}

/// Card details whose summary ends in 1111.
#[must_use]
pub fn card() -> PaymentDetails {
    PaymentDetails {
        card_number: "4111 1111 1111 1111".to_owned(),
    }
}

/// A cart holding the reference scenario: book A (399 x2) and B (350 x1).
#[must_use]
pub fn reference_cart() -> Cart {
    let mut cart = Cart::new();
    cart.add(book("1", "The Palace of Illusions", 399, 25), 2);
    cart.add(book("2", "The God of Small Things", 350, 18), 1);
    cart
}
