//! Shop state: the dependency-injected accessor bundle.
//!
//! The store client is constructed once at the application entry point and
//! handed to every accessor from there - no lazily-initialized global
//! handle. Tests inject a `MemoryStore`; production wires a
//! `FirestoreClient` from configuration.

use crate::auth::AuthClient;
use crate::catalog::CatalogService;
use crate::config::ShopConfig;
use crate::orders::OrderService;
use crate::store::{DocumentStore, FirestoreClient};

/// The assembled domain layer over one store client.
#[derive(Debug, Clone)]
pub struct Shop<S> {
    catalog: CatalogService<S>,
    orders: OrderService<S>,
}

impl<S: DocumentStore + Clone> Shop<S> {
    /// Assemble the accessors over an optional store client.
    ///
    /// The order accessor shares the catalog accessor so checkout can issue
    /// stock decrements.
    pub fn with_store(store: Option<S>, config: &ShopConfig) -> Self {
        let catalog = CatalogService::new(store.clone());
        let orders = OrderService::new(store, catalog.clone(), config.shipping);
        Self { catalog, orders }
    }

    /// The catalog accessor.
    pub const fn catalog(&self) -> &CatalogService<S> {
        &self.catalog
    }

    /// The order accessor.
    pub const fn orders(&self) -> &OrderService<S> {
        &self.orders
    }
}

impl Shop<FirestoreClient> {
    /// Assemble the production shop from configuration.
    ///
    /// A missing store configuration yields a shop in fallback mode rather
    /// than an error: reads serve the built-in datasets, mutations fail
    /// with `NotConfigured`.
    #[must_use]
    pub fn from_config(config: &ShopConfig) -> Self {
        let store = config.firestore.as_ref().map(FirestoreClient::new);
        Self::with_store(store, config)
    }
}

/// Build the auth client from configuration.
#[must_use]
pub fn auth_from_config(config: &ShopConfig) -> AuthClient {
    AuthClient::new(config.auth.as_ref())
}
