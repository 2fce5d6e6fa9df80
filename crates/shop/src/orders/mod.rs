//! Order accessor: checkout, status changes, and order feeds.
//!
//! Order creation persists the order first, then issues one atomic stock
//! decrement per line item through the catalog accessor. The two effects are
//! not a transaction: a decrement failure after the order write leaves the
//! order in place and surfaces as [`OrderError::PartialStockUpdate`] naming
//! the created order, so the inconsistency is visible instead of silent.
//!
//! Order feeds degrade to a fixed demo dataset when the store is unreachable
//! or empty; the feed's [`DataSource`] marker tells consumers which one they
//! got, so demo data can never masquerade as live orders.

pub mod demo;

use chrono::Utc;
use marigold_core::{BookId, Email, OrderId, OrderStatus};
use serde_json::{Map, json};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::cart::CartLine;
use crate::catalog::CatalogService;
use crate::config::ShippingPolicy;
use crate::models::{Customer, Order, OrderItem, PaymentDetails};
use crate::store::{Doc, DocumentStore, SortDirection, StoreError, encode};

use demo::demo_orders;

/// Store collection holding orders.
pub const ORDERS_COLLECTION: &str = "orders";

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No store client is configured.
    #[error("order store is not configured")]
    NotConfigured,

    /// The order does not exist.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// Checkout requires at least one cart line.
    #[error("cannot create an order from an empty cart")]
    EmptyCart,

    /// The order was persisted but some stock decrements failed.
    ///
    /// The order exists under `order_id`; `failed` lists the books whose
    /// stock counts were left un-decremented.
    #[error("order {order_id} created but stock update failed for {} item(s)", failed.len())]
    PartialStockUpdate {
        order_id: OrderId,
        failed: Vec<BookId>,
    },

    /// The store failed on a write path.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Where an order feed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Real orders read from the external store.
    Live,
    /// The built-in demonstration dataset.
    Demo,
}

impl DataSource {
    /// Whether the feed is demonstration data.
    #[must_use]
    pub const fn is_demo(self) -> bool {
        matches!(self, Self::Demo)
    }
}

/// A list of orders tagged with its provenance.
#[derive(Debug, Clone)]
pub struct OrderFeed {
    pub orders: Vec<Order>,
    pub source: DataSource,
}

impl OrderFeed {
    fn live(orders: Vec<Order>) -> Self {
        Self {
            orders,
            source: DataSource::Live,
        }
    }

    fn demo(orders: Vec<Order>) -> Self {
        Self {
            orders,
            source: DataSource::Demo,
        }
    }
}

/// Accessor for orders.
#[derive(Debug, Clone)]
pub struct OrderService<S> {
    store: Option<S>,
    catalog: CatalogService<S>,
    shipping: ShippingPolicy,
}

impl<S: DocumentStore> OrderService<S> {
    /// Create an accessor sharing a store client with the catalog accessor
    /// it uses for stock decrements.
    pub const fn new(
        store: Option<S>,
        catalog: CatalogService<S>,
        shipping: ShippingPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            shipping,
        }
    }

    /// The shipping rule applied at checkout.
    pub const fn shipping_policy(&self) -> ShippingPolicy {
        self.shipping
    }

    /// Create an order from cart contents.
    ///
    /// Builds frozen item snapshots, computes `subtotal`, the configured
    /// shipping fee, and `total = subtotal + shipping`, persists the order
    /// as `pending`, then decrements stock once per line item. Without a
    /// store the order is returned un-persisted under a `mock-` ID and no
    /// stock changes, matching the fallback checkout flow.
    ///
    /// # Errors
    ///
    /// `EmptyCart` for an empty input, `Store` when the order write fails,
    /// `PartialStockUpdate` when the order was written but one or more
    /// decrements failed.
    #[instrument(skip_all, fields(lines = lines.len(), customer = %customer.email))]
    pub async fn create_order(
        &self,
        lines: &[CartLine],
        customer: Customer,
        payment: &PaymentDetails,
    ) -> Result<Order, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| OrderItem::snapshot(&line.book, line.quantity))
            .collect();
        let subtotal = items.iter().map(OrderItem::line_total).sum();
        let shipping = self.shipping.fee_for(subtotal);
        let now = Utc::now();

        let mut order = Order {
            id: OrderId::default(),
            items,
            customer,
            payment: payment.summarize(),
            subtotal,
            shipping,
            total: subtotal + shipping,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let Some(store) = &self.store else {
            order.id = OrderId::new(format!("mock-{}", Uuid::new_v4().simple()));
            info!(order_id = %order.id, "no store configured, order not persisted");
            return Ok(order);
        };

        let data = encode(&order)?;
        let id = store.insert(ORDERS_COLLECTION, data).await?;
        order.id = OrderId::new(id);
        info!(order_id = %order.id, total = %order.total, "order created");

        // Sequential decrements, one per line; not atomic with the order write
        let mut failed = Vec::new();
        for item in &order.items {
            let delta = -i64::from(item.quantity);
            if let Err(err) = self.catalog.adjust_stock(&item.book_id, delta).await {
                error!(book_id = %item.book_id, error = %err, "stock decrement failed");
                failed.push(item.book_id.clone());
            }
        }
        if !failed.is_empty() {
            return Err(OrderError::PartialStockUpdate {
                order_id: order.id,
                failed,
            });
        }

        Ok(order)
    }

    /// One order by ID.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without a store, `NotFound` when absent, `Store` on
    /// read failure.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        let store = self.store.as_ref().ok_or(OrderError::NotConfigured)?;

        match store.get(ORDERS_COLLECTION, id.as_str()).await? {
            Some(doc) => Ok(doc.decode()?),
            None => Err(OrderError::NotFound(id.clone())),
        }
    }

    /// All orders, newest first.
    ///
    /// An unreachable store - or one holding no orders yet - yields the demo
    /// dataset, flagged as such in the feed's `source`.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> OrderFeed {
        let Some(store) = &self.store else {
            debug!("no store configured, serving demo orders");
            return OrderFeed::demo(demo_orders(Utc::now()));
        };

        match store
            .get_all_ordered(ORDERS_COLLECTION, "createdAt", SortDirection::Descending)
            .await
        {
            Ok(docs) => {
                let orders = decode_orders(docs);
                if orders.is_empty() {
                    debug!("store holds no orders, serving demo orders");
                    OrderFeed::demo(demo_orders(Utc::now()))
                } else {
                    OrderFeed::live(orders)
                }
            }
            Err(err) => {
                warn!(error = %err, "listing orders failed, serving demo orders");
                OrderFeed::demo(demo_orders(Utc::now()))
            }
        }
    }

    /// A customer's orders, newest first.
    ///
    /// Without a store this filters the demo dataset; a failing store yields
    /// an empty live feed rather than an error.
    #[instrument(skip(self))]
    pub async fn orders_by_email(&self, email: &Email) -> OrderFeed {
        let Some(store) = &self.store else {
            let mut orders = demo_orders(Utc::now());
            orders.retain(|order| order.customer.email == *email);
            return OrderFeed::demo(orders);
        };

        match store
            .query_eq_ordered(
                ORDERS_COLLECTION,
                "customer.email",
                json!(email),
                "createdAt",
                SortDirection::Descending,
            )
            .await
        {
            Ok(docs) => OrderFeed::live(decode_orders(docs)),
            Err(err) => {
                warn!(error = %err, "customer order query failed");
                OrderFeed::live(Vec::new())
            }
        }
    }

    /// Admin: overwrite an order's status and bump `updated_at`.
    ///
    /// The overwrite is unconditional - any status may follow any status,
    /// matching the admin dashboard's behavior. Callers wanting state-machine
    /// enforcement check [`OrderStatus::can_transition_to`] first. Without a
    /// store the change is a logged no-op, like the rest of the fallback
    /// admin flow.
    ///
    /// # Errors
    ///
    /// `NotFound` when the order is absent, `Store` on write failure.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), OrderError> {
        let Some(store) = &self.store else {
            debug!("no store configured, status change not persisted");
            return Ok(());
        };

        let mut fields = Map::new();
        fields.insert("status".to_owned(), json!(status));
        fields.insert("updatedAt".to_owned(), json!(Utc::now()));

        store
            .update_fields(ORDERS_COLLECTION, id.as_str(), fields)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    OrderError::NotFound(id.clone())
                } else {
                    OrderError::Store(err)
                }
            })
    }
}

/// Decode documents into orders, dropping (and logging) corrupt records.
fn decode_orders(docs: Vec<Doc>) -> Vec<Order> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match doc.decode::<Order>() {
                Ok(order) => Some(order),
                Err(err) => {
                    warn!(id = %id, error = %err, "skipping order that failed to decode");
                    None
                }
            }
        })
        .collect()
}
