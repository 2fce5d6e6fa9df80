//! Sales analytics reducers.
//!
//! Every view is a pure function over the full order list: no stored state,
//! no incremental maintenance, deterministic for a given input. Callers
//! fetch orders through the order accessor and pass them in; keeping the
//! reducers free of I/O means they can later be swapped for incrementally
//! maintained aggregates without touching any call site.
//!
//! Cancelled orders are excluded from the per-item views (top sellers,
//! category revenue, daily sales, top authors) but still count toward total
//! revenue in [`sales_stats`] and toward the city and customer views. The
//! asymmetry is inherited behavior, kept under test rather than fixed
//! quietly; see the repository design notes.

use std::collections::HashMap;

use chrono::NaiveDate;
use marigold_core::{OrderStatus, Price};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::Serialize;

use crate::models::{Order, OrderItem};

/// Static title -> category lookup for line items without a category field.
fn category_for_title(title: &str) -> Option<&'static str> {
    match title {
        "The Palace of Illusions" | "The God of Small Things" | "The White Tiger" => {
            Some("Fiction")
        }
        "Ikigai" | "Atomic Habits" => Some("Self-Help"),
        "Wings of Fire" => Some("Biography"),
        "Train to Pakistan" => Some("Historical Fiction"),
        "Rich Dad Poor Dad" => Some("Finance"),
        _ => None,
    }
}

fn item_category(item: &OrderItem) -> String {
    item.category.clone().unwrap_or_else(|| {
        category_for_title(&item.title)
            .unwrap_or("Other")
            .to_owned()
    })
}

/// Line items of every non-cancelled order.
fn active_items(orders: &[Order]) -> impl Iterator<Item = &OrderItem> {
    orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .flat_map(|order| &order.items)
}

/// Round `part / whole` to the nearest whole percentage.
fn percentage(part: Decimal, whole: Decimal) -> i64 {
    if whole <= Decimal::ZERO {
        return 0;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

// =============================================================================
// Sales Stats
// =============================================================================

/// Order counts per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub confirmed: u64,
    pub processing: u64,
    pub shipped: u64,
    pub delivered: u64,
    pub cancelled: u64,
}

impl StatusCounts {
    fn record(&mut self, status: OrderStatus) {
        let slot = match status {
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::Confirmed => &mut self.confirmed,
            OrderStatus::Processing => &mut self.processing,
            OrderStatus::Shipped => &mut self.shipped,
            OrderStatus::Delivered => &mut self.delivered,
            OrderStatus::Cancelled => &mut self.cancelled,
        };
        *slot += 1;
    }
}

/// Headline sales numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesStats {
    pub total_orders: u64,
    /// Revenue over ALL orders - cancelled included, unlike the per-item
    /// views. Inherited asymmetry; kept under test, not silently changed.
    pub total_revenue: Price,
    pub by_status: StatusCounts,
    /// `total_revenue / total_orders`, zero when there are no orders.
    pub avg_order_value: Price,
}

/// Total revenue, counts per status, and average order value.
#[must_use]
pub fn sales_stats(orders: &[Order]) -> SalesStats {
    let mut by_status = StatusCounts::default();
    let mut total_revenue = Price::ZERO;

    for order in orders {
        total_revenue += order.revenue();
        by_status.record(order.status);
    }

    let total_orders = orders.len() as u64;
    let avg_order_value = if orders.is_empty() {
        Price::ZERO
    } else {
        Price::new(total_revenue.amount() / Decimal::from(total_orders))
    };

    SalesStats {
        total_orders,
        total_revenue,
        by_status,
        avg_order_value,
    }
}

// =============================================================================
// Top Sellers
// =============================================================================

/// A book's sales aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBook {
    pub title: String,
    pub author: String,
    pub cover: String,
    pub total_sold: u64,
    pub revenue: Price,
}

/// The `limit` best-selling books by quantity, cancelled orders excluded.
///
/// Items group by book ID, falling back to the title for snapshots without
/// one.
#[must_use]
pub fn top_selling_books(orders: &[Order], limit: usize) -> Vec<TopBook> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut books: Vec<TopBook> = Vec::new();

    for item in active_items(orders) {
        let key = if item.book_id.is_empty() {
            item.title.clone()
        } else {
            item.book_id.as_str().to_owned()
        };

        let slot = *index.entry(key).or_insert_with(|| {
            books.push(TopBook {
                title: item.title.clone(),
                author: item.author.clone(),
                cover: item.cover.clone(),
                total_sold: 0,
                revenue: Price::ZERO,
            });
            books.len() - 1
        });
        books[slot].total_sold += u64::from(item.quantity);
        books[slot].revenue += item.line_total();
    }

    books.sort_by(|a, b| b.total_sold.cmp(&a.total_sold));
    books.truncate(limit);
    books
}

// =============================================================================
// Category Revenue
// =============================================================================

/// Revenue attributed to one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: Price,
    /// Share of total revenue, rounded to the nearest whole percent.
    pub percentage: i64,
}

/// Revenue per category, highest first; empty when there is no revenue.
///
/// Items without a category go through the static title lookup, then into
/// `"Other"`.
#[must_use]
pub fn revenue_by_category(orders: &[Order]) -> Vec<CategoryRevenue> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut categories: Vec<(String, Price)> = Vec::new();

    for item in active_items(orders) {
        let category = item_category(item);
        let slot = *index.entry(category.clone()).or_insert_with(|| {
            categories.push((category, Price::ZERO));
            categories.len() - 1
        });
        categories[slot].1 += item.line_total();
    }

    let total: Price = categories.iter().map(|(_, revenue)| *revenue).sum();
    if !total.is_positive() {
        return Vec::new();
    }

    let mut out: Vec<CategoryRevenue> = categories
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category,
            percentage: percentage(revenue.amount(), total.amount()),
            revenue,
        })
        .collect();
    out.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    out
}

// =============================================================================
// Daily Sales
// =============================================================================

/// One calendar day's order count and revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    /// Localized short label, e.g. `"7 Aug"`.
    pub label: String,
    pub orders: u64,
    pub revenue: Price,
}

/// Non-cancelled orders bucketed into the last `days` calendar days ending
/// at `today`, oldest bucket first.
///
/// Every bucket is pre-initialized so empty days render as zero instead of
/// disappearing. `today` is a parameter, keeping the reducer deterministic.
#[must_use]
pub fn sales_by_day(orders: &[Order], days: u32, today: NaiveDate) -> Vec<DailySales> {
    let mut buckets: Vec<DailySales> = (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(u64::from(back))))
        .map(|date| DailySales {
            date,
            label: date.format("%-d %b").to_string(),
            orders: 0,
            revenue: Price::ZERO,
        })
        .collect();

    let index: HashMap<NaiveDate, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| (bucket.date, i))
        .collect();

    for order in orders {
        if order.status == OrderStatus::Cancelled {
            continue;
        }
        if let Some(&slot) = index.get(&order.created_at.date_naive()) {
            buckets[slot].orders += 1;
            buckets[slot].revenue += order.revenue();
        }
    }

    buckets
}

// =============================================================================
// Top Authors
// =============================================================================

/// An author's sales aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorSales {
    pub name: String,
    pub books_sold: u64,
    pub revenue: Price,
}

/// The `limit` top-earning authors, cancelled orders excluded.
#[must_use]
pub fn top_authors(orders: &[Order], limit: usize) -> Vec<AuthorSales> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut authors: Vec<AuthorSales> = Vec::new();

    for item in active_items(orders) {
        let slot = *index.entry(item.author.clone()).or_insert_with(|| {
            authors.push(AuthorSales {
                name: item.author.clone(),
                books_sold: 0,
                revenue: Price::ZERO,
            });
            authors.len() - 1
        });
        authors[slot].books_sold += u64::from(item.quantity);
        authors[slot].revenue += item.line_total();
    }

    authors.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    authors.truncate(limit);
    authors
}

// =============================================================================
// Orders by City
// =============================================================================

/// Order volume from one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityOrders {
    pub city: String,
    pub orders: u64,
    pub revenue: Price,
}

/// Orders grouped by customer city, busiest city first.
///
/// Counts every order regardless of status, like the customer view.
#[must_use]
pub fn orders_by_city(orders: &[Order]) -> Vec<CityOrders> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut cities: Vec<CityOrders> = Vec::new();

    for order in orders {
        let city = if order.customer.city.is_empty() {
            "Unknown".to_owned()
        } else {
            order.customer.city.clone()
        };
        let slot = *index.entry(city.clone()).or_insert_with(|| {
            cities.push(CityOrders {
                city,
                orders: 0,
                revenue: Price::ZERO,
            });
            cities.len() - 1
        });
        cities[slot].orders += 1;
        cities[slot].revenue += order.revenue();
    }

    cities.sort_by(|a, b| b.orders.cmp(&a.orders));
    cities
}

// =============================================================================
// Customer Insights
// =============================================================================

/// One customer's aggregate spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSpend {
    pub name: String,
    pub email: String,
    pub order_count: u64,
    pub total_spent: Price,
}

/// Customer-base overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerInsights {
    pub total_customers: u64,
    /// Customers with more than one order.
    pub repeat_customers: u64,
    /// `repeat_customers / total_customers`, rounded to a whole percent.
    pub repeat_rate: i64,
    /// Top five customers by total spend.
    pub top_customers: Vec<CustomerSpend>,
}

/// Per-customer aggregation keyed by email, with repeat rate.
#[must_use]
pub fn customer_insights(orders: &[Order]) -> CustomerInsights {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut customers: Vec<CustomerSpend> = Vec::new();

    for order in orders {
        let email = order.customer.email.as_str().to_owned();
        let slot = *index.entry(email.clone()).or_insert_with(|| {
            customers.push(CustomerSpend {
                name: order.customer.name.clone(),
                email,
                order_count: 0,
                total_spent: Price::ZERO,
            });
            customers.len() - 1
        });
        customers[slot].order_count += 1;
        customers[slot].total_spent += order.revenue();
    }

    let total_customers = customers.len() as u64;
    let repeat_customers = customers.iter().filter(|c| c.order_count > 1).count() as u64;
    let repeat_rate = percentage(Decimal::from(repeat_customers), Decimal::from(total_customers));

    customers.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    customers.truncate(5);

    CustomerInsights {
        total_customers,
        repeat_customers,
        repeat_rate,
        top_customers: customers,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::orders::demo::demo_orders;
    use chrono::Utc;

    #[test]
    fn test_sales_stats_over_demo_orders() {
        let orders = demo_orders(Utc::now());
        let stats = sales_stats(&orders);

        assert_eq!(stats.total_orders, 7);
        // 1097 + 597 + 898 + 400 + 950 + 449 + 1097
        assert_eq!(stats.total_revenue, Price::from_rupees(5488));
        assert_eq!(stats.by_status.delivered, 4);
        assert_eq!(stats.by_status.pending, 1);
        assert_eq!(stats.by_status.shipped, 1);
        assert_eq!(stats.by_status.confirmed, 1);
        assert_eq!(
            stats.avg_order_value,
            Price::new(Decimal::from(5488) / Decimal::from(7))
        );
    }

    #[test]
    fn test_sales_stats_empty() {
        let stats = sales_stats(&[]);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, Price::ZERO);
        assert_eq!(stats.avg_order_value, Price::ZERO);
    }

    #[test]
    fn test_top_selling_books_orders_by_quantity() {
        let orders = demo_orders(Utc::now());
        let top = top_selling_books(&orders, 3);

        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].total_sold >= w[1].total_sold));
        // Wings of Fire sells 3 copies in one order, the most of any title
        assert_eq!(top[0].title, "Wings of Fire");
        assert_eq!(top[0].total_sold, 3);
        assert_eq!(top[0].revenue, Price::from_rupees(597));
    }

    #[test]
    fn test_revenue_by_category_uses_title_lookup() {
        // Demo items carry no category, so every row comes from the lookup
        let orders = demo_orders(Utc::now());
        let categories = revenue_by_category(&orders);

        assert!(categories.iter().any(|c| c.category == "Self-Help"));
        assert!(categories.iter().any(|c| c.category == "Fiction"));
        assert!(categories.windows(2).all(|w| w[0].revenue >= w[1].revenue));

        let pct_sum: i64 = categories.iter().map(|c| c.percentage).sum();
        assert!((99..=101).contains(&pct_sum), "sum was {pct_sum}");
    }

    #[test]
    fn test_revenue_by_category_empty_without_revenue() {
        assert!(revenue_by_category(&[]).is_empty());
    }

    #[test]
    fn test_sales_by_day_preinitializes_buckets() {
        let now = Utc::now();
        let orders = demo_orders(now);
        let daily = sales_by_day(&orders, 7, now.date_naive());

        assert_eq!(daily.len(), 7);
        assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
        // Orders lie 0.5 to 6 days back, all within the window
        let counted: u64 = daily.iter().map(|d| d.orders).sum();
        assert_eq!(counted, 7);
    }

    #[test]
    fn test_sales_by_day_label_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let daily = sales_by_day(&[], 1, date);
        assert_eq!(daily[0].label, "7 Aug");
    }

    #[test]
    fn test_top_authors_orders_by_revenue() {
        let orders = demo_orders(Utc::now());
        let authors = top_authors(&orders, 5);
        assert!(authors.windows(2).all(|w| w[0].revenue >= w[1].revenue));
        // Chitra Banerjee Divakaruni: 399 x 2 + 399 = 1197, the top earner
        assert_eq!(authors[0].name, "Chitra Banerjee Divakaruni");
        assert_eq!(authors[0].revenue, Price::from_rupees(1197));
    }

    #[test]
    fn test_orders_by_city_counts_all_statuses() {
        let orders = demo_orders(Utc::now());
        let cities = orders_by_city(&orders);
        // Seven orders from seven distinct cities
        assert_eq!(cities.len(), 7);
        assert!(cities.iter().all(|c| c.orders == 1));
    }

    #[test]
    fn test_customer_insights_no_repeats_in_demo_data() {
        let orders = demo_orders(Utc::now());
        let insights = customer_insights(&orders);

        assert_eq!(insights.total_customers, 7);
        assert_eq!(insights.repeat_customers, 0);
        assert_eq!(insights.repeat_rate, 0);
        assert_eq!(insights.top_customers.len(), 5);
        assert_eq!(insights.top_customers[0].total_spent, Price::from_rupees(1097));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(Decimal::from(1), Decimal::from(8)), 13);
        assert_eq!(percentage(Decimal::from(1), Decimal::from(200)), 1);
        assert_eq!(percentage(Decimal::from(0), Decimal::from(0)), 0);
    }
}
