//! Sales analytics dashboard.
//!
//! Fetches the order feed and the catalog concurrently, then derives every
//! reporting view from the order list with the pure reducers.

use chrono::Local;

use marigold_shop::analytics::{
    customer_insights, orders_by_city, revenue_by_category, sales_by_day, sales_stats,
    top_authors, top_selling_books,
};
use marigold_shop::{Shop, ShopConfig, ShopError};

const TOP_LIMIT: usize = 5;

/// Print the full dashboard.
///
/// # Errors
///
/// Returns an error if configuration loading fails. Data fetches themselves
/// degrade to fallback/demo datasets rather than failing.
#[allow(clippy::print_stdout)]
pub async fn show(days: u32) -> Result<(), ShopError> {
    let config = ShopConfig::from_env()?;
    let shop = Shop::from_config(&config);

    // Both fetches run concurrently; the reducers below are pure
    let (feed, books) = tokio::join!(shop.orders().list_orders(), shop.catalog().list_books());

    if feed.source.is_demo() {
        println!("NOTE: store unreachable or empty - showing DEMO data, not live orders\n");
    }

    let orders = &feed.orders;
    let stats = sales_stats(orders);
    let top_books = top_selling_books(orders, TOP_LIMIT);
    let categories = revenue_by_category(orders);
    let daily = sales_by_day(orders, days, Local::now().date_naive());
    let authors = top_authors(orders, TOP_LIMIT);
    let cities = orders_by_city(orders);
    let customers = customer_insights(orders);

    println!("== Overview ==");
    println!("catalog size:    {}", books.len());
    println!("total orders:    {}", stats.total_orders);
    println!("total revenue:   {}", stats.total_revenue);
    println!("avg order value: {}", stats.avg_order_value);
    println!(
        "by status:       {} pending / {} confirmed / {} processing / {} shipped / {} delivered / {} cancelled",
        stats.by_status.pending,
        stats.by_status.confirmed,
        stats.by_status.processing,
        stats.by_status.shipped,
        stats.by_status.delivered,
        stats.by_status.cancelled,
    );

    println!("\n== Top selling books ==");
    for book in &top_books {
        println!(
            "{:>4} sold  {}  ({}, {})",
            book.total_sold, book.title, book.author, book.revenue
        );
    }

    println!("\n== Revenue by category ==");
    for category in &categories {
        println!(
            "{:>3}%  {}  ({})",
            category.percentage, category.category, category.revenue
        );
    }

    println!("\n== Sales by day (last {days}) ==");
    for day in &daily {
        println!(
            "{:>7}  {:>3} orders  {}",
            day.label, day.orders, day.revenue
        );
    }

    println!("\n== Top authors ==");
    for author in &authors {
        println!(
            "{}  {} sold, {}",
            author.name, author.books_sold, author.revenue
        );
    }

    println!("\n== Orders by city ==");
    for city in &cities {
        println!("{:>3} orders  {}  ({})", city.orders, city.city, city.revenue);
    }

    println!("\n== Customers ==");
    println!(
        "{} total, {} repeat ({}% repeat rate)",
        customers.total_customers, customers.repeat_customers, customers.repeat_rate
    );
    for customer in &customers.top_customers {
        println!(
            "  {}  {} orders, {}",
            customer.email, customer.order_count, customer.total_spent
        );
    }

    Ok(())
}
