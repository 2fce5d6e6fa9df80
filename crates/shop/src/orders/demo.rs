//! Demo order dataset.
//!
//! Served when the external store is unreachable or holds no orders yet, so
//! the admin dashboard always has something to aggregate. Line items carry
//! no category on purpose - they exercise the analytics title-lookup path
//! the same way pre-denormalization records do. Consumers receive these
//! behind a `Demo` provenance marker and must never present them as live.

use chrono::{DateTime, Duration, Utc};
use marigold_core::{BookId, Email, OrderId, OrderStatus, Price};

use crate::models::{Customer, Order, OrderItem, PaymentSummary};

struct DemoLine {
    book_id: &'static str,
    title: &'static str,
    author: &'static str,
    price: i64,
    quantity: u32,
    isbn: &'static str,
}

fn item(line: &DemoLine) -> OrderItem {
    OrderItem {
        book_id: BookId::new(line.book_id),
        title: line.title.to_owned(),
        author: line.author.to_owned(),
        category: None,
        price: Price::from_rupees(line.price),
        quantity: line.quantity,
        cover: format!("https://covers.openlibrary.org/b/isbn/{}-L.jpg", line.isbn),
    }
}

#[allow(clippy::too_many_arguments)]
fn order(
    id: &str,
    lines: &[DemoLine],
    name: &str,
    email: &str,
    address: &str,
    city: &str,
    zip: &str,
    shipping: i64,
    status: OrderStatus,
    age: Duration,
    now: DateTime<Utc>,
) -> Order {
    let items: Vec<OrderItem> = lines.iter().map(item).collect();
    let subtotal: Price = items.iter().map(OrderItem::line_total).sum();
    let shipping = Price::from_rupees(shipping);
    let created_at = now - age;

    Order {
        id: OrderId::new(id),
        items,
        customer: Customer {
            name: name.to_owned(),
            email: Email::parse(email).expect("demo emails are valid"),
            address: address.to_owned(),
            city: city.to_owned(),
            zip: zip.to_owned(),
        },
        payment: PaymentSummary::redacted(),
        subtotal,
        shipping,
        total: subtotal + shipping,
        status,
        created_at,
        updated_at: created_at,
    }
}

/// The seven demo orders, with timestamps positioned relative to `now`.
#[must_use]
pub fn demo_orders(now: DateTime<Utc>) -> Vec<Order> {
    use OrderStatus::{Confirmed, Delivered, Pending, Shipped};

    vec![
        order(
            "demo-001",
            &[
                DemoLine { book_id: "1", title: "The Palace of Illusions", author: "Chitra Banerjee Divakaruni", price: 399, quantity: 2, isbn: "9781400096206" },
                DemoLine { book_id: "3", title: "Ikigai", author: "Héctor García", price: 299, quantity: 1, isbn: "9780143130727" },
            ],
            "Rahul Sharma",
            "rahul@example.com",
            "123 MG Road",
            "Mumbai",
            "400001",
            0,
            Delivered,
            Duration::days(1),
            now,
        ),
        order(
            "demo-002",
            &[DemoLine { book_id: "4", title: "Wings of Fire", author: "Dr. A.P.J. Abdul Kalam", price: 199, quantity: 3, isbn: "9788173711466" }],
            "Priya Patel",
            "priya@example.com",
            "456 Ring Road",
            "Delhi",
            "110001",
            0,
            Shipped,
            Duration::days(2),
            now,
        ),
        order(
            "demo-003",
            &[
                DemoLine { book_id: "6", title: "Atomic Habits", author: "James Clear", price: 499, quantity: 1, isbn: "9780735211292" },
                DemoLine { book_id: "8", title: "Rich Dad Poor Dad", author: "Robert T. Kiyosaki", price: 399, quantity: 1, isbn: "9781612680194" },
            ],
            "Amit Kumar",
            "amit@example.com",
            "789 Lake View",
            "Bangalore",
            "560001",
            0,
            Delivered,
            Duration::days(3),
            now,
        ),
        order(
            "demo-004",
            &[DemoLine { book_id: "2", title: "The God of Small Things", author: "Arundhati Roy", price: 350, quantity: 1, isbn: "9780812979657" }],
            "Sneha Reddy",
            "sneha@example.com",
            "321 Hill View",
            "Hyderabad",
            "500001",
            50,
            Pending,
            Duration::hours(12),
            now,
        ),
        order(
            "demo-005",
            &[
                DemoLine { book_id: "5", title: "The White Tiger", author: "Aravind Adiga", price: 450, quantity: 1, isbn: "9781416562603" },
                DemoLine { book_id: "7", title: "Train to Pakistan", author: "Khushwant Singh", price: 250, quantity: 2, isbn: "9780143027799" },
            ],
            "Vikram Singh",
            "vikram@example.com",
            "555 Park Street",
            "Kolkata",
            "700001",
            0,
            Confirmed,
            Duration::days(4),
            now,
        ),
        order(
            "demo-006",
            &[DemoLine { book_id: "1", title: "The Palace of Illusions", author: "Chitra Banerjee Divakaruni", price: 399, quantity: 1, isbn: "9781400096206" }],
            "Ananya Iyer",
            "ananya@example.com",
            "888 Beach Road",
            "Chennai",
            "600001",
            50,
            Delivered,
            Duration::days(5),
            now,
        ),
        order(
            "demo-007",
            &[
                DemoLine { book_id: "3", title: "Ikigai", author: "Héctor García", price: 299, quantity: 2, isbn: "9780143130727" },
                DemoLine { book_id: "6", title: "Atomic Habits", author: "James Clear", price: 499, quantity: 1, isbn: "9780735211292" },
            ],
            "Deepak Verma",
            "deepak@example.com",
            "222 Civil Lines",
            "Jaipur",
            "302001",
            0,
            Delivered,
            Duration::days(6),
            now,
        ),
    ]
}
