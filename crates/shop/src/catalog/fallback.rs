//! Built-in catalog served when the external store is unreachable.
//!
//! Eight curated titles with stable IDs (`"1"`-`"8"`) plus a large generated
//! tail sampled from a pool of real books. Generation uses a fixed-seed RNG
//! so every process sees the identical dataset - fallback reads must be
//! reproducible, and the seeding path writes the same documents from any
//! machine.

use std::sync::OnceLock;

use marigold_core::{BookId, Price};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Book;

/// Number of generated titles appended to the curated list.
const GENERATED_COUNT: usize = 1000;

/// Fixed RNG seed for the generated tail.
const GENERATION_SEED: u64 = 0x4d41_5249_474f_4c44;

struct CuratedBook {
    id: &'static str,
    title: &'static str,
    author: &'static str,
    category: &'static str,
    price: i64,
    original_price: Option<i64>,
    rating: f64,
    stock: i64,
    isbn: &'static str,
    description: &'static str,
}

const CURATED: &[CuratedBook] = &[
    CuratedBook {
        id: "1",
        title: "The Palace of Illusions",
        author: "Chitra Banerjee Divakaruni",
        category: "Fiction",
        price: 399,
        original_price: Some(499),
        rating: 4.8,
        stock: 25,
        isbn: "9781400096206",
        description: "The Mahabharata retold through the eyes of Draupadi.",
    },
    CuratedBook {
        id: "2",
        title: "The God of Small Things",
        author: "Arundhati Roy",
        category: "Fiction",
        price: 350,
        original_price: Some(425),
        rating: 4.7,
        stock: 18,
        isbn: "9780812979657",
        description: "Forbidden love against Kerala's rigid social hierarchy.",
    },
    CuratedBook {
        id: "3",
        title: "Ikigai: The Japanese Secret",
        author: "Héctor García",
        category: "Self-Help",
        price: 299,
        original_price: None,
        rating: 4.9,
        stock: 50,
        isbn: "9780143130727",
        description: "The Japanese art of finding purpose in a long life.",
    },
    CuratedBook {
        id: "4",
        title: "Wings of Fire",
        author: "Dr. A.P.J. Abdul Kalam",
        category: "Biography",
        price: 199,
        original_price: None,
        rating: 4.9,
        stock: 100,
        isbn: "9788173711466",
        description: "The autobiography of India's Missile Man.",
    },
    CuratedBook {
        id: "5",
        title: "The White Tiger",
        author: "Aravind Adiga",
        category: "Fiction",
        price: 450,
        original_price: None,
        rating: 4.5,
        stock: 15,
        isbn: "9781416562603",
        description: "A darkly comic climb out of the Rooster Coop.",
    },
    CuratedBook {
        id: "6",
        title: "Atomic Habits",
        author: "James Clear",
        category: "Self-Help",
        price: 499,
        original_price: Some(599),
        rating: 4.8,
        stock: 35,
        isbn: "9780735211292",
        description: "Small habits, remarkable results.",
    },
    CuratedBook {
        id: "7",
        title: "Train to Pakistan",
        author: "Khushwant Singh",
        category: "Historical Fiction",
        price: 250,
        original_price: None,
        rating: 4.6,
        stock: 20,
        isbn: "9780143027799",
        description: "Humanity amid the chaos of Partition.",
    },
    CuratedBook {
        id: "8",
        title: "Rich Dad Poor Dad",
        author: "Robert T. Kiyosaki",
        category: "Finance",
        price: 399,
        original_price: None,
        rating: 4.7,
        stock: 45,
        isbn: "9781612680194",
        description: "What the rich teach their kids about money.",
    },
];

struct PoolEntry {
    title: &'static str,
    author: &'static str,
    category: &'static str,
    isbn: &'static str,
}

const REAL_BOOK_POOL: &[PoolEntry] = &[
    // Fiction
    PoolEntry { title: "The Great Gatsby", author: "F. Scott Fitzgerald", category: "Fiction", isbn: "9780743273565" },
    PoolEntry { title: "To Kill a Mockingbird", author: "Harper Lee", category: "Fiction", isbn: "9780062420701" },
    PoolEntry { title: "1984", author: "George Orwell", category: "Fiction", isbn: "9780452262935" },
    PoolEntry { title: "The Alchemist", author: "Paulo Coelho", category: "Fiction", isbn: "9780062315007" },
    // Sci-Fi
    PoolEntry { title: "Dune", author: "Frank Herbert", category: "Sci-Fi", isbn: "9780441005901" },
    PoolEntry { title: "Fahrenheit 451", author: "Ray Bradbury", category: "Sci-Fi", isbn: "9781451673319" },
    PoolEntry { title: "The Martian", author: "Andy Weir", category: "Sci-Fi", isbn: "9780553418026" },
    // Mystery
    PoolEntry { title: "The Da Vinci Code", author: "Dan Brown", category: "Mystery", isbn: "9780307474278" },
    PoolEntry { title: "Gone Girl", author: "Gillian Flynn", category: "Mystery", isbn: "9780307588371" },
    PoolEntry { title: "Murder on the Orient Express", author: "Agatha Christie", category: "Mystery", isbn: "9780062073495" },
    // Business & Tech
    PoolEntry { title: "Steve Jobs", author: "Walter Isaacson", category: "Technology", isbn: "9781451648539" },
    PoolEntry { title: "Elon Musk", author: "Ashlee Vance", category: "Technology", isbn: "9780062301239" },
    PoolEntry { title: "Clean Code", author: "Robert C. Martin", category: "Technology", isbn: "9780132350884" },
    PoolEntry { title: "Zero to One", author: "Peter Thiel", category: "Business", isbn: "9780804139298" },
    PoolEntry { title: "Thinking, Fast and Slow", author: "Daniel Kahneman", category: "Business", isbn: "9780374275631" },
    // Biography / History
    PoolEntry { title: "Becoming", author: "Michelle Obama", category: "Biography", isbn: "9781524763138" },
    PoolEntry { title: "Educated", author: "Tara Westover", category: "Biography", isbn: "9780399590504" },
    PoolEntry { title: "Sapiens", author: "Yuval Noah Harari", category: "History", isbn: "9780062316110" },
    // Self-Help / Fantasy
    PoolEntry { title: "The Power of Now", author: "Eckhart Tolle", category: "Self-Help", isbn: "9781577314806" },
    PoolEntry { title: "Harry Potter and the Sorcerer's Stone", author: "J.K. Rowling", category: "Fantasy", isbn: "9781338299144" },
    PoolEntry { title: "The Lord of the Rings", author: "J.R.R. Tolkien", category: "Fantasy", isbn: "9780618640157" },
];

fn cover_url(isbn: &str) -> String {
    format!("https://covers.openlibrary.org/b/isbn/{isbn}-L.jpg")
}

fn generate_books(count: usize) -> Vec<Book> {
    let mut rng = StdRng::seed_from_u64(GENERATION_SEED);
    let mut generated = Vec::with_capacity(count);

    for i in 0..count {
        // Sample from the real pool cyclically; pricing and stock vary
        let template = &REAL_BOOK_POOL[i % REAL_BOOK_POOL.len()];

        let price = rng.random_range(150..950);
        let original_price = rng
            .random_bool(0.5)
            .then(|| Price::from_rupees(price + rng.random_range(50..300)));
        let rating = f64::from(rng.random_range(35_i32..=50)) / 10.0;

        generated.push(Book {
            id: BookId::new(format!("gen_{}", i + CURATED.len() + 1)),
            title: template.title.to_owned(),
            author: template.author.to_owned(),
            category: template.category.to_owned(),
            price: Price::from_rupees(price),
            original_price,
            rating: Some(rating),
            stock: rng.random_range(5..105),
            cover: cover_url(template.isbn),
            author_image: None,
            description: format!(
                "A masterpiece by {}, {} is a defining work in the {} genre.",
                template.author, template.title, template.category
            ),
        });
    }
    generated
}

/// The complete fallback catalog: curated titles first, generated tail after.
pub fn fallback_books() -> &'static [Book] {
    static BOOKS: OnceLock<Vec<Book>> = OnceLock::new();
    BOOKS.get_or_init(|| {
        let mut books: Vec<Book> = CURATED
            .iter()
            .map(|c| Book {
                id: BookId::new(c.id),
                title: c.title.to_owned(),
                author: c.author.to_owned(),
                category: c.category.to_owned(),
                price: Price::from_rupees(c.price),
                original_price: c.original_price.map(Price::from_rupees),
                rating: Some(c.rating),
                stock: c.stock,
                cover: cover_url(c.isbn),
                author_image: None,
                description: c.description.to_owned(),
            })
            .collect();
        books.extend(generate_books(GENERATED_COUNT));
        books
    })
}
