use serde::{Deserialize, Serialize};
use std::fmt;

/// One catalog entry. All fields are fixed at construction except `quantity`,
/// which the owning [`Inventory`] may update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Textbook {
    sku: i32,
    title: String,
    price: f64,
    quantity: i32,
}

impl Textbook {
    /// Construction never fails; no field is validated here. The interactive
    /// boundary decides what input it accepts.
    pub fn new(sku: i32, title: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            sku,
            title: title.into(),
            price,
            quantity,
        }
    }

    pub fn sku(&self) -> i32 {
        self.sku
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
    }
}

impl fmt::Display for Textbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SKU: {}, Title: {}, Price: ${}, Quantity: {}",
            self.sku, self.title, self.price, self.quantity
        )
    }
}

/// The in-memory catalog: an ordered list of textbooks, looked up by linear
/// scan. Duplicate SKUs are representable; `find_by_sku` returns the first
/// match in insertion order while `remove_by_sku` clears every match.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    books: Vec<Textbook>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(books: Vec<Textbook>) -> Self {
        Self { books }
    }

    /// Appends at the end. Never fails and never checks the SKU; uniqueness
    /// is a convention enforced by the caller if at all.
    pub fn add(&mut self, book: Textbook) {
        self.books.push(book);
    }

    /// Removes every entry with the given SKU. Removing a SKU that is not
    /// present leaves the inventory unchanged.
    pub fn remove_by_sku(&mut self, sku: i32) {
        self.books.retain(|b| b.sku() != sku);
    }

    pub fn find_by_sku(&self, sku: i32) -> Option<&Textbook> {
        self.books.iter().find(|b| b.sku() == sku)
    }

    /// Updates the stock count of the first entry with the given SKU.
    /// Returns `false` when no entry matches.
    pub fn set_quantity(&mut self, sku: i32, quantity: i32) -> bool {
        match self.books.iter_mut().find(|b| b.sku() == sku) {
            Some(book) => {
                book.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Read-only view of the catalog in insertion order.
    pub fn books(&self) -> &[Textbook] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
