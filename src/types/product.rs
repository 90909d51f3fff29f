//! Product and customer records.
//!
//! Products are keyed by `id` under plain lexicographic string ordering
//! (so `"10"` sorts before `"2"`). Customers are keyed by their numeric
//! string `id` in the customer hash table.

use std::fmt;

use rust_decimal::Decimal;

use crate::types::price::format_amount;

// ============================================================================
// Product
// ============================================================================

/// A product in the catalog.
///
/// ## Example
///
/// ```
/// use famin_store::types::Product;
/// use rust_decimal::Decimal;
///
/// let p = Product::new("2", "T-Shirt", "Men", "Casual", Decimal::from(1500), 20);
/// assert_eq!(p.to_string(), "ID: 2, Name: T-Shirt, Category: Men - Casual, Price: $1500, Stock: 20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Product {
    /// Unique catalog identifier (tree key)
    pub id: String,

    /// Display name
    pub name: String,

    /// Top-level category (e.g. "Men", "Women")
    pub category: String,

    /// Free-text subcategory (e.g. "Eid Edition")
    pub subcategory: String,

    /// Unit price, never negative
    pub price: Decimal,

    /// Units in stock
    pub quantity: u32,
}

impl Product {
    /// Create a new product record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            subcategory: subcategory.into(),
            price,
            quantity,
        }
    }

    /// Check whether `requested` units can be taken from stock
    #[inline]
    pub fn has_stock(&self, requested: u32) -> bool {
        self.quantity >= requested
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Category: {} - {}, Price: ${}, Stock: {}",
            self.id,
            self.name,
            self.category,
            self.subcategory,
            format_amount(self.price),
            self.quantity
        )
    }
}

// ============================================================================
// Customer
// ============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    /// Numeric-string identifier (hash table key)
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Name: {}, Email: {}", self.id, self.name, self.email)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
