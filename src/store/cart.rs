//! Shopping cart.
//!
//! A cart is a [`LinkedList`] of [`CartItem`]s in the order products were
//! first added. Adding a product that is already in the cart grows that
//! line's quantity instead of appending a second line. Stock checks and
//! decrements happen in [`crate::store::Store::add_to_cart`]; the cart
//! itself only records what was taken.
//!
//! The running total is kept alongside the lines. An add that would push a
//! line quantity past `u32::MAX` or the total past [`Decimal::MAX`] is
//! rejected and leaves the cart as it was.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::index::LinkedList;
use crate::types::price::line_total;
use crate::types::{CartItem, OrderLine, Product};

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: LinkedList<CartItem>,
    total: Decimal,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product` (a snapshot of the catalog entry).
    ///
    /// A product already in the cart keeps the price of its first add.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), ValidationError> {
        let (unit_price, held) = self
            .items
            .find(&product.id)
            .map_or((product.price, 0), |item| (item.product.price, item.quantity));

        let combined = held.checked_add(quantity).ok_or_else(|| ValidationError::Overflow {
            field: "cart quantity".to_string(),
        })?;
        let total = line_total(unit_price, combined)
            .and_then(|_| line_total(unit_price, quantity))
            .and_then(|added| self.total.checked_add(added))
            .ok_or_else(|| ValidationError::Overflow {
                field: "cart total".to_string(),
            })?;

        match self.items.find_mut(&product.id) {
            Some(item) => item.quantity = combined,
            None => self.items.push_back(CartItem::new(product.clone(), quantity)),
        }
        self.total = total;
        Ok(())
    }

    /// Quantity of a product currently in the cart
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items.find(product_id).map_or(0, |item| item.quantity)
    }

    #[inline]
    pub fn items(&self) -> &LinkedList<CartItem> {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals
    #[inline]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Freeze the cart into order lines
    pub fn to_order_lines(&self) -> LinkedList<OrderLine> {
        self.items.iter().map(OrderLine::from).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
