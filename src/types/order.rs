//! Cart lines, order lines and orders.
//!
//! ## Snapshots
//!
//! Both [`CartItem`] and [`OrderLine`] carry a full copy of the product
//! as it was when the line was created. Later edits to the catalog never
//! reach back into a placed order.
//!
//! ## Identifiers
//!
//! Order and tracking ids are `ORD`/`TRK` followed by a zero-padded
//! six-digit sequence number (see [`format_order_id`]).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::index::{LinkedList, ProductKeyed};
use crate::types::price::{checked_sum, format_amount, line_total};
use crate::types::Product;

/// Timestamp layout used for orders (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// PaymentMethod enum
// ============================================================================

/// How the customer pays for an order.
///
/// Persisted by its display text (`Cash`, `Online Payment`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cash,
    /// Paid online at checkout
    OnlinePayment,
}

impl PaymentMethod {
    /// Map a menu choice (1 = Cash, 2 = Online Payment)
    pub fn from_choice(choice: u8) -> Option<Self> {
        match choice {
            1 => Some(PaymentMethod::Cash),
            2 => Some(PaymentMethod::OnlinePayment),
            _ => None,
        }
    }

    /// Text written to the orders file
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::OnlinePayment => "Online Payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Cash" => Ok(PaymentMethod::Cash),
            "Online Payment" => Ok(PaymentMethod::OnlinePayment),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

// ============================================================================
// CartItem
// ============================================================================

/// A mutable cart line. Adding the same product again grows `quantity`.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Product as it was on first add
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Unit price times quantity, `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        line_total(self.product.price, self.quantity)
    }
}

/// Cart lines are equal when they refer to the same product.
impl PartialEq for CartItem {
    fn eq(&self, other: &Self) -> bool {
        self.product.id == other.product.id
    }
}

impl ProductKeyed for CartItem {
    fn product_id(&self) -> &str {
        &self.product.id
    }
}

// ============================================================================
// OrderLine
// ============================================================================

/// An immutable order line: product snapshot plus quantity.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn line_total(&self) -> Option<Decimal> {
        line_total(self.product.price, self.quantity)
    }
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        OrderLine::new(item.product.clone(), item.quantity)
    }
}

/// Order lines compare by product id and quantity.
impl PartialEq for OrderLine {
    fn eq(&self, other: &Self) -> bool {
        self.product.id == other.product.id && self.quantity == other.quantity
    }
}

impl ProductKeyed for OrderLine {
    fn product_id(&self) -> &str {
        &self.product.id
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A placed order. Never mutated after creation.
///
/// ## Example
///
/// ```
/// use famin_store::index::LinkedList;
/// use famin_store::types::{Order, PaymentMethod};
/// use rust_decimal::Decimal;
///
/// let order = Order {
///     order_id: "ORD000001".into(),
///     tracking_id: "TRK000001".into(),
///     timestamp: "2025-03-14 10:00:00".into(),
///     customer_name: "Sara".into(),
///     customer_address: "12 Canal Road".into(),
///     customer_phone: "0300".into(),
///     payment_method: PaymentMethod::Cash,
///     items: LinkedList::new(),
///     total_price: Decimal::from(1500),
/// };
/// assert_eq!(order.month_key().as_deref(), Some("03-2025"));
/// ```
#[derive(Debug, Clone)]
pub struct Order {
    /// `ORDnnnnnn`
    pub order_id: String,

    /// `TRKnnnnnn`
    pub tracking_id: String,

    /// Local time, [`TIMESTAMP_FORMAT`]
    pub timestamp: String,

    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub payment_method: PaymentMethod,

    /// Line items in cart order
    pub items: LinkedList<OrderLine>,

    /// Heap key: orders are ranked by this, highest first
    pub total_price: Decimal,
}

impl Order {
    /// Sales bucket for this order, `MM-YYYY`.
    ///
    /// Returns `None` when the timestamp does not parse.
    pub fn month_key(&self) -> Option<String> {
        month_key_from_timestamp(&self.timestamp)
    }

    /// Sum of line totals (may differ from `total_price` on reloaded
    /// orders, whose lines are rebuilt from the current catalog).
    /// `None` if the sum overflows.
    pub fn items_total(&self) -> Option<Decimal> {
        checked_sum(self.items.iter().map(OrderLine::line_total))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order ID: {}", self.order_id)?;
        writeln!(f, "Tracking ID: {}", self.tracking_id)?;
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(
            f,
            "Customer: {}, {}, {}",
            self.customer_name, self.customer_address, self.customer_phone
        )?;
        writeln!(f, "Payment Method: {}", self.payment_method)?;
        writeln!(f, "Items:")?;
        for line in self.items.iter() {
            match line.line_total() {
                Some(total) => writeln!(
                    f,
                    "{} x {} = ${}",
                    line.product.name,
                    line.quantity,
                    format_amount(total)
                )?,
                None => writeln!(f, "{} x {} = (overflow)", line.product.name, line.quantity)?,
            }
        }
        write!(f, "Total: ${}", format_amount(self.total_price))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `ORD` + zero-padded sequence number
pub fn format_order_id(seq: u64) -> String {
    format!("ORD{:06}", seq)
}

/// `TRK` + zero-padded sequence number
pub fn format_tracking_id(seq: u64) -> String {
    format!("TRK{:06}", seq)
}

/// Derive the `MM-YYYY` sales key from an order timestamp.
pub fn month_key_from_timestamp(timestamp: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|t| t.format("%m-%Y").to_string())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Item {}", id), "Men", "Casual", Decimal::from(price), 10)
    }

    #[test]
    fn test_payment_method_conversion() {
        assert_eq!(PaymentMethod::from_choice(1), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::from_choice(2), Some(PaymentMethod::OnlinePayment));
        assert_eq!(PaymentMethod::from_choice(3), None);

        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "Online Payment".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::OnlinePayment
        );
        assert!("Cheque".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::OnlinePayment.to_string(), "Online Payment");
    }

    #[test]
    fn test_cart_item_equality_is_by_product() {
        let a = CartItem::new(create_test_product("1", 100), 1);
        let b = CartItem::new(create_test_product("1", 999), 5);
        let c = CartItem::new(create_test_product("2", 100), 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_order_line_equality_includes_quantity() {
        let a = OrderLine::new(create_test_product("1", 100), 2);
        let b = OrderLine::new(create_test_product("1", 100), 3);

        assert_ne!(a, b);
        assert_eq!(a, OrderLine::new(create_test_product("1", 50), 2));
    }

    #[test]
    fn test_line_totals() {
        let item = CartItem::new(create_test_product("1", 250), 4);
        assert_eq!(item.line_total(), Some(Decimal::from(1000)));

        let line = OrderLine::from(&item);
        assert_eq!(line.quantity, 4);
        assert_eq!(line.line_total(), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_id_formatting() {
        assert_eq!(format_order_id(1), "ORD000001");
        assert_eq!(format_tracking_id(123456), "TRK123456");
        assert_eq!(format_order_id(1_234_567), "ORD1234567");
    }

    #[test]
    fn test_month_key() {
        assert_eq!(
            month_key_from_timestamp("2024-11-05 09:15:00").as_deref(),
            Some("11-2024")
        );
        assert!(month_key_from_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_order_display_and_items_total() {
        let mut items = LinkedList::new();
        items.push_back(OrderLine::new(create_test_product("1", 100), 2));
        items.push_back(OrderLine::new(create_test_product("2", 50), 1));

        let order = Order {
            order_id: format_order_id(3),
            tracking_id: format_tracking_id(3),
            timestamp: "2024-01-02 03:04:05".to_string(),
            customer_name: "Ali".to_string(),
            customer_address: "House 4".to_string(),
            customer_phone: "555".to_string(),
            payment_method: PaymentMethod::Cash,
            items,
            total_price: Decimal::from(250),
        };

        assert_eq!(order.items_total(), Some(Decimal::from(250)));
        let text = order.to_string();
        assert!(text.starts_with("Order ID: ORD000003\n"));
        assert!(text.contains("Item 1 x 2 = $200\n"));
        assert!(text.ends_with("Total: $250"));
    }

    #[test]
    fn test_overflowing_line_has_no_total() {
        let mut product = create_test_product("9", 0);
        product.price = Decimal::MAX;

        let mut items = LinkedList::new();
        items.push_back(OrderLine::new(product, 2));
        assert!(items.front().and_then(OrderLine::line_total).is_none());

        let order = Order {
            order_id: format_order_id(1),
            tracking_id: format_tracking_id(1),
            timestamp: "2024-01-02 03:04:05".to_string(),
            customer_name: "Ali".to_string(),
            customer_address: "House 4".to_string(),
            customer_phone: "555".to_string(),
            payment_method: PaymentMethod::Cash,
            items,
            total_price: Decimal::ZERO,
        };

        assert_eq!(order.items_total(), None);
        assert!(order.to_string().contains("Item 9 x 2 = (overflow)\n"));
    }
}
