//! Core record types for the store.
//!
//! ## Types
//!
//! - [`Product`]: A catalog entry, keyed by `id` in the product tree
//! - [`Customer`]: A registered customer, keyed by `id` in the customer table
//! - [`CartItem`]: A mutable cart line
//! - [`OrderLine`]: An immutable order line (product snapshot + quantity)
//! - [`Order`]: A placed order, ranked by `total_price`
//! - [`PaymentMethod`]: Cash or online payment
//!
//! Money is [`rust_decimal::Decimal`]; see [`price`] for parsing and formatting.

mod order;
mod product;
pub mod price;

// Re-export all types at module level
pub use order::{
    format_order_id, format_tracking_id, month_key_from_timestamp, CartItem, Order, OrderLine,
    PaymentMethod, TIMESTAMP_FORMAT,
};
pub use product::{Customer, Product};
