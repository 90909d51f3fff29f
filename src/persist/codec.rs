//! Line codecs for the flat-file records.
//!
//! ## Formats
//!
//! ```text
//! products.txt     id,name,category,subcategory,price,quantity
//! customers.txt    id,name,email
//! sales.txt        monthKey,amount
//! orders.txt       orderId,trackingId,timestamp,name,address,phone,payment,total,items
//!                  items = productId:qty;productId:qty;...
//! admins.txt       username,passwordHash
//! shipments.txt    orderId,trackingId,name,address,status
//! id_counters.txt  nextOrderId nextTrackingId
//! ```
//!
//! Fields are split left to right and the last field takes the remainder
//! of the line. Amounts are written with [`format_amount`].

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::price::{format_amount, parse_amount, parse_price, parse_quantity};
use crate::types::{Customer, Order, PaymentMethod, Product};

// ============================================================================
// Helpers
// ============================================================================

/// Split `line` into exactly `n` comma-separated fields
fn split_fields<'a>(line: &'a str, n: usize, record: &str) -> Result<Vec<&'a str>, ValidationError> {
    let fields: Vec<&str> = line.splitn(n, ',').collect();
    if fields.len() != n {
        return Err(ValidationError::InvalidFormat {
            field: record.to_string(),
            reason: format!("expected {} fields, found {}", n, fields.len()),
        });
    }
    Ok(fields)
}

// ============================================================================
// Product
// ============================================================================

pub fn encode_product(product: &Product) -> String {
    format!(
        "{},{},{},{},{},{}",
        product.id,
        product.name,
        product.category,
        product.subcategory,
        format_amount(product.price),
        product.quantity
    )
}

pub fn decode_product(line: &str) -> Result<Product, ValidationError> {
    let f = split_fields(line, 6, "product")?;
    if f[0].is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }
    Ok(Product::new(
        f[0],
        f[1],
        f[2],
        f[3],
        parse_price(f[4])?,
        parse_quantity(f[5])?,
    ))
}

// ============================================================================
// Customer
// ============================================================================

pub fn encode_customer(customer: &Customer) -> String {
    format!("{},{},{}", customer.id, customer.name, customer.email)
}

pub fn decode_customer(line: &str) -> Result<Customer, ValidationError> {
    let f = split_fields(line, 3, "customer")?;
    if f[0].is_empty() {
        return Err(ValidationError::Required {
            field: "customer id".to_string(),
        });
    }
    Ok(Customer::new(f[0], f[1], f[2]))
}

// ============================================================================
// Sales
// ============================================================================

pub fn encode_sale(month_key: &str, amount: Decimal) -> String {
    format!("{},{}", month_key, format_amount(amount))
}

pub fn decode_sale(line: &str) -> Result<(String, Decimal), ValidationError> {
    let f = split_fields(line, 2, "sales")?;
    Ok((f[0].to_string(), parse_amount("sales amount", f[1])?))
}

// ============================================================================
// Admin
// ============================================================================

pub fn encode_admin(username: &str, password_hash: &str) -> String {
    format!("{},{}", username, password_hash)
}

pub fn decode_admin(line: &str) -> Result<(String, String), ValidationError> {
    let f = split_fields(line, 2, "admin")?;
    Ok((f[0].to_string(), f[1].to_string()))
}

// ============================================================================
// Orders
// ============================================================================

/// An order line from `orders.txt` before its items are resolved against
/// the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub tracking_id: String,
    pub timestamp: String,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub payment_method: PaymentMethod,
    pub total_price: Decimal,

    /// Raw `productId:qty;...` field
    pub items: String,
}

impl OrderRecord {
    /// Parsed `(product_id, quantity)` pairs; empty entries are skipped,
    /// malformed ones come back as errors.
    pub fn item_refs(&self) -> impl Iterator<Item = Result<(&str, u32), ValidationError>> + '_ {
        self.items
            .split(';')
            .filter(|entry| !entry.is_empty())
            .map(decode_item_ref)
    }
}

fn decode_item_ref(entry: &str) -> Result<(&str, u32), ValidationError> {
    let (id, qty) = entry.split_once(':').ok_or_else(|| ValidationError::InvalidFormat {
        field: "order item".to_string(),
        reason: format!("missing ':' in '{}'", entry),
    })?;
    Ok((id, parse_quantity(qty)?))
}

pub fn encode_order(order: &Order) -> String {
    let items = order
        .items
        .iter()
        .map(|line| format!("{}:{}", line.product.id, line.quantity))
        .collect::<Vec<_>>()
        .join(";");

    format!(
        "{},{},{},{},{},{},{},{},{}",
        order.order_id,
        order.tracking_id,
        order.timestamp,
        order.customer_name,
        order.customer_address,
        order.customer_phone,
        order.payment_method,
        format_amount(order.total_price),
        items
    )
}

pub fn decode_order(line: &str) -> Result<OrderRecord, ValidationError> {
    let f = split_fields(line, 9, "order")?;
    Ok(OrderRecord {
        order_id: f[0].to_string(),
        tracking_id: f[1].to_string(),
        timestamp: f[2].to_string(),
        customer_name: f[3].to_string(),
        customer_address: f[4].to_string(),
        customer_phone: f[5].to_string(),
        payment_method: f[6].parse()?,
        total_price: parse_amount("order total", f[7])?,
        items: f[8].to_string(),
    })
}

// ============================================================================
// Shipments
// ============================================================================

pub fn encode_shipment(
    order_id: &str,
    tracking_id: &str,
    customer_name: &str,
    address: &str,
    status: &str,
) -> String {
    format!("{},{},{},{},{}", order_id, tracking_id, customer_name, address, status)
}

/// Status of a shipment line: the text after the last comma
pub fn shipment_status(line: &str) -> Option<&str> {
    line.rsplit_once(',').map(|(_, status)| status.trim())
}

// ============================================================================
// ID counters
// ============================================================================

pub fn encode_counters(next_order: u64, next_tracking: u64) -> String {
    format!("{} {}", next_order, next_tracking)
}

pub fn decode_counters(line: &str) -> Result<(u64, u64), ValidationError> {
    let mut parts = line.split_whitespace().map(|p| {
        p.parse::<u64>().map_err(|_| ValidationError::NotNumeric {
            field: "id counter".to_string(),
            value: p.to_string(),
        })
    });

    match (parts.next(), parts.next()) {
        (Some(order), Some(tracking)) => Ok((order?, tracking?)),
        _ => Err(ValidationError::InvalidFormat {
            field: "id counters".to_string(),
            reason: "expected two numbers".to_string(),
        }),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::LinkedList;
    use crate::types::OrderLine;
    use std::str::FromStr;

    fn create_test_product(id: &str) -> Product {
        Product::new(id, "Lablis", "Women", "Eid Edition", Decimal::from(25700), 10)
    }

    #[test]
    fn test_product_line() {
        let line = encode_product(&create_test_product("1"));
        assert_eq!(line, "1,Lablis,Women,Eid Edition,25700,10");
        assert_eq!(decode_product(&line).unwrap(), create_test_product("1"));
    }

    #[test]
    fn test_product_fractional_price() {
        let p = decode_product("7,Scarf,Women,New In,1500.50,3").unwrap();
        assert_eq!(p.price, Decimal::from_str("1500.50").unwrap());
        assert_eq!(encode_product(&p), "7,Scarf,Women,New In,1500.5,3");
    }

    #[test]
    fn test_product_rejects_malformed() {
        assert!(decode_product("1,Lablis,Women").is_err());
        assert!(decode_product("1,Lablis,Women,Eid,abc,10").is_err());
        assert!(decode_product("1,Lablis,Women,Eid,10,-1").is_err());
        assert!(decode_product(",Lablis,Women,Eid,10,1").is_err());
    }

    #[test]
    fn test_customer_line() {
        let c = decode_customer("1001,Ayesha,ayesha@example.com").unwrap();
        assert_eq!(c, Customer::new("1001", "Ayesha", "ayesha@example.com"));
        assert_eq!(encode_customer(&c), "1001,Ayesha,ayesha@example.com");
        assert!(decode_customer("1001,Ayesha").is_err());
    }

    #[test]
    fn test_sale_and_admin_lines() {
        assert_eq!(
            decode_sale("03-2025,27200").unwrap(),
            ("03-2025".to_string(), Decimal::from(27200))
        );
        assert_eq!(encode_sale("03-2025", Decimal::from(27200)), "03-2025,27200");
        assert!(decode_sale("03-2025,lots").is_err());

        assert_eq!(
            decode_admin("admin,abc123").unwrap(),
            ("admin".to_string(), "abc123".to_string())
        );
    }

    #[test]
    fn test_order_line() {
        let mut items = LinkedList::new();
        items.push_back(OrderLine::new(create_test_product("1"), 2));
        items.push_back(OrderLine::new(create_test_product("2"), 1));

        let order = Order {
            order_id: "ORD000001".to_string(),
            tracking_id: "TRK000001".to_string(),
            timestamp: "2025-03-14 10:00:00".to_string(),
            customer_name: "Sara".to_string(),
            customer_address: "12 Canal Road".to_string(),
            customer_phone: "0300".to_string(),
            payment_method: PaymentMethod::OnlinePayment,
            items,
            total_price: Decimal::from(77100),
        };

        let line = encode_order(&order);
        assert_eq!(
            line,
            "ORD000001,TRK000001,2025-03-14 10:00:00,Sara,12 Canal Road,0300,Online Payment,77100,1:2;2:1"
        );

        let record = decode_order(&line).unwrap();
        assert_eq!(record.order_id, "ORD000001");
        assert_eq!(record.payment_method, PaymentMethod::OnlinePayment);
        assert_eq!(record.total_price, Decimal::from(77100));

        let refs: Vec<_> = record.item_refs().collect::<Result<_, _>>().unwrap();
        assert_eq!(refs, vec![("1", 2), ("2", 1)]);
    }

    #[test]
    fn test_order_item_refs_with_bad_entries() {
        let record =
            decode_order("ORD000002,TRK000002,2025-03-14 10:00:00,A,B,C,Cash,10,1:2;;junk;3:x;4:1")
                .unwrap();

        let refs: Vec<_> = record.item_refs().collect();
        assert_eq!(refs.len(), 4);
        assert_eq!(refs[0], Ok(("1", 2)));
        assert!(refs[1].is_err());
        assert!(refs[2].is_err());
        assert_eq!(refs[3], Ok(("4", 1)));
    }

    #[test]
    fn test_order_without_items() {
        let record = decode_order("ORD000003,TRK000003,ts,A,B,C,Cash,0,").unwrap();
        assert_eq!(record.item_refs().count(), 0);
    }

    #[test]
    fn test_shipment_status() {
        let line = encode_shipment("ORD000001", "TRK000001", "Sara", "12 Canal Road", "in progress");
        assert_eq!(line, "ORD000001,TRK000001,Sara,12 Canal Road,in progress");
        assert_eq!(shipment_status(&line), Some("in progress"));
        assert_eq!(shipment_status("no commas"), None);
    }

    #[test]
    fn test_counters() {
        assert_eq!(encode_counters(5, 7), "5 7");
        assert_eq!(decode_counters("5 7").unwrap(), (5, 7));
        assert!(decode_counters("5").is_err());
        assert!(decode_counters("five 7").is_err());
    }
}
