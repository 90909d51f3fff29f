//! Monthly sales: `MM-YYYY` -> accumulated order totals.

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::ValidationError;
use crate::index::{ChainedHashMap, OrderHeap};
use crate::persist::codec::{decode_sale, encode_sale};

/// Check a user-supplied month key: seven characters, `-` at index 2.
///
/// # Example
///
/// ```
/// use famin_store::store::validate_month_key;
///
/// assert!(validate_month_key("06-2025").is_ok());
/// assert!(validate_month_key("2025-06").is_err());
/// ```
pub fn validate_month_key(month: &str) -> Result<(), ValidationError> {
    let bytes = month.as_bytes();
    if bytes.len() != 7 || bytes[2] != b'-' {
        return Err(ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: "use MM-YYYY".to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SalesTable {
    table: ChainedHashMap<String, Decimal>,
}

impl SalesTable {
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            table: ChainedHashMap::with_buckets(bucket_count),
        }
    }

    /// Add `amount` to the month's running total.
    ///
    /// On overflow the table is unchanged.
    pub fn add(&mut self, month: &str, amount: Decimal) -> Result<Decimal, ValidationError> {
        let total = self.total_after(month, amount)?;
        match self.table.find_mut(month) {
            Some(current) => *current = total,
            None => {
                self.table.insert(month.to_string(), total);
            }
        }
        Ok(total)
    }

    /// The month's total if `amount` were added, without recording it
    pub fn total_after(&self, month: &str, amount: Decimal) -> Result<Decimal, ValidationError> {
        self.get(month)
            .checked_add(amount)
            .ok_or_else(|| ValidationError::Overflow {
                field: format!("sales for {}", month),
            })
    }

    /// Total for a month, zero when nothing was sold
    pub fn get(&self, month: &str) -> Decimal {
        self.table.find(month).copied().unwrap_or(Decimal::ZERO)
    }

    /// Replace every total with the sums over `orders`.
    ///
    /// Orders whose timestamp does not parse, or whose total would overflow
    /// the month, are skipped with a warning.
    pub fn rebuild(&mut self, orders: &OrderHeap) {
        self.table.clear();
        for order in orders.iter() {
            match order.month_key() {
                Some(month) => {
                    if let Err(err) = self.add(&month, order.total_price) {
                        warn!(order_id = %order.order_id, error = %err, "Skipping order in sales rebuild");
                    }
                }
                None => warn!(
                    order_id = %order.order_id,
                    timestamp = %order.timestamp,
                    "Skipping order with unparseable timestamp"
                ),
            }
        }
    }

    /// `(month, total)` pairs in bucket order
    pub fn entries(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.table.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn load_lines(&mut self, lines: &[String]) {
        for line in lines {
            match decode_sale(line) {
                Ok((month, amount)) => {
                    if validate_month_key(&month).is_err() {
                        warn!(month = %month, "Sales key is not MM-YYYY and cannot be looked up");
                    }
                    self.table.insert(month, amount);
                }
                Err(err) => warn!(line = %line, error = %err, "Skipping malformed sales record"),
            }
        }
    }

    pub fn encode_lines(&self) -> Vec<String> {
        self.entries().map(|(k, v)| encode_sale(k, v)).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
