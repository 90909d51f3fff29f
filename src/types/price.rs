//! Money and quantity parsing utilities.
//!
//! ## Overview
//!
//! Prices and order totals are held as [`Decimal`] so that summing a cart
//! or a month of sales never drifts the way binary floating point does.
//!
//! ## Text Form
//!
//! Values are written in normalized form: `25700.00` is written as `25700`,
//! `1500.50` as `1500.5`. This is the shape the flat files already contain.
//!
//! ## Examples
//!
//! ```
//! use famin_store::types::price::{parse_price, format_amount};
//!
//! let price = parse_price("25700.00").unwrap();
//! assert_eq!(format_amount(price), "25700");
//!
//! assert!(parse_price("-1").is_err());
//! assert!(parse_price("abc").is_err());
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;

// ============================================================================
// Parsing
// ============================================================================

/// Parse a non-negative price.
///
/// # Arguments
///
/// * `s` - Decimal string (e.g., "1500.50"); surrounding whitespace is ignored
///
/// # Returns
///
/// * `Ok(Decimal)` - The parsed price
/// * `Err(ValidationError)` - If the text is not a number or is negative
pub fn parse_price(s: &str) -> Result<Decimal, ValidationError> {
    parse_amount("price", s)
}

/// Parse a non-negative decimal amount for the named field.
pub fn parse_amount(field: &str, s: &str) -> Result<Decimal, ValidationError> {
    let trimmed = s.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| ValidationError::NotNumeric {
        field: field.to_string(),
        value: trimmed.to_string(),
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(value)
}

/// Parse a non-negative integer quantity.
///
/// Text that is numeric but negative reports [`ValidationError::Negative`]
/// rather than a format error.
///
/// # Example
///
/// ```
/// use famin_store::types::price::parse_quantity;
///
/// assert_eq!(parse_quantity("20").unwrap(), 20);
/// assert!(parse_quantity("-3").is_err());
/// assert!(parse_quantity("2.5").is_err());
/// ```
pub fn parse_quantity(s: &str) -> Result<u32, ValidationError> {
    let trimmed = s.trim();
    match trimmed.parse::<u32>() {
        Ok(q) => Ok(q),
        Err(_) if trimmed.parse::<i64>().is_ok() => Err(ValidationError::Negative {
            field: "quantity".to_string(),
        }),
        Err(_) => Err(ValidationError::NotNumeric {
            field: "quantity".to_string(),
            value: trimmed.to_string(),
        }),
    }
}

// ============================================================================
// Formatting and arithmetic
// ============================================================================

/// Format an amount in normalized form (no trailing zeros).
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Unit price times quantity.
///
/// # Returns
///
/// * `Some(Decimal)` - The line total
/// * `None` - If the product does not fit in a [`Decimal`]
#[inline]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

/// Sum amounts, failing on the first `None` or on overflow.
///
/// # Example
///
/// ```
/// use famin_store::types::price::checked_sum;
/// use rust_decimal::Decimal;
///
/// let parts = [Some(Decimal::from(2)), Some(Decimal::from(3))];
/// assert_eq!(checked_sum(parts), Some(Decimal::from(5)));
/// assert_eq!(checked_sum([Some(Decimal::MAX), Some(Decimal::ONE)]), None);
/// ```
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount?))
}

// ============================================================================
// Unit Tests
// ============================================================================
