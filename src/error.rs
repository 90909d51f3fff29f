//! Error types for the store.
//!
//! ## Error Taxonomy
//!
//! - *not-found* on the index structures is `Option`/`bool`, never an error
//! - *malformed input* is a [`ValidationError`], raised before any mutation
//! - *I/O failure* during write-through is logged and swallowed by the store;
//!   [`StoreError::Io`] only surfaces from explicit file calls
//! - *unwritable data directory* at startup is [`StoreError::DataDirUnwritable`],
//!   which callers treat as fatal

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Validation Error
// ============================================================================

/// Input validation failures.
///
/// Raised before any state is touched, so the prior state is unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field must be a number.
    #[error("{field} must be a valid number, got '{value}'")]
    NotNumeric { field: String, value: String },

    /// Field cannot be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Field must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field would break the comma-separated record layout.
    #[error("{field} cannot contain commas")]
    ContainsDelimiter { field: String },

    /// Invalid format (username rule, password rule, month key).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Key already present.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// An amount or count would exceed what can be represented.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Two inputs that must agree do not.
    #[error("{field} does not match")]
    Mismatch { field: String },
}

// ============================================================================
// Store Error
// ============================================================================

/// Store operation failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No product with this id.
    #[error("Product ID {0} not found")]
    ProductNotFound(String),

    /// No customer with this id.
    #[error("Customer ID {0} not found")]
    CustomerNotFound(String),

    /// Not enough units in stock.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: u32,
        requested: u32,
    },

    /// Checkout with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The data directory cannot be created or written.
    #[error("Directory '{}' is not writable", path.display())]
    DataDirUnwritable { path: PathBuf },

    /// Underlying file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Convenience alias for results with [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Unit Tests
// ============================================================================
