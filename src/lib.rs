//! # Famin Store
//!
//! In-process data layer for the Famin e-commerce store: a product
//! catalog, customers, carts, orders and monthly sales, persisted to
//! line-oriented text files.
//!
//! ## Architecture
//!
//! - **Index**: Hand-built structures (AVL tree, chained hash map, linked
//!   list, max-heap) with slab-backed nodes
//! - **Types**: Products, customers, cart and order lines, orders
//! - **Persist**: Line codecs and flat-file I/O
//! - **Store**: The application core, write-through to disk
//!
//! ## Design Principles
//!
//! 1. **Deterministic ordering**: Products iterate by id, orders by total,
//!    hash tables in a fixed bucket order
//! 2. **No floating point money**: Prices and totals are `Decimal`
//! 3. **Arena nodes**: Tree and list nodes live in a slab, linked by key
//! 4. **Single-threaded**: Every operation runs to completion
//!
//! ## Example
//!
//! ```no_run
//! use famin_store::{CheckoutDetails, PaymentMethod, Store, StoreConfig};
//!
//! let mut store = Store::open(StoreConfig::default())?;
//! store.add_to_cart("2", 2)?;
//! let order = store.place_order(CheckoutDetails::new(
//!     "Sara",
//!     "12 Canal Road",
//!     "0300-1234567",
//!     PaymentMethod::Cash,
//! ))?;
//! println!("{}", order);
//! # Ok::<(), famin_store::StoreError>(())
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Records: Product, Customer, CartItem, OrderLine, Order
pub mod types;

/// Core index structures: ProductTree, ChainedHashMap, LinkedList, OrderHeap
pub mod index;

/// Flat-file codecs and I/O
pub mod persist;

/// Application core over the index and the data directory
pub mod store;

/// Runtime configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult, ValidationError};
pub use index::{ChainedHashMap, LinkedList, OrderHeap, ProductKeyed, ProductTree};
pub use store::{CheckoutDetails, ProductEdit, ShipmentTally, Store};
pub use types::{CartItem, Customer, Order, OrderLine, PaymentMethod, Product};
