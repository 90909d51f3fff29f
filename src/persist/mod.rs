//! Serialization adapters between the index structures and flat files.
//!
//! - [`codec`]: one encode/decode pair per record type
//! - [`DataFiles`]: directory setup, whole-file rewrite, append-only log
//!
//! The index structures never see text; the store walks them (ascending
//! for products, bucket order for tables, descending for orders) and hands
//! encoded lines to [`DataFiles::save`].

pub mod codec;
mod files;

pub use codec::OrderRecord;
pub use files::DataFiles;
