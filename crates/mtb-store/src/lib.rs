//! Store boundary for MTB record aggregation.
//!
//! Everything the aggregation core reads comes through here: typed rows from
//! the relational store and display text from the versioned property
//! catalog. The core never sees query syntax.

pub mod error;
pub mod memory;
pub mod propcat;
pub mod row;
pub mod store;

pub use error::{CatalogError, StoreError};
pub use memory::MemoryStore;
pub use propcat::{CatalogEntry, CatalogSource, MemoryCatalog, PropertyCatalog};
pub use row::{RawProperty, Row};
pub use store::{RowStore, Table};
