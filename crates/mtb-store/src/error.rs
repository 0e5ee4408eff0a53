use thiserror::Error;

use crate::store::Table;

/// Errors from single-row and keyed lookups against the backing store.
///
/// `NotFound` and `Ambiguous` are structural: a caller that required exactly
/// one row cannot continue with the item depending on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no {table} record found for {key}")]
    NotFound { table: Table, key: String },
    #[error("multiple {table} records found for {key}")]
    Ambiguous { table: Table, key: String },
    #[error("column '{column}' has no usable value")]
    MissingColumn { column: String },
}

impl StoreError {
    pub fn not_found(table: Table, key: impl ToString) -> Self {
        Self::NotFound {
            table,
            key: key.to_string(),
        }
    }

    pub fn ambiguous(table: Table, key: impl ToString) -> Self {
        Self::Ambiguous {
            table,
            key: key.to_string(),
        }
    }
}

/// A `(code, version)` pair absent from the property catalog.
///
/// Fatal for the field requiring the display text: a coding cannot be
/// emitted without it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no property catalog entry for code '{code}' version {version}")]
    MissingEntry { code: String, version: i32 },
}
