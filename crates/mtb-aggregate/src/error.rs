use mtb_store::{CatalogError, StoreError};
use thiserror::Error;

/// Fatal aggregation errors.
///
/// Fatal means: the smallest enclosing unit that structurally depends on the
/// failed lookup is aborted — an item in a list, or the whole record when the
/// root episode itself is unresolvable. Recoverable field failures never
/// appear here; they live in [`crate::outcome::MappingOutcome`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, AggregateError>;
