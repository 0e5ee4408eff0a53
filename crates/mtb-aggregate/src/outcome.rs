//! Chainable field-mapping outcomes.
//!
//! Field-level mapping often needs several dependent steps (look up a code,
//! then format it). `MappingOutcome` keeps those chains flat: once a step
//! fails the rest are skipped, and the failure is logged exactly once, at the
//! point it was created. Fatal conditions are ordinary `Err` returns
//! elsewhere; this type carries only recoverable failures.

use mtb_store::{CatalogError, StoreError};
use thiserror::Error;
use tracing::error;

/// A recoverable field-mapping failure. The field is omitted from the
/// emitted record; siblings and the record are unaffected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct FieldError {
    reason: String,
}

impl FieldError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<CatalogError> for FieldError {
    fn from(err: CatalogError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<StoreError> for FieldError {
    fn from(err: StoreError) -> Self {
        Self::new(err.to_string())
    }
}

/// Either a mapped value or a recoverable failure.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingOutcome<T> {
    Value(T),
    Failed(FieldError),
}

impl<T> MappingOutcome<T> {
    /// Runs a fallible mapping step. A failure is logged here, once.
    pub fn capture(f: impl FnOnce() -> Result<T, FieldError>) -> Self {
        match f() {
            Ok(value) => Self::Value(value),
            Err(err) => {
                error!("{err}");
                Self::Failed(err)
            }
        }
    }

    /// Applies `f` to a present value. An already-failed outcome passes
    /// through untouched and unlogged.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MappingOutcome<U> {
        match self {
            Self::Value(value) => MappingOutcome::Value(f(value)),
            Self::Failed(err) => MappingOutcome::Failed(err),
        }
    }

    /// Chains another fallible step. A new failure is logged at creation;
    /// an inherited one is not logged again.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, FieldError>) -> MappingOutcome<U> {
        match self {
            Self::Value(value) => MappingOutcome::capture(|| f(value)),
            Self::Failed(err) => MappingOutcome::Failed(err),
        }
    }

    /// The value if present — used to attach a field to the outgoing record
    /// or omit it.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Failed(_) => None,
        }
    }
}
