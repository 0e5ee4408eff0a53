//! Resilient aggregation of molecular-tumor-board records.
//!
//! Assembles one [`mtb_model::MtbRecord`] per episode from a relational
//! store whose facts are scattered across many tables, joined
//! inconsistently and individually unreliable. The pieces:
//!
//! - [`outcome::MappingOutcome`] — degrade-gracefully field mapping,
//! - [`tnm::normalize_tnm`] — staging fragment normalization,
//! - [`collect::SpecimenReferenceCollector`] — multi-path reference
//!   discovery with first-seen dedup,
//! - [`aggregate::Aggregator`] — the orchestrator applying the
//!   fatal/recoverable error policy.

pub mod aggregate;
pub mod collect;
pub mod error;
pub mod mappers;
pub mod outcome;
pub mod tnm;

pub use aggregate::Aggregator;
pub use collect::SpecimenReferenceCollector;
pub use error::{AggregateError, Result};
pub use outcome::{FieldError, MappingOutcome};
pub use tnm::normalize_tnm;
