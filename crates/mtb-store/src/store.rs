//! The row store boundary.
//!
//! The aggregation core consumes only this interface; query syntax, caching
//! and connection handling live behind it.

use std::fmt;

use crate::error::StoreError;
use crate::row::Row;

/// The source tables the aggregation reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    Episode,
    CarePlan,
    Recommendation,
    RebiopsyRequest,
    ReevaluationRequest,
    PriorFinding,
    HistologyReport,
    MolecularReport,
    Grading,
    Staging,
    PerformanceStatus,
    TherapyLine,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Episode => "episode",
            Self::CarePlan => "care_plan",
            Self::Recommendation => "recommendation",
            Self::RebiopsyRequest => "rebiopsy_request",
            Self::ReevaluationRequest => "reevaluation_request",
            Self::PriorFinding => "prior_finding",
            Self::HistologyReport => "histology_report",
            Self::MolecularReport => "molecular_report",
            Self::Grading => "grading",
            Self::Staging => "staging",
            Self::PerformanceStatus => "performance_status",
            Self::TherapyLine => "therapy_line",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to the backing relational store.
pub trait RowStore {
    /// Fetches the single row with the given id. Zero matching rows fail
    /// with [`StoreError::NotFound`], more than one with
    /// [`StoreError::Ambiguous`].
    fn row_by_id(&self, table: Table, id: i64) -> Result<Row, StoreError>;

    /// Fetches all rows owned by the given parent, in stored order. An empty
    /// result is ordinary, not an error.
    fn rows_by_parent(&self, table: Table, parent_id: i64) -> Result<Vec<Row>, StoreError>;

    /// Resolves a molecular report via its free-text submission number.
    fn molecular_report_by_submission_number(&self, submission_no: &str)
    -> Result<Row, StoreError>;

    /// Resolves the episode id behind an external case identifier.
    fn episode_id_by_case_id(&self, case_id: &str) -> Result<i64, StoreError>;

    /// Resolves the most recent episode for a (patient, tumor) pair.
    fn latest_episode_id(&self, patient_id: &str, tumor_id: i64) -> Result<i64, StoreError>;
}
