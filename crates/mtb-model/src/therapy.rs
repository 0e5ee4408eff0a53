//! Clinical course sections: performance status, therapy lines, histology
//! reports and prior molecular findings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::coding::{Coding, Period, Reference};

/// One dated ECOG observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStatus {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Coding>,
}

/// One systemic guideline therapy line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapyLine {
    pub id: String,
    pub patient: Reference,
    pub reason: Reference,
    pub recorded_on: NaiveDate,
    pub period: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub medication: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<Coding>,
    /// The board recommendation this therapy is based on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// A histology report row linked to the episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistologyReport {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen_ref: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tumor_morphology: Option<Coding>,
}

/// A prior molecular diagnostic report, matched into the record by its
/// free-text submission number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorFinding {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
