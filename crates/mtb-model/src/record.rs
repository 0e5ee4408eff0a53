//! The aggregated MTB record and its diagnosis section.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::care_plan::CarePlan;
use crate::coding::{Coding, Period, Reference};
use crate::specimen::Specimen;
use crate::therapy::{HistologyReport, PerformanceStatus, PriorFinding, TherapyLine};

/// The complete molecular-tumor-board record for one episode.
///
/// All sections except the episode itself are best-effort: a section that
/// could not be mapped is empty or absent, never partially invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MtbRecord {
    pub episode: Episode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Diagnosis>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub care_plans: Vec<CarePlan>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub specimens: Vec<Specimen>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub performance_status: Vec<PerformanceStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub therapy_lines: Vec<TherapyLine>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub histology_reports: Vec<HistologyReport>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub prior_findings: Vec<PriorFinding>,
}

/// The root clinical encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub patient: Reference,
    pub period: Period,
    /// References to the diagnoses handled within this episode.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnosis_refs: Vec<Reference>,
}

/// Coded classification of the tumor disease, with its observation histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: String,
    pub patient: Reference,
    /// Primary classification (ICD-10), display text resolved from the
    /// property catalog for the code's recorded schema version.
    pub code: Coding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topography: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_type: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading: Option<Grading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging: Option<Staging>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guideline_treatment_status: Option<Coding>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub histology_refs: Vec<Reference>,
}

/// Ordered grading observation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grading {
    pub history: Vec<GradingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,
    pub codes: Vec<Coding>,
}

/// Ordered staging observation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staging {
    pub history: Vec<StagingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagingEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tnm: Option<TnmClassification>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub other_classifications: Vec<Coding>,
}

/// TNM staging fragments. Each component is present only if the source
/// fragment survived normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TnmClassification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tumor: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metastasis: Option<Coding>,
}

impl TnmClassification {
    pub fn is_empty(&self) -> bool {
        self.tumor.is_none() && self.nodes.is_none() && self.metastasis.is_none()
    }
}
