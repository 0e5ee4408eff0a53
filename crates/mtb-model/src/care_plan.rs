//! Care plans and their recommendation children.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::coding::{Coding, Reference};

/// One board care plan owned by an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlan {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_ref: Option<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub medication_recommendations: Vec<MedicationRecommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub procedure_recommendations: Vec<ProcedureRecommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub study_enrollment_recommendations: Vec<StudyEnrollmentRecommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub rebiopsy_requests: Vec<RebiopsyRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub reevaluation_requests: Vec<ReevaluationRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genetic_counseling: Option<GeneticCounselingRecommendation>,
    /// Why the plan carries no recommendations, if the board said so.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_reason: Option<Coding>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// A medication recommendation with its supporting evidence level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecommendation {
    pub id: String,
    pub patient: Reference,
    pub reason: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_of_evidence: Option<LevelOfEvidence>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub medication: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen_ref: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureRecommendation {
    pub id: String,
    pub patient: Reference,
    pub reason: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_of_evidence: Option<LevelOfEvidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Coding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyEnrollmentRecommendation {
    pub id: String,
    pub patient: Reference,
    pub reason: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_of_evidence: Option<LevelOfEvidence>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub studies: Vec<Reference>,
}

/// Level of evidence: grade, optional addenda, publication references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelOfEvidence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading: Option<Coding>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub addenda: Vec<Coding>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub publications: Vec<PublicationReference>,
}

/// A literature reference backing an evidence grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationReference {
    pub id: String,
    /// The registry the id belongs to, e.g. PubMed or DOI.
    pub system: String,
}

pub const PUBMED_SYSTEM: &str = "https://pubmed.ncbi.nlm.nih.gov";
pub const DOI_SYSTEM: &str = "https://doi.org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticCounselingRecommendation {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Coding>,
}

/// Request to take a new biopsy for a tumor entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebiopsyRequest {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tumor_entity: Option<Reference>,
}

/// Request to reevaluate an existing specimen's histology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReevaluationRequest {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen_ref: Option<Reference>,
}
