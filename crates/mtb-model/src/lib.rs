//! Data model for aggregated molecular-tumor-board records.
//!
//! These types are pure data sinks: they carry no mapping behavior. The
//! aggregation core fills them in and omits anything it could not resolve.

pub mod care_plan;
pub mod codeset;
pub mod coding;
pub mod record;
pub mod specimen;
pub mod therapy;

pub use care_plan::{
    CarePlan, GeneticCounselingRecommendation, LevelOfEvidence, MedicationRecommendation,
    ProcedureRecommendation, PublicationReference, RebiopsyRequest, ReevaluationRequest,
    StudyEnrollmentRecommendation,
};
pub use codeset::CodeSet;
pub use coding::{Coding, Period, Reference};
pub use record::{
    Diagnosis, Episode, Grading, GradingEntry, MtbRecord, Staging, StagingEntry,
    TnmClassification,
};
pub use specimen::{Specimen, SpecimenCollection};
pub use therapy::{HistologyReport, PerformanceStatus, PriorFinding, TherapyLine};
