//! Recommendation mapping with the per-item failure boundary.
//!
//! A recommendation structurally depends on its owning care plan row (issue
//! date and diagnosis reference live there). If that row cannot be resolved
//! the recommendation is dropped from the emitted list; sibling
//! recommendations and the surrounding record are unaffected.

use std::sync::LazyLock;

use mtb_model::care_plan::{DOI_SYSTEM, PUBMED_SYSTEM};
use mtb_model::codeset::{EVIDENCE_ADDENDUM, EVIDENCE_GRADE, RECOMMENDATION_PRIORITY};
use mtb_model::{
    Coding, LevelOfEvidence, MedicationRecommendation, ProcedureRecommendation,
    PublicationReference, Reference, StudyEnrollmentRecommendation,
};
use mtb_store::{PropertyCatalog, Row, RowStore, StoreError, Table};
use regex::Regex;
use tracing::error;

use crate::error::{AggregateError, Result};
use crate::mappers::{PROCEDURE_TYPE_SYSTEM, translate};
use crate::mappers::medication::{parse_medication_json, parse_study_json};
use crate::outcome::MappingOutcome;

static PUBMED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid PubMed id pattern"));
static DOI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{4}/\d+(\.\d+)?$").expect("valid DOI pattern"));

/// Source evidence levels to destination grading codes.
const EVIDENCE_GRADE_CODES: &[(&str, &str)] = &[
    ("1", "m1A"),
    ("2", "m1B"),
    ("3", "m1C"),
    ("4", "m2A"),
    ("5", "m2B"),
    ("6", "m2C"),
    ("7", "m3"),
    ("8", "m4"),
];

/// Addendum flag columns and the addendum code each one sets.
const ADDENDUM_FLAGS: &[(&str, &str)] = &[
    ("evidence_addendum_is", "is"),
    ("evidence_addendum_iv", "iv"),
    ("evidence_addendum_z", "Z"),
    ("evidence_addendum_r", "R"),
];

pub struct RecommendationMapper<'a> {
    store: &'a dyn RowStore,
    catalog: &'a PropertyCatalog,
}

impl<'a> RecommendationMapper<'a> {
    pub fn new(store: &'a dyn RowStore, catalog: &'a PropertyCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn medications_by_care_plan(
        &self,
        care_plan_id: i64,
    ) -> Result<Vec<MedicationRecommendation>> {
        self.items(care_plan_id, "medication", |row, plan| {
            self.medication(row, plan)
        })
    }

    pub fn procedures_by_care_plan(
        &self,
        care_plan_id: i64,
    ) -> Result<Vec<ProcedureRecommendation>> {
        self.items(care_plan_id, "procedure", |row, plan| {
            self.procedure(row, plan)
        })
    }

    pub fn studies_by_care_plan(
        &self,
        care_plan_id: i64,
    ) -> Result<Vec<StudyEnrollmentRecommendation>> {
        self.items(care_plan_id, "study", |row, plan| self.study(row, plan))
    }

    /// Maps each recommendation row of one category independently. An item
    /// whose mapping fails is logged and skipped; the listing itself failing
    /// is fatal for the caller.
    fn items<T>(
        &self,
        care_plan_id: i64,
        category: &str,
        map_item: impl Fn(&Row, &Row) -> Result<T>,
    ) -> Result<Vec<T>> {
        let rows = self.store.rows_by_parent(Table::Recommendation, care_plan_id)?;

        let mut items = Vec::new();
        for row in rows {
            if row.string("category").as_deref() != Some(category) {
                continue;
            }
            match self
                .owning_care_plan(&row)
                .and_then(|plan| map_item(&row, &plan))
            {
                Ok(item) => items.push(item),
                Err(err) => {
                    error!(recommendation = row.long("id"), %err, "skipping recommendation");
                }
            }
        }
        Ok(items)
    }

    /// Resolves the structural link to the owning care plan row.
    fn owning_care_plan(&self, row: &Row) -> Result<Row> {
        let parent_id = row.parent_id().ok_or_else(|| {
            AggregateError::Store(StoreError::MissingColumn {
                column: "parent_id".to_string(),
            })
        })?;
        Ok(self.store.row_by_id(Table::CarePlan, parent_id)?)
    }

    fn medication(&self, row: &Row, plan: &Row) -> Result<MedicationRecommendation> {
        Ok(MedicationRecommendation {
            id: row.id()?.to_string(),
            patient: row.patient()?,
            reason: diagnosis_reason(plan)?,
            issued_on: plan.date("issued_on"),
            priority: priority_coding(row),
            level_of_evidence: self.level_of_evidence(row),
            medication: row
                .string("medication_json")
                .and_then(|raw| {
                    MappingOutcome::capture(|| parse_medication_json(&raw)).into_option()
                })
                .unwrap_or_default(),
            specimen_ref: row
                .long("molecular_report_ref")
                .map(|id| Reference::to(id.to_string(), "Specimen")),
        })
    }

    fn procedure(&self, row: &Row, plan: &Row) -> Result<ProcedureRecommendation> {
        let code = row.property("procedure_code").and_then(|property| {
            MappingOutcome::capture(|| {
                let entry = self.catalog.resolve(&property.value, property.version)?;
                Ok(Coding::of(&property.value, PROCEDURE_TYPE_SYSTEM)
                    .with_display(entry.short_desc.clone()))
            })
            .into_option()
        });

        Ok(ProcedureRecommendation {
            id: row.id()?.to_string(),
            patient: row.patient()?,
            reason: diagnosis_reason(plan)?,
            issued_on: plan.date("issued_on"),
            priority: priority_coding(row),
            level_of_evidence: self.level_of_evidence(row),
            code,
        })
    }

    fn study(&self, row: &Row, plan: &Row) -> Result<StudyEnrollmentRecommendation> {
        Ok(StudyEnrollmentRecommendation {
            id: row.id()?.to_string(),
            patient: row.patient()?,
            reason: diagnosis_reason(plan)?,
            issued_on: plan.date("issued_on"),
            priority: priority_coding(row),
            level_of_evidence: self.level_of_evidence(row),
            studies: row
                .string("study_json")
                .and_then(|raw| MappingOutcome::capture(|| parse_study_json(&raw)).into_option())
                .unwrap_or_default(),
        })
    }

    fn level_of_evidence(&self, row: &Row) -> Option<LevelOfEvidence> {
        let source_grade = row.string("evidence_grade")?;
        let grading = translate(EVIDENCE_GRADE_CODES, &source_grade)
            .and_then(|code| EVIDENCE_GRADE.coding(code));

        let addenda = ADDENDUM_FLAGS
            .iter()
            .filter(|(column, _)| row.flag(column))
            .filter_map(|(_, code)| EVIDENCE_ADDENDUM.coding(code))
            .collect();

        let publications = row
            .string("publications")
            .map(|text| publication_references(&text))
            .unwrap_or_default();

        Some(LevelOfEvidence {
            grading,
            addenda,
            publications,
        })
    }
}

/// The diagnosis reference kept on the owning care plan row. Required: a
/// recommendation without its disease linkage is not emitted.
fn diagnosis_reason(plan: &Row) -> Result<Reference> {
    plan.string("diagnosis_ref")
        .map(|id| Reference::to(id, "Diagnosis"))
        .ok_or_else(|| {
            AggregateError::Store(StoreError::MissingColumn {
                column: "diagnosis_ref".to_string(),
            })
        })
}

fn priority_coding(row: &Row) -> Option<Coding> {
    let priority = row.integer("priority")?;
    RECOMMENDATION_PRIORITY.coding(&priority.to_string())
}

/// Maps only PubMed ids (digits) and DOIs; anything else is dropped.
fn publication_references(field_content: &str) -> Vec<PublicationReference> {
    field_content
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            if PUBMED_ID.is_match(line) {
                Some(PublicationReference {
                    id: line.to_string(),
                    system: PUBMED_SYSTEM.to_string(),
                })
            } else if DOI.is_match(line) {
                Some(PublicationReference {
                    id: line.to_string(),
                    system: DOI_SYSTEM.to_string(),
                })
            } else {
                None
            }
        })
        .collect()
}
