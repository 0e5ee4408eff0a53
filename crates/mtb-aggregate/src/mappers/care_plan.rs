//! Care plan mapping.

use mtb_model::codeset::{GENETIC_COUNSELING_REASON, RECOMMENDATIONS_MISSING_REASON};
use mtb_model::{
    CarePlan, Coding, GeneticCounselingRecommendation, RebiopsyRequest, ReevaluationRequest,
    Reference,
};
use mtb_store::{PropertyCatalog, Row, RowStore, Table};

use crate::error::Result;
use crate::mappers::recommendation::RecommendationMapper;
use crate::outcome::MappingOutcome;

pub struct CarePlanMapper<'a> {
    store: &'a dyn RowStore,
    catalog: &'a PropertyCatalog,
}

impl<'a> CarePlanMapper<'a> {
    pub fn new(store: &'a dyn RowStore, catalog: &'a PropertyCatalog) -> Self {
        Self { store, catalog }
    }

    /// Loads and maps one care plan. A failing single-row fetch here is
    /// fatal for this plan only; the caller decides what to do with it.
    pub fn by_id(&self, id: i64) -> Result<CarePlan> {
        let row = self.store.row_by_id(Table::CarePlan, id)?;
        self.map(&row)
    }

    fn map(&self, row: &Row) -> Result<CarePlan> {
        let id = row.id()?;
        let diagnosis_ref = row
            .string("diagnosis_ref")
            .map(|ref_id| Reference::to(ref_id, "Diagnosis"));

        let mut plan = CarePlan {
            id: id.to_string(),
            patient: row.patient()?,
            issued_on: row.date("issued_on"),
            diagnosis_ref: diagnosis_ref.clone(),
            medication_recommendations: Vec::new(),
            procedure_recommendations: Vec::new(),
            study_enrollment_recommendations: Vec::new(),
            rebiopsy_requests: self.rebiopsy_requests(id, diagnosis_ref.as_ref())?,
            reevaluation_requests: self.reevaluation_requests(id)?,
            genetic_counseling: self.genetic_counseling(row),
            missing_reason: row
                .string("status_reason")
                .and_then(|code| RECOMMENDATIONS_MISSING_REASON.coding(&code)),
            notes: row
                .string("protocol_excerpt")
                .map(|text| vec![text])
                .unwrap_or_default(),
        };

        if row.flag("with_recommendations") {
            let recommendations = RecommendationMapper::new(self.store, self.catalog);
            plan.medication_recommendations = recommendations.medications_by_care_plan(id)?;
            plan.procedure_recommendations = recommendations.procedures_by_care_plan(id)?;
            plan.study_enrollment_recommendations = recommendations.studies_by_care_plan(id)?;
        }

        Ok(plan)
    }

    fn rebiopsy_requests(
        &self,
        care_plan_id: i64,
        diagnosis_ref: Option<&Reference>,
    ) -> Result<Vec<RebiopsyRequest>> {
        Ok(self
            .store
            .rows_by_parent(Table::RebiopsyRequest, care_plan_id)?
            .iter()
            .filter_map(|row| {
                MappingOutcome::capture(|| {
                    Ok(RebiopsyRequest {
                        id: row.id()?.to_string(),
                        patient: row.patient()?,
                        issued_on: row.date("issued_on"),
                        tumor_entity: diagnosis_ref.cloned(),
                    })
                })
                .into_option()
            })
            .collect())
    }

    fn reevaluation_requests(&self, care_plan_id: i64) -> Result<Vec<ReevaluationRequest>> {
        Ok(self
            .store
            .rows_by_parent(Table::ReevaluationRequest, care_plan_id)?
            .iter()
            .filter_map(|row| {
                MappingOutcome::capture(|| {
                    Ok(ReevaluationRequest {
                        id: row.id()?.to_string(),
                        patient: row.patient()?,
                        issued_on: row.date("issued_on"),
                        specimen_ref: row
                            .long("molecular_report_ref")
                            .map(|id| Reference::to(id.to_string(), "Specimen")),
                    })
                })
                .into_option()
            })
            .collect())
    }

    fn genetic_counseling(&self, row: &Row) -> Option<GeneticCounselingRecommendation> {
        if !row.flag("genetic_counseling") {
            return None;
        }

        let reason = row
            .property("genetic_counseling_reason")
            .filter(|property| GENETIC_COUNSELING_REASON.is_member(&property.value))
            .and_then(|property| {
                MappingOutcome::capture(|| {
                    let entry = self.catalog.resolve(&property.value, property.version)?;
                    Ok(Coding::of(&property.value, GENETIC_COUNSELING_REASON.system())
                        .with_display(entry.short_desc.clone()))
                })
                .into_option()
            });

        Some(GeneticCounselingRecommendation {
            id: row.id().ok()?.to_string(),
            patient: row.patient().ok()?,
            issued_on: row.date("genetic_counseling_on"),
            reason,
        })
    }
}
