//! Top-level record aggregation.
//!
//! One aggregation request walks the episode's reachable sections and emits
//! a best-effort record: recoverable field failures omit the field, a fatal
//! failure aborts only the smallest enclosing unit that structurally depends
//! on it. The whole call fails only when the root episode itself is
//! unresolvable.

use std::sync::Arc;

use mtb_model::{MtbRecord, Reference};
use mtb_store::{PropertyCatalog, RowStore, Table};
use tracing::error;

use crate::error::Result;
use crate::mappers::care_plan::CarePlanMapper;
use crate::mappers::diagnosis::DiagnosisMapper;
use crate::mappers::episode::map_episode;
use crate::mappers::histology::HistologyReportMapper;
use crate::mappers::performance::PerformanceStatusMapper;
use crate::mappers::prior_finding::PriorFindingMapper;
use crate::mappers::specimen::SpecimenMapper;
use crate::mappers::therapy_line::TherapyLineMapper;

pub struct Aggregator<'a> {
    store: &'a dyn RowStore,
    catalog: Arc<PropertyCatalog>,
}

impl<'a> Aggregator<'a> {
    /// The property catalog is built once at startup and shared by
    /// reference; aggregators are cheap per-request values on top of it.
    pub fn new(store: &'a dyn RowStore, catalog: Arc<PropertyCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Aggregates the record rooted at the given episode id.
    ///
    /// Fails only if the root row lookup fails (`NotFound`/`Ambiguous`);
    /// everything below the root degrades per section or per item.
    pub fn aggregate(&self, episode_id: i64) -> Result<MtbRecord> {
        let root = self.store.row_by_id(Table::Episode, episode_id)?;

        let episode = map_episode(&root)?;

        let diagnosis = match DiagnosisMapper::new(self.store, &self.catalog).map(&root) {
            Ok(diagnosis) => Some(diagnosis),
            Err(err) => {
                error!(episode = episode_id, %err, "diagnosis could not be mapped");
                None
            }
        };
        let diagnosis_ref = diagnosis
            .as_ref()
            .map(|diagnosis| Reference::to(diagnosis.id.clone(), "Diagnosis"));

        let care_plan_mapper = CarePlanMapper::new(self.store, &self.catalog);
        let mut care_plans = Vec::new();
        for row in self.store.rows_by_parent(Table::CarePlan, episode_id)? {
            let id = match row.id() {
                Ok(id) => id,
                Err(err) => {
                    error!(%err, "skipping care plan row without id");
                    continue;
                }
            };
            match care_plan_mapper.by_id(id) {
                Ok(plan) => care_plans.push(plan),
                Err(err) => error!(care_plan = id, %err, "skipping care plan"),
            }
        }

        let specimens =
            SpecimenMapper::new(self.store).all_by_episode(episode_id, diagnosis_ref.as_ref())?;

        Ok(MtbRecord {
            episode,
            diagnosis,
            care_plans,
            specimens,
            performance_status: PerformanceStatusMapper::new(self.store)
                .all_by_episode(episode_id)?,
            therapy_lines: TherapyLineMapper::new(self.store, &self.catalog)
                .all_by_episode(episode_id)?,
            histology_reports: HistologyReportMapper::new(self.store, &self.catalog)
                .all_by_episode(episode_id)?,
            prior_findings: PriorFindingMapper::new(self.store).all_by_episode(episode_id)?,
        })
    }

    /// Aggregates via the external case identifier.
    pub fn aggregate_by_case_id(&self, case_id: &str) -> Result<MtbRecord> {
        self.aggregate(self.store.episode_id_by_case_id(case_id)?)
    }

    /// Aggregates the most recent episode of a (patient, tumor) pair.
    pub fn aggregate_latest_for_patient(
        &self,
        patient_id: &str,
        tumor_id: i64,
    ) -> Result<MtbRecord> {
        self.aggregate(self.store.latest_episode_id(patient_id, tumor_id)?)
    }
}
