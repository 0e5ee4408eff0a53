//! Multi-path specimen reference discovery.
//!
//! A specimen id is not owned by a single parent: it is reachable from an
//! episode via several independent relation paths. Each path is one entry in
//! a data-driven list, so adding a discovery path does not touch the
//! dedup/ordering logic.

use std::collections::HashSet;

use mtb_store::{RowStore, StoreError, Table};
use tracing::debug;

/// Column carrying the molecular report (= specimen) reference on rows that
/// link to one.
const SPECIMEN_REF_COLUMN: &str = "molecular_report_ref";

/// Submission-number marker for findings whose report is not on file.
const UNKNOWN_SUBMISSION: &str = "unknown";

pub struct SpecimenReferenceCollector<'a> {
    store: &'a dyn RowStore,
}

impl<'a> SpecimenReferenceCollector<'a> {
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self { store }
    }

    /// Collects all specimen ids reachable from the episode, deduplicated in
    /// first-discovery order. Path order is fixed; row order within a path
    /// comes from the store.
    pub fn collect(&self, episode_id: i64) -> Result<Vec<i64>, StoreError> {
        let care_plan_ids: Vec<i64> = self
            .store
            .rows_by_parent(Table::CarePlan, episode_id)?
            .iter()
            .filter_map(|row| row.id().ok())
            .collect();

        type Discover<'c> = Box<dyn Fn() -> Result<Vec<i64>, StoreError> + 'c>;
        let paths: [(&str, Discover<'_>); 5] = [
            (
                "care-plan-recommendations",
                Box::new(|| self.linked_reports(Table::Recommendation, &care_plan_ids)),
            ),
            (
                "rebiopsy",
                Box::new(|| self.linked_reports(Table::RebiopsyRequest, &care_plan_ids)),
            ),
            (
                "reevaluation",
                Box::new(|| self.linked_reports(Table::ReevaluationRequest, &care_plan_ids)),
            ),
            (
                "prior-findings-by-submission-number",
                Box::new(|| self.reports_by_submission_number(episode_id)),
            ),
            (
                "histology-implicit-link",
                Box::new(|| self.histology_reports(episode_id)),
            ),
        ];

        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for (name, discover) in paths {
            let candidates = discover()?;
            debug!(path = name, candidates = candidates.len(), "specimen discovery");
            for id in candidates {
                if seen.insert(id) {
                    ordered.push(id);
                }
            }
        }
        Ok(ordered)
    }

    /// Specimen references on child rows of the given care plans.
    fn linked_reports(&self, table: Table, care_plan_ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        let mut ids = Vec::new();
        for care_plan_id in care_plan_ids {
            for row in self.store.rows_by_parent(table, *care_plan_id)? {
                if let Some(id) = row.long(SPECIMEN_REF_COLUMN) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// Prior findings carry only a free-text submission number; a number
    /// that does not resolve is skipped for that candidate alone.
    fn reports_by_submission_number(&self, episode_id: i64) -> Result<Vec<i64>, StoreError> {
        let mut ids = Vec::new();
        for row in self.store.rows_by_parent(Table::PriorFinding, episode_id)? {
            let Some(submission_no) = row.string("submission_no") else {
                continue;
            };
            if submission_no.eq_ignore_ascii_case(UNKNOWN_SUBMISSION) {
                continue;
            }
            match self
                .store
                .molecular_report_by_submission_number(&submission_no)
            {
                Ok(report) => ids.extend(report.id().ok()),
                Err(err) => {
                    debug!(submission_no = %submission_no, %err, "submission number did not resolve");
                }
            }
        }
        Ok(ids)
    }

    fn histology_reports(&self, episode_id: i64) -> Result<Vec<i64>, StoreError> {
        Ok(self
            .store
            .rows_by_parent(Table::HistologyReport, episode_id)?
            .iter()
            .filter_map(|row| row.long(SPECIMEN_REF_COLUMN))
            .collect())
    }
}
