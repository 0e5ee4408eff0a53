//! ECOG performance status mapping.

use mtb_model::PerformanceStatus;
use mtb_model::codeset::ECOG;
use mtb_store::{Row, RowStore, Table};

use crate::error::Result;
use crate::outcome::MappingOutcome;

pub struct PerformanceStatusMapper<'a> {
    store: &'a dyn RowStore,
}

impl<'a> PerformanceStatusMapper<'a> {
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self { store }
    }

    /// All ECOG observations of an episode, ordered by effective date.
    pub fn all_by_episode(&self, episode_id: i64) -> Result<Vec<PerformanceStatus>> {
        let mut all: Vec<PerformanceStatus> = self
            .store
            .rows_by_parent(Table::PerformanceStatus, episode_id)?
            .iter()
            .filter_map(|row| map_entry(row).into_option())
            .collect();
        all.sort_by_key(|status| status.effective_on);
        Ok(all)
    }
}

fn map_entry(row: &Row) -> MappingOutcome<PerformanceStatus> {
    MappingOutcome::capture(|| {
        Ok(PerformanceStatus {
            id: row.id()?.to_string(),
            patient: row.patient()?,
            effective_on: row.date("recorded_on"),
            value: row.string("ecog").and_then(|code| ECOG.coding(&code)),
        })
    })
}
