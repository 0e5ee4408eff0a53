//! Prior molecular finding mapping.

use mtb_model::PriorFinding;
use mtb_store::{Row, RowStore, Table};

use crate::error::Result;
use crate::outcome::MappingOutcome;

pub struct PriorFindingMapper<'a> {
    store: &'a dyn RowStore,
}

impl<'a> PriorFindingMapper<'a> {
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self { store }
    }

    pub fn all_by_episode(&self, episode_id: i64) -> Result<Vec<PriorFinding>> {
        Ok(self
            .store
            .rows_by_parent(Table::PriorFinding, episode_id)?
            .iter()
            .filter_map(|row| map_entry(row).into_option())
            .collect())
    }
}

fn map_entry(row: &Row) -> MappingOutcome<PriorFinding> {
    MappingOutcome::capture(|| {
        Ok(PriorFinding {
            id: row.id()?.to_string(),
            patient: row.patient()?,
            issued_on: row.date("issued_on"),
            submission_no: row.string("submission_no"),
            summary: row.string("summary"),
        })
    })
}
