//! Histology report mapping.

use mtb_model::{Coding, HistologyReport, Reference};
use mtb_store::{PropertyCatalog, Row, RowStore, Table};

use crate::error::Result;
use crate::mappers::TUMOR_MORPHOLOGY_SYSTEM;
use crate::outcome::MappingOutcome;

pub struct HistologyReportMapper<'a> {
    store: &'a dyn RowStore,
    catalog: &'a PropertyCatalog,
}

impl<'a> HistologyReportMapper<'a> {
    pub fn new(store: &'a dyn RowStore, catalog: &'a PropertyCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn all_by_episode(&self, episode_id: i64) -> Result<Vec<HistologyReport>> {
        Ok(self
            .store
            .rows_by_parent(Table::HistologyReport, episode_id)?
            .iter()
            .filter_map(|row| self.map(row).into_option())
            .collect())
    }

    fn map(&self, row: &Row) -> MappingOutcome<HistologyReport> {
        MappingOutcome::capture(|| {
            let tumor_morphology = row.property("tumor_morphology").and_then(|property| {
                MappingOutcome::capture(|| {
                    let entry = self.catalog.resolve(&property.value, property.version)?;
                    Ok(Coding::of(&property.value, TUMOR_MORPHOLOGY_SYSTEM)
                        .with_display(entry.short_desc.clone()))
                })
                .into_option()
            });

            Ok(HistologyReport {
                id: row.id()?.to_string(),
                patient: row.patient()?,
                issued_on: row.date("issued_on"),
                specimen_ref: row
                    .long("molecular_report_ref")
                    .map(|id| Reference::to(id.to_string(), "Specimen")),
                tumor_morphology,
            })
        })
    }
}
