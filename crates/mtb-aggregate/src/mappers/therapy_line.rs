//! Systemic guideline therapy lines.

use mtb_model::codeset::{THERAPY_INTENT, THERAPY_STATUS, THERAPY_STATUS_REASON};
use mtb_model::{CodeSet, Coding, Period, Reference, TherapyLine};
use mtb_store::{PropertyCatalog, Row, RowStore, Table};
use tracing::warn;

use crate::error::Result;
use crate::mappers::medication::parse_medication_json;
use crate::outcome::{FieldError, MappingOutcome};

pub struct TherapyLineMapper<'a> {
    store: &'a dyn RowStore,
    catalog: &'a PropertyCatalog,
}

impl<'a> TherapyLineMapper<'a> {
    pub fn new(store: &'a dyn RowStore, catalog: &'a PropertyCatalog) -> Self {
        Self { store, catalog }
    }

    pub fn all_by_episode(&self, episode_id: i64) -> Result<Vec<TherapyLine>> {
        Ok(self
            .store
            .rows_by_parent(Table::TherapyLine, episode_id)?
            .iter()
            .filter_map(|row| self.map(row))
            .collect())
    }

    fn map(&self, row: &Row) -> Option<TherapyLine> {
        let started_on = row.date("started_on");
        let recorded_on = row.date("recorded_on");
        // A line without start and recording date is considered empty.
        let (Some(started_on), Some(recorded_on)) = (started_on, recorded_on) else {
            warn!(
                therapy_line = row.long("id"),
                "skipping therapy line without start and recording dates"
            );
            return None;
        };

        MappingOutcome::capture(|| {
            // The disease linkage is required; a line without it is dropped.
            let diagnosis_id = row
                .parent_id()
                .ok_or_else(|| FieldError::new("therapy line without disease linkage"))?;
            Ok(TherapyLine {
                id: row.id()?.to_string(),
                patient: row.patient()?,
                reason: Reference::to(diagnosis_id.to_string(), "Diagnosis"),
                recorded_on,
                period: Period {
                    start: Some(started_on),
                    end: row.date("ended_on"),
                },
                line_number: row.long("number"),
                medication: row
                    .string("medication_json")
                    .and_then(|raw| {
                        MappingOutcome::capture(|| parse_medication_json(&raw)).into_option()
                    })
                    .unwrap_or_default(),
                intent: self.catalog_coding(row, "intent", &THERAPY_INTENT),
                status: self.catalog_coding(row, "status", &THERAPY_STATUS),
                status_reason: self.catalog_coding(row, "status_reason", &THERAPY_STATUS_REASON),
                based_on: row.string("recommendation_ref").map(Reference::bare),
                notes: row.string("note").map(|note| vec![note]).unwrap_or_default(),
            })
        })
        .into_option()
    }

    /// Value-set-guarded, catalog-resolved coding for one column.
    fn catalog_coding(&self, row: &Row, column: &str, set: &CodeSet) -> Option<Coding> {
        row.property(column)
            .filter(|property| set.is_member(&property.value))
            .and_then(|property| {
                MappingOutcome::capture(|| {
                    let entry = self.catalog.resolve(&property.value, property.version)?;
                    Ok(Coding::of(&property.value, set.system())
                        .with_display(entry.short_desc.clone()))
                })
                .into_option()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtb_store::{MemoryCatalog, MemoryStore};
    use serde_json::json;

    fn fixture() -> (MemoryStore, PropertyCatalog) {
        let mut store = MemoryStore::new();
        store.insert_value(
            Table::TherapyLine,
            json!({
                "id": 1,
                "parent_id": 100,
                "patient_id": "P1",
                "number": 2,
                "started_on": "2023-04-01",
                "recorded_on": "2023-06-15",
                "intent": "P",
                "intent_catalog_version": 3
            }),
        );
        store.insert_value(
            Table::TherapyLine,
            json!({"id": 2, "parent_id": 100, "patient_id": "P1"}),
        );

        let mut source = MemoryCatalog::new();
        source.insert("P", 3, "Palliative", "v3");
        (store, PropertyCatalog::new(source))
    }

    #[test]
    fn lines_without_dates_are_skipped() {
        let (store, catalog) = fixture();
        let lines = TherapyLineMapper::new(&store, &catalog)
            .all_by_episode(100)
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].id, "1");
        assert_eq!(lines[0].line_number, Some(2));
    }

    #[test]
    fn intent_is_validated_and_display_resolved() {
        let (store, catalog) = fixture();
        let lines = TherapyLineMapper::new(&store, &catalog)
            .all_by_episode(100)
            .unwrap();
        let intent = lines[0].intent.as_ref().unwrap();
        assert_eq!(intent.code, "P");
        assert_eq!(intent.display.as_deref(), Some("Palliative"));
    }
}
