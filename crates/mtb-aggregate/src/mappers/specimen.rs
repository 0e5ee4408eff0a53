//! Specimen hydration and the diagnosis back-reference pass.

use mtb_model::codeset::{COLLECTION_LOCALIZATION, COLLECTION_METHOD, SPECIMEN_TYPE};
use mtb_model::{Coding, Reference, Specimen, SpecimenCollection};
use mtb_store::{Row, RowStore, Table};
use tracing::error;

use crate::collect::SpecimenReferenceCollector;
use crate::error::Result;
use crate::mappers::translate;

const FIXATION_CODES: &[(&str, &str)] = &[("2", "cryo-frozen"), ("3", "FFPE")];

const METHOD_CODES: &[(&str, &str)] = &[
    ("B", "biopsy"),
    ("R", "resection"),
    ("LB", "liquid-biopsy"),
    ("Z", "cytology"),
];

const LOCALIZATION_CODES: &[(&str, &str)] = &[
    ("T", "primary-tumor"),
    ("LK", "metastasis"),
    ("M", "metastasis"),
    ("ITM", "metastasis"),
    ("SM", "metastasis"),
];

pub struct SpecimenMapper<'a> {
    store: &'a dyn RowStore,
}

impl<'a> SpecimenMapper<'a> {
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self { store }
    }

    /// Hydrates one specimen by id. The diagnosis back-reference is not
    /// knowable here — hydration is keyed purely by specimen id.
    pub fn by_id(&self, id: i64) -> Result<Specimen> {
        let row = self.store.row_by_id(Table::MolecularReport, id)?;
        Ok(Specimen {
            id: row.id()?.to_string(),
            patient: row.patient()?,
            specimen_type: specimen_type_coding(&row),
            collection: collection(&row),
            diagnosis: None,
        })
    }

    /// Discovers, hydrates and back-references all specimens of an episode.
    pub fn all_by_episode(
        &self,
        episode_id: i64,
        diagnosis_ref: Option<&Reference>,
    ) -> Result<Vec<Specimen>> {
        let ids = SpecimenReferenceCollector::new(self.store).collect(episode_id)?;

        let mut specimens = Vec::new();
        for id in ids {
            match self.by_id(id) {
                Ok(specimen) => specimens.push(specimen),
                Err(err) => error!(specimen = id, %err, "skipping specimen"),
            }
        }

        // Second pass: every hydrated specimen shares the episode's
        // diagnosis.
        if let Some(diagnosis_ref) = diagnosis_ref {
            for specimen in &mut specimens {
                specimen.diagnosis = Some(diagnosis_ref.clone());
            }
        }

        Ok(specimens)
    }
}

fn specimen_type_coding(row: &Row) -> Option<Coding> {
    let fixation = row.string("fixation");
    let is_blood = row
        .string("sample_material")
        .is_some_and(|material| material.eq_ignore_ascii_case("B"));

    match fixation {
        // Unfixed blood samples are fresh tissue by convention.
        None if is_blood => SPECIMEN_TYPE.coding("fresh-tissue"),
        None => None,
        Some(code) => {
            let destination = translate(FIXATION_CODES, &code).unwrap_or("unknown");
            SPECIMEN_TYPE.coding(destination)
        }
    }
}

fn collection(row: &Row) -> Option<SpecimenCollection> {
    let method_source = row.string("collection_method")?;
    let material = row.string("sample_material")?;

    let method =
        COLLECTION_METHOD.coding(translate(METHOD_CODES, &method_source).unwrap_or("unknown"))?;
    let localization = COLLECTION_LOCALIZATION
        .coding(translate(LOCALIZATION_CODES, &material).unwrap_or("unknown"))?;

    Some(SpecimenCollection {
        method,
        localization,
        collected_on: row.date("collected_on"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fixation_codes_translate() {
        let row = Row::from_value(json!({"fixation": "3"}));
        assert_eq!(specimen_type_coding(&row).unwrap().code, "FFPE");

        let row = Row::from_value(json!({"fixation": "9"}));
        assert_eq!(specimen_type_coding(&row).unwrap().code, "unknown");
    }

    #[test]
    fn unfixed_blood_is_fresh_tissue() {
        let row = Row::from_value(json!({"sample_material": "B"}));
        assert_eq!(specimen_type_coding(&row).unwrap().code, "fresh-tissue");

        let row = Row::from_value(json!({"sample_material": "T"}));
        assert!(specimen_type_coding(&row).is_none());
    }

    #[test]
    fn collection_requires_method_and_material() {
        let row = Row::from_value(json!({
            "collection_method": "LB",
            "sample_material": "LK",
            "collected_on": "2024-02-10"
        }));
        let collection = collection(&row).unwrap();
        assert_eq!(collection.method.code, "liquid-biopsy");
        assert_eq!(collection.localization.code, "metastasis");

        let row = Row::from_value(json!({"collection_method": "B"}));
        assert!(super::collection(&row).is_none());
    }
}
