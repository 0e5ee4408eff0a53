//! Diagnosis mapping, including the grading and staging histories.

use mtb_model::codeset::{DIAGNOSIS_TYPE, GUIDELINE_TREATMENT_STATUS, STAGING_METHOD};
use mtb_model::{
    Coding, Diagnosis, Grading, GradingEntry, Reference, Staging, StagingEntry, TnmClassification,
};
use mtb_store::{PropertyCatalog, Row, RowStore, StoreError, Table};

use crate::error::Result;
use crate::mappers::{GRADING_SYSTEM, ICD10_SYSTEM, ICD_O3_SYSTEM, TUMOR_SPREAD_SYSTEM,
    UICC_SYSTEM, WHO_GRADING_SYSTEM};
use crate::outcome::{FieldError, MappingOutcome};
use crate::tnm::normalize_tnm;

pub struct DiagnosisMapper<'a> {
    store: &'a dyn RowStore,
    catalog: &'a PropertyCatalog,
}

impl<'a> DiagnosisMapper<'a> {
    pub fn new(store: &'a dyn RowStore, catalog: &'a PropertyCatalog) -> Self {
        Self { store, catalog }
    }

    /// Maps the diagnosis carried on the root row.
    ///
    /// The primary classification code and its catalog display text are
    /// required: without them no compliant coding exists, and the diagnosis
    /// sub-record is aborted.
    pub fn map(&self, root: &Row) -> Result<Diagnosis> {
        let id = root.id()?;

        let code_property = root
            .property("diagnosis_code")
            .ok_or_else(|| StoreError::MissingColumn {
                column: "diagnosis_code".to_string(),
            })?;
        let entry = self
            .catalog
            .resolve(&code_property.value, code_property.version)?;
        let mut code = Coding::of(&code_property.value, ICD10_SYSTEM)
            .with_display(entry.short_desc.clone());
        if let Some(label) = &entry.version_label {
            code = code.with_version(label);
        }

        let guideline_treatment_status = root
            .property("guideline_treatment_status")
            .filter(|property| GUIDELINE_TREATMENT_STATUS.is_member(&property.value))
            .and_then(|property| {
                MappingOutcome::capture(|| {
                    let entry = self.catalog.resolve(&property.value, property.version)?;
                    Ok(Coding::of(&property.value, GUIDELINE_TREATMENT_STATUS.system())
                        .with_display(entry.short_desc.clone()))
                })
                .into_option()
            });

        Ok(Diagnosis {
            id: id.to_string(),
            patient: root.patient()?,
            code,
            topography: root
                .string("topography_code")
                .map(|code| Coding::of(code, ICD_O3_SYSTEM)),
            diagnosis_type: root
                .string("diagnosis_type")
                .and_then(|code| DIAGNOSIS_TYPE.coding(&code)),
            recorded_on: root.date("first_diagnosis_on"),
            grading: self.grading(id)?,
            staging: self.staging(id)?,
            guideline_treatment_status,
            histology_refs: self.histology_refs(id)?,
        })
    }

    /// Grading observations; an entry that fails to map is dropped from the
    /// history, not propagated.
    fn grading(&self, diagnosis_id: i64) -> Result<Option<Grading>> {
        let history: Vec<GradingEntry> = self
            .store
            .rows_by_parent(Table::Grading, diagnosis_id)?
            .iter()
            .filter_map(|row| self.grading_entry(row).into_option())
            .collect();
        Ok((!history.is_empty()).then_some(Grading { history }))
    }

    fn grading_entry(&self, row: &Row) -> MappingOutcome<GradingEntry> {
        MappingOutcome::capture(|| {
            let recorded_on = row.date("recorded_on");

            if let Some(property) = row.property("grading") {
                let entry = self.catalog.resolve(&property.value, property.version)?;
                let mut coding = Coding::of(&property.value, GRADING_SYSTEM)
                    .with_display(entry.short_desc.clone());
                if let Some(label) = &entry.version_label {
                    coding = coding.with_version(label);
                }
                return Ok(GradingEntry {
                    recorded_on,
                    codes: vec![coding],
                });
            }

            if let Some(property) = row.property("who_grade") {
                let entry = self.catalog.resolve(&property.value, property.version)?;
                let mut coding = Coding::of(&property.value, WHO_GRADING_SYSTEM)
                    .with_display(entry.short_desc.clone());
                if let Some(label) = &entry.version_label {
                    coding = coding.with_version(label);
                }
                return Ok(GradingEntry {
                    recorded_on,
                    codes: vec![coding],
                });
            }

            Err(FieldError::new("grading entry without grading code"))
        })
    }

    fn staging(&self, diagnosis_id: i64) -> Result<Option<Staging>> {
        let history: Vec<StagingEntry> = self
            .store
            .rows_by_parent(Table::Staging, diagnosis_id)?
            .iter()
            .filter_map(|row| self.staging_entry(row).into_option())
            .collect();
        Ok((!history.is_empty()).then_some(Staging { history }))
    }

    fn staging_entry(&self, row: &Row) -> MappingOutcome<StagingEntry> {
        MappingOutcome::capture(|| {
            let entry = StagingEntry {
                recorded_on: row.date("recorded_on"),
                method: row
                    .string("method")
                    .and_then(|code| STAGING_METHOD.coding(&code)),
                tnm: tnm_classification(row),
                other_classifications: row
                    .string("spread")
                    .map(|code| vec![Coding::of(code, TUMOR_SPREAD_SYSTEM)])
                    .unwrap_or_default(),
            };
            if entry.method.is_none()
                && entry.tnm.is_none()
                && entry.other_classifications.is_empty()
            {
                return Err(FieldError::new("staging entry without any classification"));
            }
            Ok(entry)
        })
    }

    fn histology_refs(&self, diagnosis_id: i64) -> Result<Vec<Reference>> {
        Ok(self
            .store
            .rows_by_parent(Table::HistologyReport, diagnosis_id)?
            .iter()
            .filter_map(|row| row.id().ok())
            .map(|id| Reference::to(id.to_string(), "HistologyReport"))
            .collect())
    }
}

/// TNM components from one staging row. The tumor fragment goes through the
/// normalizer; a component without both prefix and value is left out.
fn tnm_classification(row: &Row) -> Option<TnmClassification> {
    let mut tnm = TnmClassification::default();

    if let (Some(prefix), Some(value)) = (
        row.string("tnm_t_prefix"),
        row.string("tnm_t").and_then(|raw| normalize_tnm(&raw)),
    ) {
        tnm.tumor = Some(Coding::of(format!("{prefix}T{value}"), UICC_SYSTEM));
    }

    if let (Some(prefix), Some(value)) = (row.string("tnm_n_prefix"), row.string("tnm_n")) {
        tnm.nodes = Some(Coding::of(format!("{prefix}N{value}"), UICC_SYSTEM));
    }

    if let (Some(prefix), Some(value)) = (row.string("tnm_m_prefix"), row.string("tnm_m")) {
        tnm.metastasis = Some(Coding::of(format!("{prefix}M{value}"), UICC_SYSTEM));
    }

    (!tnm.is_empty()).then_some(tnm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tnm_components_require_prefix_and_value() {
        let row = Row::from_value(json!({
            "tnm_t_prefix": "c",
            "tnm_t": "2",
            "tnm_n": "1"
        }));
        let tnm = tnm_classification(&row).unwrap();
        assert_eq!(tnm.tumor.unwrap().code, "cT2");
        // No prefix, no nodes component.
        assert!(tnm.nodes.is_none());
    }

    #[test]
    fn unrepresentable_tumor_fragment_drops_the_component() {
        let row = Row::from_value(json!({
            "tnm_t_prefix": "p",
            "tnm_t": "1mi",
            "tnm_m_prefix": "c",
            "tnm_m": "0"
        }));
        let tnm = tnm_classification(&row).unwrap();
        assert!(tnm.tumor.is_none());
        assert_eq!(tnm.metastasis.unwrap().code, "cM0");
    }

    #[test]
    fn row_without_components_yields_no_classification() {
        let row = Row::from_value(json!({"recorded_on": "2024-01-01"}));
        assert!(tnm_classification(&row).is_none());
    }
}
