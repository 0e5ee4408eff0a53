//! Per-section mappers from source rows to record model types.
//!
//! Every coded field follows the same discipline: validate the raw code
//! against its destination value set, resolve display text where the
//! destination mandates it, and wrap the whole step in a
//! [`MappingOutcome`](crate::outcome::MappingOutcome) so a failure omits the
//! field instead of aborting the record.

pub mod care_plan;
pub mod diagnosis;
pub mod episode;
pub mod histology;
pub mod medication;
pub mod performance;
pub mod prior_finding;
pub mod recommendation;
pub mod specimen;
pub mod therapy_line;

pub(crate) const ICD10_SYSTEM: &str = "http://fhir.de/CodeSystem/bfarm/icd-10-gm";
pub(crate) const ICD_O3_SYSTEM: &str = "urn:oid:2.16.840.1.113883.6.43.1";
pub(crate) const ATC_SYSTEM: &str = "http://fhir.de/CodeSystem/bfarm/atc";
pub(crate) const UNREGISTERED_MEDICATION_SYSTEM: &str = "undefined";
pub(crate) const UICC_SYSTEM: &str = "UICC";
pub(crate) const TUMOR_SPREAD_SYSTEM: &str = "dnpm-dip/mtb/diagnosis/kds-tumor-spread";
pub(crate) const GRADING_SYSTEM: &str = "https://www.basisdatensatz.de/feld/161/grading";
pub(crate) const WHO_GRADING_SYSTEM: &str = "dnpm-dip/mtb/who-grading-cns-tumors";
pub(crate) const PROCEDURE_TYPE_SYSTEM: &str = "dnpm-dip/mtb/recommendation/procedure/type";
pub(crate) const TUMOR_MORPHOLOGY_SYSTEM: &str = "urn:oid:2.16.840.1.113883.6.43.1";

/// Source-to-destination code translation table lookup.
pub(crate) fn translate(table: &[(&str, &'static str)], source: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
}
