//! End-to-end aggregation tests against the in-memory store.

use std::sync::Arc;

use mtb_aggregate::mappers::recommendation::RecommendationMapper;
use mtb_aggregate::{AggregateError, Aggregator};
use mtb_store::{MemoryCatalog, MemoryStore, PropertyCatalog, StoreError, Table};
use serde_json::json;

const EPISODE: i64 = 100;
const CARE_PLAN: i64 = 20;
const BROKEN_CARE_PLAN: i64 = 21;

fn catalog() -> Arc<PropertyCatalog> {
    let mut source = MemoryCatalog::new();
    source.insert("C34.1", 2, "Upper lobe, bronchus or lung", "2025");
    source.insert("G2", 1, "Moderately differentiated", "v1");
    source.insert("exhausted", 4, "Guideline options exhausted", "v4");
    source.insert("P", 3, "Palliative", "v3");
    Arc::new(PropertyCatalog::new(source))
}

fn store() -> MemoryStore {
    let mut store = MemoryStore::new();

    store.insert_value(
        Table::Episode,
        json!({
            "id": EPISODE,
            "patient_id": "P1",
            "case_number": "F-100",
            "tumor_id": 1,
            "registered_on": "2024-04-12",
            "diagnosis_code": "C34.1",
            "diagnosis_code_catalog_version": 2,
            "topography_code": "C34.1",
            "diagnosis_type": "main",
            "first_diagnosis_on": "2023-11-02",
            "guideline_treatment_status": "exhausted",
            "guideline_treatment_status_catalog_version": 4
        }),
    );

    store.insert_value(
        Table::Grading,
        json!({
            "id": 70,
            "parent_id": EPISODE,
            "recorded_on": "2023-11-10",
            "grading": "G2",
            "grading_catalog_version": 1
        }),
    );
    // Grading row without any code is dropped from the history.
    store.insert_value(
        Table::Grading,
        json!({"id": 71, "parent_id": EPISODE, "recorded_on": "2023-12-01"}),
    );

    store.insert_value(
        Table::Staging,
        json!({
            "id": 80,
            "parent_id": EPISODE,
            "recorded_on": "2023-11-12",
            "method": "clinical",
            "tnm_t_prefix": "c",
            "tnm_t": "2",
            "tnm_n_prefix": "c",
            "tnm_n": "0"
        }),
    );

    store.insert_value(
        Table::CarePlan,
        json!({
            "id": CARE_PLAN,
            "parent_id": EPISODE,
            "patient_id": "P1",
            "issued_on": "2024-05-03",
            "diagnosis_ref": "100",
            "with_recommendations": 1
        }),
    );
    // Two rows sharing one id: the single-row fetch is ambiguous, so this
    // plan and everything hanging off it is skipped.
    store.insert_value(
        Table::CarePlan,
        json!({"id": BROKEN_CARE_PLAN, "parent_id": EPISODE, "patient_id": "P1"}),
    );
    store.insert_value(
        Table::CarePlan,
        json!({"id": BROKEN_CARE_PLAN, "parent_id": EPISODE, "patient_id": "P1"}),
    );

    store.insert_value(
        Table::Recommendation,
        json!({
            "id": 31,
            "parent_id": CARE_PLAN,
            "patient_id": "P1",
            "category": "medication",
            "priority": 1,
            "evidence_grade": "1",
            "medication_json": "[{\"code\": \"L01EA01\", \"substance\": \"Imatinib\", \"system\": \"ATC\", \"version\": \"2024\"}]",
            "molecular_report_ref": 40
        }),
    );
    store.insert_value(
        Table::Recommendation,
        json!({
            "id": 32,
            "parent_id": BROKEN_CARE_PLAN,
            "patient_id": "P1",
            "category": "medication",
            "priority": 2
        }),
    );
    store.insert_value(
        Table::Recommendation,
        json!({
            "id": 33,
            "parent_id": CARE_PLAN,
            "patient_id": "P1",
            "category": "medication",
            "priority": 3
        }),
    );

    store.insert_value(
        Table::RebiopsyRequest,
        json!({
            "id": 60,
            "parent_id": CARE_PLAN,
            "patient_id": "P1",
            "issued_on": "2024-05-03",
            "molecular_report_ref": 41
        }),
    );

    store.insert_value(
        Table::MolecularReport,
        json!({
            "id": 40,
            "patient_id": "P1",
            "fixation": "3",
            "collection_method": "B",
            "sample_material": "T",
            "collected_on": "2024-04-20"
        }),
    );
    store.insert_value(
        Table::MolecularReport,
        json!({"id": 41, "patient_id": "P1", "sample_material": "B"}),
    );

    store.insert_value(
        Table::PerformanceStatus,
        json!({
            "id": 90,
            "parent_id": EPISODE,
            "patient_id": "P1",
            "recorded_on": "2024-05-01",
            "ecog": "1"
        }),
    );

    store.insert_value(
        Table::TherapyLine,
        json!({
            "id": 95,
            "parent_id": EPISODE,
            "patient_id": "P1",
            "number": 1,
            "started_on": "2023-12-01",
            "recorded_on": "2024-01-15",
            "intent": "P",
            "intent_catalog_version": 3
        }),
    );

    store.insert_value(
        Table::PriorFinding,
        json!({
            "id": 97,
            "parent_id": EPISODE,
            "patient_id": "P1",
            "issued_on": "2022-06-01",
            "submission_no": "unknown",
            "summary": "external panel, no material left"
        }),
    );

    store
}

#[test]
fn aggregates_a_complete_record() {
    let store = store();
    let record = Aggregator::new(&store, catalog()).aggregate(EPISODE).unwrap();

    assert_eq!(record.episode.id, "100");
    assert_eq!(record.episode.patient.id, "P1");

    let diagnosis = record.diagnosis.as_ref().unwrap();
    assert_eq!(diagnosis.code.code, "C34.1");
    assert_eq!(
        diagnosis.code.display.as_deref(),
        Some("Upper lobe, bronchus or lung")
    );
    assert_eq!(diagnosis.code.version.as_deref(), Some("2025"));
    assert_eq!(
        diagnosis
            .guideline_treatment_status
            .as_ref()
            .unwrap()
            .display
            .as_deref(),
        Some("Guideline options exhausted")
    );

    // The codeless grading row was dropped, the coded one survived.
    assert_eq!(diagnosis.grading.as_ref().unwrap().history.len(), 1);
    let staging = &diagnosis.staging.as_ref().unwrap().history[0];
    assert_eq!(staging.tnm.as_ref().unwrap().tumor.as_ref().unwrap().code, "cT2");

    assert_eq!(record.performance_status.len(), 1);
    assert_eq!(record.therapy_lines.len(), 1);
    assert_eq!(record.prior_findings.len(), 1);
}

#[test]
fn malformed_care_plan_does_not_abort_siblings() {
    let store = store();
    let record = Aggregator::new(&store, catalog()).aggregate(EPISODE).unwrap();

    // Only the intact plan is emitted.
    assert_eq!(record.care_plans.len(), 1);
    let plan = &record.care_plans[0];
    assert_eq!(plan.id, "20");

    // Recommendations 31 and 33 survive; 32 hangs off the broken plan.
    let ids: Vec<&str> = plan
        .medication_recommendations
        .iter()
        .map(|rec| rec.id.as_str())
        .collect();
    assert_eq!(ids, vec!["31", "33"]);
}

#[test]
fn recommendation_without_resolvable_care_plan_is_skipped() {
    let mut store = MemoryStore::new();
    // Children of a care plan id with no backing row at all.
    store.insert_value(
        Table::Recommendation,
        json!({"id": 1, "parent_id": 50, "patient_id": "P1", "category": "medication"}),
    );
    store.insert_value(
        Table::Recommendation,
        json!({"id": 2, "parent_id": 50, "patient_id": "P1", "category": "medication"}),
    );

    let catalog = catalog();
    let mapper = RecommendationMapper::new(&store, &catalog);
    let items = mapper.medications_by_care_plan(50).unwrap();
    assert!(items.is_empty());
}

#[test]
fn unknown_code_omits_the_field_but_not_its_siblings() {
    let mut store = store();
    // A second staging row with a method outside the destination value set.
    store.insert_value(
        Table::Staging,
        json!({
            "id": 81,
            "parent_id": EPISODE,
            "recorded_on": "2024-01-20",
            "method": "radiologic",
            "tnm_m_prefix": "c",
            "tnm_m": "1"
        }),
    );

    let record = Aggregator::new(&store, catalog()).aggregate(EPISODE).unwrap();
    let history = &record.diagnosis.as_ref().unwrap().staging.as_ref().unwrap().history;
    assert_eq!(history.len(), 2);
    let entry = &history[1];
    assert!(entry.method.is_none());
    assert_eq!(
        entry.tnm.as_ref().unwrap().metastasis.as_ref().unwrap().code,
        "cM1"
    );
}

#[test]
fn specimens_are_deduplicated_and_back_referenced() {
    let store = store();
    let record = Aggregator::new(&store, catalog()).aggregate(EPISODE).unwrap();

    let ids: Vec<&str> = record
        .specimens
        .iter()
        .map(|specimen| specimen.id.as_str())
        .collect();
    assert_eq!(ids, vec!["40", "41"]);

    for specimen in &record.specimens {
        let diagnosis = specimen.diagnosis.as_ref().unwrap();
        assert_eq!(diagnosis.id, "100");
    }
    assert_eq!(
        record.specimens[0].specimen_type.as_ref().unwrap().code,
        "FFPE"
    );
    assert_eq!(
        record.specimens[1].specimen_type.as_ref().unwrap().code,
        "fresh-tissue"
    );
}

#[test]
fn missing_root_is_fatal() {
    let store = store();
    let err = Aggregator::new(&store, catalog()).aggregate(999).unwrap_err();
    assert_eq!(
        err,
        AggregateError::Store(StoreError::not_found(Table::Episode, "id 999"))
    );
}

#[test]
fn ambiguous_root_is_fatal() {
    let mut store = store();
    store.insert_value(Table::Episode, json!({"id": EPISODE, "patient_id": "P1"}));
    let err = Aggregator::new(&store, catalog()).aggregate(EPISODE).unwrap_err();
    assert_eq!(
        err,
        AggregateError::Store(StoreError::ambiguous(Table::Episode, "id 100"))
    );
}

#[test]
fn unmappable_diagnosis_degrades_to_a_record_without_one() {
    let mut store = store();
    store.insert_value(
        Table::Episode,
        json!({"id": 101, "patient_id": "P1", "tumor_id": 1}),
    );

    let record = Aggregator::new(&store, catalog()).aggregate(101).unwrap();
    assert!(record.diagnosis.is_none());
    assert_eq!(record.episode.id, "101");
}

#[test]
fn convenience_lookups_resolve_to_the_same_record() {
    let mut store = store();
    store.insert_value(
        Table::Episode,
        json!({"id": 101, "patient_id": "P1", "tumor_id": 1}),
    );
    let catalog = catalog();
    let aggregator = Aggregator::new(&store, catalog);

    let by_case = aggregator.aggregate_by_case_id("F-100").unwrap();
    assert_eq!(by_case.episode.id, "100");

    // Latest episode for the pair is the one with the highest id.
    let latest = aggregator.aggregate_latest_for_patient("P1", 1).unwrap();
    assert_eq!(latest.episode.id, "101");

    assert!(matches!(
        aggregator.aggregate_by_case_id("F-999"),
        Err(AggregateError::Store(StoreError::NotFound { .. }))
    ));
}
