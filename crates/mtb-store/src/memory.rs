//! Insertion-ordered in-memory row store.
//!
//! Serves as the reference implementation and as the fixture store for
//! tests: rows come back in the order they were inserted, so discovery
//! order is deterministic.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::StoreError;
use crate::row::Row;
use crate::store::{RowStore, Table};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<Table, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: Table, row: Row) {
        self.tables.entry(table).or_default().push(row);
    }

    /// Convenience for JSON-literal fixtures.
    pub fn insert_value(&mut self, table: Table, value: Value) {
        self.insert(table, Row::from_value(value));
    }

    fn rows(&self, table: Table) -> &[Row] {
        self.tables.get(&table).map_or(&[], Vec::as_slice)
    }

    fn single<'a>(
        &self,
        table: Table,
        key: &str,
        mut matches: impl Iterator<Item = &'a Row>,
    ) -> Result<Row, StoreError> {
        match (matches.next(), matches.next()) {
            (None, _) => Err(StoreError::not_found(table, key)),
            (Some(row), None) => Ok(row.clone()),
            (Some(_), Some(_)) => Err(StoreError::ambiguous(table, key)),
        }
    }
}

impl RowStore for MemoryStore {
    fn row_by_id(&self, table: Table, id: i64) -> Result<Row, StoreError> {
        let matches = self
            .rows(table)
            .iter()
            .filter(|row| row.long("id") == Some(id));
        self.single(table, &format!("id {id}"), matches)
    }

    fn rows_by_parent(&self, table: Table, parent_id: i64) -> Result<Vec<Row>, StoreError> {
        Ok(self
            .rows(table)
            .iter()
            .filter(|row| row.parent_id() == Some(parent_id))
            .cloned()
            .collect())
    }

    fn molecular_report_by_submission_number(
        &self,
        submission_no: &str,
    ) -> Result<Row, StoreError> {
        let matches = self
            .rows(Table::MolecularReport)
            .iter()
            .filter(|row| row.string("submission_no").as_deref() == Some(submission_no));
        self.single(
            Table::MolecularReport,
            &format!("submission number '{submission_no}'"),
            matches,
        )
    }

    fn episode_id_by_case_id(&self, case_id: &str) -> Result<i64, StoreError> {
        let row = {
            let matches = self
                .rows(Table::Episode)
                .iter()
                .filter(|row| row.string("case_number").as_deref() == Some(case_id));
            self.single(Table::Episode, &format!("case id '{case_id}'"), matches)?
        };
        row.id()
    }

    fn latest_episode_id(&self, patient_id: &str, tumor_id: i64) -> Result<i64, StoreError> {
        self.rows(Table::Episode)
            .iter()
            .filter(|row| {
                row.string("patient_id").as_deref() == Some(patient_id)
                    && row.long("tumor_id") == Some(tumor_id)
            })
            .filter_map(|row| row.id().ok())
            .max()
            .ok_or_else(|| {
                StoreError::not_found(
                    Table::Episode,
                    format!("patient '{patient_id}' tumor {tumor_id}"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_value(
            Table::Episode,
            json!({"id": 1, "patient_id": "P1", "case_number": "F-100", "tumor_id": 1}),
        );
        store.insert_value(
            Table::Episode,
            json!({"id": 2, "patient_id": "P1", "case_number": "F-200", "tumor_id": 1}),
        );
        store.insert_value(Table::Grading, json!({"id": 10, "parent_id": 1}));
        store.insert_value(Table::Grading, json!({"id": 11, "parent_id": 1}));
        store.insert_value(Table::Grading, json!({"id": 12, "parent_id": 2}));
        store
    }

    #[test]
    fn row_by_id_requires_exactly_one_row() {
        let mut store = store();
        assert_eq!(store.row_by_id(Table::Episode, 1).unwrap().id().unwrap(), 1);
        assert_eq!(
            store.row_by_id(Table::Episode, 99),
            Err(StoreError::not_found(Table::Episode, "id 99"))
        );

        store.insert_value(Table::Episode, json!({"id": 1, "patient_id": "P9"}));
        assert_eq!(
            store.row_by_id(Table::Episode, 1),
            Err(StoreError::ambiguous(Table::Episode, "id 1"))
        );
    }

    #[test]
    fn rows_by_parent_preserves_order_and_tolerates_empty() {
        let store = store();
        let rows = store.rows_by_parent(Table::Grading, 1).unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id().unwrap()).collect();
        assert_eq!(ids, vec![10, 11]);
        assert!(store.rows_by_parent(Table::Staging, 1).unwrap().is_empty());
    }

    #[test]
    fn keyed_lookups() {
        let store = store();
        assert_eq!(store.episode_id_by_case_id("F-200").unwrap(), 2);
        assert!(store.episode_id_by_case_id("F-999").is_err());
        assert_eq!(store.latest_episode_id("P1", 1).unwrap(), 2);
        assert!(store.latest_episode_id("P2", 1).is_err());
    }
}
