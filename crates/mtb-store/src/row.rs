//! Typed access to one source row.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use mtb_model::Reference;
use serde_json::Value;

use crate::error::StoreError;

/// One row from the backing store, as a column name → value map.
///
/// Accessors are lenient: a missing column, a JSON null, or a value of the
/// wrong shape all read as `None`. Whether an absent value is tolerable is
/// decided by the mapper consuming it, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, Value>,
}

/// A raw coded value paired with the schema-version tag recorded next to it.
///
/// Source systems keep multiple historical code lists; the version tag says
/// which list the code belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    pub value: String,
    pub version: i32,
}

impl Row {
    /// Builds a row from a JSON object. Non-object values yield an empty row.
    pub fn from_value(value: Value) -> Self {
        let cells = match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        Self { cells }
    }

    /// The row's own id. Every stored row carries one.
    pub fn id(&self) -> Result<i64, StoreError> {
        self.long("id").ok_or(StoreError::MissingColumn {
            column: "id".to_string(),
        })
    }

    /// The owning parent row id, if the table is a sub-form table.
    pub fn parent_id(&self) -> Option<i64> {
        self.long("parent_id")
    }

    /// Reference to the patient owning this row.
    pub fn patient(&self) -> Result<Reference, StoreError> {
        self.string("patient_id")
            .map(|id| Reference::to(id, "Patient"))
            .ok_or(StoreError::MissingColumn {
                column: "patient_id".to_string(),
            })
    }

    pub fn string(&self, column: &str) -> Option<String> {
        match self.cells.get(column)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn integer(&self, column: &str) -> Option<i32> {
        self.long(column)?.try_into().ok()
    }

    pub fn long(&self, column: &str) -> Option<i64> {
        match self.cells.get(column)? {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn double(&self, column: &str) -> Option<f64> {
        match self.cells.get(column)? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Dates are stored as ISO `YYYY-MM-DD` strings.
    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        let raw = self.string(column)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()
    }

    /// Truthiness of checkbox-like columns: `true`, `1` or `"1"`.
    pub fn flag(&self, column: &str) -> bool {
        match self.cells.get(column) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::String(s)) => s == "1",
            _ => false,
        }
    }

    /// Values of a multi-select form field.
    pub fn multi_values(&self, column: &str) -> Vec<String> {
        match self.cells.get(column) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A coded column together with its `<column>_catalog_version` tag.
    /// Present only if both parts are present.
    pub fn property(&self, column: &str) -> Option<RawProperty> {
        let value = self.string(column)?;
        let version = self.integer(&format!("{column}_catalog_version"))?;
        Some(RawProperty { value, version })
    }

    pub fn is_null(&self, column: &str) -> bool {
        matches!(self.cells.get(column), None | Some(Value::Null))
    }
}
