//! Coded values and entity references shared across the record model.

use serde::{Deserialize, Serialize};

/// A coded value validated against a destination terminology.
///
/// A `Coding` is only ever constructed whole: a raw code that cannot be
/// paired with its mandated display text yields no coding at all, never a
/// partially populated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub system: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Coding {
    /// A coding with code and system only.
    pub fn of(code: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: None,
            system: system.into(),
            version: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A reference to another entity within the record, by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    /// The referenced entity kind, e.g. `"Patient"` or `"Diagnosis"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl Reference {
    pub fn to(id: impl Into<String>, entity: &str) -> Self {
        Self {
            id: id.into(),
            entity: Some(entity.to_string()),
        }
    }

    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity: None,
        }
    }
}

/// A date range with optional open end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<chrono::NaiveDate>,
}
