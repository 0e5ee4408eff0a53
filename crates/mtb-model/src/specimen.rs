//! Tumor specimens.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::coding::{Coding, Reference};

/// A biological sample.
///
/// A specimen has no single owning parent: it is discovered through several
/// independent relation paths rooted at an episode. The diagnosis
/// back-reference is unknown at hydration time and attached afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    pub id: String,
    pub patient: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen_type: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<SpecimenCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Reference>,
}

/// How and where the sample was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecimenCollection {
    pub method: Coding,
    pub localization: Coding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected_on: Option<NaiveDate>,
}
