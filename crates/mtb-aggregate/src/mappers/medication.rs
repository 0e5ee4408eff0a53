//! Parsers for the JSON-valued form columns.
//!
//! The source form keeps medication agents and study enrollments as JSON
//! arrays inside single text columns.

use mtb_model::{Coding, Reference};
use serde::Deserialize;

use crate::mappers::{ATC_SYSTEM, UNREGISTERED_MEDICATION_SYSTEM};
use crate::outcome::FieldError;

#[derive(Debug, Deserialize)]
struct AgentEntry {
    code: Option<String>,
    #[serde(alias = "substance")]
    name: Option<String>,
    system: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StudyEntry {
    id: Option<String>,
    #[serde(alias = "nct")]
    registry_id: Option<String>,
}

/// Maps the medication JSON column into agent codings.
///
/// An agent maps to the registered ATC system only when it carries both the
/// ATC tag and a version; anything else is an unregistered agent.
pub fn parse_medication_json(raw: &str) -> Result<Vec<Coding>, FieldError> {
    let agents: Vec<AgentEntry> = serde_json::from_str(raw)
        .map_err(|_| FieldError::new(format!("cannot parse medication list: {raw}")))?;

    Ok(agents
        .into_iter()
        .map(|agent| {
            let registered = agent.system.as_deref() == Some("ATC")
                && agent.version.as_deref().is_some_and(|v| !v.is_empty());
            Coding {
                code: agent.code.unwrap_or_default(),
                display: agent.name,
                system: if registered {
                    ATC_SYSTEM.to_string()
                } else {
                    UNREGISTERED_MEDICATION_SYSTEM.to_string()
                },
                version: agent.version.filter(|v| !v.is_empty()),
            }
        })
        .collect())
}

/// Maps the study JSON column into study references. Entries without any
/// usable identifier are dropped.
pub fn parse_study_json(raw: &str) -> Result<Vec<Reference>, FieldError> {
    let studies: Vec<StudyEntry> = serde_json::from_str(raw)
        .map_err(|_| FieldError::new(format!("cannot parse study list: {raw}")))?;

    Ok(studies
        .into_iter()
        .filter_map(|study| study.id.or(study.registry_id))
        .map(|id| Reference::to(id, "Study"))
        .collect())
}
