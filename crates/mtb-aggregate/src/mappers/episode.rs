//! Episode-of-care mapping from the root row.

use mtb_model::{Episode, Period, Reference};
use mtb_store::Row;

use crate::error::Result;

/// Maps the root row into the episode section. The episode references its
/// own id as diagnosis, since both are kept on the root row.
pub fn map_episode(root: &Row) -> Result<Episode> {
    let id = root.id()?;
    Ok(Episode {
        id: id.to_string(),
        patient: root.patient()?,
        period: Period {
            start: root.date("registered_on"),
            end: None,
        },
        diagnosis_refs: vec![Reference::to(id.to_string(), "Diagnosis")],
    })
}
