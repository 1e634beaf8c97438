//! Sequences each group owned after its last apply.
//!
//! Router filters carry no owner, so without this file every filter a group
//! itself created would look like a conflict when that group is updated.
//!
//! ```toml
//! [[acl]]
//! name = "lan-in"
//! type = "ip"
//! sequences = [100, 110, 120]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rtx_acl_core::AclType;
use serde::Deserialize;

use crate::plan::{group_owner_id, read_file, LoadError};
use crate::router::FilterSpace;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PriorState {
    #[serde(default, rename = "acl")]
    pub groups: Vec<StateGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub acl_type: AclType,
    #[serde(default)]
    pub sequences: Vec<u32>,
}

pub fn load_state(path: &Path) -> Result<PriorState, LoadError> {
    let raw = read_file("state", path)?;
    toml::from_str(&raw).map_err(|source| LoadError::Parse {
        kind: "state",
        path: path.display().to_string(),
        source,
    })
}

/// Relabel router-owned numbers with the owner id of the state group that created them.
///
/// Only groups sharing `acl_type`'s router table are considered. Numbers in the
/// state but absent from `existing` are left out: the router is authoritative.
pub fn overlay_state(existing: &mut BTreeMap<u32, String>, state: &PriorState, acl_type: AclType) {
    let space = FilterSpace::for_acl_type(acl_type);
    for group in state
        .groups
        .iter()
        .filter(|g| FilterSpace::for_acl_type(g.acl_type) == space)
    {
        for seq in &group.sequences {
            if let Some(owner) = existing.get_mut(seq) {
                *owner = group_owner_id(&group.name);
            }
        }
    }
}
