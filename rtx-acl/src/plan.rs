//! Declarative ACL plan files.
//!
//! A plan lists ACL groups the way a user authors them: a name, an ACL type,
//! either a `sequence_start`/`sequence_step` pair or per-entry `sequence`
//! values, and optional interface bindings.
//!
//! ```toml
//! [[acl]]
//! name = "lan-in"
//! type = "ip"
//! sequence_start = 100
//!
//! [[acl.entry]]
//! action = "pass"
//!
//! [[acl.apply]]
//! interface = "lan1"
//! direction = "in"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rtx_acl_core::{
    detect_mode, resolve_group_step, AclType, SequenceGroup, SequenceMode, SequenceRange,
    MAX_SEQUENCE,
};
use serde::Deserialize;
use thiserror::Error;

/// A parsed plan file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AclPlan {
    #[serde(default, rename = "acl")]
    pub groups: Vec<AclGroup>,
}

/// One ACL group and its entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AclGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub acl_type: AclType,
    #[serde(default)]
    pub sequence_start: Option<i64>,
    #[serde(default)]
    pub sequence_step: Option<i64>,
    #[serde(default, rename = "entry")]
    pub entries: Vec<AclEntry>,
    #[serde(default, rename = "apply")]
    pub applies: Vec<AclApply>,
}

/// A single filter entry. Fields other than `sequence` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AclEntry {
    #[serde(default)]
    pub sequence: Option<i64>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, toml::Value>,
}

/// Binding of a group to an interface in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AclApply {
    pub interface: String,
    pub direction: String,
    #[serde(default)]
    pub filter_ids: Vec<i64>,
}

/// Errors returned when loading plan or state files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {kind} file {path}: {source}")]
    Io {
        kind: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {kind} file {path}: {source}")]
    Parse {
        kind: &'static str,
        path: String,
        source: toml::de::Error,
    },
}

/// Owner identifier for the numbers of the group called `name`.
///
/// The `acl.` prefix keeps plan groups apart from [`ROUTER_OWNER`](crate::router::ROUTER_OWNER),
/// whatever a group is named.
pub fn group_owner_id(name: &str) -> String {
    format!("acl.{name}")
}

/// Load an ACL plan from a TOML file.
pub fn load_plan(path: &Path) -> Result<AclPlan, LoadError> {
    let raw = read_file("plan", path)?;
    parse_plan(&raw, path.display().to_string())
}

/// Parse an ACL plan from TOML text; `path` is used for error messages.
pub fn parse_plan(raw: &str, path: String) -> Result<AclPlan, LoadError> {
    toml::from_str(raw).map_err(|source| LoadError::Parse {
        kind: "plan",
        path,
        source,
    })
}

pub(crate) fn read_file(kind: &'static str, path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        kind,
        path: path.display().to_string(),
        source,
    })
}

impl AclGroup {
    /// The sequencing-relevant view used by the calculator.
    pub fn sequencing(&self) -> SequenceGroup {
        SequenceGroup {
            start: self.sequence_start,
            step: self.sequence_step,
            entry_sequences: self.entries.iter().map(|e| e.sequence).collect(),
        }
    }

    pub fn mode(&self) -> SequenceMode {
        detect_mode(&self.sequencing())
    }

    /// Sequence of each entry, in entry order.
    ///
    /// With a positive `sequence_start` the value is `start + i * step`;
    /// otherwise it is the entry's own `sequence`. Slots that are unset or fall
    /// outside `1..=MAX_SEQUENCE` are `None`.
    pub fn resolved_sequences(&self) -> Vec<Option<u32>> {
        let in_bounds = |v: i64| u32::try_from(v).ok().filter(|s| (1..=MAX_SEQUENCE).contains(s));

        match self.sequence_start.filter(|s| *s > 0) {
            Some(start) => {
                let step = resolve_group_step(self.sequence_step);
                (0..self.entries.len())
                    .map(|i| {
                        i64::try_from(i)
                            .ok()
                            .and_then(|i| i.checked_mul(step))
                            .and_then(|offset| start.checked_add(offset))
                            .and_then(in_bounds)
                    })
                    .collect()
            }
            None => self
                .entries
                .iter()
                .map(|e| e.sequence.and_then(in_bounds))
                .collect(),
        }
    }

    /// Owner identifier of this group's numbers; see [`group_owner_id`].
    pub fn owner_id(&self) -> String {
        group_owner_id(&self.name)
    }

    /// The numbers this group occupies, skipping unresolved slots, owned by [`Self::owner_id`].
    pub fn range(&self) -> SequenceRange {
        self.range_owned_by(self.owner_id())
    }

    /// Same as [`Self::range`] with an explicit owner.
    pub fn range_owned_by(&self, owner: impl Into<String>) -> SequenceRange {
        let sequences = self.resolved_sequences().into_iter().flatten().collect();
        SequenceRange::new(owner, &self.name, self.acl_type, sequences)
    }
}

impl AclApply {
    /// Filter ids bound by this apply block: the explicit list, or every sequence.
    pub fn effective_filter_ids(&self, sequences: &[u32]) -> Vec<i64> {
        if self.filter_ids.is_empty() {
            sequences.iter().map(|&s| i64::from(s)).collect()
        } else {
            self.filter_ids.clone()
        }
    }
}
