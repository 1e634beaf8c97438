//! Group-level validation of an ACL plan.
//!
//! Checks one group in isolation: sequence mode consistency, per-entry
//! sequence presence and bounds, duplicate numbers, and apply bindings.
//! [`validate_plan_names`] adds the one plan-wide rule, unique group names.
//! Cross-group and router collisions are handled in [`crate::check`].
//!
//! ## Checks Performed
//!
//! 1. **Bounds**: explicit `sequence_start`/`sequence_step` within `1..=65535`
//! 2. **Mode**: auto start combined with per-entry sequences is rejected
//! 3. **Entries**: manual entries need a sequence within `1..=65535`
//! 4. **Range**: auto runs must fit below the maximum sequence
//! 5. **Duplicates**: no number may repeat inside the group
//! 6. **Applies**: unique interface/direction pairs and filter ids, valid
//!    directions, and MAC ACLs only on LAN/bridge interfaces

use std::collections::{BTreeMap, BTreeSet};

use rtx_acl_core::{
    resolve_group_step, validate_internal, validate_range, AclType, SequenceError, SequenceMode,
    MAX_SEQUENCE, MIN_SEQUENCE,
};
use serde::Serialize;
use tracing::debug;

use crate::plan::AclGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

/// Validate one group. Returns every problem found; empty when the group is valid.
pub fn validate_group(group: &AclGroup) -> Vec<Finding> {
    let mut out = Vec::new();
    out.extend(sequence_findings(group));
    out.extend(duplicate_findings(group));
    out.extend(apply_findings(group));

    debug!(
        acl_name = %group.name,
        acl_type = %group.acl_type,
        mode = %group.mode(),
        findings = out.len(),
        "validated group"
    );
    out
}

/// Plan-wide checks, each paired with the index of the offending group.
pub fn validate_plan_names(groups: &[AclGroup]) -> Vec<(usize, Finding)> {
    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    let mut out = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let prev = *first_seen.entry(group.name.as_str()).or_insert(i);
        if prev != i {
            out.push((
                i,
                err(
                    "duplicate_group_name",
                    format!(
                        "acl {} group[{i}]: name is already used by group[{prev}]; group names must be unique",
                        group.name
                    ),
                ),
            ));
        }
    }
    out
}

/// Explicit `sequence_start`/`sequence_step` values outside `1..=MAX_SEQUENCE`.
/// Zero means unset for both.
fn bound_findings(group: &AclGroup) -> Vec<Finding> {
    let name = &group.name;
    let out_of_bounds = |v: i64| v < 0 || v > i64::from(MAX_SEQUENCE);
    let mut out = Vec::new();

    if let Some(start) = group.sequence_start.filter(|s| out_of_bounds(*s)) {
        out.push(err(
            "invalid_sequence_start",
            format!("acl {name}: sequence_start {start} is outside {MIN_SEQUENCE}..={MAX_SEQUENCE}"),
        ));
    }
    if let Some(step) = group.sequence_step.filter(|s| out_of_bounds(*s)) {
        out.push(err(
            "invalid_sequence_step",
            format!("acl {name}: sequence_step {step} is outside {MIN_SEQUENCE}..={MAX_SEQUENCE}"),
        ));
    }
    out
}

fn sequence_findings(group: &AclGroup) -> Vec<Finding> {
    let name = &group.name;
    let mut out = bound_findings(group);
    let bounds_ok = out.is_empty();

    match group.mode() {
        SequenceMode::Mixed => {
            for (i, entry) in group.entries.iter().enumerate() {
                if entry.sequence.is_some_and(|s| s > 0) {
                    out.push(err(
                        "mixed_sequence_mode",
                        format!(
                            "acl {name} entry[{i}]: sequence cannot be set when sequence_start is set (auto mode); remove the sequence or remove sequence_start"
                        ),
                    ));
                }
            }
        }
        SequenceMode::Auto if bounds_ok => {
            let start = group.sequence_start.unwrap_or_default();
            let step = resolve_group_step(group.sequence_step);
            let count = i64::try_from(group.entries.len()).unwrap_or(i64::MAX);
            if let Err(e) = validate_range(start, step, count) {
                out.push(err(range_error_code(&e), format!("acl {name}: {e}")));
            }
        }
        SequenceMode::Auto => {}
        SequenceMode::Manual => {
            for (i, entry) in group.entries.iter().enumerate() {
                match entry.sequence {
                    None | Some(0) => out.push(err(
                        "missing_entry_sequence",
                        format!(
                            "acl {name} entry[{i}]: sequence must be set when sequence_start is not set (manual mode)"
                        ),
                    )),
                    Some(s) if s < i64::from(MIN_SEQUENCE) || s > i64::from(MAX_SEQUENCE) => {
                        out.push(err(
                            "sequence_out_of_range",
                            format!(
                                "acl {name} entry[{i}]: sequence {s} is outside {MIN_SEQUENCE}..={MAX_SEQUENCE}"
                            ),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
    }
    out
}

fn range_error_code(e: &SequenceError) -> &'static str {
    match e {
        SequenceError::InvalidStart { .. } => "invalid_sequence_start",
        SequenceError::InvalidStep { .. } => "invalid_sequence_step",
        SequenceError::InvalidCount { .. } => "invalid_entry_count",
        _ => "sequence_overflow",
    }
}

fn duplicate_findings(group: &AclGroup) -> Vec<Finding> {
    match validate_internal(&group.range()) {
        Ok(()) => Vec::new(),
        Err(e) => vec![err("duplicate_sequence", e.to_string())],
    }
}

fn apply_findings(group: &AclGroup) -> Vec<Finding> {
    let name = &group.name;
    let sequences: BTreeSet<i64> = group
        .range()
        .sequences()
        .iter()
        .map(|&s| i64::from(s))
        .collect();
    let mut bound: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut out = Vec::new();

    for (i, apply) in group.applies.iter().enumerate() {
        let iface = apply.interface.trim().to_ascii_lowercase();
        let direction = apply.direction.trim().to_ascii_lowercase();

        if direction != "in" && direction != "out" {
            out.push(err(
                "invalid_direction",
                format!(
                    "acl {name} apply[{i}]: direction '{}' must be 'in' or 'out'",
                    apply.direction
                ),
            ));
        }

        if let Some(prev) = bound.insert((iface.clone(), direction.clone()), i) {
            out.push(err(
                "duplicate_apply",
                format!(
                    "acl {name} apply[{i}]: interface {iface} direction {direction} is already bound by apply[{prev}]"
                ),
            ));
        }

        if let Some(reason) = interface_rejects(&iface, group.acl_type) {
            out.push(err(
                "unsupported_interface",
                format!("acl {name} apply[{i}]: {reason}"),
            ));
        }

        let mut seen = BTreeSet::new();
        for (j, id) in apply.filter_ids.iter().enumerate() {
            if !seen.insert(*id) {
                out.push(err(
                    "duplicate_filter_id",
                    format!("acl {name} apply[{i}].filter_ids[{j}]: filter id {id} is repeated"),
                ));
            } else if !sequences.contains(id) {
                out.push(warn(
                    "unknown_filter_id",
                    format!(
                        "acl {name} apply[{i}].filter_ids[{j}]: filter id {id} is not one of this group's sequences"
                    ),
                ));
            }
        }
    }
    out
}

/// MAC filtering only exists on LAN and bridge interfaces.
fn interface_rejects(iface: &str, acl_type: AclType) -> Option<String> {
    let is_pp = iface.len() > 2 && iface.starts_with("pp");
    let is_tunnel = iface.len() > 6 && iface.starts_with("tunnel");
    if acl_type == AclType::Mac && (is_pp || is_tunnel) {
        return Some(format!(
            "MAC ACL cannot be applied to {iface}; MAC filtering is only supported on LAN and bridge interfaces"
        ));
    }
    None
}

fn err(code: &str, message: String) -> Finding {
    Finding {
        severity: Severity::Error,
        code: code.to_string(),
        message,
    }
}

fn warn(code: &str, message: String) -> Finding {
    Finding {
        severity: Severity::Warning,
        code: code.to_string(),
        message,
    }
}
