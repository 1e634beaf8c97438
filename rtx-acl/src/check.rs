//! Full plan check: group validation, cross-group overlap and router collisions.
//!
//! ## Check Flow
//!
//! 1. Validate each group on its own ([`validate_group`]) and require unique
//!    names ([`validate_plan_names`])
//! 2. Intersect every pair of same-type groups ([`validate_no_overlap`]).
//!    Ranges are owned by `acl.<name>`, so no group can pass for a router filter
//! 3. When router configuration is given, compare each group with the filters
//!    already defined in its table, treating numbers the group owned in the
//!    prior state as its own
//! 4. For every group involved in a collision, propose a free
//!    `sequence_start` that avoids the router and the other groups

use std::collections::{BTreeMap, BTreeSet};

use rtx_acl_core::{
    check_against_existing, collision_help, resolve_group_step, suggest_next_start,
    validate_no_overlap, AclType, AggregateCollisionError, CollisionError, SequenceError,
    SequenceRange, DEFAULT_SEQUENCE_STEP,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::plan::{AclGroup, AclPlan};
use crate::router::{router_sequences, FilterSpace};
use crate::state::{overlay_state, PriorState};
use crate::validate::{validate_group, validate_plan_names, Finding, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIssue {
    pub severity: Severity,
    pub code: String,
    pub group: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub group: String,
    pub acl_type: AclType,
    pub suggested_start: Option<u32>,
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub groups: usize,
    pub router_checked: bool,
    pub state_loaded: bool,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<CheckIssue>,
    pub suggestions: Vec<Suggestion>,
}

/// Run every check over `plan`.
///
/// `router_config` is the router's `show config` text; `state` lists the
/// sequences each group owned after its last apply.
pub fn build_check_report(
    plan: &AclPlan,
    router_config: Option<&str>,
    state: Option<&PriorState>,
) -> CheckReport {
    let mut issues: Vec<CheckIssue> = validate_plan_names(&plan.groups)
        .into_iter()
        .map(|(i, f)| issue_from_finding(&plan.groups[i].name, f))
        .collect();
    for group in &plan.groups {
        issues.extend(
            validate_group(group)
                .into_iter()
                .map(|f| issue_from_finding(&group.name, f)),
        );
    }

    let owners = plan_owner_ids(plan);
    let ranges: Vec<SequenceRange> = plan
        .groups
        .iter()
        .zip(&owners)
        .map(|(group, owner)| group.range_owned_by(owner.as_str()))
        .collect();
    let mut collided: BTreeMap<usize, Vec<CollisionError>> = BTreeMap::new();

    if let Err(e) = validate_no_overlap(&ranges) {
        for c in e.collisions() {
            let Some(i) = owners.iter().position(|o| *o == c.conflicts_with) else {
                continue;
            };
            issues.push(CheckIssue {
                severity: Severity::Error,
                code: "sequence_collision".to_string(),
                group: plan.groups[i].name.clone(),
                message: c.to_string(),
            });
            collided.entry(i).or_default().push(c.clone());
        }
    }

    let router_tables = router_config.map(|cfg| router_tables(cfg, plan, state));
    if let Some(tables) = &router_tables {
        for (i, (group, range)) in plan.groups.iter().zip(&ranges).enumerate() {
            let Some(existing) = tables.get(&group.acl_type) else {
                continue;
            };
            if let Err(e) = check_against_existing(range, existing, Some(range.owner())) {
                for c in e.collisions() {
                    issues.push(CheckIssue {
                        severity: Severity::Error,
                        code: "router_collision".to_string(),
                        group: group.name.clone(),
                        message: format!("acl {}: {c}", group.name),
                    });
                    collided.entry(i).or_default().push(c.clone());
                }
            }
        }
    }

    let suggestions = plan
        .groups
        .iter()
        .enumerate()
        .filter_map(|(i, group)| {
            let collisions = collided.remove(&i)?;
            let occupied = occupied_for(i, group, &ranges, router_tables.as_ref());
            Some(suggestion_for(group, collisions, &occupied))
        })
        .collect();

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .count();

    info!(
        groups = plan.groups.len(),
        errors, warnings, "plan check finished"
    );

    CheckReport {
        groups: plan.groups.len(),
        router_checked: router_config.is_some(),
        state_loaded: state.is_some(),
        errors,
        warnings,
        issues,
        suggestions,
    }
}

pub fn render_check_text(report: &CheckReport, explain: bool) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "check groups={} router={} state={}",
        report.groups,
        yes_no(report.router_checked),
        yes_no(report.state_loaded)
    ));
    out.push(format!(
        "result errors={} warnings={}",
        report.errors, report.warnings
    ));
    out.push("issues".to_string());
    if report.issues.is_empty() {
        out.push("- none".to_string());
    }
    for issue in &report.issues {
        let sev = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        out.push(format!(
            "- [{sev}] {} ({}): {}",
            issue.code, issue.group, issue.message
        ));
    }
    if report.suggestions.is_empty() {
        return out.join("\n");
    }
    out.push("suggestions".to_string());
    for s in &report.suggestions {
        match s.suggested_start {
            Some(start) => out.push(format!("- {}: sequence_start = {start}", s.group)),
            None => out.push(format!("- {}: no free sequence range found", s.group)),
        }
        if explain {
            out.extend(s.help.lines().map(|l| format!("    {l}")));
        }
    }
    out.join("\n")
}

/// Router filters for every ACL type used by the plan, with prior-state owners applied.
fn router_tables(
    config: &str,
    plan: &AclPlan,
    state: Option<&PriorState>,
) -> BTreeMap<AclType, BTreeMap<u32, String>> {
    let mut tables = BTreeMap::new();
    for group in &plan.groups {
        tables.entry(group.acl_type).or_insert_with(|| {
            let mut existing = router_sequences(config, group.acl_type);
            if let Some(state) = state {
                overlay_state(&mut existing, state, group.acl_type);
            }
            existing
        });
    }
    tables
}

/// Owner id per group. A repeated name gets its position appended so the two
/// groups stay apart; the repeat itself is reported as `duplicate_group_name`.
fn plan_owner_ids(plan: &AclPlan) -> Vec<String> {
    let mut seen = BTreeSet::new();
    plan.groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let id = group.owner_id();
            if seen.insert(id.clone()) {
                id
            } else {
                format!("{id}#{i}")
            }
        })
        .collect()
}

/// Numbers a new start for group `index` must avoid: other plan groups in the
/// same router table, plus router filters in that table it does not own.
fn occupied_for(
    index: usize,
    group: &AclGroup,
    ranges: &[SequenceRange],
    router_tables: Option<&BTreeMap<AclType, BTreeMap<u32, String>>>,
) -> BTreeMap<u32, String> {
    let own = ranges.get(index).map(SequenceRange::owner);
    let mut occupied: BTreeMap<u32, String> = router_tables
        .and_then(|t| t.get(&group.acl_type))
        .map(|existing| {
            existing
                .iter()
                .filter(|(_, owner)| Some(owner.as_str()) != own)
                .map(|(seq, owner)| (*seq, owner.clone()))
                .collect()
        })
        .unwrap_or_default();

    let space = FilterSpace::for_acl_type(group.acl_type);
    for (_, range) in ranges.iter().enumerate().filter(|(j, r)| {
        *j != index && FilterSpace::for_acl_type(r.acl_type()) == space
    }) {
        for &seq in range.sequences() {
            occupied.entry(seq).or_insert_with(|| range.owner().to_string());
        }
    }
    debug!(acl_name = %group.name, ?space, occupied = occupied.len(), "collected occupied sequences");
    occupied
}

fn suggestion_for(
    group: &AclGroup,
    collisions: Vec<CollisionError>,
    occupied: &BTreeMap<u32, String>,
) -> Suggestion {
    let step = u32::try_from(resolve_group_step(group.sequence_step))
        .unwrap_or(DEFAULT_SEQUENCE_STEP);
    let preferred = group
        .sequence_start
        .and_then(|s| u32::try_from(s).ok())
        .unwrap_or(0);
    let suggested_start = suggest_next_start(occupied, group.entries.len(), step, preferred);

    let err = match <[CollisionError; 1]>::try_from(collisions) {
        Ok([single]) => SequenceError::Collision(single),
        Err(collisions) => SequenceError::AggregateCollision(AggregateCollisionError { collisions }),
    };

    Suggestion {
        group: group.name.clone(),
        acl_type: group.acl_type,
        suggested_start,
        help: collision_help(&err, suggested_start),
    }
}

fn issue_from_finding(group: &str, finding: Finding) -> CheckIssue {
    CheckIssue {
        severity: finding.severity,
        code: finding.code,
        group: group.to_string(),
        message: finding.message,
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
