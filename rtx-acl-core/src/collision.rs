//! Sequence collision detection.
//!
//! Two checks are offered:
//!
//! - **Between planned groups** ([`validate_no_overlap`]): every pair of ranges
//!   with the same [`AclType`](crate::AclType) is intersected and each shared number becomes
//!   one [`CollisionError`].
//! - **Against live state** ([`check_against_existing`]): a candidate range is
//!   compared with a `sequence -> owner` map read back from the router, which
//!   also covers filters nobody in the plan manages.
//!
//! Every collision found in a pass is returned at once so a user can fix all
//! conflicts in a single edit.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{AggregateCollisionError, CollisionError, SequenceError};
use crate::range::SequenceRange;

/// Fail on the first number that appears twice in `range`, scanning in order.
pub fn validate_internal(range: &SequenceRange) -> Result<(), SequenceError> {
    let mut seen = BTreeSet::new();
    for &sequence in range.sequences() {
        if !seen.insert(sequence) {
            return Err(SequenceError::DuplicateSequence {
                sequence,
                group: range.group().to_string(),
            });
        }
    }
    debug!(range = %range, "no internal duplicates");
    Ok(())
}

/// Numbers present in both ranges.
///
/// Callers compare only ranges of the same [`AclType`](crate::AclType); this function does not
/// look at the type.
pub fn find_overlaps(a: &SequenceRange, b: &SequenceRange) -> BTreeSet<u32> {
    let left: BTreeSet<u32> = a.sequences().iter().copied().collect();
    b.sequences()
        .iter()
        .copied()
        .filter(|s| left.contains(s))
        .collect()
}

/// Report every number shared by two ranges of the same type.
///
/// Ranges of different types are skipped without being intersected.
pub fn validate_no_overlap(ranges: &[SequenceRange]) -> Result<(), SequenceError> {
    let mut collisions = Vec::new();

    for (i, a) in ranges.iter().enumerate() {
        for b in ranges.iter().skip(i + 1) {
            if a.acl_type() != b.acl_type() {
                continue;
            }
            for sequence in find_overlaps(a, b) {
                collisions.push(CollisionError {
                    sequence,
                    owned_by: a.owner().to_string(),
                    conflicts_with: b.owner().to_string(),
                    acl_type: a.acl_type(),
                    message: Some(format!(
                        "sequence {sequence} in {:?} conflicts with {:?}",
                        a.owner(),
                        b.owner()
                    )),
                });
            }
        }
    }

    debug!(
        ranges = ranges.len(),
        collisions = collisions.len(),
        "checked ranges for overlap"
    );

    if collisions.is_empty() {
        return Ok(());
    }
    Err(SequenceError::AggregateCollision(AggregateCollisionError {
        collisions,
    }))
}

/// Compare a candidate range with sequences already in use elsewhere.
///
/// `existing` maps each used number to its current owner. Numbers owned by
/// `exclude_owner` are the candidate's own prior state and never conflict.
/// A single conflict is returned as [`SequenceError::Collision`], several as
/// [`SequenceError::AggregateCollision`].
pub fn check_against_existing(
    candidate: &SequenceRange,
    existing: &BTreeMap<u32, String>,
    exclude_owner: Option<&str>,
) -> Result<(), SequenceError> {
    if candidate.is_empty() {
        return Ok(());
    }

    debug!(
        acl_name = candidate.group(),
        acl_type = %candidate.acl_type(),
        sequences = ?candidate.sequences(),
        exclude_owner,
        "checking candidate against existing sequences"
    );

    let mut collisions: Vec<CollisionError> = candidate
        .sequences()
        .iter()
        .filter_map(|&sequence| {
            let owner = existing.get(&sequence)?;
            if exclude_owner.is_some_and(|ex| ex == owner.as_str()) {
                return None;
            }
            Some(CollisionError {
                sequence,
                owned_by: candidate.owner().to_string(),
                conflicts_with: owner.clone(),
                acl_type: candidate.acl_type(),
                message: Some(format!(
                    "sequence {sequence} is already in use (owned by {owner:?}); choose a different sequence range"
                )),
            })
        })
        .collect();

    match collisions.len() {
        0 => Ok(()),
        1 => Err(SequenceError::Collision(collisions.remove(0))),
        _ => Err(SequenceError::AggregateCollision(AggregateCollisionError {
            collisions,
        })),
    }
}

/// User-facing explanation of a collision error with remedial steps.
pub fn collision_help(err: &SequenceError, suggested_start: Option<u32>) -> String {
    let mut out = vec![err.to_string(), String::new(), "Suggested actions:".to_string()];
    out.push("  1. Use a different sequence_start value to avoid overlap".to_string());
    if let Some(start) = suggested_start {
        out.push(format!("     Example: sequence_start = {start}"));
    }
    out.push("  2. If using manual mode, choose unique sequence numbers".to_string());
    out.push("  3. Review existing ACLs to understand sequence allocation".to_string());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use pretty_assertions::assert_eq;

    use super::{
        check_against_existing, collision_help, find_overlaps, validate_internal,
        validate_no_overlap,
    };
    use crate::acl::AclType;
    use crate::error::SequenceError;
    use crate::range::SequenceRange;

    fn range(owner: &str, acl_type: AclType, sequences: &[u32]) -> SequenceRange {
        SequenceRange::new(owner, owner, acl_type, sequences.to_vec())
    }

    fn existing(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
        pairs.iter().map(|(s, o)| (*s, o.to_string())).collect()
    }

    #[test]
    fn internal_duplicate_reports_first_repeat() {
        let r = range("a", AclType::Ip, &[10, 20, 30, 20, 10]);
        assert_eq!(
            validate_internal(&r),
            Err(SequenceError::DuplicateSequence {
                sequence: 20,
                group: "a".to_string()
            })
        );
    }

    #[test]
    fn overlap_returns_shared_values() {
        let a = range("a", AclType::Ip, &[100, 110, 120]);
        let b = range("b", AclType::Ip, &[120, 130, 140]);
        let c = range("c", AclType::Ip, &[200, 210]);
        assert_eq!(find_overlaps(&a, &b), BTreeSet::from([120]));
        assert!(find_overlaps(&a, &c).is_empty());
    }

    #[test]
    fn no_overlap_ignores_other_types() {
        let ranges = vec![
            range("ip", AclType::Ip, &[100, 110]),
            range("mac", AclType::Mac, &[100, 110]),
        ];
        assert_eq!(validate_no_overlap(&ranges), Ok(()));
    }

    #[test]
    fn no_overlap_reports_only_intersecting_pair() {
        let ranges = vec![
            range("a", AclType::Ip, &[100, 110, 120]),
            range("b", AclType::Ip, &[110, 120, 130]),
            range("c", AclType::Ip, &[500, 510]),
        ];
        let err = validate_no_overlap(&ranges).expect_err("collisions");
        let found: Vec<(u32, &str, &str)> = err
            .collisions()
            .iter()
            .map(|c| (c.sequence, c.owned_by.as_str(), c.conflicts_with.as_str()))
            .collect();
        assert_eq!(found, vec![(110, "a", "b"), (120, "a", "b")]);
        assert!(matches!(err, SequenceError::AggregateCollision(_)));
    }

    #[test]
    fn existing_check_skips_excluded_owner() {
        let candidate = range("acl.lan", AclType::Ip, &[100, 110, 120]);
        let used = existing(&[(100, "lan"), (110, "router")]);

        let err = check_against_existing(&candidate, &used, Some("lan")).expect_err("conflict");
        match err {
            SequenceError::Collision(c) => {
                assert_eq!(c.sequence, 110);
                assert_eq!(c.conflicts_with, "router");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn existing_check_aggregates_multiple_conflicts() {
        let candidate = range("acl.lan", AclType::Ip, &[100, 110, 120]);
        let used = existing(&[(100, "router"), (120, "router")]);
        let err = check_against_existing(&candidate, &used, None).expect_err("conflicts");
        assert_eq!(err.collisions().len(), 2);
    }

    #[test]
    fn existing_check_passes_when_disjoint_or_empty() {
        let used = existing(&[(1, "router")]);
        let candidate = range("acl.lan", AclType::Ip, &[100]);
        assert_eq!(check_against_existing(&candidate, &used, None), Ok(()));
        let empty = range("acl.none", AclType::Ip, &[]);
        assert_eq!(check_against_existing(&empty, &used, None), Ok(()));
    }

    #[test]
    fn help_includes_suggestion_when_present() {
        let err = SequenceError::DuplicateSequence {
            sequence: 5,
            group: "a".to_string(),
        };
        let with = collision_help(&err, Some(1000));
        let without = collision_help(&err, None);
        assert!(with.contains("sequence_start = 1000"));
        assert!(!without.contains("Example:"));
        assert!(without.starts_with("duplicate sequence 5"));
    }
}
