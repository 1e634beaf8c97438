//! Sequence number calculation for ACL groups.
//!
//! A group either derives its filter numbers from a start value and a step
//! (auto mode) or lists one explicit number per entry (manual mode). Setting
//! both is classified as mixed mode and left to the caller to reject.
//!
//! All functions here are pure: the same inputs always yield the same output.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::error::SequenceError;

/// Smallest filter number the router accepts.
pub const MIN_SEQUENCE: u32 = 1;

/// Largest filter number the router accepts.
pub const MAX_SEQUENCE: u32 = 65535;

/// Step used when a group sets a start but no step.
pub const DEFAULT_SEQUENCE_STEP: u32 = 10;

/// Start value proposed to users who enable auto mode without a preference.
pub const DEFAULT_SEQUENCE_START: u32 = 10;

/// How sequence numbers are assigned within one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceMode {
    Auto,
    Manual,
    Mixed,
}

impl Display for SequenceMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SequenceMode::Auto => "auto",
            SequenceMode::Manual => "manual",
            SequenceMode::Mixed => "mixed",
        })
    }
}

/// The sequencing-relevant view of one ACL group.
///
/// `entry_sequences` holds one slot per entry, `Some` when the entry sets its
/// own number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceGroup {
    pub start: Option<i64>,
    pub step: Option<i64>,
    pub entry_sequences: Vec<Option<i64>>,
}

impl SequenceGroup {
    fn has_auto_start(&self) -> bool {
        self.start.is_some_and(|s| s > 0)
    }

    fn has_explicit_sequences(&self) -> bool {
        self.entry_sequences
            .iter()
            .any(|s| s.is_some_and(|v| v > 0))
    }
}

/// Compute `count` sequence numbers starting at `start`, `step` apart.
///
/// Returns an empty list for `count == 0`.
///
/// ```
/// use rtx_acl_core::compute_sequence_run;
///
/// assert_eq!(compute_sequence_run(100, 10, 3).unwrap(), vec![100, 110, 120]);
/// ```
pub fn compute_sequence_run(start: i64, step: i64, count: i64) -> Result<Vec<u32>, SequenceError> {
    validate_range(start, step, count)?;

    // Bounds were checked above, so every member fits in 1..=MAX_SEQUENCE.
    let sequences = (0..count)
        .map(|i| start + i * step)
        .filter_map(|v| u32::try_from(v).ok())
        .collect();
    Ok(sequences)
}

/// Validate a run without materializing it.
///
/// Checks run in a fixed order: start, step, count, then overflow. The last
/// member is computed in `i128` so large `step * count` products cannot wrap.
pub fn validate_range(start: i64, step: i64, count: i64) -> Result<(), SequenceError> {
    if start < i64::from(MIN_SEQUENCE) {
        return Err(SequenceError::InvalidStart { start });
    }
    if step < 1 {
        return Err(SequenceError::InvalidStep { step });
    }
    if count < 0 {
        return Err(SequenceError::InvalidCount { count });
    }

    let overflow = |value: i128| SequenceError::SequenceOverflow {
        value,
        start,
        step,
        count,
    };

    if start > i64::from(MAX_SEQUENCE) {
        return Err(overflow(i128::from(start)));
    }
    if count == 0 {
        return Ok(());
    }

    let last = i128::from(start) + i128::from(count - 1) * i128::from(step);
    if last > i128::from(MAX_SEQUENCE) {
        return Err(overflow(last));
    }
    Ok(())
}

/// Classify how a group assigns its sequence numbers.
pub fn detect_mode(group: &SequenceGroup) -> SequenceMode {
    match (group.has_auto_start(), group.has_explicit_sequences()) {
        (true, true) => SequenceMode::Mixed,
        (true, false) => SequenceMode::Auto,
        (false, _) => SequenceMode::Manual,
    }
}

/// Step a group actually uses: unset or zero falls back to [`DEFAULT_SEQUENCE_STEP`].
pub fn resolve_group_step(step: Option<i64>) -> i64 {
    match step {
        None | Some(0) => i64::from(DEFAULT_SEQUENCE_STEP),
        Some(step) => step,
    }
}

/// Compute a group's sequences when they are derived from its start.
///
/// Manual groups yield `Ok(None)`: their numbers come from the entries.
/// Mixed groups are computed as if auto so that range errors still surface.
pub fn compute_for_group(group: &SequenceGroup) -> Result<Option<Vec<u32>>, SequenceError> {
    let mode = detect_mode(group);
    let Some(start) = group.start.filter(|_| mode != SequenceMode::Manual) else {
        return Ok(None);
    };
    let count = i64::try_from(group.entry_sequences.len()).unwrap_or(i64::MAX);
    compute_sequence_run(start, resolve_group_step(group.step), count).map(Some)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        compute_for_group, compute_sequence_run, detect_mode, resolve_group_step, validate_range,
        SequenceGroup, SequenceMode, DEFAULT_SEQUENCE_STEP, MAX_SEQUENCE,
    };
    use crate::error::SequenceError;

    fn group(start: Option<i64>, step: Option<i64>, entries: &[Option<i64>]) -> SequenceGroup {
        SequenceGroup {
            start,
            step,
            entry_sequences: entries.to_vec(),
        }
    }

    #[test]
    fn run_starts_at_start_and_steps_evenly() {
        assert_eq!(compute_sequence_run(100, 10, 3), Ok(vec![100, 110, 120]));
        assert_eq!(compute_sequence_run(1, 1, 5), Ok(vec![1, 2, 3, 4, 5]));
    }

    #[test]
    fn zero_count_is_empty_not_error() {
        assert_eq!(compute_sequence_run(500, 7, 0), Ok(vec![]));
    }

    #[test]
    fn single_value_at_upper_bound_is_allowed() {
        assert_eq!(compute_sequence_run(65535, 1, 1), Ok(vec![MAX_SEQUENCE]));
    }

    #[test]
    fn errors_follow_start_step_count_order() {
        assert_eq!(
            compute_sequence_run(0, 0, -1),
            Err(SequenceError::InvalidStart { start: 0 })
        );
        assert_eq!(
            compute_sequence_run(100, 0, -1),
            Err(SequenceError::InvalidStep { step: 0 })
        );
        assert_eq!(
            compute_sequence_run(100, 10, -1),
            Err(SequenceError::InvalidCount { count: -1 })
        );
    }

    #[test]
    fn overflow_reports_last_member() {
        let err = compute_sequence_run(65530, 10, 3).expect_err("overflow");
        match err {
            SequenceError::SequenceOverflow { value, .. } => assert_eq!(value, 65550),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn start_above_maximum_overflows_even_for_empty_run() {
        assert!(matches!(
            validate_range(70000, 10, 0),
            Err(SequenceError::SequenceOverflow { value: 70000, .. })
        ));
    }

    #[test]
    fn huge_products_do_not_wrap() {
        let err = validate_range(1, i64::MAX, i64::MAX).expect_err("overflow");
        assert!(matches!(err, SequenceError::SequenceOverflow { .. }));
    }

    #[test]
    fn detects_each_mode() {
        assert_eq!(detect_mode(&group(Some(100), None, &[None, None])), SequenceMode::Auto);
        assert_eq!(
            detect_mode(&group(None, None, &[Some(10), Some(20)])),
            SequenceMode::Manual
        );
        assert_eq!(
            detect_mode(&group(Some(0), None, &[Some(10)])),
            SequenceMode::Manual
        );
        assert_eq!(
            detect_mode(&group(Some(100), None, &[None, Some(20)])),
            SequenceMode::Mixed
        );
    }

    #[test]
    fn explicit_zero_sequence_does_not_make_group_mixed() {
        assert_eq!(
            detect_mode(&group(Some(100), None, &[Some(0), None])),
            SequenceMode::Auto
        );
    }

    #[test]
    fn group_step_defaults_when_unset_or_zero() {
        assert_eq!(resolve_group_step(None), i64::from(DEFAULT_SEQUENCE_STEP));
        assert_eq!(resolve_group_step(Some(0)), i64::from(DEFAULT_SEQUENCE_STEP));
        assert_eq!(resolve_group_step(Some(5)), 5);
    }

    #[test]
    fn auto_group_uses_entry_count_and_default_step() {
        let g = group(Some(200), None, &[None, None, None]);
        assert_eq!(compute_for_group(&g), Ok(Some(vec![200, 210, 220])));
    }

    #[test]
    fn manual_group_yields_none() {
        let g = group(None, Some(5), &[Some(1), Some(2)]);
        assert_eq!(compute_for_group(&g), Ok(None));
    }

    #[test]
    fn mixed_group_propagates_range_errors() {
        let g = group(Some(65535), Some(10), &[None, Some(7)]);
        assert!(matches!(
            compute_for_group(&g),
            Err(SequenceError::SequenceOverflow { .. })
        ));
    }
}
