//! Free start suggestion for new or colliding ACL groups.

use std::collections::BTreeMap;

use tracing::debug;

use crate::calculator::{DEFAULT_SEQUENCE_STEP, MAX_SEQUENCE, MIN_SEQUENCE};

/// Round-number starts tried, in order, when the preferred start is taken.
pub const SUGGESTED_STARTS: [u32; 4] = [10, 100, 1000, 10000];

/// Whether `count` numbers from `start`, `step` apart, are all unused and in bounds.
pub fn is_run_free(existing: &BTreeMap<u32, String>, start: u32, step: u32, count: usize) -> bool {
    if start < MIN_SEQUENCE {
        return false;
    }
    (0..count as u64).all(|i| {
        let value = u64::from(start) + i * u64::from(step);
        match u32::try_from(value) {
            Ok(seq) if seq <= MAX_SEQUENCE => !existing.contains_key(&seq),
            _ => false,
        }
    })
}

/// Propose a start whose run of `entry_count` numbers is entirely free.
///
/// Candidates, in order: `preferred_start` (when non-zero), each of
/// [`SUGGESTED_STARTS`], then the hundred just past the highest used number.
/// `None` means no candidate fits; callers treat that as a hard failure.
/// A zero `step` is read as [`DEFAULT_SEQUENCE_STEP`].
pub fn suggest_next_start(
    existing: &BTreeMap<u32, String>,
    entry_count: usize,
    step: u32,
    preferred_start: u32,
) -> Option<u32> {
    if entry_count == 0 {
        return Some(preferred_start);
    }
    let step = if step == 0 { DEFAULT_SEQUENCE_STEP } else { step };

    let past_highest = existing
        .keys()
        .next_back()
        .map(|&last| (last / 100 + 1) * 100);

    let found = (preferred_start > 0)
        .then_some(preferred_start)
        .into_iter()
        .chain(SUGGESTED_STARTS)
        .chain(past_highest)
        .find(|&start| is_run_free(existing, start, step, entry_count));

    debug!(
        entry_count,
        step,
        preferred_start,
        used = existing.len(),
        suggestion = ?found,
        "suggested sequence start"
    );
    found
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{is_run_free, suggest_next_start};

    fn used(values: &[u32]) -> BTreeMap<u32, String> {
        values.iter().map(|v| (*v, "router".to_string())).collect()
    }

    #[test]
    fn empty_map_keeps_preferred_start() {
        assert_eq!(suggest_next_start(&BTreeMap::new(), 3, 10, 100), Some(100));
    }

    #[test]
    fn zero_entries_returns_preferred_unchanged() {
        let full = used(&[10, 100, 1000, 10000, 42]);
        assert_eq!(suggest_next_start(&full, 0, 10, 42), Some(42));
        assert_eq!(suggest_next_start(&full, 0, 10, 0), Some(0));
    }

    #[test]
    fn occupied_preference_falls_back_to_fixed_list() {
        let existing = used(&[100, 110]);
        assert_eq!(suggest_next_start(&existing, 3, 10, 100), Some(10));

        let existing = used(&[10, 30, 100]);
        assert_eq!(suggest_next_start(&existing, 3, 10, 100), Some(1000));
    }

    #[test]
    fn all_fixed_candidates_taken_rounds_past_highest() {
        let existing = used(&[10, 100, 1000, 10000, 12345]);
        assert_eq!(suggest_next_start(&existing, 2, 10, 0), Some(12400));
    }

    #[test]
    fn returns_none_when_nothing_fits() {
        let existing = used(&[10, 100, 1000, 10000, 65500]);
        assert_eq!(suggest_next_start(&existing, 2, 10, 0), None);
    }

    #[test]
    fn run_past_maximum_is_not_free() {
        assert!(!is_run_free(&BTreeMap::new(), 65530, 10, 2));
        assert!(is_run_free(&BTreeMap::new(), 65530, 5, 2));
        assert!(!is_run_free(&BTreeMap::new(), 0, 10, 1));
    }
}
