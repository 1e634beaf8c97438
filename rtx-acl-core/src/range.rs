use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::acl::AclType;

/// The sequence numbers one ACL group occupies.
///
/// Built once from a desired or observed sequence list and never mutated.
/// `min`/`max` are cached for display only; membership checks use the full
/// list because manual groups need not be contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceRange {
    owner: String,
    group: String,
    acl_type: AclType,
    sequences: Vec<u32>,
    min: Option<u32>,
    max: Option<u32>,
}

impl SequenceRange {
    /// Create a range, keeping `sequences` in the order given.
    pub fn new(
        owner: impl Into<String>,
        group: impl Into<String>,
        acl_type: AclType,
        sequences: Vec<u32>,
    ) -> Self {
        let min = sequences.iter().copied().min();
        let max = sequences.iter().copied().max();
        Self {
            owner: owner.into(),
            group: group.into(),
            acl_type,
            sequences,
            min,
            max,
        }
    }

    /// Identifier of the resource that owns the range.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// ACL group name.
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn acl_type(&self) -> AclType {
        self.acl_type
    }

    pub fn sequences(&self) -> &[u32] {
        &self.sequences
    }

    pub fn min(&self) -> Option<u32> {
        self.min
    }

    pub fn max(&self) -> Option<u32> {
        self.max
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn contains(&self, sequence: u32) -> bool {
        self.sequences.contains(&sequence)
    }
}

impl Display for SequenceRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.sequences.as_slice(), self.min, self.max) {
            ([], _, _) => write!(f, "{} (no sequences)", self.owner),
            ([only], _, _) => write!(f, "{} (sequence {only})", self.owner),
            (_, Some(min), Some(max)) => write!(
                f,
                "{} (sequences {min}-{max}, count={})",
                self.owner,
                self.sequences.len()
            ),
            _ => write!(f, "{}", self.owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceRange;
    use crate::acl::AclType;

    #[test]
    fn caches_bounds_of_unsorted_input() {
        let range = SequenceRange::new("acl.a", "a", AclType::Mac, vec![30, 10, 20]);
        assert_eq!(range.min(), Some(10));
        assert_eq!(range.max(), Some(30));
        assert_eq!(range.sequences(), &[30, 10, 20]);
    }

    #[test]
    fn display_covers_empty_single_and_many() {
        let empty = SequenceRange::new("acl.a", "a", AclType::Ip, vec![]);
        let one = SequenceRange::new("acl.b", "b", AclType::Ip, vec![100]);
        let many = SequenceRange::new("acl.c", "c", AclType::Ip, vec![100, 110, 120]);

        assert_eq!(empty.to_string(), "acl.a (no sequences)");
        assert_eq!(one.to_string(), "acl.b (sequence 100)");
        assert_eq!(many.to_string(), "acl.c (sequences 100-120, count=3)");
    }

    #[test]
    fn contains_checks_members_not_span() {
        let range = SequenceRange::new("acl.a", "a", AclType::Ip, vec![100, 200]);
        assert!(range.contains(200));
        assert!(!range.contains(150));
    }
}
