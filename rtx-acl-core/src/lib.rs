//! Sequence-number allocation and collision detection for RTX router ACLs.
//!
//! Filter numbers on the router live in one address space per ACL type,
//! bounded by [`MIN_SEQUENCE`] and [`MAX_SEQUENCE`]. Independently managed ACL
//! groups must not claim the same number. This crate computes the numbers a
//! group occupies, detects overlaps between groups and against numbers already
//! on the router, and proposes free starting points.
//!
//! Everything here is pure and synchronous.

pub mod acl;
pub mod allocate;
pub mod calculator;
pub mod collision;
pub mod error;
pub mod range;

pub use acl::{AclType, UnknownAclType};
pub use allocate::{is_run_free, suggest_next_start, SUGGESTED_STARTS};
pub use calculator::{
    compute_for_group, compute_sequence_run, detect_mode, resolve_group_step, validate_range,
    SequenceGroup, SequenceMode, DEFAULT_SEQUENCE_START, DEFAULT_SEQUENCE_STEP, MAX_SEQUENCE,
    MIN_SEQUENCE,
};
pub use collision::{
    check_against_existing, collision_help, find_overlaps, validate_internal, validate_no_overlap,
};
pub use error::{AggregateCollisionError, CollisionError, SequenceError};
pub use range::SequenceRange;
