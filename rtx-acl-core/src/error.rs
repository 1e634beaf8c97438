use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::acl::AclType;
use crate::calculator::{MAX_SEQUENCE, MIN_SEQUENCE};

/// Errors raised by the sequence calculator and collision detector.
///
/// Each variant is terminal for the call that produced it; nothing here is
/// clamped or repaired on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Start value is below [`MIN_SEQUENCE`].
    #[error("start must be a positive integer: got {start}, minimum is {min}", min = MIN_SEQUENCE)]
    InvalidStart { start: i64 },
    /// Step value is zero or negative.
    #[error("step must be a positive integer: got {step}")]
    InvalidStep { step: i64 },
    /// Entry count is negative.
    #[error("count must be non-negative: got {count}")]
    InvalidCount { count: i64 },
    /// Start or a computed member of the run exceeds [`MAX_SEQUENCE`].
    #[error(
        "calculated sequence {value} exceeds maximum {max} (start={start}, step={step}, count={count})",
        max = MAX_SEQUENCE
    )]
    SequenceOverflow {
        value: i128,
        start: i64,
        step: i64,
        count: i64,
    },
    /// The same number appears twice inside one group.
    #[error("duplicate sequence {sequence} detected within ACL {group:?}")]
    DuplicateSequence { sequence: u32, group: String },
    /// Exactly one conflicting value.
    #[error(transparent)]
    Collision(CollisionError),
    /// Several conflicting values, reported together.
    #[error(transparent)]
    AggregateCollision(AggregateCollisionError),
}

impl SequenceError {
    /// Collision records carried by this error; empty for non-collision variants.
    pub fn collisions(&self) -> &[CollisionError] {
        match self {
            SequenceError::Collision(c) => std::slice::from_ref(c),
            SequenceError::AggregateCollision(agg) => &agg.collisions,
            _ => &[],
        }
    }
}

/// One sequence number claimed by two owners in the same numbering space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollisionError {
    pub sequence: u32,
    pub owned_by: String,
    pub conflicts_with: String,
    pub acl_type: AclType,
    pub message: Option<String>,
}

impl Display for CollisionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return f.write_str(message);
        }
        write!(
            f,
            "sequence {} (owned by {:?}) conflicts with {:?} for ACL type {}",
            self.sequence, self.owned_by, self.conflicts_with, self.acl_type
        )
    }
}

impl std::error::Error for CollisionError {}

/// Every collision found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateCollisionError {
    pub collisions: Vec<CollisionError>,
}

impl Display for AggregateCollisionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.collisions.is_empty() {
            return f.write_str("no collisions");
        }
        write!(
            f,
            "detected {} sequence collision(s):",
            self.collisions.len()
        )?;
        for collision in &self.collisions {
            write!(f, "\n  - {collision}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateCollisionError {}
