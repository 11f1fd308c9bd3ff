//! Crate-wide error type.
//!
//! There is no local recovery anywhere in the solver: every error aborts the
//! containing task and surfaces to the driver, which joins the remaining
//! workers and reports the first failure. Partial outputs stay in `tmp/`.

use std::fmt;

#[derive(Debug)]
pub enum SolverError {
    /// A `State` violated a representation invariant (overlapping occupancy
    /// masks, wrong piece counts, anchor not on an enemy pusher), or a piece
    /// operation targeted an empty square.
    InvalidState { reason: &'static str },
    /// Database construction was handed interval files whose element counts
    /// disagree, or an empty/non-empty pair.
    LengthMismatch {
        starts: usize,
        lengths: usize,
        path: String,
    },
    /// A prior generation's aggregated database file is absent.
    MissingGeneration { generation: u32, path: String },
    /// A filesystem operation failed.
    Io {
        stage: &'static str,
        path: String,
        error: String,
    },
    /// A single source position has more successors than a 16-bit outcount
    /// can hold. Only reachable with non-traditional board tables.
    Overflow { rank: u64, successors: usize },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidState { reason } => write!(f, "invalid state: {reason}"),
            SolverError::LengthMismatch {
                starts,
                lengths,
                path,
            } => write!(
                f,
                "interval file pair mismatch at {path}: {starts} starts vs {lengths} lengths"
            ),
            SolverError::MissingGeneration { generation, path } => {
                write!(f, "missing generation {generation} database file: {path}")
            }
            SolverError::Io { stage, path, error } => {
                write!(f, "i/o failure while {stage} {path}: {error}")
            }
            SolverError::Overflow { rank, successors } => write!(
                f,
                "outcount overflow: rank {rank} has {successors} successors (max 65535)"
            ),
        }
    }
}

impl std::error::Error for SolverError {}
