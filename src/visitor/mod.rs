//! Visitor protocol for state enumeration, plus the concrete classifiers.
//!
//! The generator drives a visitor through `begin(source)`, one `accept` per
//! successor, and a final `end(source)`. `begin` may decline a source (e.g.
//! because the database already classifies it); `accept` may stop further
//! expansion of the current source. `end` is always delivered once `begin` has
//! been called, whatever path the expansion took.
//!
//! Visitors that can run under the parallel driver also implement
//! [`ForkableStateVisitor`]: `fork` makes an empty worker instance and `merge`
//! absorbs a populated one. Merging is a method on the concrete type (the
//! driver is generic), so no downcasting is involved.

use crate::core::state::{Removed, State};
use crate::error::SolverError;
use crate::intervals::{self, Interval};

mod composite;
mod inherent;
mod opening;
mod outcounting;

pub use composite::CompositeValueVisitor;
pub use inherent::InherentValueVisitor;
pub use opening::OpeningProcedureVisitor;
pub use outcounting::OutcountingVisitor;

/// Per-thread rank buffer cap: 16 MiB of u64 ranks.
pub const RANK_BUFFER_CAPACITY: usize = 16 * 1024 * 1024 / 8;

/// Interval lists accumulated by a classifying visitor.
///
/// Each inner list is one worker's (or one drain's) maximal interval list;
/// different inner lists cover disjoint rank blocks but arrive unordered. The
/// writer orders them before persisting.
#[derive(Debug, Default)]
pub struct ClassifiedIntervals {
    pub win_lists: Vec<Vec<Interval>>,
    pub loss_lists: Vec<Vec<Interval>>,
}

impl ClassifiedIntervals {
    pub fn win_count(&self) -> u64 {
        self.win_lists.iter().map(|l| intervals::size(l)).sum()
    }

    pub fn loss_count(&self) -> u64 {
        self.loss_lists.iter().map(|l| intervals::size(l)).sum()
    }
}

pub trait StateVisitor {
    /// Announce a source position. Returning `Ok(false)` skips its expansion
    /// (the matching [`end`] is still delivered).
    ///
    /// [`end`]: StateVisitor::end
    fn begin(&mut self, source: &State) -> Result<bool, SolverError>;

    /// Inspect one successor. `removed` reports what the producing push shoved
    /// off the board, from the mover's pre-swap perspective. Returning
    /// `Ok(false)` stops further expansion of the current source.
    fn accept(&mut self, successor: &State, removed: Removed) -> Result<bool, SolverError>;

    /// Close out the source announced by the last [`begin`].
    ///
    /// [`begin`]: StateVisitor::begin
    fn end(&mut self, source: &State) -> Result<(), SolverError>;
}

/// A visitor that can be split across worker threads.
pub trait ForkableStateVisitor: StateVisitor + Send {
    /// A fresh worker instance sharing this visitor's configuration but none
    /// of its accumulated results.
    fn fork(&self) -> Self
    where
        Self: Sized;

    /// Absorb a populated worker instance.
    fn merge(&mut self, other: Self) -> Result<(), SolverError>
    where
        Self: Sized;
}
