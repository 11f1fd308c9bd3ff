//! Generation 0: inherent wins and losses.

use crate::board::Board;
use crate::core::state::{Removed, State};
use crate::error::SolverError;
use crate::intervals::IntervalAccumulator;
use crate::rank;
use crate::visitor::{
    ClassifiedIntervals, ForkableStateVisitor, StateVisitor, RANK_BUFFER_CAPACITY,
};

/// Classifies each source by its immediate push menu alone.
///
/// A source is an *inherent win* if some push ejects an enemy piece, and an
/// *inherent loss* if every push ejects one of its own pieces (no
/// non-suicidal option exists). A source that is both — every push ejects a
/// piece, at least one of them an enemy — counts as a win: ejecting the enemy
/// piece ends the game on the spot. A source with no pushes at all counts as
/// a loss; with a zero-move turn legal this requires a position with no legal
/// push in any move sequence, which the traditional board does not produce.
pub struct InherentValueVisitor<'a> {
    board: &'a Board,
    buffer_capacity: usize,
    win_acc: IntervalAccumulator,
    loss_acc: IntervalAccumulator,
    results: ClassifiedIntervals,
    visited: u64,
    source_rank: u64,
    is_win: bool,
    is_loss: bool,
}

impl<'a> InherentValueVisitor<'a> {
    pub fn new(board: &'a Board) -> Result<InherentValueVisitor<'a>, SolverError> {
        Self::with_buffer_capacity(board, RANK_BUFFER_CAPACITY)
    }

    pub fn with_buffer_capacity(
        board: &'a Board,
        buffer_capacity: usize,
    ) -> Result<InherentValueVisitor<'a>, SolverError> {
        Ok(InherentValueVisitor {
            board,
            buffer_capacity,
            win_acc: IntervalAccumulator::new(buffer_capacity)?,
            loss_acc: IntervalAccumulator::new(buffer_capacity)?,
            results: ClassifiedIntervals::default(),
            visited: 0,
            source_rank: 0,
            is_win: false,
            is_loss: false,
        })
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

    /// Finish the streaming accumulators and hand over the interval lists.
    pub fn into_results(mut self) -> ClassifiedIntervals {
        let wins = self.win_acc.finish();
        if !wins.is_empty() {
            self.results.win_lists.push(wins);
        }
        let losses = self.loss_acc.finish();
        if !losses.is_empty() {
            self.results.loss_lists.push(losses);
        }
        self.results
    }
}

impl StateVisitor for InherentValueVisitor<'_> {
    fn begin(&mut self, source: &State) -> Result<bool, SolverError> {
        self.source_rank = rank::rank(self.board, source)?;
        self.is_win = false;
        self.is_loss = true;
        Ok(true)
    }

    fn accept(&mut self, _successor: &State, removed: Removed) -> Result<bool, SolverError> {
        match removed {
            Removed::EnemyPusher | Removed::EnemyPawn => {
                self.is_win = true;
                self.is_loss = false;
                // The classification cannot change any more.
                return Ok(false);
            }
            Removed::AlliedPusher | Removed::AlliedPawn => {}
            Removed::None => self.is_loss = false,
        }
        Ok(true)
    }

    fn end(&mut self, _source: &State) -> Result<(), SolverError> {
        self.visited += 1;
        if self.is_win {
            self.win_acc.push(self.source_rank);
        } else if self.is_loss {
            self.loss_acc.push(self.source_rank);
        }
        Ok(())
    }
}

impl ForkableStateVisitor for InherentValueVisitor<'_> {
    fn fork(&self) -> Self {
        // Buffer capacity was validated when self was built.
        InherentValueVisitor::with_buffer_capacity(self.board, self.buffer_capacity)
            .unwrap_or_else(|_| unreachable!("fork of a validated visitor"))
    }

    fn merge(&mut self, other: Self) -> Result<(), SolverError> {
        let visited = other.visited;
        let mut results = other.into_results();
        self.visited += visited;
        self.results.win_lists.append(&mut results.win_lists);
        self.results.loss_lists.append(&mut results.loss_lists);
        Ok(())
    }
}
