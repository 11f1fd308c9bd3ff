//! One-ply classification against a dense database.

use crate::board::Board;
use crate::core::state::{Removed, State};
use crate::db::{Outcome, WinLossDatabase};
use crate::error::SolverError;
use crate::intervals::IntervalAccumulator;
use crate::rank;
use crate::visitor::{
    ClassifiedIntervals, ForkableStateVisitor, StateVisitor, RANK_BUFFER_CAPACITY,
};

/// Classifies a source by looking every successor up in the database: a win
/// if any successor is a loss, a loss if every successor is a win, otherwise
/// undecided (drawn or deeper than the database).
///
/// This is the simpler alternative to outcounting, usable once the database
/// is dense enough that one-ply lookups decide everything of interest; the
/// opening procedure classifies the same way.
pub struct CompositeValueVisitor<'a> {
    board: &'a Board,
    db: &'a WinLossDatabase,
    buffer_capacity: usize,
    win_acc: IntervalAccumulator,
    loss_acc: IntervalAccumulator,
    results: ClassifiedIntervals,
    visited: u64,
    source_rank: u64,
    is_win: bool,
    all_win: bool,
}

impl<'a> CompositeValueVisitor<'a> {
    pub fn new(
        board: &'a Board,
        db: &'a WinLossDatabase,
    ) -> Result<CompositeValueVisitor<'a>, SolverError> {
        Self::with_buffer_capacity(board, db, RANK_BUFFER_CAPACITY)
    }

    pub fn with_buffer_capacity(
        board: &'a Board,
        db: &'a WinLossDatabase,
        buffer_capacity: usize,
    ) -> Result<CompositeValueVisitor<'a>, SolverError> {
        Ok(CompositeValueVisitor {
            board,
            db,
            buffer_capacity,
            win_acc: IntervalAccumulator::new(buffer_capacity)?,
            loss_acc: IntervalAccumulator::new(buffer_capacity)?,
            results: ClassifiedIntervals::default(),
            visited: 0,
            source_rank: 0,
            is_win: false,
            all_win: true,
        })
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

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

impl StateVisitor for CompositeValueVisitor<'_> {
    fn begin(&mut self, source: &State) -> Result<bool, SolverError> {
        let r = rank::rank(self.board, source)?;
        if self.db.query(r) != Outcome::Unknown {
            return Ok(false);
        }
        self.source_rank = r;
        self.is_win = false;
        self.all_win = true;
        Ok(true)
    }

    fn accept(&mut self, successor: &State, removed: Removed) -> Result<bool, SolverError> {
        match removed {
            Removed::EnemyPusher | Removed::EnemyPawn => {
                self.is_win = true;
                Ok(false)
            }
            // Ejecting one's own piece is an immediate self-loss, never the
            // best reply; it does not figure into either bound.
            Removed::AlliedPusher | Removed::AlliedPawn => Ok(true),
            Removed::None => match self.db.query(rank::rank(self.board, successor)?) {
                Outcome::Loss => {
                    self.is_win = true;
                    Ok(false)
                }
                Outcome::Win => Ok(true),
                Outcome::Unknown => {
                    self.all_win = false;
                    Ok(true)
                }
            },
        }
    }

    fn end(&mut self, _source: &State) -> Result<(), SolverError> {
        self.visited += 1;
        if self.is_win {
            self.win_acc.push(self.source_rank);
        } else if self.all_win {
            self.loss_acc.push(self.source_rank);
        }
        Ok(())
    }
}

impl ForkableStateVisitor for CompositeValueVisitor<'_> {
    fn fork(&self) -> Self {
        CompositeValueVisitor::with_buffer_capacity(self.board, self.db, self.buffer_capacity)
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
