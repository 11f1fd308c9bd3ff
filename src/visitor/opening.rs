//! Classification of opening placements.

use crate::board::Board;
use crate::core::state::{Removed, State};
use crate::db::{Outcome, WinLossDatabase};
use crate::error::SolverError;
use crate::rank;
use crate::visitor::{ForkableStateVisitor, StateVisitor};

/// Sorts legal opening positions into won / lost / drawn buckets by looking
/// their successors up in a finished database.
///
/// Opening positions carry no anchor and therefore no rank; the sources
/// themselves are collected, not rank intervals. Successors are ordinary
/// anchored states and classify exactly as in
/// [`CompositeValueVisitor`](crate::visitor::CompositeValueVisitor): any
/// losing successor makes the opening won, all-winning successors make it
/// lost, anything else leaves it drawn (or undecided by the database, which
/// for a complete run is the same thing).
pub struct OpeningProcedureVisitor<'a> {
    board: &'a Board,
    db: &'a WinLossDatabase,
    pub won: Vec<State>,
    pub lost: Vec<State>,
    pub drawn: Vec<State>,
    current: Option<State>,
    is_win: bool,
    all_win: bool,
}

impl<'a> OpeningProcedureVisitor<'a> {
    pub fn new(board: &'a Board, db: &'a WinLossDatabase) -> OpeningProcedureVisitor<'a> {
        OpeningProcedureVisitor {
            board,
            db,
            won: Vec::new(),
            lost: Vec::new(),
            drawn: Vec::new(),
            current: None,
            is_win: false,
            all_win: true,
        }
    }

    pub fn visited(&self) -> usize {
        self.won.len() + self.lost.len() + self.drawn.len()
    }
}

impl StateVisitor for OpeningProcedureVisitor<'_> {
    fn begin(&mut self, source: &State) -> Result<bool, SolverError> {
        self.current = Some(*source);
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

    fn end(&mut self, source: &State) -> Result<(), SolverError> {
        let state = self.current.take().unwrap_or(*source);
        if self.is_win {
            self.won.push(state);
        } else if self.all_win {
            self.lost.push(state);
        } else {
            self.drawn.push(state);
        }
        Ok(())
    }
}

impl ForkableStateVisitor for OpeningProcedureVisitor<'_> {
    fn fork(&self) -> Self {
        OpeningProcedureVisitor::new(self.board, self.db)
    }

    fn merge(&mut self, other: Self) -> Result<(), SolverError> {
        self.won.extend(other.won);
        self.lost.extend(other.lost);
        self.drawn.extend(other.drawn);
        Ok(())
    }
}
