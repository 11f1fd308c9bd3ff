//! Generations ≥ 1: predecessor outcounting against the database.

use rustc_hash::FxHashMap;

use crate::board::Board;
use crate::core::state::{Removed, State};
use crate::db::{Outcome, WinLossDatabase};
use crate::error::SolverError;
use crate::intervals::IntervalAccumulator;
use crate::rank;
use crate::visitor::{
    ClassifiedIntervals, ForkableStateVisitor, StateVisitor, RANK_BUFFER_CAPACITY,
};

/// Pair buffer cap: 64 Mi entries, about 1 GiB per worker.
pub const PAIR_BUFFER_CAPACITY: usize = 64 * 1024 * 1024;

/// Early-flush slack: a conservative upper bound on one source's successor
/// count, so a single source never overruns the committed buffer.
const FLUSH_MARGIN: usize = 25_000;

/// Classifies unclassified sources by counting undecided successors.
///
/// For each source the database does not already classify, the visitor
/// records the source's successor count and emits one `(successor, source)`
/// pair per distinct successor. Pushes that eject one of the mover's own
/// pieces are immediate self-losses and are not successors; pushes that eject
/// an enemy piece cannot occur here, because such a source is an inherent win
/// and was filtered by the database check.
///
/// When the buffer fills it is sorted by successor, and each distinct
/// successor is looked up once: a LOSS successor makes every paired source a
/// new win; a WIN successor decrements each paired source's outcount; an
/// unknown successor is skipped. A source whose outcount reaches zero had
/// every successor already won for the opponent, so it is a new loss.
pub struct OutcountingVisitor<'a> {
    board: &'a Board,
    db: &'a WinLossDatabase,
    pair_capacity: usize,
    buffer_capacity: usize,
    pairs: Vec<(u64, u64)>,
    outcounts: FxHashMap<u64, u16>,
    successors: Vec<u64>,
    win_acc: IntervalAccumulator,
    loss_acc: IntervalAccumulator,
    results: ClassifiedIntervals,
    visited: u64,
    source_rank: u64,
}

impl<'a> OutcountingVisitor<'a> {
    pub fn new(
        board: &'a Board,
        db: &'a WinLossDatabase,
    ) -> Result<OutcountingVisitor<'a>, SolverError> {
        Self::with_capacities(board, db, PAIR_BUFFER_CAPACITY, RANK_BUFFER_CAPACITY)
    }

    pub fn with_capacities(
        board: &'a Board,
        db: &'a WinLossDatabase,
        pair_capacity: usize,
        buffer_capacity: usize,
    ) -> Result<OutcountingVisitor<'a>, SolverError> {
        Ok(OutcountingVisitor {
            board,
            db,
            pair_capacity,
            buffer_capacity,
            pairs: Vec::new(),
            outcounts: FxHashMap::default(),
            successors: Vec::new(),
            win_acc: IntervalAccumulator::new(buffer_capacity)?,
            loss_acc: IntervalAccumulator::new(buffer_capacity)?,
            results: ClassifiedIntervals::default(),
            visited: 0,
            source_rank: 0,
        })
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

    /// Sort the pair buffer by successor and resolve each distinct successor
    /// with one database query.
    fn flush(&mut self) {
        if self.pairs.is_empty() {
            return;
        }
        self.pairs.sort_unstable();
        let mut i = 0;
        while i < self.pairs.len() {
            let successor = self.pairs[i].0;
            let end = run_end(&self.pairs, i);
            match self.db.query(successor) {
                Outcome::Loss => {
                    for &(_, source) in &self.pairs[i..end] {
                        self.win_acc.push(source);
                    }
                }
                Outcome::Win => {
                    for &(_, source) in &self.pairs[i..end] {
                        if let Some(count) = self.outcounts.get_mut(&source) {
                            *count -= 1;
                        }
                    }
                }
                Outcome::Unknown => {}
            }
            i = end;
        }
        self.pairs.clear();
    }

    /// Flush the remaining pairs and turn exhausted outcounts into losses.
    fn resolve(&mut self) {
        self.flush();
        for (&source, &count) in &self.outcounts {
            if count == 0 {
                self.loss_acc.push(source);
            }
        }
        self.outcounts.clear();
    }

    pub fn into_results(mut self) -> ClassifiedIntervals {
        self.resolve();
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

/// End of the run of pairs sharing `pairs[start].0`: a short linear probe,
/// then galloping + binary search for long runs.
fn run_end(pairs: &[(u64, u64)], start: usize) -> usize {
    let key = pairs[start].0;
    let linear_limit = (start + 32).min(pairs.len());
    let mut i = start + 1;
    while i < linear_limit {
        if pairs[i].0 != key {
            return i;
        }
        i += 1;
    }
    if i == pairs.len() || pairs[i].0 != key {
        return i;
    }

    let mut lo = i;
    let mut step = 32usize;
    let mut hi = loop {
        let probe = lo + step;
        if probe >= pairs.len() {
            break pairs.len();
        }
        if pairs[probe].0 != key {
            break probe;
        }
        lo = probe;
        step *= 2;
    };
    // pairs[lo].0 == key, pairs[hi].0 != key (or hi == len).
    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        if pairs[mid].0 == key {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

impl StateVisitor for OutcountingVisitor<'_> {
    fn begin(&mut self, source: &State) -> Result<bool, SolverError> {
        let r = rank::rank(self.board, source)?;
        if self.db.query(r) != Outcome::Unknown {
            return Ok(false);
        }
        if self.pairs.len() + FLUSH_MARGIN > self.pair_capacity {
            self.flush();
        }
        self.source_rank = r;
        self.successors.clear();
        Ok(true)
    }

    fn accept(&mut self, successor: &State, removed: Removed) -> Result<bool, SolverError> {
        if removed == Removed::None {
            self.successors.push(rank::rank(self.board, successor)?);
        }
        Ok(true)
    }

    fn end(&mut self, _source: &State) -> Result<(), SolverError> {
        self.successors.sort_unstable();
        self.successors.dedup();
        if self.successors.len() > u16::MAX as usize {
            return Err(SolverError::Overflow {
                rank: self.source_rank,
                successors: self.successors.len(),
            });
        }
        self.outcounts
            .insert(self.source_rank, self.successors.len() as u16);
        for &successor in &self.successors {
            self.pairs.push((successor, self.source_rank));
        }
        self.visited += 1;
        Ok(())
    }
}

impl ForkableStateVisitor for OutcountingVisitor<'_> {
    fn fork(&self) -> Self {
        OutcountingVisitor::with_capacities(
            self.board,
            self.db,
            self.pair_capacity,
            self.buffer_capacity,
        )
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
