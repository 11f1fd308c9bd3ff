use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use pushfight_solver::board::{mini, Board};
use pushfight_solver::core::state::Removed;
use pushfight_solver::db::{files, writer, Value, WinLossDatabase};
use pushfight_solver::enumerate;
use pushfight_solver::intervals::{self, Interval};
use pushfight_solver::rank;
use pushfight_solver::visitor::{
    ClassifiedIntervals, CompositeValueVisitor, InherentValueVisitor, OpeningProcedureVisitor,
    OutcountingVisitor, StateVisitor,
};

fn unique_temp_dir(name: &str) -> PathBuf {
    let base = std::env::temp_dir()
        .join("pushfight_solver_tests")
        .join(name);
    let _ = fs::create_dir_all(&base);

    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    for i in 0..1000u32 {
        let p = base.join(format!("{pid}-{nanos}-{i}"));
        if fs::create_dir(&p).is_ok() {
            return p;
        }
    }

    panic!("failed to create a unique temp dir under {}", base.display());
}

/// Flatten a visitor's interval lists into one maximal list.
fn normalize(lists: &[Vec<Interval>]) -> Vec<Interval> {
    let mut all: Vec<Interval> = lists.iter().flatten().copied().collect();
    all.sort_unstable();
    intervals::coalesce(&all)
}

fn write_generation(dir: &Path, gen: u32, results: ClassifiedIntervals) {
    let (wins, losses) = (results.win_lists, results.loss_lists);
    let (s, l) = files::aggregate_paths(dir, gen, Value::Win);
    writer::write_interval_files(wins, &s, &l).unwrap();
    let (s, l) = files::aggregate_paths(dir, gen, Value::Loss);
    writer::write_interval_files(losses, &s, &l).unwrap();
}

fn compute_generation(board: &Board, dir: &Path, gen: u32) -> ClassifiedIntervals {
    if gen == 0 {
        let mut visitor = InherentValueVisitor::new(board).unwrap();
        enumerate::enumerate_anchored_states(board, &mut visitor).unwrap();
        visitor.into_results()
    } else {
        let db = files::open_through_generation(dir, gen).unwrap();
        let mut visitor = OutcountingVisitor::new(board, &db).unwrap();
        enumerate::enumerate_anchored_states(board, &mut visitor).unwrap();
        visitor.into_results()
    }
}

/// Solve the mini board to the fixpoint, leaving aggregated files in `dir`.
/// Returns the per-generation (win, loss) interval lists.
fn solve_mini(dir: &Path) -> Vec<(Vec<Interval>, Vec<Interval>)> {
    let board = mini();
    let mut generations = Vec::new();
    for gen in 0..64 {
        let results = compute_generation(&board, dir, gen);
        let wins = normalize(&results.win_lists);
        let losses = normalize(&results.loss_lists);
        let done = wins.is_empty() && losses.is_empty();
        write_generation(dir, gen, results);
        generations.push((wins, losses));
        if done {
            return generations;
        }
    }
    panic!("mini board did not converge within 64 generations");
}

#[test]
fn outcounting_against_a_synthetic_database() {
    let dir = unique_temp_dir("synthetic");
    let board = mini();

    // Ranks {0, 5, 10} are losses, {1..5, 6..10} wins, the rest unknown.
    let (s, l) = files::aggregate_paths(&dir, 0, Value::Win);
    writer::write_interval_files(vec![vec![(1, 5), (6, 10)]], &s, &l).unwrap();
    let (s, l) = files::aggregate_paths(&dir, 0, Value::Loss);
    writer::write_interval_files(vec![vec![(0, 1), (5, 6), (10, 11)]], &s, &l).unwrap();
    let db = files::open_through_generation(&dir, 1).unwrap();

    let mut visitor = OutcountingVisitor::new(&board, &db).unwrap();
    let feed = |visitor: &mut OutcountingVisitor, source: u64, successors: &[u64]| {
        let source = rank::unrank(&board, source).unwrap();
        assert!(visitor.begin(&source).unwrap());
        for &succ in successors {
            let succ = rank::unrank(&board, succ).unwrap();
            assert!(visitor.accept(&succ, Removed::None).unwrap());
        }
        visitor.end(&source).unwrap();
    };

    // One successor is a loss: the source is a new win.
    feed(&mut visitor, 20, &[5, 7]);
    // Every successor is a win: the source is a new loss.
    feed(&mut visitor, 21, &[6, 7]);
    // An unknown successor keeps the source undecided.
    feed(&mut visitor, 22, &[11, 7]);

    let results = visitor.into_results();
    assert_eq!(normalize(&results.win_lists), vec![(20, 21)]);
    assert_eq!(normalize(&results.loss_lists), vec![(21, 22)]);
}

#[test]
fn outcounting_skips_classified_sources() {
    let dir = unique_temp_dir("skip_classified");
    let board = mini();
    let (s, l) = files::aggregate_paths(&dir, 0, Value::Win);
    writer::write_interval_files(vec![vec![(20, 21)]], &s, &l).unwrap();
    let (s, l) = files::aggregate_paths(&dir, 0, Value::Loss);
    writer::write_interval_files(vec![], &s, &l).unwrap();
    let db = files::open_through_generation(&dir, 1).unwrap();

    let mut visitor = OutcountingVisitor::new(&board, &db).unwrap();
    let classified = rank::unrank(&board, 20).unwrap();
    assert!(!visitor.begin(&classified).unwrap());
}

#[test]
fn mini_board_solves_to_a_fixpoint() {
    let dir = unique_temp_dir("solve_mini");
    let generations = solve_mini(&dir);
    let board = mini();

    // Generation 0 finds inherent wins and losses.
    let (gen0_wins, gen0_losses) = &generations[0];
    assert!(intervals::size(gen0_wins) > 0);
    assert!(intervals::size(gen0_losses) > 0);
    // The last generation is the empty fixpoint; at least one retrograde
    // generation classified something.
    assert!(generations.len() >= 3);

    // Generations are pairwise disjoint: nothing is ever reclassified.
    let mut all: Vec<Vec<Interval>> = Vec::new();
    for (wins, losses) in &generations {
        all.push(wins.clone());
        all.push(losses.clone());
    }
    for i in 0..all.len() {
        for j in i + 1..all.len() {
            assert!(
                intervals::intersection(&all[i], &all[j]).is_empty(),
                "generation lists {i} and {j} overlap"
            );
        }
    }

    // Everything classified lies within the rank space; draws remain.
    let classified: u64 = all.iter().map(|list| intervals::size(list)).sum();
    assert!(classified <= rank::total_states(&board));
}

#[test]
fn outcounting_matches_one_ply_composite_classification() {
    let dir = unique_temp_dir("composite_cross_check");
    let board = mini();

    // Generation 0 on disk, then classify generation 1 both ways.
    let results = compute_generation(&board, &dir, 0);
    write_generation(&dir, 0, results);
    let db = files::open_through_generation(&dir, 1).unwrap();

    let mut outcounting = OutcountingVisitor::new(&board, &db).unwrap();
    enumerate::enumerate_anchored_states(&board, &mut outcounting).unwrap();
    let by_outcount = outcounting.into_results();

    let mut composite = CompositeValueVisitor::new(&board, &db).unwrap();
    enumerate::enumerate_anchored_states(&board, &mut composite).unwrap();
    let by_lookup = composite.into_results();

    assert_eq!(
        normalize(&by_outcount.win_lists),
        normalize(&by_lookup.win_lists)
    );
    assert_eq!(
        normalize(&by_outcount.loss_lists),
        normalize(&by_lookup.loss_lists)
    );
}

#[test]
fn retrograde_wins_have_a_losing_successor() {
    let dir = unique_temp_dir("retrograde_law");
    let generations = solve_mini(&dir);
    let board = mini();
    let gen_count = generations.len() as u32;

    // Rebuild the database over all prior generations and spot-check the
    // defining property of generation 1 wins and losses.
    let db = files::open_through_generation(&dir, 1).unwrap();
    let (gen1_wins, gen1_losses) = &generations[1];

    struct Checker<'a> {
        board: &'a Board,
        db: &'a WinLossDatabase,
        has_losing: bool,
        all_winning: bool,
    }
    impl StateVisitor for Checker<'_> {
        fn begin(
            &mut self,
            _: &pushfight_solver::core::state::State,
        ) -> Result<bool, pushfight_solver::error::SolverError> {
            self.has_losing = false;
            self.all_winning = true;
            Ok(true)
        }
        fn accept(
            &mut self,
            successor: &pushfight_solver::core::state::State,
            removed: Removed,
        ) -> Result<bool, pushfight_solver::error::SolverError> {
            if removed == Removed::None {
                match self.db.query(rank::rank(self.board, successor)?) {
                    pushfight_solver::db::Outcome::Loss => self.has_losing = true,
                    pushfight_solver::db::Outcome::Win => {}
                    pushfight_solver::db::Outcome::Unknown => self.all_winning = false,
                }
            }
            Ok(true)
        }
        fn end(
            &mut self,
            _: &pushfight_solver::core::state::State,
        ) -> Result<(), pushfight_solver::error::SolverError> {
            Ok(())
        }
    }

    let mut checker = Checker {
        board: &board,
        db: &db,
        has_losing: false,
        all_winning: true,
    };
    let spot_check = |checker: &mut Checker, list: &[Interval], expect_losing: bool| {
        for &(a, b) in list.iter().take(5) {
            for r in a..b.min(a + 3) {
                let source = rank::unrank(&board, r).unwrap();
                pushfight_solver::movegen::for_each_successor(&board, &source, checker).unwrap();
                if expect_losing {
                    assert!(checker.has_losing, "win rank {r} has no losing successor");
                } else {
                    assert!(checker.all_winning, "loss rank {r} has a non-won successor");
                }
            }
        }
    };
    spot_check(&mut checker, gen1_wins, true);
    spot_check(&mut checker, gen1_losses, false);
    assert!(gen_count >= 2);
}

#[test]
fn opening_classification_against_the_solved_database() {
    let dir = unique_temp_dir("openings_solved");
    let generations = solve_mini(&dir);
    let board = mini();
    let db = files::open_through_generation(&dir, generations.len() as u32).unwrap();

    let mut visitor = OpeningProcedureVisitor::new(&board, &db);
    enumerate::for_each_opening_state(&board, &mut visitor).unwrap();

    // 2 pushers + 1 pawn per side in a 4-square half: C(4,2) * C(2,1) = 12
    // placements each.
    assert_eq!(visitor.visited(), 144);
    assert_eq!(
        visitor.won.len() + visitor.lost.len() + visitor.drawn.len(),
        144
    );
    // A second run is deterministic.
    let mut again = OpeningProcedureVisitor::new(&board, &db);
    enumerate::for_each_opening_state(&board, &mut again).unwrap();
    assert_eq!(again.won, visitor.won);
    assert_eq!(again.lost, visitor.lost);
    assert_eq!(again.drawn, visitor.drawn);
}
