//! Parallel enumeration driver.
//!
//! One OS thread per worker pulls subslice indices from a shared atomic
//! counter (tasks are near-uniform, so work stealing buys nothing), runs each
//! subslice against a private fork of the parent visitor, and merges the fork
//! back into the parent under a single mutex when its task stream runs dry.
//! Merging destroys the global rank order across subslices; whoever persists
//! the aggregated lists must sort them by start first (the writer does).
//!
//! Workers share nothing mutable but the counter and the merge mutex. A
//! worker error stops that worker only; the remaining workers drain the
//! counter, and the first error is returned after all threads have joined.
//! Worker panics propagate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;

use crate::board::Board;
use crate::enumerate;
use crate::error::SolverError;
use crate::rank;
use crate::visitor::ForkableStateVisitor;

/// One worker per logical core.
pub fn default_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Enumerate one slice with `workers` threads, one subslice per task.
pub fn enumerate_slice_threaded<V: ForkableStateVisitor>(
    board: &Board,
    slice: u32,
    parent: &mut V,
    workers: usize,
) -> Result<(), SolverError> {
    let tasks = rank::subslice_count(board);
    run_tasks(workers, tasks, parent, |visitor, subslice| {
        enumerate::for_each_state_in_subslice(board, slice, subslice, visitor)
    })
}

/// Enumerate every slice with `workers` threads. Tasks are (slice, subslice)
/// pairs, dispensed in rank order.
pub fn enumerate_anchored_states_threaded<V: ForkableStateVisitor>(
    board: &Board,
    parent: &mut V,
    workers: usize,
) -> Result<(), SolverError> {
    let per_slice = rank::subslice_count(board);
    let tasks = board.anchorable_squares() as u64 * per_slice;
    run_tasks(workers, tasks, parent, |visitor, task| {
        let slice = (task / per_slice) as u32;
        let subslice = task % per_slice;
        enumerate::for_each_state_in_subslice(board, slice, subslice, visitor)
    })
}

fn run_tasks<V, F>(
    workers: usize,
    task_count: u64,
    parent: &mut V,
    task: F,
) -> Result<(), SolverError>
where
    V: ForkableStateVisitor,
    F: Fn(&mut V, u64) -> Result<(), SolverError> + Sync,
{
    if workers <= 1 {
        for idx in 0..task_count {
            task(parent, idx)?;
        }
        return Ok(());
    }

    let counter = AtomicU64::new(0);
    let parent = Mutex::new(parent);
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(scope.spawn(|| -> Result<(), SolverError> {
                let mut local = lock(&parent).fork();
                loop {
                    let idx = counter.fetch_add(1, Ordering::Relaxed);
                    if idx >= task_count {
                        break;
                    }
                    task(&mut local, idx)?;
                }
                lock(&parent).merge(local)
            }));
        }

        let mut result = Ok(());
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        result
    })
}

/// Poisoning only happens if a worker panicked while merging; that panic is
/// about to be resumed at join, so just take the guard.
fn lock<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
