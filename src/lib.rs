//! # pushfight_solver
//!
//! A retrograde analysis engine for the board game *Push Fight*: every legal
//! anchored position is classified as a forced win, forced loss, or draw for
//! the side to move, generation by generation, into an on-disk interval
//! database.
//!
//! ## Architecture
//!
//! The codebase is structured as layered components:
//!
//! - [`core`]: allocation-free primitives (bit twiddling, the 16-byte
//!   [`core::state::State`]).
//! - [`board`]: immutable geometry built once from raw tables — adjacency,
//!   rail/void edges, placement halves, the 180° rotation map.
//! - [`rank`]: the bijection between legal states and a contiguous integer
//!   range; slices (anchor square) and subslices (first enemy-pusher
//!   combination) are its contiguous blocks and the units of sharding.
//! - [`movegen`] + [`enumerate`]: successor generation under the
//!   move-then-push rules, and rank-ordered enumeration of all starting
//!   positions, both driving a [`visitor`].
//! - [`intervals`] + [`db`]: interval compression of classified rank sets and
//!   the memory-mapped win/loss database built from them.
//! - [`driver`]: the thread pool that fans subslices out over cores and
//!   merges forked visitors deterministically.
//! - [`stopwatch`] + [`manifest`]: per-run resource metrics and the JSON
//!   record each shard leaves beside its output.
//!
//! ## Quick start (one generation-0 slice)
//!
//! ```no_run
//! use pushfight_solver::board::traditional;
//! use pushfight_solver::driver;
//! use pushfight_solver::visitor::InherentValueVisitor;
//!
//! let board = traditional();
//! let mut visitor = InherentValueVisitor::new(&board).unwrap();
//! driver::enumerate_slice_threaded(&board, 0, &mut visitor, 4).unwrap();
//! let results = visitor.into_results();
//! println!("{} wins, {} losses", results.win_count(), results.loss_count());
//! ```

pub mod board;
pub mod core;
pub mod db;
pub mod driver;
pub mod enumerate;
pub mod error;
pub mod intervals;
pub mod manifest;
pub mod movegen;
pub mod rank;
pub mod stopwatch;
pub mod visitor;
