//! A scaled-down demo board.
//!
//! Two rows of four squares, rails along both long sides, void at both ends,
//! two pushers and one pawn per side, at most one move before the push:
//!
//! ```text
//! rail  0 1 2 3
//!       4 5 6 7  rail
//! ```
//!
//! Every square is rail-adjacent and so anchorable. The whole anchored state
//! space is 10 080 positions, small enough to enumerate exhaustively; the
//! integration tests solve it end to end.

use crate::board::Neighbor::{Rail as R, Void as V};
use crate::board::{Board, BoardTables, Neighbor};

const fn s(i: u32) -> Neighbor {
    Neighbor::Square(i)
}

#[rustfmt::skip]
static TOPOLOGY: [[Neighbor; 4]; 8] = [
    [V,    R,    s(1), s(4)], // 0
    [s(0), R,    s(2), s(5)], // 1
    [s(1), R,    s(3), s(6)], // 2
    [s(2), R,    V,    s(7)], // 3
    [V,    s(0), s(5), R],    // 4
    [s(4), s(1), s(6), R],    // 5
    [s(5), s(2), s(7), R],    // 6
    [s(6), s(3), V,    R],    // 7
];

#[rustfmt::skip]
static SQUARE_TO_COORD: [(u32, u32); 8] = [
    (0, 0), (0, 1), (0, 2), (0, 3),
    (1, 0), (1, 1), (1, 2), (1, 3),
];

static PLACEMENT_FIRST: [u32; 4] = [0, 1, 4, 5];
static PLACEMENT_SECOND: [u32; 4] = [2, 3, 6, 7];

static ALLOWED_MOVES: [u32; 2] = [0, 1];

pub static MINI_TABLES: BoardTables = BoardTables {
    name: "mini",
    squares: 8,
    anchorable_squares: 8,
    pushers: 2,
    pawns: 1,
    topology: &TOPOLOGY,
    square_to_coord: &SQUARE_TO_COORD,
    placement_first: &PLACEMENT_FIRST,
    placement_second: &PLACEMENT_SECOND,
    allowed_moves: &ALLOWED_MOVES,
};

/// Build the demo board.
pub fn mini() -> Board {
    Board::new(&MINI_TABLES)
}
