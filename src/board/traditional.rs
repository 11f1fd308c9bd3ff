//! The traditional Push Fight board.
//!
//! 26 squares in four rows: the two outer rows are five squares long and run
//! under the side rails, the two middle rows are eight squares long and open
//! onto the void at both ends. The shape is 180°-rotationally symmetric (not
//! mirror symmetric; the outer rows are offset by one column).
//!
//! Numbering puts the first player's placement half (columns 0–3) first.
//! After a push the anchor is canonicalized out of the second player's half,
//! so exactly these 13 squares can carry an anchor, and the rank bijection
//! keys its leading digit on them:
//!
//! ```text
//! rail        0  1 13 14 15
//!       2  3  4  5 16 17 18 19
//!       6  7  8  9 20 21 22 23
//! rail    10 11 12 24 25
//! ```
//!
//! Under this numbering the 180° rotation is simply `i -> 25 - i`.
//!
//! Each side fields 2 pushers and 3 pawns, placed on its own half; a turn is
//! 0, 1 or 2 moves followed by a mandatory push.

use crate::board::Neighbor::{Rail as R, Void as V};
use crate::board::{Board, BoardTables, Neighbor};

const fn s(i: u32) -> Neighbor {
    Neighbor::Square(i)
}

/// Per-square neighbors in [left, up, right, down] order.
#[rustfmt::skip]
static TOPOLOGY: [[Neighbor; 4]; 26] = [
    [V,     R,     s(1),  s(4)],  // 0
    [s(0),  R,     s(13), s(5)],  // 1
    [V,     R,     s(3),  s(6)],  // 2
    [s(2),  R,     s(4),  s(7)],  // 3
    [s(3),  s(0),  s(5),  s(8)],  // 4
    [s(4),  s(1),  s(16), s(9)],  // 5
    [V,     s(2),  s(7),  R],     // 6
    [s(6),  s(3),  s(8),  s(10)], // 7
    [s(7),  s(4),  s(9),  s(11)], // 8
    [s(8),  s(5),  s(20), s(12)], // 9
    [V,     s(7),  s(11), R],     // 10
    [s(10), s(8),  s(12), R],     // 11
    [s(11), s(9),  s(24), R],     // 12
    [s(1),  R,     s(14), s(16)], // 13
    [s(13), R,     s(15), s(17)], // 14
    [s(14), R,     V,     s(18)], // 15
    [s(5),  s(13), s(17), s(20)], // 16
    [s(16), s(14), s(18), s(21)], // 17
    [s(17), s(15), s(19), s(22)], // 18
    [s(18), R,     V,     s(23)], // 19
    [s(9),  s(16), s(21), s(24)], // 20
    [s(20), s(17), s(22), s(25)], // 21
    [s(21), s(18), s(23), R],     // 22
    [s(22), s(19), V,     R],     // 23
    [s(12), s(20), s(25), R],     // 24
    [s(24), s(21), V,     R],     // 25
];

/// (row, column) of each square; used once to derive the 180° rotation map.
#[rustfmt::skip]
static SQUARE_TO_COORD: [(u32, u32); 26] = [
    (0, 2), (0, 3),
    (1, 0), (1, 1), (1, 2), (1, 3),
    (2, 0), (2, 1), (2, 2), (2, 3),
    (3, 1), (3, 2), (3, 3),
    (0, 4), (0, 5), (0, 6),
    (1, 4), (1, 5), (1, 6), (1, 7),
    (2, 4), (2, 5), (2, 6), (2, 7),
    (3, 4), (3, 5),
];

static PLACEMENT_FIRST: [u32; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
static PLACEMENT_SECOND: [u32; 13] = [13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25];

static ALLOWED_MOVES: [u32; 3] = [0, 1, 2];

pub static TRADITIONAL_TABLES: BoardTables = BoardTables {
    name: "traditional",
    squares: 26,
    anchorable_squares: 13,
    pushers: 2,
    pawns: 3,
    topology: &TOPOLOGY,
    square_to_coord: &SQUARE_TO_COORD,
    placement_first: &PLACEMENT_FIRST,
    placement_second: &PLACEMENT_SECOND,
    allowed_moves: &ALLOWED_MOVES,
};

/// Build the traditional board.
pub fn traditional() -> Board {
    Board::new(&TRADITIONAL_TABLES)
}
