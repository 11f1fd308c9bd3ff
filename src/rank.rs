//! The bijection between legal anchored states and `[0, total_states)`.
//!
//! A rank is a mixed-radix integer built left to right: the anchor square
//! first, then the four piece groups (remaining enemy pushers, enemy pawns,
//! allied pushers, allied pawns), each encoded as the colexicographic index of
//! its combination within the squares still free at that point. PEXT renumbers
//! a group's squares densely under the shrinking free mask, so the encoding
//! matches the enumerator's ascending-mask combination order exactly: within a
//! slice, the enumerator's n-th state has rank n.
//!
//! Slices (anchor square) and subslices (first enemy-pusher combination) are
//! contiguous rank blocks, which is what makes interval compression of the
//! win/loss sets effective.

use crate::board::Board;
use crate::core::bits;
use crate::core::state::State;
use crate::error::SolverError;

pub type Rank = u64;

/// Group sizes in rank order. The anchor itself is the leading digit and is
/// excluded from the first group.
fn group_sizes(board: &Board) -> [u32; 4] {
    [
        board.pushers() - 1,
        board.pawns(),
        board.pushers(),
        board.pawns(),
    ]
}

/// Colexicographic index of a dense k-combination (ascending-mask order).
#[inline]
pub fn combination_index(board: &Board, dense: u32) -> u64 {
    let mut idx = 0u64;
    for (i, sq) in bits::set_bits(dense).enumerate() {
        idx += board.binomial(sq, i as u32 + 1);
    }
    idx
}

/// Inverse of [`combination_index`]: the `idx`-th dense k-combination of
/// `[0, n)` in ascending-mask order.
pub fn combination_from_index(board: &Board, n: u32, k: u32, idx: u64) -> u32 {
    let mut dense = 0u32;
    let mut rem = idx;
    let mut limit = n;
    for j in (1..=k).rev() {
        // Largest c < limit with C(c, j) <= rem.
        let mut c = limit - 1;
        while board.binomial(c, j) > rem {
            c -= 1;
        }
        dense |= 1 << c;
        rem -= board.binomial(c, j);
        limit = c;
    }
    debug_assert_eq!(rem, 0);
    dense
}

/// Rank a legal anchored state. Validates every representation invariant and
/// fails with `InvalidState` rather than producing a colliding rank. Does not
/// allocate.
pub fn rank(board: &Board, state: &State) -> Result<Rank, SolverError> {
    state.validate(board)?;
    let anchor = state.anchored_pieces.trailing_zeros();
    if anchor >= board.anchorable_squares() {
        return Err(SolverError::InvalidState {
            reason: "anchor on a non-anchorable square",
        });
    }

    let groups = [
        state.enemy_pushers & !state.anchored_pieces,
        state.enemy_pawns,
        state.allied_pushers,
        state.allied_pawns,
    ];
    let sizes = group_sizes(board);

    let mut free = board.squares_mask() & !state.anchored_pieces;
    let mut r = anchor as u64;
    for (mask, k) in groups.into_iter().zip(sizes) {
        let n = free.count_ones();
        r = r * board.binomial(n, k) + combination_index(board, bits::pext(mask, free));
        free &= !mask;
    }
    Ok(r)
}

/// Reconstruct the state with the given rank (the inverse of [`rank`]).
pub fn unrank(board: &Board, r: Rank) -> Result<State, SolverError> {
    if r >= total_states(board) {
        return Err(SolverError::InvalidState {
            reason: "rank out of range",
        });
    }

    let sizes = group_sizes(board);

    // Peel the digits off right to left.
    let mut radices = [0u64; 4];
    let mut n = board.squares() - 1;
    for (radix, &k) in radices.iter_mut().zip(&sizes) {
        *radix = board.binomial(n, k);
        n -= k;
    }
    let mut rem = r;
    let mut digits = [0u64; 4];
    for (digit, &radix) in digits.iter_mut().zip(&radices).rev() {
        *digit = rem % radix;
        rem /= radix;
    }
    let anchor = rem as u32;
    debug_assert!(anchor < board.anchorable_squares());

    let mut free = board.squares_mask() & !(1 << anchor);
    let mut masks = [0u32; 4];
    for ((mask, &digit), &k) in masks.iter_mut().zip(&digits).zip(&sizes) {
        let dense = combination_from_index(board, free.count_ones(), k, digit);
        *mask = bits::pdep(dense, free);
        free &= !*mask;
    }

    Ok(State {
        enemy_pushers: (1 << anchor) | masks[0],
        enemy_pawns: masks[1],
        allied_pushers: masks[2],
        allied_pawns: masks[3],
        anchored_pieces: 1 << anchor,
    })
}

/// Number of states sharing one anchor square.
pub fn slice_size(board: &Board) -> u64 {
    let mut n = board.squares() - 1;
    let mut size = 1u64;
    for k in group_sizes(board) {
        size *= board.binomial(n, k);
        n -= k;
    }
    size
}

/// Number of subslices (first enemy-pusher combinations) per slice.
pub fn subslice_count(board: &Board) -> u64 {
    board.binomial(board.squares() - 1, board.pushers() - 1)
}

/// Number of states per subslice.
pub fn subslice_size(board: &Board) -> u64 {
    slice_size(board) / subslice_count(board)
}

/// Size of the whole anchored-state space.
pub fn total_states(board: &Board) -> u64 {
    board.anchorable_squares() as u64 * slice_size(board)
}

/// First rank of a slice.
pub fn slice_start(board: &Board, slice: u32) -> u64 {
    slice as u64 * slice_size(board)
}
