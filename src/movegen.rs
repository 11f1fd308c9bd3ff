//! Successor generation: sliding moves followed by a mandatory push.
//!
//! A turn is `k` sliding moves (any allied pieces, any distance through
//! connected empty space) followed by one push, where `k` must satisfy the
//! board's allowed-moves mask. Expansion recurses over the move count and
//! fires the visitor's `accept` once per produced push successor.
//!
//! Push mechanics: the pusher displaces the contiguous chain of pieces ahead
//! of it by one square. A chain ending against the rail or containing the
//! anchored piece blocks the push; a chain reaching the board edge ejects its
//! last piece into the void. After the push the pusher's new square becomes
//! the anchor, the turn passes (allied and enemy masks swap), and the result
//! is canonicalized: if the anchor landed in the second player's placement
//! half the whole state is rotated 180°, identifying rotation-equivalent
//! positions.

use crate::board::{Board, Dir, Neighbor};
use crate::core::bits::{self, set_bits};
use crate::core::state::{Removed, State};
use crate::error::SolverError;
use crate::visitor::StateVisitor;

/// Empty squares reachable from `source` by any number of orthogonal steps
/// through empty space. The source square itself is excluded.
pub fn connected_empty_space(board: &Board, source: u32, blockers: u32) -> u32 {
    let open = !blockers;
    let mut reach = 1u32 << source;
    loop {
        let mut grown = reach;
        for sq in set_bits(reach) {
            grown |= board.neighbor_mask(sq) & open;
        }
        if grown == reach {
            break;
        }
        reach = grown;
    }
    reach & !(1 << source)
}

/// Expand every successor of `source`, delivering each to `visitor.accept`.
///
/// Calls `visitor.begin(source)` first and `visitor.end(source)` on every exit
/// path, including early stops requested by the visitor and errors.
pub fn for_each_successor<V: StateVisitor + ?Sized>(
    board: &Board,
    source: &State,
    visitor: &mut V,
) -> Result<(), SolverError> {
    if !visitor.begin(source)? {
        return visitor.end(source);
    }
    let mut chain = Vec::with_capacity(board.squares() as usize);
    let expanded = expand(board, source, 0, &mut chain, visitor);
    let ended = visitor.end(source);
    expanded?;
    ended
}

fn expand<V: StateVisitor + ?Sized>(
    board: &Board,
    state: &State,
    move_number: u32,
    chain: &mut Vec<u32>,
    visitor: &mut V,
) -> Result<bool, SolverError> {
    if board.allowed_moves_mask() & (1 << move_number) != 0
        && !all_pushes(board, state, chain, visitor)?
    {
        return Ok(false);
    }

    if move_number < board.max_moves() {
        for from in set_bits(state.allied_pushers) {
            for to in set_bits(connected_empty_space(board, from, state.blockers())) {
                let mut moved = *state;
                bits::move_bit(&mut moved.allied_pushers, from, to);
                if !expand(board, &moved, move_number + 1, chain, visitor)? {
                    return Ok(false);
                }
            }
        }
        for from in set_bits(state.allied_pawns) {
            for to in set_bits(connected_empty_space(board, from, state.blockers())) {
                let mut moved = *state;
                bits::move_bit(&mut moved.allied_pawns, from, to);
                if !expand(board, &moved, move_number + 1, chain, visitor)? {
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

/// Try every (pusher, direction) push of `state`. Returns `Ok(false)` if the
/// visitor asked to stop.
fn all_pushes<V: StateVisitor + ?Sized>(
    board: &Board,
    state: &State,
    chain: &mut Vec<u32>,
    visitor: &mut V,
) -> Result<bool, SolverError> {
    let blockers = state.blockers();
    let pushable = blockers & !state.anchored_pieces;

    for start in set_bits(state.allied_pushers) {
        // A pusher with no unanchored piece beside it cannot push anywhere.
        if board.neighbor_mask(start) & pushable == 0 {
            continue;
        }

        'dirs: for dir in Dir::ALL {
            chain.clear();
            chain.push(start);

            // Walk the chain of displaced pieces. `ejected` is the square
            // whose piece falls into the void, if the chain ends off-board.
            let mut ejected = None;
            loop {
                let cur = *chain.last().ok_or(SolverError::InvalidState {
                    reason: "push chain empty",
                })?;
                let cur_bit = 1u32 << cur;
                if board.adjacent_to_void(dir) & cur_bit != 0 {
                    if chain.len() < 2 {
                        // The pusher itself is at the edge; there is nothing
                        // in front of it to push.
                        continue 'dirs;
                    }
                    ejected = Some(cur);
                    break;
                }
                if board.adjacent_to_rail(dir) & cur_bit != 0 {
                    continue 'dirs;
                }
                let next = match board.neighbor(cur, dir) {
                    Neighbor::Square(n) => n,
                    // Void and rail edges were handled above.
                    Neighbor::Void | Neighbor::Rail => continue 'dirs,
                };
                if state.anchored_pieces & (1 << next) != 0 {
                    continue 'dirs;
                }
                chain.push(next);
                if blockers & (1 << next) == 0 {
                    if chain.len() == 2 {
                        // Pusher sliding into empty space is a move, not a
                        // push.
                        continue 'dirs;
                    }
                    break;
                }
            }

            let mut successor = *state;
            let removed = match ejected {
                Some(sq) => successor.remove_piece(sq)?,
                None => Removed::None,
            };
            for i in (0..chain.len() - 1).rev() {
                successor.move_piece(chain[i], chain[i + 1])?;
            }
            successor.anchored_pieces = 1 << chain[1];
            let mut successor = successor.swap_sides();
            if successor.anchored_pieces & board.placement_second_mask() != 0 {
                successor = board.rotate_state(&successor);
            }

            if !visitor.accept(&successor, removed)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
