//! The 16-byte position representation.

use crate::board::Board;
use crate::core::bits;
use crate::error::SolverError;

/// A Push Fight position from the perspective of the side to move.
///
/// Each mask has one bit per board square. "Allied" pieces belong to the side
/// to move; "enemy" pieces to the opponent. `anchored_pieces` marks squares
/// immune to being pushed, normally exactly the enemy pusher that made the
/// previous push (it is empty only for opening positions, where nobody has
/// pushed yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    pub enemy_pushers: u32,
    pub enemy_pawns: u32,
    pub allied_pushers: u32,
    pub allied_pawns: u32,
    pub anchored_pieces: u32,
}

/// What a push shoved off the board, from the pushing side's perspective
/// *before* the turn swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removed {
    /// The push ended on an empty square; nothing left the board.
    None,
    AlliedPusher,
    AlliedPawn,
    EnemyPusher,
    EnemyPawn,
}

impl Removed {
    pub fn is_enemy(self) -> bool {
        matches!(self, Removed::EnemyPusher | Removed::EnemyPawn)
    }

    pub fn is_allied(self) -> bool {
        matches!(self, Removed::AlliedPusher | Removed::AlliedPawn)
    }

    /// The single-character notation used in dumps: uppercase = pusher,
    /// lowercase = pawn, `A`/`a` allied, `E`/`e` enemy, space = nothing.
    pub fn as_char(self) -> char {
        match self {
            Removed::None => ' ',
            Removed::AlliedPusher => 'A',
            Removed::AlliedPawn => 'a',
            Removed::EnemyPusher => 'E',
            Removed::EnemyPawn => 'e',
        }
    }
}

impl State {
    /// Union of all occupancy masks: the squares a sliding piece cannot cross.
    #[inline]
    pub fn blockers(&self) -> u32 {
        self.enemy_pushers | self.enemy_pawns | self.allied_pushers | self.allied_pawns
    }

    /// The same position seen by the other player. `anchored_pieces` is
    /// unchanged; the anchor sits on whoever pushed last regardless of
    /// perspective.
    #[inline]
    pub fn swap_sides(self) -> State {
        State {
            enemy_pushers: self.allied_pushers,
            enemy_pawns: self.allied_pawns,
            allied_pushers: self.enemy_pushers,
            allied_pawns: self.enemy_pawns,
            anchored_pieces: self.anchored_pieces,
        }
    }

    /// Relocate the piece on `from` to `to`, whichever mask holds it.
    ///
    /// All four masks get the bit transfer; only the owning mask's transfer is
    /// non-trivial.
    #[inline]
    pub fn move_piece(&mut self, from: u32, to: u32) -> Result<(), SolverError> {
        if self.blockers() & (1 << from) == 0 {
            return Err(SolverError::InvalidState {
                reason: "move_piece: no piece on source square",
            });
        }
        bits::move_bit(&mut self.enemy_pushers, from, to);
        bits::move_bit(&mut self.enemy_pawns, from, to);
        bits::move_bit(&mut self.allied_pushers, from, to);
        bits::move_bit(&mut self.allied_pawns, from, to);
        Ok(())
    }

    /// Take the piece on `square` off the board, reporting what it was.
    pub fn remove_piece(&mut self, square: u32) -> Result<Removed, SolverError> {
        let bit = 1u32 << square;
        if self.allied_pushers & bit != 0 {
            self.allied_pushers &= !bit;
            Ok(Removed::AlliedPusher)
        } else if self.allied_pawns & bit != 0 {
            self.allied_pawns &= !bit;
            Ok(Removed::AlliedPawn)
        } else if self.enemy_pushers & bit != 0 {
            self.enemy_pushers &= !bit;
            Ok(Removed::EnemyPusher)
        } else if self.enemy_pawns & bit != 0 {
            self.enemy_pawns &= !bit;
            Ok(Removed::EnemyPawn)
        } else {
            Err(SolverError::InvalidState {
                reason: "remove_piece: no piece on square",
            })
        }
    }

    /// Check every representation invariant of an anchored state.
    ///
    /// The move generator only ever produces states for which this holds; the
    /// rank function refuses states for which it does not.
    pub fn validate(&self, board: &Board) -> Result<(), SolverError> {
        let all = self.blockers();
        let sum = self.enemy_pushers.count_ones()
            + self.enemy_pawns.count_ones()
            + self.allied_pushers.count_ones()
            + self.allied_pawns.count_ones();
        if sum != all.count_ones() {
            return Err(SolverError::InvalidState {
                reason: "occupancy masks overlap",
            });
        }
        if all & !board.squares_mask() != 0 {
            return Err(SolverError::InvalidState {
                reason: "piece outside the board",
            });
        }
        if self.enemy_pushers.count_ones() != board.pushers()
            || self.allied_pushers.count_ones() != board.pushers()
        {
            return Err(SolverError::InvalidState {
                reason: "wrong pusher count",
            });
        }
        if self.enemy_pawns.count_ones() != board.pawns()
            || self.allied_pawns.count_ones() != board.pawns()
        {
            return Err(SolverError::InvalidState {
                reason: "wrong pawn count",
            });
        }
        if self.anchored_pieces.count_ones() != 1 {
            return Err(SolverError::InvalidState {
                reason: "anchored mask must hold exactly one piece",
            });
        }
        if self.anchored_pieces & !self.enemy_pushers != 0 {
            return Err(SolverError::InvalidState {
                reason: "anchor not on an enemy pusher",
            });
        }
        Ok(())
    }
}
