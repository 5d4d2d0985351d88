//! Move history tracking
//!
//! Maintains the chronological record of every committed move. The Ruleset
//! reads the last entry for en passant eligibility; collaborators read the
//! full list for move review.
//!
//! The history is shared by all branches. Once branches diverge under quantum
//! moves, "the last move" is the last *requested* move, not necessarily the
//! last move that took effect in a given branch.

use crate::game::moves::Move;

/// Complete move history for the current game
///
/// Index 0 is the first move of the game.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    /// Append a committed move
    pub fn add_move(&mut self, record: Move) {
        self.moves.push(record);
    }

    /// Get the most recent move, if any
    ///
    /// Used to detect en passant opportunities.
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Number of half-moves (ply) made
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Get a specific move by ply index
    pub fn get_move(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    /// Iterate over all moves in chronological order
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }
}
