//! Move records
//!
//! A [`Move`] is built by the orchestrator once the request has passed the
//! Ruleset, and is immutable afterwards. Classic moves carry the measurement
//! flags computed from the board meaning at request time; quantum moves carry
//! exactly two distinct targets.

use crate::game::pieces::{PieceId, Player};
use crate::game::types::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move with a single target, applied independently to every branch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicMove {
    pub player: Player,
    pub piece_id: PieceId,
    pub origin: Cell,
    pub target: Cell,
    /// Collapse the origin cell before moving
    pub measures_origin: bool,
    /// Collapse the target cell before moving
    pub measures_target: bool,
    pub is_castling: bool,
}

impl ClassicMove {
    /// Whether this is a pawn-style two-rank vertical advance
    pub fn is_double_advance(&self) -> bool {
        self.origin.x == self.target.x && self.origin.y.abs_diff(self.target.y) == 2
    }
}

/// A move with two targets, splitting every branch in two
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumMove {
    pub player: Player,
    pub piece_id: PieceId,
    pub origin: Cell,
    pub targets: [Cell; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Classic(ClassicMove),
    Quantum(QuantumMove),
}

impl Move {
    pub fn player(&self) -> Player {
        match self {
            Move::Classic(m) => m.player,
            Move::Quantum(m) => m.player,
        }
    }

    pub fn piece_id(&self) -> PieceId {
        match self {
            Move::Classic(m) => m.piece_id,
            Move::Quantum(m) => m.piece_id,
        }
    }

    pub fn origin(&self) -> Cell {
        match self {
            Move::Classic(m) => m.origin,
            Move::Quantum(m) => m.origin,
        }
    }

    pub fn targets(&self) -> Vec<Cell> {
        match self {
            Move::Classic(m) => vec![m.target],
            Move::Quantum(m) => m.targets.to_vec(),
        }
    }

    pub fn as_classic(&self) -> Option<&ClassicMove> {
        match self {
            Move::Classic(m) => Some(m),
            Move::Quantum(_) => None,
        }
    }

    pub fn is_quantum(&self) -> bool {
        matches!(self, Move::Quantum(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Classic(m) => write!(f, "{} {}{}", m.piece_id, m.origin, m.target),
            Move::Quantum(m) => write!(
                f,
                "{} {}:{},{}",
                m.piece_id, m.origin, m.targets[0], m.targets[1]
            ),
        }
    }
}

/// Result of collapsing one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    pub cell: Cell,
    /// Occupant of the sampled branch at `cell` (`None` when empty)
    pub occupant: Option<PieceId>,
    /// Branches discarded because they disagreed with the sample
    pub discarded: usize,
}

/// Notification sent to move hooks and subscribers after each commit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    /// Zero-based position of the move in the history
    pub ply: usize,
    pub record: Move,
    pub measurements: Vec<MeasurementOutcome>,
}
