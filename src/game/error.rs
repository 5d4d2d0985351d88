//! Error types for game module
//!
//! Rule violations ([`GameError::IllegalMove`], [`GameError::InvalidMoveShape`],
//! [`GameError::PieceNotFound`], [`GameError::QuantumMoveForbidden`]) are
//! reported to the caller and leave the game untouched.
//! [`GameError::InvalidSetup`] only comes out of game construction. An
//! [`GameError::InvariantViolation`] means the branch bookkeeping is already
//! broken; callers should treat it as fatal.

use crate::game::pieces::{PieceId, PieceType};
use crate::game::types::Cell;

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Requested target is not in the legal destination set of the piece
    #[error("Illegal move: piece {piece} cannot move to {target}")]
    IllegalMove { piece: PieceId, target: Cell },

    /// Wrong number of targets, or duplicated quantum targets
    #[error("Invalid move shape: {message}")]
    InvalidMoveShape { message: String },

    /// Piece is unknown, or has no presence at the given cell
    #[error("Piece {piece} not found at {cell}")]
    PieceNotFound { piece: PieceId, cell: Cell },

    /// Piece type cannot split into superposition
    #[error("{piece_type:?} pieces cannot make quantum moves")]
    QuantumMoveForbidden { piece_type: PieceType },

    /// Starting position or piece registry is inconsistent
    #[error("Invalid setup: {message}")]
    InvalidSetup { message: String },

    /// Branch bookkeeping is inconsistent
    #[error("Quantum state invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl GameError {
    /// Whether the error indicates corrupted state rather than a rejected request
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::InvariantViolation { .. })
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        GameError::InvariantViolation {
            message: message.into(),
        }
    }

    pub(crate) fn setup(message: impl Into<String>) -> Self {
        GameError::InvalidSetup {
            message: message.into(),
        }
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        GameError::InvalidMoveShape {
            message: message.into(),
        }
    }
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
