//! Quantum chess game logic
//!
//! A game is a weighted set of classical boards ("branches"). Classic moves
//! are applied to every branch independently, quantum moves split every
//! branch in two, and measurement collapses a cell by sampling one branch.
//!
//! # Module Organization
//!
//! - `types` - Cells and board extent
//! - `pieces` - Piece descriptors and the piece registry
//! - `moves` - Move records and move events
//! - `rules` - Pure move legality, per branch and aggregated over branches
//! - `state` - Classical branches, the quantum state and the board meaning
//! - `history` - Ordered record of committed moves
//! - `chess_game` - The orchestrator validating and dispatching move requests
//! - `setup` - Standard and custom starting positions
//!
//! # Data Flow
//!
//! 1. [`ChessGame`] receives a move request
//! 2. The Ruleset computes the legal destinations of the real piece
//! 3. The orchestrator builds a [`Move`] record (with measurement flags)
//! 4. [`QuantumBoardState`] measures, mutates and consolidates its branches
//! 5. [`BoardMeaning`] is recomputed on demand for presentation

pub mod chess_game;
pub mod error;
pub mod history;
pub mod moves;
pub mod pieces;
pub mod rules;
pub mod setup;
pub mod state;
pub mod types;

pub use chess_game::ChessGame;
pub use error::{GameError, GameResult};
pub use history::MoveHistory;
pub use moves::{ClassicMove, MeasurementOutcome, Move, MoveEvent, QuantumMove};
pub use pieces::{ClassicPiece, PieceId, PieceRegistry, PieceType, Player};
pub use setup::GameSetup;
pub use state::{BoardMeaning, ClassicBoardState, PieceLocation, QuantumBoardState, RealPiece};
pub use types::{BoardExtent, Cell};
