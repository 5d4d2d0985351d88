pub mod core;
pub mod game;

pub use game::{
    BoardExtent, BoardMeaning, Cell, ChessGame, GameError, GameResult, GameSetup, Move, MoveEvent,
    PieceId, PieceType, Player, RealPiece,
};
