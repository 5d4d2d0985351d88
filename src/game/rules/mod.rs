//! Chess rules module - pure move legality and generation
//!
//! The Ruleset is stateless. It reads a [`RuleContext`] (piece registry,
//! board extent, last committed move) plus a read-only view of the board and
//! never mutates anything.
//!
//! # Module Structure
//!
//! - `piece_moves` - Per-branch movement rules for each piece type
//! - this module - [`aggregate_destinations`], the union over every branch
//!   in which a real piece stands on its origin cell
//!
//! # Aggregation
//!
//! Branches in which the piece is not on the origin cell are skipped rather
//! than treated as illegal. The union is then filtered against the board
//! meaning: a piece may move onto a cell holding another instance of itself
//! in superposition, never onto a cell where a teammate has any presence.

pub mod piece_moves;


use crate::game::moves::Move;
use crate::game::pieces::{PieceId, PieceRegistry};
use crate::game::state::QuantumBoardState;
use crate::game::types::{BoardExtent, Cell};
use std::collections::BTreeSet;

pub use piece_moves::{castling_rook, en_passant_victim, get_possible_moves, is_valid_move};

/// Everything besides the board that move legality depends on
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    pub pieces: &'a PieceRegistry,
    pub extent: BoardExtent,
    /// Last committed move, shared by every branch
    pub last_move: Option<&'a Move>,
}

impl<'a> RuleContext<'a> {
    pub fn new(pieces: &'a PieceRegistry, extent: BoardExtent, last_move: Option<&'a Move>) -> Self {
        RuleContext {
            pieces,
            extent,
            last_move,
        }
    }
}

/// Legal destinations of the real piece `piece_id` standing on `origin`
///
/// Returns an empty set for unknown pieces or pieces with no presence on
/// `origin`.
pub fn aggregate_destinations(
    ctx: &RuleContext<'_>,
    piece_id: PieceId,
    origin: Cell,
    state: &QuantumBoardState,
) -> BTreeSet<Cell> {
    let Some(piece) = ctx.pieces.get(piece_id) else {
        return BTreeSet::new();
    };

    let mut destinations = BTreeSet::new();
    for branch in state
        .branches()
        .iter()
        .filter(|branch| branch.piece_at(origin) == Some(piece_id))
    {
        destinations.extend(get_possible_moves(ctx, piece, origin, branch));
    }

    destinations.retain(|&cell| {
        !state.occupants_at(cell).into_iter().any(|other| {
            other != piece_id
                && ctx
                    .pieces
                    .get(other)
                    .is_some_and(|teammate| teammate.player == piece.player)
        })
    });

    destinations
}
