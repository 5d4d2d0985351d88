//! Chess piece movement rules for a single branch
//!
//! Contains the rules for how each chess piece can move on one fully
//! determined [`ClassicBoardState`]. Pure functions with no side effects.
//!
//! Sliding pieces stop at the first occupied cell, knights and kings use
//! fixed offsets, and every piece captures only enemies. Pawns add the
//! double advance from their start rank and en passant against the last
//! committed move; kings add castling, checked independently per side.

use super::RuleContext;
use crate::game::pieces::{ClassicPiece, PieceType, Player};
use crate::game::state::ClassicBoardState;
use crate::game::types::Cell;

/// Check if a move is valid for a given piece in one branch
///
/// The piece is assumed to stand on `from`; callers that are not sure
/// should check the branch occupancy first.
pub fn is_valid_move(
    ctx: &RuleContext<'_>,
    piece: &ClassicPiece,
    from: Cell,
    to: Cell,
    board: &ClassicBoardState,
) -> bool {
    // Can't move to the same cell
    if from == to {
        return false;
    }

    // Can't move off the board
    if !ctx.extent.contains(to) {
        return false;
    }

    // Can't capture your own pieces
    if let Some(target_player) = player_at(ctx, board, to) {
        if target_player == piece.player {
            return false;
        }
    }

    match piece.piece_type {
        PieceType::Pawn => is_valid_pawn_move(ctx, piece, from, to, board),
        PieceType::Knight => is_valid_knight_move(from, to),
        PieceType::Bishop => is_valid_bishop_move(from, to, board),
        PieceType::Rook => is_valid_rook_move(from, to, board),
        PieceType::Queen => is_valid_queen_move(from, to, board),
        PieceType::King => is_valid_king_move(ctx, piece, from, to, board),
    }
}

/// Get all destinations of a piece in one branch
///
/// Returned cells are in row-major order starting from `a1`.
pub fn get_possible_moves(
    ctx: &RuleContext<'_>,
    piece: &ClassicPiece,
    position: Cell,
    board: &ClassicBoardState,
) -> Vec<Cell> {
    ctx.extent
        .cells()
        .filter(|&to| is_valid_move(ctx, piece, position, to, board))
        .collect()
}

/// Rook relocation for a castling king move, if every castling condition holds
///
/// Returns `(rook_from, rook_to)`. The king must be unmoved and travel
/// exactly two cells along its rank; the rook must be an unmoved friendly
/// rook on the board edge in the direction of travel, with every cell
/// between the two pieces empty.
pub fn castling_rook(
    ctx: &RuleContext<'_>,
    king: &ClassicPiece,
    from: Cell,
    to: Cell,
    board: &ClassicBoardState,
) -> Option<(Cell, Cell)> {
    if king.piece_type != PieceType::King || board.has_moved(king.id) {
        return None;
    }
    if from.y != to.y || from.x.abs_diff(to.x) != 2 {
        return None;
    }

    let dir: i8 = if to.x > from.x { 1 } else { -1 };
    let edge_x = if dir > 0 { ctx.extent.width.checked_sub(1)? } else { 0 };
    let rook_from = Cell::new(edge_x, from.y);

    // The king has to land strictly between its start and the rook
    let lands_inside = if dir > 0 {
        to.x < rook_from.x
    } else {
        to.x > rook_from.x
    };
    if !lands_inside {
        return None;
    }

    let rook_id = board.piece_at(rook_from)?;
    let rook = ctx.pieces.get(rook_id)?;
    if rook.player != king.player || rook.piece_type != PieceType::Rook || board.has_moved(rook_id) {
        return None;
    }

    if !is_path_clear(from, rook_from, board) {
        return None;
    }

    let rook_to = ctx.extent.step(to, -dir, 0)?;
    Some((rook_from, rook_to))
}

/// The enemy pawn an en passant move onto `to` would capture
///
/// Eligibility is read from the shared move history: the last move must be a
/// double advance by an enemy pawn that ended beside `from`, and `to` must be
/// the cell it passed over. The pawn must also actually stand there in this
/// branch.
pub fn en_passant_victim(
    ctx: &RuleContext<'_>,
    pawn: &ClassicPiece,
    from: Cell,
    to: Cell,
    board: &ClassicBoardState,
) -> Option<Cell> {
    if pawn.piece_type != PieceType::Pawn || !board.is_empty(to) {
        return None;
    }
    if from.x.abs_diff(to.x) != 1 || to.y as i16 - from.y as i16 != pawn.player.forward() as i16 {
        return None;
    }

    let last = ctx.last_move?.as_classic()?;
    if last.player == pawn.player || !last.is_double_advance() {
        return None;
    }
    let mover = ctx.pieces.get(last.piece_id)?;
    if mover.piece_type != PieceType::Pawn {
        return None;
    }

    let victim_cell = Cell::new(to.x, from.y);
    let passed = Cell::new(last.target.x, (last.origin.y + last.target.y) / 2);
    if last.target != victim_cell || passed != to {
        return None;
    }
    (board.piece_at(victim_cell) == Some(last.piece_id)).then_some(victim_cell)
}

fn player_at(ctx: &RuleContext<'_>, board: &ClassicBoardState, cell: Cell) -> Option<Player> {
    board
        .piece_at(cell)
        .and_then(|id| ctx.pieces.get(id))
        .map(|piece| piece.player)
}

/// Rank pawns of `player` start on
fn pawn_start_rank(ctx: &RuleContext<'_>, player: Player) -> u8 {
    match player {
        Player::White => 1,
        Player::Black => ctx.extent.height.saturating_sub(2),
    }
}

fn is_valid_pawn_move(
    ctx: &RuleContext<'_>,
    pawn: &ClassicPiece,
    from: Cell,
    to: Cell,
    board: &ClassicBoardState,
) -> bool {
    let direction = pawn.player.forward() as i16;

    let dx = to.x as i16 - from.x as i16;
    let dy = to.y as i16 - from.y as i16;

    // Forward move
    if dx == 0 && dy == direction {
        return board.is_empty(to);
    }

    // Double move from starting rank
    if dx == 0 && dy == 2 * direction && from.y == pawn_start_rank(ctx, pawn.player) {
        let intermediate = Cell::new(from.x, (from.y as i16 + direction) as u8);
        return board.is_empty(intermediate) && board.is_empty(to);
    }

    // Capture diagonally
    if dx.abs() == 1 && dy == direction {
        if let Some(target_player) = player_at(ctx, board, to) {
            return target_player != pawn.player;
        }
        return en_passant_victim(ctx, pawn, from, to, board).is_some();
    }

    false
}

fn is_valid_knight_move(from: Cell, to: Cell) -> bool {
    let dx = from.x.abs_diff(to.x);
    let dy = from.y.abs_diff(to.y);
    (dx == 2 && dy == 1) || (dx == 1 && dy == 2)
}

fn is_valid_bishop_move(from: Cell, to: Cell, board: &ClassicBoardState) -> bool {
    // Must move diagonally
    if from.x.abs_diff(to.x) != from.y.abs_diff(to.y) {
        return false;
    }

    is_path_clear(from, to, board)
}

fn is_valid_rook_move(from: Cell, to: Cell, board: &ClassicBoardState) -> bool {
    // Must move horizontally or vertically
    if from.x != to.x && from.y != to.y {
        return false;
    }

    is_path_clear(from, to, board)
}

fn is_valid_queen_move(from: Cell, to: Cell, board: &ClassicBoardState) -> bool {
    is_valid_rook_move(from, to, board) || is_valid_bishop_move(from, to, board)
}

fn is_valid_king_move(
    ctx: &RuleContext<'_>,
    king: &ClassicPiece,
    from: Cell,
    to: Cell,
    board: &ClassicBoardState,
) -> bool {
    if from.x.abs_diff(to.x) <= 1 && from.y.abs_diff(to.y) <= 1 {
        return true;
    }

    castling_rook(ctx, king, from, to, board).is_some()
}

/// Whether every cell strictly between `from` and `to` is empty
///
/// Only meaningful for cells sharing a rank, file or diagonal.
fn is_path_clear(from: Cell, to: Cell, board: &ClassicBoardState) -> bool {
    let dx = (to.x as i16 - from.x as i16).signum();
    let dy = (to.y as i16 - from.y as i16).signum();

    let mut x = from.x as i16 + dx;
    let mut y = from.y as i16 + dy;

    while (x, y) != (to.x as i16, to.y as i16) {
        if !board.is_empty(Cell::new(x as u8, y as u8)) {
            return false;
        }
        x += dx;
        y += dy;
    }

    true
}
