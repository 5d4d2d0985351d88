//! One fully determined chess position (a branch)

use crate::game::pieces::{PieceId, PieceType};
use crate::game::rules::{self, RuleContext};
use crate::game::types::Cell;
use num_bigint::BigUint;
use num_traits::One;
use std::collections::{BTreeMap, BTreeSet};

/// A single classical board inside a quantum board state
///
/// `weight` is the number of identical underlying classical histories this
/// branch stands for. Two branches are identical when their occupancy maps
/// match; capture lists, moved sets and weights are not compared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassicBoardState {
    occupancy: BTreeMap<Cell, PieceId>,
    captured: Vec<PieceId>,
    moved: BTreeSet<PieceId>,
    weight: BigUint,
}

impl Default for ClassicBoardState {
    fn default() -> Self {
        ClassicBoardState {
            occupancy: BTreeMap::new(),
            captured: Vec::new(),
            moved: BTreeSet::new(),
            weight: BigUint::one(),
        }
    }
}

impl ClassicBoardState {
    /// Empty root branch with weight 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Root branch holding the given placements
    ///
    /// Returns `None` if a cell or a piece id appears twice.
    pub fn from_placements(placements: impl IntoIterator<Item = (Cell, PieceId)>) -> Option<Self> {
        let mut board = ClassicBoardState::new();
        for (cell, id) in placements {
            if !board.place(cell, id) {
                return None;
            }
        }
        Some(board)
    }

    /// Put a piece on an empty cell, refusing a second copy of the same id
    pub fn place(&mut self, cell: Cell, id: PieceId) -> bool {
        if self.occupancy.contains_key(&cell) || self.cell_of(id).is_some() {
            return false;
        }
        self.occupancy.insert(cell, id);
        true
    }

    pub fn piece_at(&self, cell: Cell) -> Option<PieceId> {
        self.occupancy.get(&cell).copied()
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        !self.occupancy.contains_key(&cell)
    }

    pub fn cell_of(&self, id: PieceId) -> Option<Cell> {
        self.occupancy
            .iter()
            .find(|(_, &occupant)| occupant == id)
            .map(|(&cell, _)| cell)
    }

    pub fn occupancy(&self) -> &BTreeMap<Cell, PieceId> {
        &self.occupancy
    }

    /// Captured piece ids, in capture order
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    pub fn is_captured(&self, id: PieceId) -> bool {
        self.captured.contains(&id)
    }

    pub fn has_moved(&self, id: PieceId) -> bool {
        self.moved.contains(&id)
    }

    pub fn weight(&self) -> &BigUint {
        &self.weight
    }

    pub(crate) fn set_weight(&mut self, weight: BigUint) {
        self.weight = weight;
    }

    /// Occupancy-only comparison
    pub fn is_identical(&self, other: &ClassicBoardState) -> bool {
        self.occupancy == other.occupancy
    }

    /// Move `id` from `origin` to `target` if that move is legal in this branch
    ///
    /// Does nothing and returns `false` when the piece is not on `origin` or
    /// the Ruleset rejects the move here. Castling moves the rook in the same
    /// step; en passant removes the passed pawn.
    pub fn apply_move_if_legal(
        &mut self,
        ctx: &RuleContext<'_>,
        id: PieceId,
        origin: Cell,
        target: Cell,
    ) -> bool {
        if self.piece_at(origin) != Some(id) {
            return false;
        }
        let Some(piece) = ctx.pieces.get(id) else {
            return false;
        };
        if !rules::is_valid_move(ctx, piece, origin, target, self) {
            return false;
        }

        let mut rook_relocation = None;
        if piece.piece_type == PieceType::King && origin.y == target.y && origin.x.abs_diff(target.x) >= 2 {
            match rules::castling_rook(ctx, piece, origin, target, self) {
                Some(relocation) => rook_relocation = Some(relocation),
                None => return false,
            }
        }
        let en_passant = rules::en_passant_victim(ctx, piece, origin, target, self);

        if let Some(captured) = self.occupancy.remove(&target) {
            self.captured.push(captured);
        }
        if let Some(victim_cell) = en_passant {
            if let Some(victim) = self.occupancy.remove(&victim_cell) {
                self.captured.push(victim);
            }
        }

        self.occupancy.remove(&origin);
        self.occupancy.insert(target, id);
        self.moved.insert(id);

        if let Some((rook_from, rook_to)) = rook_relocation {
            if let Some(rook) = self.occupancy.remove(&rook_from) {
                self.occupancy.insert(rook_to, rook);
                self.moved.insert(rook);
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pieces::{ClassicPiece, PieceRegistry, PieceType, Player};
    use crate::game::types::BoardExtent;

    fn registry() -> PieceRegistry {
        [
            ClassicPiece::new(Player::White, PieceId(0), PieceType::Rook),
            ClassicPiece::new(Player::Black, PieceId(1), PieceType::Knight),
            ClassicPiece::new(Player::Black, PieceId(2), PieceType::Bishop),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_place_rejects_duplicates() {
        let mut board = ClassicBoardState::new();
        assert!(board.place(Cell::new(0, 0), PieceId(0)));
        assert!(!board.place(Cell::new(0, 0), PieceId(1)));
        assert!(!board.place(Cell::new(1, 1), PieceId(0)));
        assert!(ClassicBoardState::from_placements([
            (Cell::new(0, 0), PieceId(0)),
            (Cell::new(0, 0), PieceId(1)),
        ])
        .is_none());
    }

    #[test]
    fn test_capture_is_recorded() {
        let pieces = registry();
        let ctx = RuleContext::new(&pieces, BoardExtent::STANDARD, None);
        let mut board = ClassicBoardState::from_placements([
            (Cell::new(0, 0), PieceId(0)),
            (Cell::new(0, 5), PieceId(1)),
        ])
        .unwrap();

        assert!(board.apply_move_if_legal(&ctx, PieceId(0), Cell::new(0, 0), Cell::new(0, 5)));
        assert_eq!(board.piece_at(Cell::new(0, 5)), Some(PieceId(0)));
        assert!(board.is_empty(Cell::new(0, 0)));
        assert_eq!(board.captured(), &[PieceId(1)]);
        assert!(board.has_moved(PieceId(0)));
    }

    #[test]
    fn test_illegal_move_is_noop() {
        let pieces = registry();
        let ctx = RuleContext::new(&pieces, BoardExtent::STANDARD, None);
        let mut board = ClassicBoardState::from_placements([
            (Cell::new(0, 0), PieceId(0)),
            (Cell::new(0, 3), PieceId(1)),
        ])
        .unwrap();
        let before = board.clone();

        // Blocked by the knight on a4
        assert!(!board.apply_move_if_legal(&ctx, PieceId(0), Cell::new(0, 0), Cell::new(0, 6)));
        // Wrong origin
        assert!(!board.apply_move_if_legal(&ctx, PieceId(0), Cell::new(1, 0), Cell::new(1, 4)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_identity_ignores_weight_and_captures() {
        let pieces = registry();
        let ctx = RuleContext::new(&pieces, BoardExtent::STANDARD, None);
        let mut a = ClassicBoardState::from_placements([
            (Cell::new(0, 0), PieceId(0)),
            (Cell::new(0, 5), PieceId(1)),
        ])
        .unwrap();
        a.apply_move_if_legal(&ctx, PieceId(0), Cell::new(0, 0), Cell::new(0, 5));

        let mut b = ClassicBoardState::from_placements([(Cell::new(0, 5), PieceId(0))]).unwrap();
        b.set_weight(BigUint::from(7u32));

        assert!(a.is_identical(&b));
        assert_ne!(a, b);
    }
}
