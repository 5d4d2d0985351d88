//! Board meaning: the per-cell projection players see
//!
//! A [`BoardMeaning`] is fully recomputed from a [`QuantumBoardState`] and has
//! no identity of its own. Each cell lists the real pieces with a non-zero
//! presence there; captured presences are aggregated separately.

use super::weight;
use super::QuantumBoardState;
use crate::game::pieces::{ClassicPiece, PieceId, PieceRegistry};
use crate::game::types::{BoardExtent, Cell};
use num_bigint::BigUint;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PieceLocation {
    Board(Cell),
    Captured,
}

/// A piece as it appears in one place, with the probability of being there
///
/// `presence` is rounded and only meant for display; `quantum` comes from the
/// exact branch weights.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RealPiece {
    pub piece: ClassicPiece,
    pub location: PieceLocation,
    pub presence: f64,
    /// Some branch places this piece elsewhere
    pub quantum: bool,
}

impl RealPiece {
    pub fn id(&self) -> PieceId {
        self.piece.id
    }

    /// A piece is quantum when part of its presence lies elsewhere
    pub fn is_quantum(&self) -> bool {
        self.quantum
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardMeaning {
    extent: BoardExtent,
    cells: Vec<Vec<RealPiece>>,
    captured: Vec<RealPiece>,
}

impl BoardMeaning {
    /// Project a quantum state onto the board
    ///
    /// Cell lists and the captured list are ordered by piece id.
    pub fn from_state(state: &QuantumBoardState, pieces: &PieceRegistry, extent: BoardExtent) -> Self {
        let mut on_board: BTreeMap<(Cell, PieceId), BigUint> = BTreeMap::new();
        let mut captured: BTreeMap<PieceId, BigUint> = BTreeMap::new();

        for branch in state.branches() {
            for (&cell, &id) in branch.occupancy() {
                *on_board.entry((cell, id)).or_default() += branch.weight();
            }
            for &id in branch.captured() {
                *captured.entry(id).or_default() += branch.weight();
            }
        }

        let total = state.total_weight();
        let mut cells = vec![Vec::new(); extent.area()];
        for ((cell, id), w) in on_board {
            let (Some(index), Some(piece)) = (extent.index_of(cell), pieces.get(id)) else {
                continue;
            };
            cells[index].push(RealPiece {
                piece: *piece,
                location: PieceLocation::Board(cell),
                presence: weight::ratio(&w, total),
                quantum: &w != total,
            });
        }

        let captured = captured
            .into_iter()
            .filter_map(|(id, w)| {
                pieces.get(id).map(|piece| RealPiece {
                    piece: *piece,
                    location: PieceLocation::Captured,
                    presence: weight::ratio(&w, total),
                    quantum: &w != total,
                })
            })
            .collect();

        BoardMeaning {
            extent,
            cells,
            captured,
        }
    }

    pub fn extent(&self) -> BoardExtent {
        self.extent
    }

    /// Real pieces with presence on `cell` (empty slice off the board)
    pub fn at(&self, cell: Cell) -> &[RealPiece] {
        self.extent
            .index_of(cell)
            .map(|index| self.cells[index].as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty_at(&self, cell: Cell) -> bool {
        self.at(cell).is_empty()
    }

    /// Captured presences, one entry per piece that is captured in some branch
    pub fn captured(&self) -> &[RealPiece] {
        &self.captured
    }

    pub fn real_piece(&self, id: PieceId, cell: Cell) -> Option<&RealPiece> {
        self.at(cell).iter().find(|p| p.id() == id)
    }

    pub fn presence_of(&self, id: PieceId, cell: Cell) -> f64 {
        self.real_piece(id, cell).map_or(0.0, |p| p.presence)
    }

    pub fn captured_presence_of(&self, id: PieceId) -> f64 {
        self.captured
            .iter()
            .find(|p| p.id() == id)
            .map_or(0.0, |p| p.presence)
    }

    /// Every appearance of one piece, board cells first then the captured pile
    pub fn instances_of(&self, id: PieceId) -> Vec<&RealPiece> {
        self.cells
            .iter()
            .flatten()
            .chain(self.captured.iter())
            .filter(|p| p.id() == id)
            .collect()
    }

    /// Cells with their real pieces, rank by rank starting from `a1`
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &[RealPiece])> + '_ {
        self.extent
            .cells()
            .zip(self.cells.iter())
            .map(|(cell, pieces)| (cell, pieces.as_slice()))
    }
}
