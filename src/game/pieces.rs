//! Piece descriptors and the piece registry
//!
//! A [`ClassicPiece`] is the immutable identity of one physical piece: its
//! owner, its type and a game-unique [`PieceId`]. Branches only store ids;
//! everything else is looked up through the [`PieceRegistry`], which also keeps
//! captured pieces addressable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Player {
    #[default]
    White,
    Black,
}

impl Player {
    /// Numeric player id (0 for White, 1 for Black)
    pub fn id(self) -> u8 {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::White => "White",
            Player::Black => "Black",
        }
    }

    /// Rank direction pawns of this player advance in
    pub fn forward(self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    /// Whether this piece type may split into superposition
    pub fn can_quantum_move(self) -> bool {
        !matches!(self, PieceType::Pawn)
    }

    /// Single-letter symbol, uppercase for White and lowercase for Black
    pub fn symbol(self, player: Player) -> char {
        let c = match self {
            PieceType::Pawn => 'P',
            PieceType::Rook => 'R',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        };
        match player {
            Player::White => c,
            Player::Black => c.to_ascii_lowercase(),
        }
    }
}

/// Game-unique piece identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable identity of a single piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicPiece {
    pub player: Player,
    pub piece_type: PieceType,
    pub id: PieceId,
}

impl ClassicPiece {
    pub fn new(player: Player, id: PieceId, piece_type: PieceType) -> Self {
        ClassicPiece {
            player,
            piece_type,
            id,
        }
    }

    pub fn symbol(&self) -> char {
        self.piece_type.symbol(self.player)
    }
}

impl fmt::Display for ClassicPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{:?}", self.player.id(), self.id.0, self.piece_type)
    }
}

/// Every piece of a game, keyed by id
///
/// Pieces are registered once at setup and never removed, so a captured
/// piece can still be resolved from the capture lists of the branches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PieceRegistry {
    pieces: BTreeMap<PieceId, ClassicPiece>,
}

impl PieceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new piece, returning `false` if the id is already taken
    pub fn insert(&mut self, piece: ClassicPiece) -> bool {
        if self.pieces.contains_key(&piece.id) {
            return false;
        }
        self.pieces.insert(piece.id, piece);
        true
    }

    pub fn get(&self, id: PieceId) -> Option<&ClassicPiece> {
        self.pieces.get(&id)
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// One past the highest registered id, or `None` once `u16::MAX` is taken
    pub fn next_id(&self) -> Option<PieceId> {
        match self.pieces.keys().next_back() {
            Some(id) => id.0.checked_add(1).map(PieceId),
            None => Some(PieceId(0)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassicPiece> {
        self.pieces.values()
    }
}

/// Collects pieces in order; a piece whose id is already registered is
/// skipped, so the first piece with a given id wins. Use
/// [`PieceRegistry::insert`] to detect duplicates.
impl FromIterator<ClassicPiece> for PieceRegistry {
    fn from_iter<I: IntoIterator<Item = ClassicPiece>>(iter: I) -> Self {
        let mut registry = PieceRegistry::new();
        for piece in iter {
            registry.insert(piece);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_display() {
        let king = ClassicPiece::new(Player::Black, PieceId(31), PieceType::King);
        assert_eq!(king.to_string(), "1:31/King");
        assert_eq!(king.symbol(), 'k');
        assert_eq!(Player::White.name(), "White");
    }

    #[test]
    fn test_registry_rejects_duplicate_ids() {
        let mut registry = PieceRegistry::new();
        assert!(registry.insert(ClassicPiece::new(Player::White, PieceId(0), PieceType::Pawn)));
        assert!(!registry.insert(ClassicPiece::new(Player::Black, PieceId(0), PieceType::Rook)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(PieceId(0)).unwrap().piece_type, PieceType::Pawn);
        assert_eq!(registry.next_id(), Some(PieceId(1)));
    }

    #[test]
    fn test_next_id_follows_highest_id() {
        let mut registry = PieceRegistry::new();
        assert_eq!(registry.next_id(), Some(PieceId(0)));

        registry.insert(ClassicPiece::new(Player::White, PieceId(7), PieceType::Rook));
        registry.insert(ClassicPiece::new(Player::White, PieceId(2), PieceType::Rook));
        assert_eq!(registry.next_id(), Some(PieceId(8)));

        registry.insert(ClassicPiece::new(Player::Black, PieceId(u16::MAX), PieceType::King));
        assert_eq!(registry.next_id(), None);
    }

    #[test]
    fn test_collect_keeps_first_of_duplicate_ids() {
        let registry: PieceRegistry = [
            ClassicPiece::new(Player::White, PieceId(3), PieceType::Knight),
            ClassicPiece::new(Player::Black, PieceId(3), PieceType::Queen),
            ClassicPiece::new(Player::Black, PieceId(4), PieceType::Queen),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(PieceId(3)).unwrap().piece_type, PieceType::Knight);
        assert_eq!(registry.get(PieceId(3)).unwrap().player, Player::White);
    }

    #[test]
    fn test_only_pawns_cannot_quantum_move() {
        assert!(!PieceType::Pawn.can_quantum_move());
        assert!(PieceType::Knight.can_quantum_move());
        assert!(PieceType::King.can_quantum_move());
    }
}
