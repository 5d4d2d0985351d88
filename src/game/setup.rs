//! Game setup: piece registry plus starting placements
//!
//! [`GameSetup::standard`] builds the usual 32-piece starting position.
//! Ids are assigned per side as pawns by file (0-7), rooks (8, 9),
//! knights (10, 11), bishops (12, 13), queen (14) and king (15); Black uses
//! the same order offset by 16. The queen-side piece of each pair gets the
//! lower id.
//!
//! Custom positions are built with [`GameSetup::place`], which is what most
//! rules tests use.

use crate::game::chess_game::ChessGame;
use crate::game::error::{GameError, GameResult};
use crate::game::pieces::{ClassicPiece, PieceId, PieceRegistry, PieceType, Player};
use crate::game::types::{BoardExtent, Cell};

/// Standard back rank, a-file to h-file, with each piece's id offset within its side
const BACK_ROW: [(PieceType, u16); 8] = [
    (PieceType::Rook, 8),
    (PieceType::Knight, 10),
    (PieceType::Bishop, 12),
    (PieceType::Queen, 14),
    (PieceType::King, 15),
    (PieceType::Bishop, 13),
    (PieceType::Knight, 11),
    (PieceType::Rook, 9),
];

/// Id offset of Black's pieces in the standard setup
const BLACK_ID_OFFSET: u16 = 16;

#[derive(Clone, Debug)]
pub struct GameSetup {
    extent: BoardExtent,
    pieces: PieceRegistry,
    placements: Vec<(Cell, PieceId)>,
}

impl GameSetup {
    /// An empty board of the given extent
    pub fn new(extent: BoardExtent) -> Self {
        GameSetup {
            extent,
            pieces: PieceRegistry::new(),
            placements: Vec::new(),
        }
    }

    /// The standard starting position on an 8x8 board
    pub fn standard() -> Self {
        let mut setup = GameSetup::new(BoardExtent::STANDARD);
        setup.fill_standard();
        setup
    }

    /// The standard starting position on the lower-left files of a larger board
    ///
    /// White takes ranks 1-2, Black the two highest ranks.
    pub fn standard_on(extent: BoardExtent) -> GameResult<Self> {
        if extent.width < 8 || extent.height < 4 {
            return Err(GameError::setup(format!(
                "standard layout needs at least 8x4 cells, board is {}x{}",
                extent.width, extent.height
            )));
        }

        let mut setup = GameSetup::new(extent);
        setup.fill_standard();
        Ok(setup)
    }

    /// Add both standard armies; the extent is at least 8x4 and the setup empty
    fn fill_standard(&mut self) {
        for player in [Player::White, Player::Black] {
            let offset = match player {
                Player::White => 0,
                Player::Black => BLACK_ID_OFFSET,
            };
            let (back_rank, pawn_rank) = match player {
                Player::White => (0, 1),
                Player::Black => (self.extent.height - 1, self.extent.height - 2),
            };

            for file in 0..8u8 {
                let pawn = ClassicPiece::new(player, PieceId(offset + file as u16), PieceType::Pawn);
                self.pieces.insert(pawn);
                self.placements.push((Cell::new(file, pawn_rank), pawn.id));
            }
            for (file, &(piece_type, id)) in BACK_ROW.iter().enumerate() {
                let piece = ClassicPiece::new(player, PieceId(offset + id), piece_type);
                self.pieces.insert(piece);
                self.placements.push((Cell::new(file as u8, back_rank), piece.id));
            }
        }
    }

    pub fn extent(&self) -> BoardExtent {
        self.extent
    }

    /// Register a new piece with the next free id and place it
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let mut setup = GameSetup::new(BoardExtent::STANDARD);
    /// let knight = setup.place(Player::White, PieceType::Knight, Cell::new(1, 0))?;
    /// let game = setup.build()?;
    /// ```
    pub fn place(&mut self, player: Player, piece_type: PieceType, cell: Cell) -> GameResult<PieceId> {
        let id = self
            .pieces
            .next_id()
            .ok_or_else(|| GameError::setup("no piece ids left"))?;
        self.insert(ClassicPiece::new(player, id, piece_type), cell)?;
        Ok(id)
    }

    /// Register and place a piece with an explicit id
    pub fn insert(&mut self, piece: ClassicPiece, cell: Cell) -> GameResult<()> {
        if !self.extent.contains(cell) {
            return Err(GameError::setup(format!("{cell} is outside the board")));
        }
        if self.placements.iter().any(|&(used, _)| used == cell) {
            return Err(GameError::setup(format!("{cell} is already occupied")));
        }
        if !self.pieces.insert(piece) {
            return Err(GameError::setup(format!("piece id {} is already used", piece.id)));
        }
        self.placements.push((cell, piece.id));
        Ok(())
    }

    pub fn build(self) -> GameResult<ChessGame> {
        ChessGame::new(self.extent, self.pieces, self.placements)
    }
}
