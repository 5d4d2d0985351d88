//! Board coordinates and board extent
//!
//! Provides the coordinate newtypes shared by every layer of the engine:
//! branches key their occupancy by [`Cell`], the Ruleset walks cells with
//! [`Cell::offset`], and [`BoardExtent`] bounds every walk.
//!
//! Files are lettered from `a`, ranks are numbered from `1`, so `Cell::new(4, 3)`
//! is `e4`. White starts on the low ranks and advances towards higher `y`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported board width (files `a`..=`z`).
pub const MAX_BOARD_WIDTH: u8 = 26;

/// Largest supported board height (ranks `1`..=`99`).
pub const MAX_BOARD_HEIGHT: u8 = 99;

/// A single board cell, `x` is the file and `y` the rank (both zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Cell { x, y }
    }

    /// Create a cell from algebraic notation (e.g., "e4", "b10")
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let cell = Cell::from_algebraic("e4").unwrap();
    /// assert_eq!(cell, Cell::new(4, 3));
    /// ```
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        if !file_char.is_ascii_lowercase() {
            return None;
        }

        let rank_str = chars.as_str();
        if rank_str.is_empty() || rank_str.len() > 2 || !rank_str.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let rank_num: u8 = rank_str.parse().ok()?;
        if rank_num == 0 {
            return None;
        }

        Some(Cell::new(file_char as u8 - b'a', rank_num - 1))
    }

    /// Convert cell to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.x) as char, self.y as u16 + 1)
    }

    /// The cell `(dx, dy)` away from this one, if it has non-negative coordinates
    ///
    /// Callers still have to check the result against a [`BoardExtent`].
    pub fn offset(self, dx: i8, dy: i8) -> Option<Cell> {
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if (0..=u8::MAX as i16).contains(&x) && (0..=u8::MAX as i16).contains(&y) {
            Some(Cell::new(x as u8, y as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.x < MAX_BOARD_WIDTH {
            write!(f, "{}", self.to_algebraic())
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

impl From<(u8, u8)> for Cell {
    fn from((x, y): (u8, u8)) -> Self {
        Cell::new(x, y)
    }
}

impl From<Cell> for (u8, u8) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

/// The rectangular extent of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardExtent {
    pub width: u8,
    pub height: u8,
}

impl BoardExtent {
    /// The standard 8x8 board.
    pub const STANDARD: BoardExtent = BoardExtent { width: 8, height: 8 };

    pub const fn new(width: u8, height: u8) -> Self {
        BoardExtent { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Neighbouring cell clipped to the board
    pub fn step(&self, cell: Cell, dx: i8, dy: i8) -> Option<Cell> {
        cell.offset(dx, dy).filter(|c| self.contains(*c))
    }

    /// Number of cells on the board
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of a cell (rank 1 first)
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// All cells, rank by rank starting from `a1`
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

impl Default for BoardExtent {
    fn default() -> Self {
        BoardExtent::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_algebraic() {
        let cell = Cell::from_algebraic("e4").unwrap();
        assert_eq!(cell, Cell::new(4, 3));
        assert_eq!(cell.to_algebraic(), "e4");

        assert_eq!(Cell::from_algebraic("a1"), Some(Cell::new(0, 0)));
        assert_eq!(Cell::from_algebraic("b10"), Some(Cell::new(1, 9)));
        assert_eq!(Cell::from_algebraic("a0"), None);
        assert_eq!(Cell::from_algebraic("E4"), None);
        assert_eq!(Cell::from_algebraic("e"), None);
        assert_eq!(Cell::from_algebraic("e4x"), None);
    }

    #[test]
    fn test_cell_offset() {
        let cell = Cell::new(0, 0);
        assert_eq!(cell.offset(1, 2), Some(Cell::new(1, 2)));
        assert_eq!(cell.offset(-1, 0), None);
        assert_eq!(Cell::new(3, 3).offset(-3, -3), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_extent_step_clips_to_board() {
        let extent = BoardExtent::STANDARD;
        assert_eq!(extent.step(Cell::new(7, 7), 1, 0), None);
        assert_eq!(extent.step(Cell::new(6, 7), 1, 0), Some(Cell::new(7, 7)));
    }

    #[test]
    fn test_extent_cells_order() {
        let extent = BoardExtent::new(2, 2);
        let cells: Vec<Cell> = extent.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
        assert_eq!(extent.index_of(Cell::new(1, 1)), Some(3));
        assert_eq!(extent.index_of(Cell::new(2, 0)), None);
    }
}
