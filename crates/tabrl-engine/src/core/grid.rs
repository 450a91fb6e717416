use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Number of rows (and columns) of the grid.
pub const GRID_SIZE: usize = 3;

/// Total number of cells on the grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Every line that wins the game, in evaluation order:
/// rows top to bottom, columns left to right, then both diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum PlayerNum {
    One,
    Two,
}

impl PlayerNum {
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Zero-based seat index, handy for `[T; 2]` tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    #[must_use]
    pub const fn mark(self) -> Cell {
        match self {
            Self::One => Cell::One,
            Self::Two => Cell::Two,
        }
    }
}

impl fmt::Display for PlayerNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1"),
            Self::Two => write!(f, "2"),
        }
    }
}

/// Content of a single grid cell.
///
/// The discriminant is the base-3 digit used by [`StateIndex`](crate::StateIndex).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    One = 1,
    Two = 2,
}

impl Cell {
    #[must_use]
    pub const fn digit(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(Self::Empty),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    #[must_use]
    pub const fn owner(self) -> Option<PlayerNum> {
        match self {
            Self::Empty => None,
            Self::One => Some(PlayerNum::One),
            Self::Two => Some(PlayerNum::Two),
        }
    }
}

/// A `(row, col)` position as requested by a player.
///
/// Coordinates are not validated on construction; players may ask for any
/// position and the game rejects those outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major cell index, or `None` if the coordinate is off the grid.
    #[must_use]
    pub const fn cell_index(self) -> Option<usize> {
        if self.row < GRID_SIZE && self.col < GRID_SIZE {
            Some(self.row * GRID_SIZE + self.col)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn from_cell_index(index: usize) -> Self {
        Self {
            row: index / GRID_SIZE,
            col: index % GRID_SIZE,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The 3x3 playing surface.
///
/// `Grid` is a plain value: players receive copies and may build hypothetical
/// successor grids with [`Grid::marked`] without touching the game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Cell; CELL_COUNT],
}

impl Grid {
    pub const EMPTY: Self = Self {
        cells: [Cell::Empty; CELL_COUNT],
    };

    #[must_use]
    pub const fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    #[must_use]
    pub const fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        coord.cell_index().map(|i| self.cells[i])
    }

    #[must_use]
    pub fn is_empty_at(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|c| c.is_empty())
    }

    /// Empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> ArrayVec<Coord, CELL_COUNT> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| Coord::from_cell_index(i))
            .collect()
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled_count() == CELL_COUNT
    }

    /// Returns a copy of this grid with `coord` set to `player`'s mark.
    ///
    /// Returns `None` if the coordinate is off the grid or already taken.
    #[must_use]
    pub fn marked(&self, coord: Coord, player: PlayerNum) -> Option<Self> {
        let index = coord.cell_index()?;
        if !self.cells[index].is_empty() {
            return None;
        }
        let mut next = *self;
        next.cells[index] = player.mark();
        Some(next)
    }

    /// Owner of the first complete line, checked rows, then columns, then diagonals.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerNum> {
        LINES.iter().find_map(|&[a, b, c]| {
            let owner = self.cells[a].owner()?;
            (self.cells[b] == self.cells[a] && self.cells[c] == self.cells[a]).then_some(owner)
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(GRID_SIZE).enumerate() {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            for (col, cell) in cells.iter().enumerate() {
                if col > 0 {
                    write!(f, "|")?;
                }
                let ch = match cell {
                    Cell::Empty => ' ',
                    Cell::One => 'X',
                    Cell::Two => 'O',
                };
                write!(f, " {ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(digits: [u8; CELL_COUNT]) -> Grid {
        Grid::from_cells(digits.map(|d| Cell::from_digit(d).unwrap()))
    }

    #[test]
    fn test_empty_grid_has_all_cells_free() {
        let grid = Grid::EMPTY;
        assert_eq!(grid.empty_cells().len(), CELL_COUNT);
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(grid.winner(), None);
        assert_eq!(grid.empty_cells()[0], Coord::new(0, 0));
        assert_eq!(grid.empty_cells()[8], Coord::new(2, 2));
    }

    #[test]
    fn test_marked_rejects_taken_and_off_grid_cells() {
        let grid = Grid::EMPTY.marked(Coord::new(1, 1), PlayerNum::One).unwrap();
        assert_eq!(grid.get(Coord::new(1, 1)), Some(Cell::One));
        assert!(grid.marked(Coord::new(1, 1), PlayerNum::Two).is_none());
        assert!(grid.marked(Coord::new(3, 0), PlayerNum::Two).is_none());
        assert!(grid.marked(Coord::new(0, 3), PlayerNum::Two).is_none());
    }

    #[test]
    fn test_winner_detects_every_line() {
        for line in LINES {
            let mut digits = [0; CELL_COUNT];
            for i in line {
                digits[i] = 2;
            }
            assert_eq!(grid_from(digits).winner(), Some(PlayerNum::Two), "{line:?}");
        }
    }

    #[test]
    fn test_mixed_line_has_no_winner() {
        let grid = grid_from([1, 1, 2, 0, 0, 0, 0, 0, 0]);
        assert_eq!(grid.winner(), None);
    }

    #[test]
    fn test_full_grid_without_line() {
        let grid = grid_from([1, 2, 1, 1, 2, 2, 2, 1, 1]);
        assert!(grid.is_full());
        assert_eq!(grid.winner(), None);
        assert!(grid.empty_cells().is_empty());
    }

    #[test]
    fn test_coord_cell_index_roundtrip() {
        for i in 0..CELL_COUNT {
            assert_eq!(Coord::from_cell_index(i).cell_index(), Some(i));
        }
        assert_eq!(Coord::new(2, 3).cell_index(), None);
    }

    #[test]
    fn test_display_uses_player_marks() {
        let grid = grid_from([1, 0, 0, 0, 2, 0, 0, 0, 0]);
        let text = grid.to_string();
        assert!(text.starts_with(" X |   |   \n"));
        assert!(text.contains("   | O |   "));
    }
}
