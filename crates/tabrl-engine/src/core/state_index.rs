use serde::{Deserialize, Serialize};

use super::grid::{CELL_COUNT, Cell, Grid};

/// Dense integer key of a grid position, in `0..StateIndex::COUNT`.
///
/// Each cell is read as a base-3 digit ([`Cell::digit`]) and the digits are
/// weighted most-significant first: cell `(0, 0)` carries weight `3^8`, cell
/// `(2, 2)` carries weight `1`. The mapping is a bijection between grids and
/// indices.
///
/// The index says nothing about whose turn it is. Two grids with the same cell
/// pattern always share an index, so callers that need turn information must
/// track it separately.
///
/// # Example
///
/// ```
/// use tabrl_engine::{Coord, Grid, PlayerNum, StateIndex};
///
/// let grid = Grid::EMPTY.marked(Coord::new(2, 2), PlayerNum::Two).unwrap();
/// let index = StateIndex::encode(&grid);
/// assert_eq!(index.get(), 2);
/// assert_eq!(index.decode(), grid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateIndex(u16);

impl StateIndex {
    /// Number of distinct indices (`3^9`).
    pub const COUNT: usize = 3_usize.pow(CELL_COUNT as u32);

    /// Index of the empty grid.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw index, returning `None` if it is outside `0..COUNT`.
    #[must_use]
    pub fn new(raw: usize) -> Option<Self> {
        if raw < Self::COUNT {
            u16::try_from(raw).ok().map(Self)
        } else {
            None
        }
    }

    #[must_use]
    pub fn encode(grid: &Grid) -> Self {
        let raw = grid
            .cells()
            .iter()
            .fold(0_u16, |acc, cell| acc * 3 + u16::from(cell.digit()));
        Self(raw)
    }

    #[must_use]
    pub fn decode(self) -> Grid {
        let mut cells = [Cell::Empty; CELL_COUNT];
        let mut rest = self.0;
        for cell in cells.iter_mut().rev() {
            #[expect(clippy::cast_possible_truncation)]
            let digit = (rest % 3) as u8;
            // digit < 3 by construction
            *cell = Cell::from_digit(digit).unwrap_or_default();
            rest /= 3;
        }
        Grid::from_cells(cells)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// The index as a table position.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}
