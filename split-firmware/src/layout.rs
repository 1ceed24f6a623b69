//! Per-half key tables and the cell addressing shared by the scanner and the link.

use split_common::{keycodes::KeyCode, link_format::MAX_CELLS};

/// Which physical half this firmware image is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

/// A matrix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub row: u8,
    pub column: u8,
}
impl Cell {
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    /// Row-major index of the cell in a matrix `COLS` wide.
    pub const fn ordinal<const COLS: usize>(self) -> u8 {
        (self.row as usize * COLS + self.column as usize) as u8
    }

    /// Inverse of [Cell::ordinal]. `None` when the ordinal lies past the last row.
    pub const fn from_ordinal<const ROWS: usize, const COLS: usize>(ordinal: u8) -> Option<Self> {
        let row = ordinal as usize / COLS;
        if row >= ROWS {
            return None;
        }
        Some(Self::new(row as u8, (ordinal as usize % COLS) as u8))
    }
}

/// Key codes of one half, indexed `[row][column]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTable<const ROWS: usize, const COLS: usize>([[KeyCode; COLS]; ROWS]);

impl<const ROWS: usize, const COLS: usize> KeyTable<ROWS, COLS> {
    pub const fn new(keys: [[KeyCode; COLS]; ROWS]) -> Self {
        assert!(ROWS > 0 && COLS > 0, "empty matrix");
        assert!(ROWS * COLS <= MAX_CELLS, "matrix too large for the link format");
        Self(keys)
    }

    pub const fn empty() -> Self {
        Self::new([[KeyCode::NONE; COLS]; ROWS])
    }

    /// Key at `cell`; [KeyCode::NONE] for cells outside the table.
    pub fn get(&self, cell: Cell) -> KeyCode {
        self.0
            .get(cell.row as usize)
            .and_then(|r| r.get(cell.column as usize))
            .copied()
            .unwrap_or(KeyCode::NONE)
    }
}

/// The tables as seen from one half: `this` for locally scanned cells and `other` for
/// cells reported over the link.
#[derive(Debug, Clone, Copy)]
pub struct HalfLayout<'l, const ROWS: usize, const COLS: usize> {
    pub side: Side,
    pub this: &'l KeyTable<ROWS, COLS>,
    pub other: &'l KeyTable<ROWS, COLS>,
}

impl<'l, const ROWS: usize, const COLS: usize> HalfLayout<'l, ROWS, COLS> {
    pub const fn for_side(
        side: Side,
        left: &'l KeyTable<ROWS, COLS>,
        right: &'l KeyTable<ROWS, COLS>,
    ) -> Self {
        match side {
            Side::Left => Self {
                side,
                this: left,
                other: right,
            },
            Side::Right => Self {
                side,
                this: right,
                other: left,
            },
        }
    }
}

/// Build a [KeyTable] from rows of [KeyCode] constant names.
///
/// ```ignore
/// const LEFT: KeyTable<2, 3> = key_table![
///     [ESCAPE, N1, N2],
///     [TAB, Q, W],
/// ];
/// ```
#[macro_export]
macro_rules! key_table {
    ($([$($key:ident),* $(,)?]),* $(,)?) => {
        $crate::layout::KeyTable::new([$([$($crate::KeyCode::$key),*]),*])
    };
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod test;
