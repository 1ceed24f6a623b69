//! Ways to ask for a reboot into the bootloader.

use crate::{
    layout::{Cell, KeyTable},
    report::KeyboardReport,
};

/// A board-level button that requests the bootloader, polled once per tick.
pub trait ReflashButton {
    fn is_pressed(&mut self) -> bool;
}

/// For boards without a button.
pub struct NoReflashButton;
impl ReflashButton for NoReflashButton {
    fn is_pressed(&mut self) -> bool {
        false
    }
}

impl<F: FnMut() -> bool> ReflashButton for F {
    fn is_pressed(&mut self) -> bool {
        self()
    }
}

/// Key chord on the master half that requests the bootloader.
///
/// The chord fires when the whole report equals the report of these cells pressed on the
/// master's own table: extra keys, including ones from the other half, prevent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicChord {
    cells: [Cell; 4],
}

impl MagicChord {
    pub const fn new(cells: [Cell; 4]) -> Self {
        Self { cells }
    }

    /// The four corners of the block spanning rows `0..=bottom_row` and columns
    /// `0..=last_column`.
    pub const fn corners(bottom_row: u8, last_column: u8) -> Self {
        Self::new([
            Cell::new(0, 0),
            Cell::new(bottom_row, 0),
            Cell::new(0, last_column),
            Cell::new(bottom_row, last_column),
        ])
    }

    pub fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    /// The report the chord produces on `table`; `None` if every cell maps to no key, which
    /// disables the chord.
    pub fn pattern<const ROWS: usize, const COLS: usize>(
        &self,
        table: &KeyTable<ROWS, COLS>,
    ) -> Option<KeyboardReport> {
        let report = KeyboardReport::from_keys(self.cells.iter().map(|c| table.get(*c)));
        (!report.is_empty()).then_some(report)
    }
}

#[cfg(test)]
#[path = "reflash_test.rs"]
mod test;
