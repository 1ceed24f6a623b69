use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use split_common::globals::ROW_SETTLE_US;

use crate::{debounce::Debouncer, layout::Cell};

/// A debounced switch transition. Bit 7 of the row carries the key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanKey {
    row: u8,
    col: u8,
}
impl ScanKey {
    pub fn new(row: u8, col: u8, is_down: bool) -> Self {
        Self {
            row: row | if is_down { 0x80 } else { 0 },
            col,
        }
    }

    pub fn row(&self) -> usize {
        (self.row & 0x7f) as usize
    }

    pub fn column(&self) -> usize {
        self.col as usize
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.row & 0x7f, self.col)
    }

    pub fn is_down(&self) -> bool {
        self.row & 0x80 == 0x80
    }
}

/// Scans a row-driven matrix. Rows are driven high one at a time and columns, pulled down,
/// read high where a switch is closed.
pub struct KeyScanner<I: InputPin, O: OutputPin, D: DelayNs, const ROWS: usize, const COLS: usize>
{
    row_pins: [O; ROWS],
    column_pins: [I; COLS],
    delay: D,
    debouncer: Debouncer<ROWS, COLS>,
}

impl<I: InputPin, O: OutputPin, D: DelayNs, const ROWS: usize, const COLS: usize>
    KeyScanner<I, O, D, ROWS, COLS>
{
    pub fn new(
        mut row_pins: [O; ROWS],
        column_pins: [I; COLS],
        delay: D,
        debounce_ticks: u8,
    ) -> Self {
        for pin in row_pins.iter_mut() {
            pin.set_low().ok();
        }
        Self {
            row_pins,
            column_pins,
            delay,
            debouncer: Debouncer::new(debounce_ticks),
        }
    }

    /// One pass over the matrix. `on_change` sees each accepted transition in row-major order.
    ///
    /// At most one row is driven at any time. A column read error counts as an open switch.
    pub async fn scan(&mut self, mut on_change: impl FnMut(ScanKey)) {
        for (row, row_pin) in self.row_pins.iter_mut().enumerate() {
            row_pin.set_high().ok();
            self.delay.delay_us(ROW_SETTLE_US).await;

            for (column, column_pin) in self.column_pins.iter_mut().enumerate() {
                let raw = column_pin.is_high().unwrap_or(false);
                if let Some(is_down) = self.debouncer.observe(row, column, raw) {
                    on_change(ScanKey::new(row as u8, column as u8, is_down));
                }
            }

            row_pin.set_low().ok();
        }
    }

    /// Cells whose debounced state is down.
    pub fn down_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.debouncer
            .down_cells()
            .map(|(row, column)| Cell::new(row as u8, column as u8))
    }

    pub fn is_down(&self, cell: Cell) -> bool {
        self.debouncer
            .is_down(cell.row as usize, cell.column as usize)
    }
}

#[cfg(test)]
#[path = "key_scanner_test.rs"]
mod test;
