/// Per-cell hold-off debouncer.
///
/// A cell accepts the first raw level that differs from its accepted state and then ignores
/// the switch for `threshold` further observations. The hold counter only runs down while the
/// cell is observed, so one observation per scan makes the window a number of ticks.
pub struct Debouncer<const ROWS: usize, const COLS: usize> {
    hold: [[u8; COLS]; ROWS],
    state: [[bool; COLS]; ROWS],
    threshold: u8,
}

impl<const ROWS: usize, const COLS: usize> Debouncer<ROWS, COLS> {
    pub const fn new(threshold: u8) -> Self {
        Self {
            hold: [[0; COLS]; ROWS],
            state: [[false; COLS]; ROWS],
            threshold,
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Feed one raw sample for a cell. Returns the new state when a transition is accepted.
    pub fn observe(&mut self, row: usize, column: usize, raw: bool) -> Option<bool> {
        let hold = &mut self.hold[row][column];
        if *hold > 0 {
            *hold -= 1;
            return None;
        }

        let state = &mut self.state[row][column];
        if *state == raw {
            return None;
        }
        *state = raw;
        *hold = self.threshold;
        Some(raw)
    }

    pub fn is_down(&self, row: usize, column: usize) -> bool {
        self.state[row][column]
    }

    /// `(row, column)` of every cell whose accepted state is down.
    pub fn down_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.state.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter(|(_, down)| **down)
                .map(move |(column, _)| (row, column))
        })
    }
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod test;
