extern crate alloc;
extern crate std;

use alloc::vec;
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug)]
struct KeyMatrixInner {
    columns: usize,
    switches: Vec<bool>,
    driven: Vec<bool>,
    max_driven: usize,
    row_writes: usize,
}

/// A simulated diode matrix. Row pins drive, column pins read high where a closed switch
/// connects them to a driven row.
#[derive(Clone)]
pub struct KeyMatrix {
    inner: Rc<RefCell<KeyMatrixInner>>,
}
impl KeyMatrix {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(KeyMatrixInner {
                columns,
                switches: vec![false; rows * columns],
                driven: vec![false; rows],
                max_driven: 0,
                row_writes: 0,
            })),
        }
    }

    pub fn row_pins<const ROWS: usize>(&self) -> [RowPin; ROWS] {
        core::array::from_fn(|row| RowPin {
            matrix: self.clone(),
            row,
        })
    }

    pub fn column_pins<const COLS: usize>(&self) -> [ColumnPin; COLS] {
        core::array::from_fn(|column| ColumnPin {
            matrix: self.clone(),
            column,
        })
    }

    pub fn down(&self, row: usize, column: usize) {
        self.set_switch(row, column, true);
    }

    pub fn up(&self, row: usize, column: usize) {
        self.set_switch(row, column, false);
    }

    pub fn set_switch(&self, row: usize, column: usize, is_down: bool) {
        let mut inner = self.inner.borrow_mut();
        let idx = row * inner.columns + column;
        inner.switches[idx] = is_down;
    }

    /// Most rows ever driven at the same time.
    pub fn max_rows_driven(&self) -> usize {
        self.inner.borrow().max_driven
    }

    pub fn rows_driven(&self) -> usize {
        self.inner.borrow().driven.iter().filter(|d| **d).count()
    }

    pub fn row_writes(&self) -> usize {
        self.inner.borrow().row_writes
    }

    fn drive(&self, row: usize, high: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.row_writes += 1;
        inner.driven[row] = high;
        let n = inner.driven.iter().filter(|d| **d).count();
        if n > inner.max_driven {
            inner.max_driven = n;
        }
    }

    fn read(&self, column: usize) -> bool {
        let inner = self.inner.borrow();
        inner
            .driven
            .iter()
            .enumerate()
            .any(|(row, d)| *d && inner.switches[row * inner.columns + column])
    }
}

pub struct RowPin {
    matrix: KeyMatrix,
    row: usize,
}
impl ErrorType for RowPin {
    type Error = Infallible;
}
impl OutputPin for RowPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.matrix.drive(self.row, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.matrix.drive(self.row, true);
        Ok(())
    }
}

pub struct ColumnPin {
    matrix: KeyMatrix,
    column: usize,
}
impl ErrorType for ColumnPin {
    type Error = Infallible;
}
impl InputPin for ColumnPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.matrix.read(self.column))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.matrix.read(self.column))
    }
}

/// Settle delay that returns at once and counts how often it was asked to wait.
#[derive(Clone, Default)]
pub struct NoDelay(Rc<RefCell<usize>>);
impl NoDelay {
    pub fn count(&self) -> usize {
        *self.0.borrow()
    }
}
impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        *self.0.borrow_mut() += 1;
    }
}
