//! The half-to-half serial link: event bytes, the receive queue and the receiver task.

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embedded_io_async::Read;
use split_common::link_format;

use crate::{key_scanner::ScanKey, layout::Cell};

/// One key transition as carried over the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkEvent {
    ordinal: u8,
    pressed: bool,
}

impl LinkEvent {
    pub const fn new(ordinal: u8, pressed: bool) -> Self {
        Self {
            ordinal: ordinal & link_format::ORDINAL_MASK,
            pressed,
        }
    }

    pub fn from_scan_key<const COLS: usize>(key: ScanKey) -> Self {
        Self::new(key.cell().ordinal::<COLS>(), key.is_down())
    }

    pub const fn decode(byte: u8) -> Self {
        let (ordinal, pressed) = link_format::decode(byte);
        Self { ordinal, pressed }
    }

    pub const fn encode(self) -> u8 {
        link_format::encode(self.ordinal, self.pressed)
    }

    pub fn ordinal(&self) -> u8 {
        self.ordinal
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The transition on a `ROWS` x `COLS` matrix, or `None` if the ordinal is out of range.
    pub fn scan_key<const ROWS: usize, const COLS: usize>(self) -> Option<ScanKey> {
        let cell = Cell::from_ordinal::<ROWS, COLS>(self.ordinal)?;
        Some(ScanKey::new(cell.row, cell.column, self.pressed))
    }
}

/// Bytes received from the other half, waiting for the master's next tick.
///
/// Filled by [LinkReceiver] and drained by the controller. When full, new bytes are dropped.
pub struct LinkQueue<M: RawMutex, const N: usize>(Channel<M, u8, N>);

impl<M: RawMutex, const N: usize> Default for LinkQueue<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}

impl<M: RawMutex, const N: usize> LinkQueue<M, N> {
    pub const fn new() -> Self {
        Self(Channel::new())
    }

    /// Queue a received byte. Returns false if the queue was full and the byte dropped.
    pub fn push(&self, byte: u8) -> bool {
        match self.0.try_send(byte) {
            Ok(()) => true,
            Err(_) => {
                crate::debug!("link queue full; dropped {}", byte);
                false
            }
        }
    }

    pub fn pop(&self) -> Option<u8> {
        self.0.try_receive().ok()
    }

    /// Pop bytes until the queue is empty.
    pub fn drain(&self) -> impl Iterator<Item = u8> + '_ {
        core::iter::from_fn(|| self.pop())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Moves bytes from the serial receiver into a [LinkQueue].
pub struct LinkReceiver<'q, R: Read, M: RawMutex, const N: usize> {
    rx: R,
    queue: &'q LinkQueue<M, N>,
}

impl<'q, R: Read, M: RawMutex, const N: usize> LinkReceiver<'q, R, M, N> {
    pub fn new(rx: R, queue: &'q LinkQueue<M, N>) -> Self {
        Self { rx, queue }
    }

    /// Runs until the receiver reports end of stream. Read errors (framing, parity, overrun)
    /// are logged and reception continues.
    pub async fn run(&mut self) {
        let mut buf = [0u8; N];
        loop {
            match self.rx.read(&mut buf).await {
                Ok(0) => return,
                Ok(n) => {
                    for byte in &buf[..n] {
                        self.queue.push(*byte);
                    }
                }
                Err(_) => crate::warn!("link receive error"),
            }
        }
    }
}

#[cfg(test)]
#[path = "link_test.rs"]
mod test;
