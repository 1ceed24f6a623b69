//! Wire format of the half-to-half serial link.
//!
//! Every debounced transition travels as one byte: the cell ordinal
//! (`row * columns + column`) in the low seven bits and the pressed flag in bit 7.
//! There is no framing, acknowledgement or sequence number.

/// Set when the key went down.
pub const PRESSED_FLAG: u8 = 0x80;
/// Mask selecting the cell ordinal.
pub const ORDINAL_MASK: u8 = 0x7f;
/// Number of cells addressable by one byte.
pub const MAX_CELLS: usize = ORDINAL_MASK as usize + 1;

pub const BAUDRATE: u32 = 115_200;
/// Received bytes held for the master before new ones are dropped.
pub const QUEUE_CAPACITY: usize = 16;

pub const fn encode(ordinal: u8, pressed: bool) -> u8 {
    (ordinal & ORDINAL_MASK) | if pressed { PRESSED_FLAG } else { 0 }
}

/// Split a link byte into `(ordinal, pressed)`.
pub const fn decode(byte: u8) -> (u8, bool) {
    (byte & ORDINAL_MASK, byte & PRESSED_FLAG != 0)
}

#[cfg(test)]
#[path = "link_format_test.rs"]
mod test;
