#![no_std]

#[cfg(feature = "rp")]
pub mod rp;

#[cfg(feature = "defmt")]
use defmt_rtt as _;

pub use split_common::{globals, keycodes, link_format};
pub use split_firmware::*;
pub use static_cell::StaticCell;
