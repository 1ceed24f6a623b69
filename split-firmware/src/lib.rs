#![no_std]
#[macro_use]
mod macros;

pub mod controller;
pub mod debounce;
pub mod exec;
pub mod firmware_functions;
pub mod key_scanner;
pub mod layout;
pub mod link;
pub mod reflash;
pub mod report;
pub mod usb;

#[cfg(any(test, feature = "test-utils"))]
pub mod serial_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod switch_test_stub;
#[cfg(test)]
pub mod time_driver_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod usb_test_stub;

pub use exec::SplitKeyboardBuilder;
pub use split_common::keycodes::KeyCode;

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
