//! RP2040 board support: bootloader entry, BOOTSEL button probe and link UART settings.

pub use embassy_rp::*;

use embassy_rp::{
    peripherals,
    uart::{self, DataBits, Parity, StopBits},
    Peri,
};
use split_common::link_format::BAUDRATE;
use split_firmware::reflash::ReflashButton;

pub fn reset() {
    cortex_m::peripheral::SCB::sys_reset()
}

pub fn reset_to_usb_boot() {
    embassy_rp::rom_data::reset_to_usb_boot(0, 0);
    #[allow(clippy::empty_loop)]
    loop {
        // Waiting for the reset to happen
    }
}

/// 8 data bits, even parity, one stop bit.
pub fn link_uart_config() -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = BAUDRATE;
    config.data_bits = DataBits::DataBits8;
    config.stop_bits = StopBits::STOP1;
    config.parity = Parity::ParityEven;
    config
}

/// The BOOTSEL button, read through the flash chip-select line.
pub struct QspiBootselButton(Peri<'static, peripherals::BOOTSEL>);

impl QspiBootselButton {
    pub fn new(bootsel: Peri<'static, peripherals::BOOTSEL>) -> Self {
        Self(bootsel)
    }
}

impl ReflashButton for QspiBootselButton {
    fn is_pressed(&mut self) -> bool {
        embassy_rp::bootsel::is_bootsel_pressed(self.0.reborrow())
    }
}

/// Claim the matrix pins: rows as outputs driven low, columns as pulled-down inputs.
///
/// ```ignore
/// let (row_pins, column_pins) = config_matrix_pins_rp!(peripherals: p,
///     rows: [PIN_2, PIN_5], columns: [PIN_9, PIN_14]);
/// ```
#[macro_export]
macro_rules! config_matrix_pins_rp {
    (peripherals: $p:ident, rows: [$($row_pin:ident),+ $(,)?], columns: [$($col_pin:ident),+ $(,)?]) => {{
        use $crate::rp::gpio::{Input, Level, Output, Pull};
        let row_pins = [$(Output::new($p.$row_pin, Level::Low)),+];
        let column_pins = [$(Input::new($p.$col_pin, Pull::Down)),+];
        (row_pins, column_pins)
    }};
}

/// Open the half-to-half UART with [link_uart_config] and return its `(tx, rx)` halves.
///
/// `$irqs` must bind the UART interrupt to `BufferedInterruptHandler`.
#[macro_export]
macro_rules! config_link_uart_rp {
    (peripherals: $p:ident, irqs: $irqs:ident, uart: $uart:ident, tx: $tx:ident, rx: $rx:ident) => {{
        use $crate::rp::uart::BufferedUart;
        use $crate::StaticCell;
        static TX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
        static RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
        let uart = BufferedUart::new(
            $p.$uart,
            $p.$tx,
            $p.$rx,
            $irqs,
            &mut TX_BUF.init([0; 32])[..],
            &mut RX_BUF.init([0; 32])[..],
            $crate::rp::link_uart_config(),
        );
        uart.split()
    }};
}
