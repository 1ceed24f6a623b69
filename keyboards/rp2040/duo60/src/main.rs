#![no_std]
#![no_main]

use embassy_executor::Spawner;
use split_builder::{
    controller::RoleSelect,
    key_table,
    layout::{HalfLayout, KeyTable, Side},
    rp::{
        bind_interrupts,
        peripherals::{UART0, USB},
        uart::BufferedInterruptHandler,
        usb::{Driver, InterruptHandler},
        QspiBootselButton,
    },
    SplitKeyboardBuilder,
};

// ---------------- User Config ------------------

// USB config
const VENDOR_ID: u16 = 0xcafe;
const PRODUCT_ID: u16 = 0x4004;
const MANUFACTURER: &str = "duo60";
const PRODUCT: &str = "duo60 split keyboard";
const SERIAL_NUMBER: &str = "duo60:0001";
const MAX_POWER: u16 = 100;

// Which half this image is for; pick with `--features right`
#[cfg(not(feature = "right"))]
const SIDE: Side = Side::Left;
#[cfg(feature = "right")]
const SIDE: Side = Side::Right;

// ForceSlave keeps this half off the USB report even when plugged in
const ROLE: RoleSelect = RoleSelect::Auto;

static LEFT: KeyTable<5, 6> = key_table![
    [PAGE_DOWN, N0, N1, N2, N3, N4],
    [BACKSPACE, Q, W, E, R, T],
    [ALT_LEFT, A, S, D, F, G],
    [CONTROL_LEFT, Z, X, C, V, B],
    [NONE, NONE, GUI_LEFT, SHIFT_LEFT, SPACE, TAB],
];

static RIGHT: KeyTable<5, 6> = key_table![
    [N5, N6, N7, N8, N9, PAGE_UP],
    [Y, U, I, O, P, DELETE],
    [H, J, K, L, SEMICOLON, ALT_RIGHT],
    [N, M, COMMA, PERIOD, SLASH, CONTROL_RIGHT],
    [ESCAPE, ENTER, SHIFT_RIGHT, GUI_RIGHT, NONE, NONE],
];

#[cfg(not(feature = "right"))]
macro_rules! config_pins {
    (peripherals: $p:ident) => {
        split_builder::config_matrix_pins_rp!(peripherals: $p,
            rows: [PIN_2, PIN_5, PIN_8, PIN_15, PIN_10],
            columns: [PIN_9, PIN_14, PIN_6, PIN_7, PIN_3, PIN_28])
    };
}

#[cfg(feature = "right")]
macro_rules! config_pins {
    (peripherals: $p:ident) => {
        split_builder::config_matrix_pins_rp!(peripherals: $p,
            rows: [PIN_2, PIN_5, PIN_9, PIN_14, PIN_20],
            columns: [PIN_1, PIN_4, PIN_18, PIN_19, PIN_16, PIN_17])
    };
}

// ----------- End of user config ----------------

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let p = split_builder::rp::init(Default::default());

    let driver = Driver::new(p.USB, Irqs);

    let (row_pins, column_pins) = config_pins!(peripherals: p);
    let (link_tx, link_rx) = split_builder::config_link_uart_rp!(peripherals: p, irqs: Irqs,
        uart: UART0, tx: PIN_12, rx: PIN_13);

    SplitKeyboardBuilder::new(
        VENDOR_ID,
        PRODUCT_ID,
        driver,
        row_pins,
        column_pins,
        link_tx,
        link_rx,
        HalfLayout::for_side(SIDE, &LEFT, &RIGHT),
    )
    .reflash_button(QspiBootselButton::new(p.BOOTSEL))
    .role(ROLE)
    .reset(&split_builder::rp::reset)
    .reset_to_usb_boot(&split_builder::rp::reset_to_usb_boot)
    .manufacturer(MANUFACTURER)
    .product(PRODUCT)
    .serial_number(SERIAL_NUMBER)
    .max_power(MAX_POWER)
    .run()
    .await
}
