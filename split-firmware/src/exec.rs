use embassy_futures::select::{select, select3, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Duration};
use embassy_usb::{driver::Driver, Config, UsbDevice};
use embedded_hal::digital::{InputPin, OutputPin};
use split_common::{
    globals::{DEBOUNCE_TICKS_DEFAULT, TICK_PERIOD_US_DEFAULT},
    link_format::QUEUE_CAPACITY,
};
use static_cell::StaticCell;

use crate::{
    controller::{RoleSelect, SplitController},
    firmware_functions::{self, ResetFn},
    key_scanner::KeyScanner,
    layout::HalfLayout,
    link::{LinkQueue, LinkReceiver},
    reflash::{MagicChord, NoReflashButton, ReflashButton},
    usb::{Configurator, HidState, UsbBuffers, UsbEvents, UsbHidTransport, UsbStatus},
};

type Queue = LinkQueue<CriticalSectionRawMutex, QUEUE_CAPACITY>;

static LINK_QUEUE: Queue = Queue::new();
static USB_STATUS: UsbStatus = UsbStatus::new();

static USB_EVENTS: StaticCell<UsbEvents<'static>> = StaticCell::new();
static USB_BUFFERS: StaticCell<UsbBuffers> = StaticCell::new();
static HID_STATE: StaticCell<HidState<'static>> = StaticCell::new();

async fn usb_run<'d, D: Driver<'d>>(mut usb: UsbDevice<'d, D>, status: &UsbStatus) -> ! {
    loop {
        usb.run_until_suspend().await;
        match select(usb.wait_resume(), status.wait_wakeup()).await {
            Either::First(()) => status.clear_wakeup(),
            Either::Second(()) => {
                if let Err(err) = usb.remote_wakeup().await {
                    crate::warn!("remote wakeup failed: {:?}", err);
                }
            }
        }
    }
}

/// Collects the board specifics for one half and runs it.
///
/// ```ignore
/// SplitKeyboardBuilder::new(0x1209, 0x0001, driver, rows, cols, tx, rx, layout)
///     .reflash_button(bootsel)
///     .reset_to_usb_boot(&reset_to_usb_boot)
///     .run()
///     .await
/// ```
pub struct SplitKeyboardBuilder<
    D: Driver<'static>,
    I: InputPin,
    O: OutputPin,
    T: embedded_io::Write,
    R: embedded_io_async::Read,
    B: ReflashButton,
    const ROWS: usize,
    const COLS: usize,
> {
    reset: Option<ResetFn>,
    reset_to_usb_boot: Option<ResetFn>,
    usb_config: Config<'static>,
    driver: D,
    row_pins: [O; ROWS],
    column_pins: [I; COLS],
    link_tx: T,
    link_rx: R,
    reflash_button: B,
    layout: HalfLayout<'static, ROWS, COLS>,
    role: RoleSelect,
    debounce_ticks: u8,
    tick_period: Duration,
    magic_chord: Option<MagicChord>,
}

impl<
        D: Driver<'static>,
        I: InputPin,
        O: OutputPin,
        T: embedded_io::Write,
        R: embedded_io_async::Read,
        const ROWS: usize,
        const COLS: usize,
    > SplitKeyboardBuilder<D, I, O, T, R, NoReflashButton, ROWS, COLS>
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vid: u16,
        pid: u16,
        driver: D,
        row_pins: [O; ROWS],
        column_pins: [I; COLS],
        link_tx: T,
        link_rx: R,
        layout: HalfLayout<'static, ROWS, COLS>,
    ) -> Self {
        Self {
            reset: None,
            reset_to_usb_boot: None,
            usb_config: Config::new(vid, pid),
            driver,
            row_pins,
            column_pins,
            link_tx,
            link_rx,
            reflash_button: NoReflashButton,
            layout,
            role: RoleSelect::Auto,
            debounce_ticks: DEBOUNCE_TICKS_DEFAULT,
            tick_period: Duration::from_micros(TICK_PERIOD_US_DEFAULT),
            magic_chord: Some(MagicChord::corners(3, COLS as u8 - 1)),
        }
    }
}

impl<
        D: Driver<'static>,
        I: InputPin,
        O: OutputPin,
        T: embedded_io::Write,
        R: embedded_io_async::Read,
        B: ReflashButton,
        const ROWS: usize,
        const COLS: usize,
    > SplitKeyboardBuilder<D, I, O, T, R, B, ROWS, COLS>
{
    pub fn reflash_button<B2: ReflashButton>(
        self,
        value: B2,
    ) -> SplitKeyboardBuilder<D, I, O, T, R, B2, ROWS, COLS> {
        SplitKeyboardBuilder {
            reset: self.reset,
            reset_to_usb_boot: self.reset_to_usb_boot,
            usb_config: self.usb_config,
            driver: self.driver,
            row_pins: self.row_pins,
            column_pins: self.column_pins,
            link_tx: self.link_tx,
            link_rx: self.link_rx,
            reflash_button: value,
            layout: self.layout,
            role: self.role,
            debounce_ticks: self.debounce_ticks,
            tick_period: self.tick_period,
            magic_chord: self.magic_chord,
        }
    }

    pub fn role(mut self, value: RoleSelect) -> Self {
        self.role = value;
        self
    }

    pub fn debounce_ticks(mut self, value: u8) -> Self {
        self.debounce_ticks = value;
        self
    }

    pub fn tick_period(mut self, value: Duration) -> Self {
        self.tick_period = value;
        self
    }

    /// Cells of the bootloader chord; `None` turns the chord off.
    pub fn magic_chord(mut self, value: Option<MagicChord>) -> Self {
        self.magic_chord = value;
        self
    }

    pub fn reset(mut self, value: ResetFn) -> Self {
        self.reset = Some(value);
        self
    }

    pub fn reset_to_usb_boot(mut self, value: ResetFn) -> Self {
        self.reset_to_usb_boot = Some(value);
        self
    }

    pub fn manufacturer(mut self, value: &'static str) -> Self {
        self.usb_config.manufacturer = Some(value);
        self
    }

    pub fn product(mut self, value: &'static str) -> Self {
        self.usb_config.product = Some(value);
        self
    }

    pub fn serial_number(mut self, value: &'static str) -> Self {
        self.usb_config.serial_number = Some(value);
        self
    }

    pub fn max_power(mut self, value: u16) -> Self {
        self.usb_config.max_power = value;
        self
    }

    /// Run the keyboard. Only a reboot ends it.
    ///
    /// Must be called at most once.
    pub async fn run(self) -> ! {
        firmware_functions::handle_reset(self.reset);
        firmware_functions::handle_reset_to_usb_boot(self.reset_to_usb_boot);

        let configurator = Configurator::new(self.usb_config);
        let mut usb_builder =
            configurator.usb_builder(self.driver, USB_BUFFERS.init(UsbBuffers::default()));
        usb_builder.handler(USB_EVENTS.init(UsbEvents::new(&USB_STATUS)));
        let hid_writer = configurator.add_keyboard(&mut usb_builder, HID_STATE.init(HidState::new()));
        let usb = usb_builder.build();

        let scanner = KeyScanner::new(self.row_pins, self.column_pins, Delay, self.debounce_ticks);
        let mut controller = SplitController::new(
            scanner,
            self.layout,
            &LINK_QUEUE,
            UsbHidTransport::new(hid_writer, &USB_STATUS),
            self.link_tx,
            self.reflash_button,
            self.role,
            self.magic_chord,
        );
        let mut receiver = LinkReceiver::new(self.link_rx, &LINK_QUEUE);

        crate::info!("keyboard started: {:?} half", self.layout.side);

        let link_fut = async {
            receiver.run().await;
            crate::warn!("link receiver stopped");
            core::future::pending::<()>().await
        };

        select3(
            usb_run(usb, &USB_STATUS),
            link_fut,
            controller.run(self.tick_period),
        )
        .await;

        crate::info!("rebooting to bootloader");
        firmware_functions::reset_to_usb_boot();
        loop {
            core::future::pending::<()>().await;
        }
    }
}
