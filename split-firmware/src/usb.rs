use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_usb::{
    class::hid::{self, HidWriter},
    driver::Driver,
    Builder, Config, Handler,
};

use crate::report::REPORT_SIZE;

pub use hid::State as HidState;

/// Boot-style keyboard without a report id: one modifier byte then one bit per usage
/// `0x04..=0x6B`.
#[rustfmt::skip]
pub const KEYBOARD_REPORT_DESC: [u8; 39] = [
    0x05, 0x01, // (GLOBAL) USAGE_PAGE         0x0001 Generic Desktop Page
    0x09, 0x06, // (LOCAL)  USAGE              0x00010006 Keyboard (Application Collection)
    0xA1, 0x01, // (MAIN)   COLLECTION         0x01 Application
    0x05, 0x07, //   (GLOBAL) USAGE_PAGE         0x0007 Keyboard/Keypad Page
    0x19, 0xE0, //   (LOCAL)  USAGE_MINIMUM      0x000700E0 Keyboard LeftControl
    0x29, 0xE7, //   (LOCAL)  USAGE_MAXIMUM      0x000700E7 Keyboard Right GUI
    0x15, 0x00, //   (GLOBAL) LOGICAL_MINIMUM    0x00 (0)
    0x25, 0x01, //   (GLOBAL) LOGICAL_MAXIMUM    0x01 (1)
    0x95, 0x08, //   (GLOBAL) REPORT_COUNT       0x08 (8) Number of fields
    0x75, 0x01, //   (GLOBAL) REPORT_SIZE        0x01 (1) Number of bits per field
    0x81, 0x02, //   (MAIN)   INPUT              0x00000002 (8 fields x 1 bit) Data Variable Absolute
    0x05, 0x07, //   (GLOBAL) USAGE_PAGE         0x0007 Keyboard/Keypad Page
    0x19, 0x04, //   (LOCAL)  USAGE_MINIMUM      0x00070004 Keyboard a and A
    0x29, 0x6B, //   (LOCAL)  USAGE_MAXIMUM      0x0007006B Keyboard F16
    0x15, 0x00, //   (GLOBAL) LOGICAL_MINIMUM    0x00 (0)
    0x25, 0x01, //   (GLOBAL) LOGICAL_MAXIMUM    0x01 (1)
    0x95, 0x68, //   (GLOBAL) REPORT_COUNT       0x68 (104) Number of fields
    0x75, 0x01, //   (GLOBAL) REPORT_SIZE        0x01 (1) Number of bits per field
    0x81, 0x02, //   (MAIN)   INPUT              0x00000002 (104 fields x 1 bit) Data Variable Absolute
    0xC0,       // (MAIN)   END_COLLECTION     Application
];

/// What the master needs from the host connection.
#[allow(async_fn_in_trait)]
pub trait HidTransport {
    /// Host has configured the device.
    fn is_mounted(&self) -> bool;
    fn is_suspended(&self) -> bool;
    /// A report may be submitted now.
    fn is_ready(&self) -> bool;
    fn request_remote_wakeup(&mut self);
    /// Send one report. Returns false if it was not accepted.
    async fn submit_report(&mut self, report: &[u8]) -> bool;
}

/// Device state shared between the USB device task and the controller.
pub struct UsbStatus {
    configured: AtomicBool,
    suspended: AtomicBool,
    remote_wakeup_enabled: AtomicBool,
    wakeup: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for UsbStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl UsbStatus {
    pub const fn new() -> Self {
        Self {
            configured: AtomicBool::new(false),
            suspended: AtomicBool::new(false),
            remote_wakeup_enabled: AtomicBool::new(false),
            wakeup: Signal::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::Relaxed)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Relaxed)
    }

    pub fn remote_wakeup_enabled(&self) -> bool {
        self.remote_wakeup_enabled.load(Ordering::Relaxed)
    }

    pub fn request_wakeup(&self) {
        self.wakeup.signal(());
    }

    pub fn clear_wakeup(&self) {
        self.wakeup.reset();
    }

    pub async fn wait_wakeup(&self) {
        self.wakeup.wait().await
    }
}

/// Device event handler feeding [UsbStatus].
pub struct UsbEvents<'s> {
    status: &'s UsbStatus,
}

impl<'s> UsbEvents<'s> {
    pub fn new(status: &'s UsbStatus) -> Self {
        Self { status }
    }
}

impl Handler for UsbEvents<'_> {
    fn enabled(&mut self, enabled: bool) {
        self.status.configured.store(false, Ordering::Relaxed);
        self.status.suspended.store(false, Ordering::Relaxed);
        crate::debug!("USB enabled {}", enabled);
    }

    fn reset(&mut self) {
        self.status.configured.store(false, Ordering::Relaxed);
        self.status.suspended.store(false, Ordering::Relaxed);
        crate::debug!("USB bus reset");
    }

    fn addressed(&mut self, addr: u8) {
        self.status.configured.store(false, Ordering::Relaxed);
        crate::debug!("USB address {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        self.status.configured.store(configured, Ordering::Relaxed);
        crate::info!("USB configured {}", configured);
    }

    fn suspended(&mut self, suspended: bool) {
        self.status.suspended.store(suspended, Ordering::Relaxed);
        crate::debug!("USB suspended {}", suspended);
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        self.status
            .remote_wakeup_enabled
            .store(enabled, Ordering::Relaxed);
    }
}

/// [HidTransport] over the embassy-usb HID class.
pub struct UsbHidTransport<'d, D: Driver<'d>> {
    writer: HidWriter<'d, D, REPORT_SIZE>,
    status: &'d UsbStatus,
}

impl<'d, D: Driver<'d>> UsbHidTransport<'d, D> {
    pub fn new(writer: HidWriter<'d, D, REPORT_SIZE>, status: &'d UsbStatus) -> Self {
        Self { writer, status }
    }
}

impl<'d, D: Driver<'d>> HidTransport for UsbHidTransport<'d, D> {
    fn is_mounted(&self) -> bool {
        self.status.is_configured()
    }

    fn is_suspended(&self) -> bool {
        self.status.is_suspended()
    }

    fn is_ready(&self) -> bool {
        self.status.is_configured() && !self.status.is_suspended()
    }

    fn request_remote_wakeup(&mut self) {
        if self.status.remote_wakeup_enabled() {
            self.status.request_wakeup();
        } else {
            crate::debug!("remote wakeup not enabled by host");
        }
    }

    async fn submit_report(&mut self, report: &[u8]) -> bool {
        match self.writer.write(report).await {
            Ok(()) => true,
            Err(err) => {
                crate::warn!("Failed to send report: {:?}", err);
                false
            }
        }
    }
}

const CONFIG_SIZE: usize = 128;
const BOS_SIZE: usize = 32;
const MSOS_SIZE: usize = 0;
const CONTROL_SIZE: usize = 64;

pub struct UsbBuffers {
    config_descriptor_buf: [u8; CONFIG_SIZE],
    bos_descriptor_buf: [u8; BOS_SIZE],
    msos_descriptor_buf: [u8; MSOS_SIZE],
    control_buf: [u8; CONTROL_SIZE],
}

impl Default for UsbBuffers {
    fn default() -> Self {
        Self {
            config_descriptor_buf: [0; CONFIG_SIZE],
            bos_descriptor_buf: [0; BOS_SIZE],
            msos_descriptor_buf: [0; MSOS_SIZE],
            control_buf: [0; CONTROL_SIZE],
        }
    }
}

pub struct Configurator<'d> {
    device_config: Config<'d>,
    max_packet_size: u16,
    poll_ms: u8,
}

impl<'d> Configurator<'d> {
    pub fn new(mut device_config: Config<'d>) -> Self {
        device_config.supports_remote_wakeup = true;
        Self {
            device_config,
            max_packet_size: device_config.max_packet_size_0 as u16,
            poll_ms: 1,
        }
    }

    pub fn device_config(&self) -> &Config<'d> {
        &self.device_config
    }

    pub fn usb_builder<D: Driver<'d>>(&self, driver: D, buffers: &'d mut UsbBuffers) -> Builder<'d, D> {
        Builder::new(
            driver,
            self.device_config,
            &mut buffers.config_descriptor_buf,
            &mut buffers.bos_descriptor_buf,
            &mut buffers.msos_descriptor_buf,
            &mut buffers.control_buf,
        )
    }

    /// Add the keyboard interface with [KEYBOARD_REPORT_DESC].
    pub fn add_keyboard<D: Driver<'d>>(
        &self,
        builder: &mut Builder<'d, D>,
        state: &'d mut HidState<'d>,
    ) -> HidWriter<'d, D, REPORT_SIZE> {
        let config = hid::Config {
            report_descriptor: &KEYBOARD_REPORT_DESC,
            request_handler: None,
            poll_ms: self.poll_ms,
            max_packet_size: self.max_packet_size,
        };
        HidWriter::new(builder, state, config)
    }
}

#[cfg(test)]
#[path = "usb_test.rs"]
mod test;
