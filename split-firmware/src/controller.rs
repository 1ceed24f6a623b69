//! The per-tick driver for one half.
//!
//! Every tick the controller polls the reflash button and works out its role. A master scans
//! its own matrix, applies the other half's events from the link queue and reports to the
//! host. A slave only scans and forwards its transitions over the link.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::{
    key_scanner::KeyScanner,
    layout::HalfLayout,
    link::{LinkEvent, LinkQueue},
    reflash::{MagicChord, ReflashButton},
    report::KeyboardReport,
    usb::HidTransport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Connected to the host: merges both halves and sends reports.
    Master,
    /// Forwards its transitions to the master.
    Slave,
}

/// How the role is chosen each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoleSelect {
    /// Master while the host has the device mounted, slave otherwise.
    #[default]
    Auto,
    /// Always slave, even when plugged into a host.
    ForceSlave,
}

impl RoleSelect {
    pub fn resolve(self, mounted: bool) -> Role {
        match self {
            RoleSelect::Auto if mounted => Role::Master,
            _ => Role::Slave,
        }
    }
}

/// What the main loop should do after a tick.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flow {
    Continue,
    /// Reboot into the bootloader.
    Reboot,
}

pub struct SplitController<
    'a,
    I: InputPin,
    O: OutputPin,
    D: DelayNs,
    H: HidTransport,
    S: embedded_io::Write,
    B: ReflashButton,
    M: RawMutex,
    const ROWS: usize,
    const COLS: usize,
    const QN: usize,
> {
    scanner: KeyScanner<I, O, D, ROWS, COLS>,
    layout: HalfLayout<'a, ROWS, COLS>,
    link: &'a LinkQueue<M, QN>,
    hid: H,
    link_tx: S,
    reflash_button: B,
    role_select: RoleSelect,
    role: Option<Role>,
    report: KeyboardReport,
    magic: Option<KeyboardReport>,
    /// The current report still has to reach the host.
    pending: bool,
}

impl<
        'a,
        I: InputPin,
        O: OutputPin,
        D: DelayNs,
        H: HidTransport,
        S: embedded_io::Write,
        B: ReflashButton,
        M: RawMutex,
        const ROWS: usize,
        const COLS: usize,
        const QN: usize,
    > SplitController<'a, I, O, D, H, S, B, M, ROWS, COLS, QN>
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scanner: KeyScanner<I, O, D, ROWS, COLS>,
        layout: HalfLayout<'a, ROWS, COLS>,
        link: &'a LinkQueue<M, QN>,
        hid: H,
        link_tx: S,
        reflash_button: B,
        role_select: RoleSelect,
        magic_chord: Option<MagicChord>,
    ) -> Self {
        let magic = magic_chord.and_then(|chord| chord.pattern(layout.this));
        Self {
            scanner,
            layout,
            link,
            hid,
            link_tx,
            reflash_button,
            role_select,
            role: None,
            report: KeyboardReport::new(),
            magic,
            pending: true,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Run [Self::tick] every `period` on an absolute schedule until a tick asks for a reboot.
    pub async fn run(&mut self, period: Duration) {
        let mut next = Instant::now();
        loop {
            Timer::at(next).await;
            next += period;
            if let Flow::Reboot = self.tick().await {
                return;
            }
        }
    }

    pub async fn tick(&mut self) -> Flow {
        if self.reflash_button.is_pressed() {
            crate::info!("reflash button pressed");
            return Flow::Reboot;
        }

        let role = self.role_select.resolve(self.hid.is_mounted());
        if self.role != Some(role) {
            crate::info!("acting as {:?}", role);
            self.role = Some(role);
            if role == Role::Master {
                self.resync_report();
            }
        }

        match role {
            Role::Master => self.master_tick().await,
            Role::Slave => {
                self.slave_tick().await;
                Flow::Continue
            }
        }
    }

    /// Rebuild the report from the keys this half already holds down, so keys pressed while
    /// acting as slave are not lost.
    fn resync_report(&mut self) {
        self.report.clear();
        for cell in self.scanner.down_cells() {
            self.report.apply(self.layout.this.get(cell), true);
        }
        self.pending = true;
    }

    async fn master_tick(&mut self) -> Flow {
        let mut changed = false;

        let report = &mut self.report;
        let this = self.layout.this;
        self.scanner
            .scan(|key| changed |= report.apply(this.get(key.cell()), key.is_down()))
            .await;

        let link = self.link;
        for byte in link.drain() {
            match LinkEvent::decode(byte).scan_key::<ROWS, COLS>() {
                Some(key) => {
                    changed |= self
                        .report
                        .apply(self.layout.other.get(key.cell()), key.is_down())
                }
                None => crate::debug!("ignoring link byte {}", byte),
            }
        }

        if self.magic.as_ref() == Some(&self.report) {
            crate::info!("magic chord pressed");
            return Flow::Reboot;
        }

        if self.hid.is_suspended() {
            if changed {
                self.hid.request_remote_wakeup();
            }
            self.pending = true;
        } else if changed || self.pending {
            self.pending =
                !(self.hid.is_ready() && self.hid.submit_report(self.report.as_bytes()).await);
        }

        Flow::Continue
    }

    async fn slave_tick(&mut self) {
        let link_tx = &mut self.link_tx;
        self.scanner
            .scan(|key| {
                let byte = LinkEvent::from_scan_key::<COLS>(key).encode();
                if link_tx.write_all(&[byte]).and_then(|_| link_tx.flush()).is_err() {
                    crate::warn!("link send failed for {}", byte);
                }
            })
            .await;
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod test;
