extern crate std;

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::usb::HidTransport;

#[derive(Debug)]
pub struct StubHidState {
    pub mounted: bool,
    pub suspended: bool,
    pub ready: bool,
    /// Whether submitted reports are accepted.
    pub accept: bool,
    pub reports: Vec<Vec<u8>>,
    pub rejected: usize,
    pub wakeups: usize,
}

impl Default for StubHidState {
    fn default() -> Self {
        Self {
            mounted: true,
            suspended: false,
            ready: true,
            accept: true,
            reports: Vec::new(),
            rejected: 0,
            wakeups: 0,
        }
    }
}

/// Recording host connection. Clones share state so a test keeps a handle after moving one
/// into the controller.
#[derive(Clone, Default)]
pub struct StubHid(Rc<RefCell<StubHidState>>);

impl StubHid {
    pub fn unmounted() -> Self {
        let hid = Self::default();
        hid.set_mounted(false);
        hid
    }

    pub fn set_mounted(&self, mounted: bool) {
        let mut s = self.0.borrow_mut();
        s.mounted = mounted;
        s.ready = mounted && !s.suspended;
    }

    pub fn set_suspended(&self, suspended: bool) {
        let mut s = self.0.borrow_mut();
        s.suspended = suspended;
        s.ready = s.mounted && !suspended;
    }

    pub fn set_ready(&self, ready: bool) {
        self.0.borrow_mut().ready = ready;
    }

    pub fn set_accept(&self, accept: bool) {
        self.0.borrow_mut().accept = accept;
    }

    pub fn reports(&self) -> Vec<Vec<u8>> {
        self.0.borrow().reports.clone()
    }

    pub fn take_reports(&self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.0.borrow_mut().reports)
    }

    pub fn rejected(&self) -> usize {
        self.0.borrow().rejected
    }

    pub fn wakeups(&self) -> usize {
        self.0.borrow().wakeups
    }
}

impl HidTransport for StubHid {
    fn is_mounted(&self) -> bool {
        self.0.borrow().mounted
    }

    fn is_suspended(&self) -> bool {
        self.0.borrow().suspended
    }

    fn is_ready(&self) -> bool {
        self.0.borrow().ready
    }

    fn request_remote_wakeup(&mut self) {
        self.0.borrow_mut().wakeups += 1;
    }

    async fn submit_report(&mut self, report: &[u8]) -> bool {
        let mut s = self.0.borrow_mut();
        if s.accept {
            s.reports.push(report.into());
            true
        } else {
            s.rejected += 1;
            false
        }
    }
}
