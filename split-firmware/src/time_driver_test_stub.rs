extern crate std;

use core::{cell::Cell, task::Waker};
use embassy_time_driver::Driver;

/// Virtual clock: a wake request moves time forward to the requested instant, so timers
/// expire on the next poll and tests run without waiting.
struct VirtualClock;

impl Driver for VirtualClock {
    fn now(&self) -> u64 {
        NOW.with(|now| now.get())
    }

    fn schedule_wake(&self, at: u64, waker: &Waker) {
        NOW.with(|now| {
            if at > now.get() {
                now.set(at);
            }
        });

        waker.wake_by_ref();
    }
}

std::thread_local! {
    static NOW: Cell<u64> = const { Cell::new(0) };
}

embassy_time_driver::time_driver_impl!(static TIME_DRIVER: VirtualClock = VirtualClock);

/// Set the current thread's clock in microseconds.
pub fn set_now(t: u64) {
    NOW.with(|now| now.set(t));
}

pub fn now() -> u64 {
    NOW.with(|now| now.get())
}
