//! Board functions registered at startup and called from board-independent code.

use core::cell::Cell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;

pub type ResetFn = &'static (dyn Fn() + Sync);

#[derive(Clone, Copy)]
struct Functions {
    reset: Option<ResetFn>,
    reset_to_usb_boot: Option<ResetFn>,
}

static FUNCTIONS: CriticalSectionMutex<Cell<Functions>> =
    CriticalSectionMutex::new(Cell::new(Functions {
        reset: None,
        reset_to_usb_boot: None,
    }));

fn registered() -> Functions {
    FUNCTIONS.lock(|f| f.get())
}

/// Restart the MCU. Returns only when no reset function is registered.
pub fn reset() {
    if let Some(f) = registered().reset {
        f();
    }
}

/// Restart into the USB mass-storage bootloader. Returns only when no function is registered.
pub fn reset_to_usb_boot() {
    match registered().reset_to_usb_boot {
        Some(f) => f(),
        None => crate::warn!("no bootloader entry registered"),
    }
}

/// Register a function that will reset the MCU when [reset] is called.
///
/// ```
/// use split_firmware::firmware_functions::handle_reset;
/// # pub mod cortex_m { pub mod peripheral {pub mod SCB {pub fn sys_reset() {}}}}
///
/// fn myreset() {
///     cortex_m::peripheral::SCB::sys_reset();
/// }
///
/// handle_reset(Some(&myreset));
/// ```
pub fn handle_reset(value: Option<ResetFn>) {
    FUNCTIONS.lock(|f| {
        f.set(Functions {
            reset: value,
            ..f.get()
        })
    });
}

/// Register the function behind [reset_to_usb_boot].
pub fn handle_reset_to_usb_boot(value: Option<ResetFn>) {
    FUNCTIONS.lock(|f| {
        f.set(Functions {
            reset_to_usb_boot: value,
            ..f.get()
        })
    });
}

#[cfg(all(not(test), feature = "reset-on-panic", target_os = "none"))]
mod panic {
    #[panic_handler]
    fn panic(_info: &core::panic::PanicInfo) -> ! {
        super::reset();

        loop {}
    }
}

#[cfg(test)]
#[path = "firmware_functions_test.rs"]
mod test;
