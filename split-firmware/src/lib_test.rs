extern crate std;

#[cfg(feature = "defmt")]
#[defmt::global_logger]
struct Logger;

#[cfg(feature = "defmt")]
unsafe impl defmt::Logger for Logger {
    fn acquire() {}

    unsafe fn release() {}

    unsafe fn write(_bytes: &[u8]) {}

    unsafe fn flush() {}
}

#[test]
fn key_code_reexport() {
    assert_eq!(super::KeyCode::Q, kc!("q"));
    assert_eq!(super::KeyCode::SHIFT_LEFT, kc!("shift_left"));
}
