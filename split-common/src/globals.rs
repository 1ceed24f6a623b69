/// Ticks a cell ignores its switch after an accepted transition.
pub const DEBOUNCE_TICKS_DEFAULT: u8 = 5;
/// Main loop period in microseconds.
pub const TICK_PERIOD_US_DEFAULT: u64 = 1_000;
/// Time between driving a row and sampling the columns.
pub const ROW_SETTLE_US: u32 = 1;
