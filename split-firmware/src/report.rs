use split_common::keycodes::{key_range::BASIC_BYTES, KeyCode, KeyKind};

/// Modifier byte followed by one bit per basic usage from `A` (0x04) up.
pub const REPORT_SIZE: usize = 1 + BASIC_BYTES;

/// The keyboard state sent to the host, byte for byte.
///
/// Byte 0 holds the modifiers (`0xE0` is bit 0). Basic usage `kc` sits at bit `(kc - 4) % 8`
/// of byte `1 + (kc - 4) / 8`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyboardReport([u8; REPORT_SIZE]);

impl KeyboardReport {
    pub const fn new() -> Self {
        Self([0; REPORT_SIZE])
    }

    /// Report with every key in `keys` held down.
    pub fn from_keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        let mut report = Self::new();
        for kc in keys {
            report.apply(kc, true);
        }
        report
    }

    /// Set or clear the bit for `kc`. Returns true if the report changed.
    ///
    /// [KeyCode::NONE] and usages outside the report layout are ignored.
    pub fn apply(&mut self, kc: KeyCode, pressed: bool) -> bool {
        let Some((byte, mask)) = Self::position(kc) else {
            if let KeyKind::Unsupported = kc.kind() {
                crate::debug!("no report bit for key {}", kc.0);
            }
            return false;
        };
        let old = self.0[byte];
        if pressed {
            self.0[byte] |= mask;
        } else {
            self.0[byte] &= !mask;
        }
        old != self.0[byte]
    }

    pub fn is_down(&self, kc: KeyCode) -> bool {
        Self::position(kc).is_some_and(|(byte, mask)| self.0[byte] & mask != 0)
    }

    pub fn modifiers(&self) -> u8 {
        self.0[0]
    }

    pub fn clear(&mut self) {
        self.0 = [0; REPORT_SIZE];
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; REPORT_SIZE] {
        &self.0
    }

    fn position(kc: KeyCode) -> Option<(usize, u8)> {
        match kc.kind() {
            KeyKind::Modifier { bit } => Some((0, 1 << bit)),
            KeyKind::Basic { index } => Some((1 + (index >> 3) as usize, 1 << (index & 7))),
            KeyKind::NoOp | KeyKind::Unsupported => None,
        }
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod test;
