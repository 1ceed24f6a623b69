//! USB HID keyboard usages (usage page 0x07) understood by the firmware.

pub mod key_range {
    pub const NONE: u8 = 0x00;

    pub const BASIC_MIN: u8 = 0x04;
    pub const BASIC_A: u8 = 0x04;
    pub const BASIC_1: u8 = 0x1e;
    pub const BASIC_0: u8 = 0x27;
    /// Last usage with a bit in the report (F16).
    pub const BASIC_MAX: u8 = 0x6b;
    pub const MODIFIER_MIN: u8 = 0xe0;
    pub const MODIFIER_MAX: u8 = 0xe7;

    /// Number of bytes needed to hold one bit per basic usage.
    pub const BASIC_BYTES: usize = (BASIC_MAX - BASIC_MIN) as usize / 8 + 1;
}

use key_range::*;

/// Where a usage lands in a keyboard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyKind {
    /// Position holds no key.
    NoOp,
    /// Bit `bit` of the modifier byte.
    Modifier { bit: u8 },
    /// Bit offset `index` in the packed basic key bytes.
    Basic { index: u8 },
    /// A valid HID usage that the fixed report layout has no room for.
    Unsupported,
}

/// A keyboard usage id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const NONE: Self = Self(NONE);

    pub const A: Self = Self(0x04);
    pub const B: Self = Self(0x05);
    pub const C: Self = Self(0x06);
    pub const D: Self = Self(0x07);
    pub const E: Self = Self(0x08);
    pub const F: Self = Self(0x09);
    pub const G: Self = Self(0x0a);
    pub const H: Self = Self(0x0b);
    pub const I: Self = Self(0x0c);
    pub const J: Self = Self(0x0d);
    pub const K: Self = Self(0x0e);
    pub const L: Self = Self(0x0f);
    pub const M: Self = Self(0x10);
    pub const N: Self = Self(0x11);
    pub const O: Self = Self(0x12);
    pub const P: Self = Self(0x13);
    pub const Q: Self = Self(0x14);
    pub const R: Self = Self(0x15);
    pub const S: Self = Self(0x16);
    pub const T: Self = Self(0x17);
    pub const U: Self = Self(0x18);
    pub const V: Self = Self(0x19);
    pub const W: Self = Self(0x1a);
    pub const X: Self = Self(0x1b);
    pub const Y: Self = Self(0x1c);
    pub const Z: Self = Self(0x1d);

    pub const N1: Self = Self(BASIC_1);
    pub const N2: Self = Self(0x1f);
    pub const N3: Self = Self(0x20);
    pub const N4: Self = Self(0x21);
    pub const N5: Self = Self(0x22);
    pub const N6: Self = Self(0x23);
    pub const N7: Self = Self(0x24);
    pub const N8: Self = Self(0x25);
    pub const N9: Self = Self(0x26);
    pub const N0: Self = Self(BASIC_0);

    pub const ENTER: Self = Self(0x28);
    pub const ESCAPE: Self = Self(0x29);
    pub const BACKSPACE: Self = Self(0x2a);
    pub const TAB: Self = Self(0x2b);
    pub const SPACE: Self = Self(0x2c);
    pub const MINUS: Self = Self(0x2d);
    pub const EQUAL: Self = Self(0x2e);
    pub const BRACKET_LEFT: Self = Self(0x2f);
    pub const BRACKET_RIGHT: Self = Self(0x30);
    pub const BACKSLASH: Self = Self(0x31);
    pub const NON_US_HASH: Self = Self(0x32);
    pub const SEMICOLON: Self = Self(0x33);
    pub const APOSTROPHE: Self = Self(0x34);
    pub const GRAVE: Self = Self(0x35);
    pub const COMMA: Self = Self(0x36);
    pub const PERIOD: Self = Self(0x37);
    pub const SLASH: Self = Self(0x38);
    pub const CAPS_LOCK: Self = Self(0x39);

    pub const F1: Self = Self(0x3a);
    pub const F2: Self = Self(0x3b);
    pub const F3: Self = Self(0x3c);
    pub const F4: Self = Self(0x3d);
    pub const F5: Self = Self(0x3e);
    pub const F6: Self = Self(0x3f);
    pub const F7: Self = Self(0x40);
    pub const F8: Self = Self(0x41);
    pub const F9: Self = Self(0x42);
    pub const F10: Self = Self(0x43);
    pub const F11: Self = Self(0x44);
    pub const F12: Self = Self(0x45);

    pub const PRINT_SCREEN: Self = Self(0x46);
    pub const SCROLL_LOCK: Self = Self(0x47);
    pub const PAUSE: Self = Self(0x48);
    pub const INSERT: Self = Self(0x49);
    pub const HOME: Self = Self(0x4a);
    pub const PAGE_UP: Self = Self(0x4b);
    pub const DELETE: Self = Self(0x4c);
    pub const END: Self = Self(0x4d);
    pub const PAGE_DOWN: Self = Self(0x4e);
    pub const ARROW_RIGHT: Self = Self(0x4f);
    pub const ARROW_LEFT: Self = Self(0x50);
    pub const ARROW_DOWN: Self = Self(0x51);
    pub const ARROW_UP: Self = Self(0x52);

    pub const NUM_LOCK: Self = Self(0x53);
    pub const KP_DIVIDE: Self = Self(0x54);
    pub const KP_MULTIPLY: Self = Self(0x55);
    pub const KP_SUBTRACT: Self = Self(0x56);
    pub const KP_ADD: Self = Self(0x57);
    pub const KP_ENTER: Self = Self(0x58);
    pub const KP_1: Self = Self(0x59);
    pub const KP_2: Self = Self(0x5a);
    pub const KP_3: Self = Self(0x5b);
    pub const KP_4: Self = Self(0x5c);
    pub const KP_5: Self = Self(0x5d);
    pub const KP_6: Self = Self(0x5e);
    pub const KP_7: Self = Self(0x5f);
    pub const KP_8: Self = Self(0x60);
    pub const KP_9: Self = Self(0x61);
    pub const KP_0: Self = Self(0x62);
    pub const KP_DECIMAL: Self = Self(0x63);
    pub const NON_US_BACKSLASH: Self = Self(0x64);
    pub const APPLICATION: Self = Self(0x65);
    pub const POWER: Self = Self(0x66);
    pub const KP_EQUAL: Self = Self(0x67);

    pub const F13: Self = Self(0x68);
    pub const F14: Self = Self(0x69);
    pub const F15: Self = Self(0x6a);
    pub const F16: Self = Self(BASIC_MAX);
    pub const F17: Self = Self(0x6c);
    pub const F18: Self = Self(0x6d);
    pub const F19: Self = Self(0x6e);
    pub const F20: Self = Self(0x6f);
    pub const F21: Self = Self(0x70);
    pub const F22: Self = Self(0x71);
    pub const F23: Self = Self(0x72);
    pub const F24: Self = Self(0x73);

    pub const CONTROL_LEFT: Self = Self(MODIFIER_MIN);
    pub const SHIFT_LEFT: Self = Self(0xe1);
    pub const ALT_LEFT: Self = Self(0xe2);
    pub const GUI_LEFT: Self = Self(0xe3);
    pub const CONTROL_RIGHT: Self = Self(0xe4);
    pub const SHIFT_RIGHT: Self = Self(0xe5);
    pub const ALT_RIGHT: Self = Self(0xe6);
    pub const GUI_RIGHT: Self = Self(MODIFIER_MAX);

    pub const fn code(self) -> u8 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == NONE
    }

    pub const fn kind(self) -> KeyKind {
        match self.0 {
            NONE => KeyKind::NoOp,
            MODIFIER_MIN..=MODIFIER_MAX => KeyKind::Modifier {
                bit: self.0 - MODIFIER_MIN,
            },
            BASIC_MIN..=BASIC_MAX => KeyKind::Basic {
                index: self.0 - BASIC_MIN,
            },
            _ => KeyKind::Unsupported,
        }
    }
}

impl From<u8> for KeyCode {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("none", KeyCode::NONE),
    ("noop", KeyCode::NONE),
    ("a", KeyCode::A),
    ("b", KeyCode::B),
    ("c", KeyCode::C),
    ("d", KeyCode::D),
    ("e", KeyCode::E),
    ("f", KeyCode::F),
    ("g", KeyCode::G),
    ("h", KeyCode::H),
    ("i", KeyCode::I),
    ("j", KeyCode::J),
    ("k", KeyCode::K),
    ("l", KeyCode::L),
    ("m", KeyCode::M),
    ("n", KeyCode::N),
    ("o", KeyCode::O),
    ("p", KeyCode::P),
    ("q", KeyCode::Q),
    ("r", KeyCode::R),
    ("s", KeyCode::S),
    ("t", KeyCode::T),
    ("u", KeyCode::U),
    ("v", KeyCode::V),
    ("w", KeyCode::W),
    ("x", KeyCode::X),
    ("y", KeyCode::Y),
    ("z", KeyCode::Z),
    ("1", KeyCode::N1),
    ("2", KeyCode::N2),
    ("3", KeyCode::N3),
    ("4", KeyCode::N4),
    ("5", KeyCode::N5),
    ("6", KeyCode::N6),
    ("7", KeyCode::N7),
    ("8", KeyCode::N8),
    ("9", KeyCode::N9),
    ("0", KeyCode::N0),
    ("enter", KeyCode::ENTER),
    ("ent", KeyCode::ENTER),
    ("escape", KeyCode::ESCAPE),
    ("esc", KeyCode::ESCAPE),
    ("backspace", KeyCode::BACKSPACE),
    ("bksp", KeyCode::BACKSPACE),
    ("tab", KeyCode::TAB),
    ("space", KeyCode::SPACE),
    ("spc", KeyCode::SPACE),
    ("minus", KeyCode::MINUS),
    ("equal", KeyCode::EQUAL),
    ("[", KeyCode::BRACKET_LEFT),
    ("]", KeyCode::BRACKET_RIGHT),
    ("\\", KeyCode::BACKSLASH),
    (";", KeyCode::SEMICOLON),
    ("semicolon", KeyCode::SEMICOLON),
    ("'", KeyCode::APOSTROPHE),
    ("`", KeyCode::GRAVE),
    (",", KeyCode::COMMA),
    ("comma", KeyCode::COMMA),
    (".", KeyCode::PERIOD),
    ("period", KeyCode::PERIOD),
    ("/", KeyCode::SLASH),
    ("slash", KeyCode::SLASH),
    ("pageup", KeyCode::PAGE_UP),
    ("pgup", KeyCode::PAGE_UP),
    ("pagedown", KeyCode::PAGE_DOWN),
    ("pgdn", KeyCode::PAGE_DOWN),
    ("delete", KeyCode::DELETE),
    ("del", KeyCode::DELETE),
    ("home", KeyCode::HOME),
    ("end", KeyCode::END),
    ("left", KeyCode::ARROW_LEFT),
    ("right", KeyCode::ARROW_RIGHT),
    ("up", KeyCode::ARROW_UP),
    ("down", KeyCode::ARROW_DOWN),
    ("f1", KeyCode::F1),
    ("f12", KeyCode::F12),
    ("f16", KeyCode::F16),
    ("f17", KeyCode::F17),
    ("controlleft", KeyCode::CONTROL_LEFT),
    ("lc", KeyCode::CONTROL_LEFT),
    ("shiftleft", KeyCode::SHIFT_LEFT),
    ("ls", KeyCode::SHIFT_LEFT),
    ("altleft", KeyCode::ALT_LEFT),
    ("la", KeyCode::ALT_LEFT),
    ("guileft", KeyCode::GUI_LEFT),
    ("lg", KeyCode::GUI_LEFT),
    ("controlright", KeyCode::CONTROL_RIGHT),
    ("rc", KeyCode::CONTROL_RIGHT),
    ("shiftright", KeyCode::SHIFT_RIGHT),
    ("rs", KeyCode::SHIFT_RIGHT),
    ("altright", KeyCode::ALT_RIGHT),
    ("ra", KeyCode::ALT_RIGHT),
    ("guiright", KeyCode::GUI_RIGHT),
    ("rg", KeyCode::GUI_RIGHT),
];

/// Look up a key by mnemonic. Case, dashes and underscores are ignored so `Page_Down`,
/// `page-down` and `pagedown` all name the same key.
pub fn key_code(name: &str) -> Option<KeyCode> {
    KEY_NAMES
        .iter()
        .find(|(n, _)| same_name(n, name))
        .map(|(_, kc)| *kc)
}

fn same_name(canonical: &str, name: &str) -> bool {
    let mut wanted = name
        .chars()
        .filter(|c| !matches!(c, '_' | '-') || name.len() == 1)
        .map(|c| c.to_ascii_lowercase());
    let mut have = canonical.chars();
    loop {
        match (have.next(), wanted.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
