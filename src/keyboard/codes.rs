//! Key code constants
//!
//! Codes are HID usage IDs from the keyboard/keypad page (0x07), the
//! namespace every other part of the crate speaks.

/// Numeric key identifier (HID usage code)
pub type KeyCode = i64;

/// Escape
pub const ESC_CODE: KeyCode = 0x29;

/// Left Control
pub const LEFT_CTRL_CODE: KeyCode = 224;
/// Left Shift
pub const LEFT_SHIFT_CODE: KeyCode = 225;
/// Left Option/Alt
pub const LEFT_OPTION_CODE: KeyCode = 226;
/// Left Command/GUI
pub const LEFT_COMMAND_CODE: KeyCode = 227;

/// Right Control
pub const RIGHT_CTRL_CODE: KeyCode = 228;
/// Right Shift
pub const RIGHT_SHIFT_CODE: KeyCode = 229;
/// Right Option/Alt
pub const RIGHT_OPTION_CODE: KeyCode = 230;
/// Right Command/GUI
pub const RIGHT_COMMAND_CODE: KeyCode = 231;

/// The modifier keys whose state the manager tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    LeftControl,
    LeftShift,
    LeftOption,
    LeftCommand,
}

impl Modifier {
    /// All tracked modifiers, in key code order
    pub const ALL: [Modifier; 4] = [
        Modifier::LeftControl,
        Modifier::LeftShift,
        Modifier::LeftOption,
        Modifier::LeftCommand,
    ];

    /// Look up the tracked modifier for a key code
    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            LEFT_CTRL_CODE => Some(Modifier::LeftControl),
            LEFT_SHIFT_CODE => Some(Modifier::LeftShift),
            LEFT_OPTION_CODE => Some(Modifier::LeftOption),
            LEFT_COMMAND_CODE => Some(Modifier::LeftCommand),
            _ => None,
        }
    }

    pub fn code(self) -> KeyCode {
        match self {
            Modifier::LeftControl => LEFT_CTRL_CODE,
            Modifier::LeftShift => LEFT_SHIFT_CODE,
            Modifier::LeftOption => LEFT_OPTION_CODE,
            Modifier::LeftCommand => LEFT_COMMAND_CODE,
        }
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modifier::LeftControl => write!(f, "LeftControl"),
            Modifier::LeftShift => write!(f, "LeftShift"),
            Modifier::LeftOption => write!(f, "LeftOption"),
            Modifier::LeftCommand => write!(f, "LeftCommand"),
        }
    }
}
