//! Key events flowing from the listener into the manager

use serde::{Deserialize, Serialize};

use crate::keyboard::KeyCode;

/// A single press or release of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// HID usage code of the key
    pub key_code: KeyCode,
    /// `true` on press, `false` on release
    pub pressed: bool,
}

impl KeyEvent {
    pub fn new(key_code: KeyCode, pressed: bool) -> Self {
        Self { key_code, pressed }
    }

    pub fn press(key_code: KeyCode) -> Self {
        Self::new(key_code, true)
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self::new(key_code, false)
    }
}

impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let edge = if self.pressed { "DOWN" } else { "UP" };
        write!(f, "KEY {:#04x} {}", self.key_code, edge)
    }
}
