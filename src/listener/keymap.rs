//! macOS virtual keycode translation
//!
//! CGEvents carry `kVK_*` virtual keycodes; the manager speaks HID usage
//! codes. Modifier keys only arrive as FlagsChanged events, so their edge
//! is recovered from the device-dependent flag bits.

use crate::events::KeyEvent;
use crate::keyboard::{
    KeyCode, ESC_CODE, LEFT_COMMAND_CODE, LEFT_CTRL_CODE, LEFT_OPTION_CODE, LEFT_SHIFT_CODE,
    RIGHT_COMMAND_CODE, RIGHT_CTRL_CODE, RIGHT_OPTION_CODE, RIGHT_SHIFT_CODE,
};

/// Virtual keycodes (Carbon `Events.h`) that need special handling
pub mod vk {
    pub const ESCAPE: u16 = 0x35;
    pub const RIGHT_COMMAND: u16 = 0x36;
    pub const COMMAND: u16 = 0x37;
    pub const SHIFT: u16 = 0x38;
    pub const OPTION: u16 = 0x3A;
    pub const CONTROL: u16 = 0x3B;
    pub const RIGHT_SHIFT: u16 = 0x3C;
    pub const RIGHT_OPTION: u16 = 0x3D;
    pub const RIGHT_CONTROL: u16 = 0x3E;
}

/// Device-dependent modifier bits (IOKit `IOLLEvent.h`)
pub mod device_mask {
    pub const LEFT_CONTROL: u64 = 0x0000_0001;
    pub const LEFT_SHIFT: u64 = 0x0000_0002;
    pub const RIGHT_SHIFT: u64 = 0x0000_0004;
    pub const LEFT_COMMAND: u64 = 0x0000_0008;
    pub const RIGHT_COMMAND: u64 = 0x0000_0010;
    pub const LEFT_OPTION: u64 = 0x0000_0020;
    pub const RIGHT_OPTION: u64 = 0x0000_0040;
    pub const RIGHT_CONTROL: u64 = 0x0000_2000;
}

/// Translate a virtual keycode to its HID usage code
pub fn hid_usage(virtual_keycode: u16) -> Option<KeyCode> {
    let code = match virtual_keycode {
        // Letters
        0x00 => 0x04, // A
        0x0B => 0x05, // B
        0x08 => 0x06, // C
        0x02 => 0x07, // D
        0x0E => 0x08, // E
        0x03 => 0x09, // F
        0x05 => 0x0A, // G
        0x04 => 0x0B, // H
        0x22 => 0x0C, // I
        0x26 => 0x0D, // J
        0x28 => 0x0E, // K
        0x25 => 0x0F, // L
        0x2E => 0x10, // M
        0x2D => 0x11, // N
        0x1F => 0x12, // O
        0x23 => 0x13, // P
        0x0C => 0x14, // Q
        0x0F => 0x15, // R
        0x01 => 0x16, // S
        0x11 => 0x17, // T
        0x20 => 0x18, // U
        0x09 => 0x19, // V
        0x0D => 0x1A, // W
        0x07 => 0x1B, // X
        0x10 => 0x1C, // Y
        0x06 => 0x1D, // Z

        // Digits
        0x12 => 0x1E, // 1
        0x13 => 0x1F, // 2
        0x14 => 0x20, // 3
        0x15 => 0x21, // 4
        0x17 => 0x22, // 5
        0x16 => 0x23, // 6
        0x1A => 0x24, // 7
        0x1C => 0x25, // 8
        0x19 => 0x26, // 9
        0x1D => 0x27, // 0

        // Editing and punctuation
        0x24 => 0x28, // Return
        vk::ESCAPE => ESC_CODE,
        0x33 => 0x2A, // Delete (backspace)
        0x30 => 0x2B, // Tab
        0x31 => 0x2C, // Space
        0x1B => 0x2D, // -
        0x18 => 0x2E, // =
        0x21 => 0x2F, // [
        0x1E => 0x30, // ]
        0x2A => 0x31, // backslash
        0x29 => 0x33, // ;
        0x27 => 0x34, // '
        0x32 => 0x35, // `
        0x2B => 0x36, // ,
        0x2F => 0x37, // .
        0x2C => 0x38, // /
        0x39 => 0x39, // Caps Lock

        // Function keys
        0x7A => 0x3A, // F1
        0x78 => 0x3B, // F2
        0x63 => 0x3C, // F3
        0x76 => 0x3D, // F4
        0x60 => 0x3E, // F5
        0x61 => 0x3F, // F6
        0x62 => 0x40, // F7
        0x64 => 0x41, // F8
        0x65 => 0x42, // F9
        0x6D => 0x43, // F10
        0x67 => 0x44, // F11
        0x6F => 0x45, // F12

        // Navigation
        0x73 => 0x4A, // Home
        0x74 => 0x4B, // Page Up
        0x75 => 0x4C, // Forward Delete
        0x77 => 0x4D, // End
        0x79 => 0x4E, // Page Down
        0x7C => 0x4F, // Right
        0x7B => 0x50, // Left
        0x7D => 0x51, // Down
        0x7E => 0x52, // Up

        // Modifiers
        vk::CONTROL => LEFT_CTRL_CODE,
        vk::SHIFT => LEFT_SHIFT_CODE,
        vk::OPTION => LEFT_OPTION_CODE,
        vk::COMMAND => LEFT_COMMAND_CODE,
        vk::RIGHT_CONTROL => RIGHT_CTRL_CODE,
        vk::RIGHT_SHIFT => RIGHT_SHIFT_CODE,
        vk::RIGHT_OPTION => RIGHT_OPTION_CODE,
        vk::RIGHT_COMMAND => RIGHT_COMMAND_CODE,

        _ => return None,
    };
    Some(code)
}

/// Device mask bit that is set while the given modifier key is held
fn modifier_mask(virtual_keycode: u16) -> Option<u64> {
    match virtual_keycode {
        vk::CONTROL => Some(device_mask::LEFT_CONTROL),
        vk::SHIFT => Some(device_mask::LEFT_SHIFT),
        vk::OPTION => Some(device_mask::LEFT_OPTION),
        vk::COMMAND => Some(device_mask::LEFT_COMMAND),
        vk::RIGHT_CONTROL => Some(device_mask::RIGHT_CONTROL),
        vk::RIGHT_SHIFT => Some(device_mask::RIGHT_SHIFT),
        vk::RIGHT_OPTION => Some(device_mask::RIGHT_OPTION),
        vk::RIGHT_COMMAND => Some(device_mask::RIGHT_COMMAND),
        _ => None,
    }
}

/// Build the event for a KeyDown/KeyUp
pub fn key_event(virtual_keycode: u16, pressed: bool) -> Option<KeyEvent> {
    hid_usage(virtual_keycode).map(|code| KeyEvent::new(code, pressed))
}

/// Build the event for a FlagsChanged on a modifier key.
///
/// The key is pressed when its device bit is present in `flag_bits`.
/// Caps Lock and Fn are not reported.
pub fn modifier_event(virtual_keycode: u16, flag_bits: u64) -> Option<KeyEvent> {
    let mask = modifier_mask(virtual_keycode)?;
    let code = hid_usage(virtual_keycode)?;
    Some(KeyEvent::new(code, flag_bits & mask != 0))
}
