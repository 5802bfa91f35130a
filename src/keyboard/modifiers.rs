//! Modifier key state tracking
//!
//! Holds the down/up state of the four left-hand modifier keys.
//! Every flag starts up (`false`) until an event says otherwise.

use super::codes::{KeyCode, Modifier};

/// Tracks which left-hand modifier keys are currently pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// Left Command is held (227)
    pub left_command: bool,
    /// Left Option is held (226)
    pub left_option: bool,
    /// Left Shift is held (225)
    pub left_shift: bool,
    /// Left Control is held (224)
    pub left_control: bool,
}

impl ModifierState {
    /// Record a press/release for `code`.
    ///
    /// Returns the modifier that was updated, or `None` when `code` is not a
    /// tracked modifier (state is left untouched).
    pub fn apply(&mut self, code: KeyCode, pressed: bool) -> Option<Modifier> {
        let modifier = Modifier::from_code(code)?;
        *self.flag_mut(modifier) = pressed;
        Some(modifier)
    }

    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.left_command && !self.left_option && !self.left_shift && !self.left_control
    }

    fn flag_mut(&mut self, modifier: Modifier) -> &mut bool {
        match modifier {
            Modifier::LeftControl => &mut self.left_control,
            Modifier::LeftShift => &mut self.left_shift,
            Modifier::LeftOption => &mut self.left_option,
            Modifier::LeftCommand => &mut self.left_command,
        }
    }
}
