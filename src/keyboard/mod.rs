//! Keyboard state and observer relay
//!
//! Tracks the left Command/Option/Shift/Control keys and dispatches
//! press/release notifications (Escape in particular) to observers
//! registered per key code.

mod codes;
mod manager;
mod modifiers;
mod observer;

pub use codes::{
    KeyCode, Modifier, ESC_CODE, LEFT_COMMAND_CODE, LEFT_CTRL_CODE, LEFT_OPTION_CODE,
    LEFT_SHIFT_CODE, RIGHT_COMMAND_CODE, RIGHT_CTRL_CODE, RIGHT_OPTION_CODE, RIGHT_SHIFT_CODE,
};
pub use manager::KeyboardEventManager;
pub use modifiers::ModifierState;
pub use observer::{KeyObserver, ObserverTable};
