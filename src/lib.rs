//! escape-key-listener: Escape and modifier key observer for macOS
//!
//! - `keyboard`: modifier flags and per-key-code observer relay
//! - `listener`: CGEventTap thread translating OS key events to HID codes
//! - `events`: the key event type passed between them
//! - `config`, `lifecycle`: daemon plumbing

pub mod config;
pub mod events;
pub mod keyboard;
pub mod lifecycle;
pub mod listener;

pub use events::KeyEvent;
pub use keyboard::{KeyCode, KeyObserver, KeyboardEventManager, ModifierState, ESC_CODE};
pub use listener::{KeyListener, ListenerError, ListenerEvent, ListenerOptions};
