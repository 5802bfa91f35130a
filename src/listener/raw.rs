//! Raw tap callback values and their translation to listener events
//!
//! The tap callback only copies fields out of the CGEvent; everything
//! else happens on the listener loop through [`translate`].

use tracing::warn;

use super::keymap;
use super::{ListenerEvent, ListenerOptions};

/// What the tap callback hands to the listener loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKey {
    Down { keycode: u16, autorepeat: bool },
    Up { keycode: u16 },
    FlagsChanged { keycode: u16, flags: u64 },
    TapDisabled,
}

/// Turn a raw tap value into a listener event.
///
/// `reenable` is called when the system has disabled the tap; a disabled
/// tap delivers nothing further until it is switched back on.
pub fn translate<F>(raw: RawKey, options: ListenerOptions, reenable: F) -> Option<ListenerEvent>
where
    F: FnOnce(),
{
    let key = match raw {
        RawKey::Down {
            autorepeat: true, ..
        } if options.ignore_autorepeat => return None,
        RawKey::Down { keycode, .. } => keymap::key_event(keycode, true),
        RawKey::Up { keycode } => keymap::key_event(keycode, false),
        RawKey::FlagsChanged { keycode, flags } => keymap::modifier_event(keycode, flags),
        RawKey::TapDisabled => {
            warn!("event tap disabled by the system, re-enabling");
            reenable();
            return Some(ListenerEvent::TapDisabled);
        }
    };

    key.map(ListenerEvent::Key)
}
