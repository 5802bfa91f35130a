//! CGEventTap run loop

#[cfg(target_os = "macos")]
pub use macos::run_event_loop;

#[cfg(not(target_os = "macos"))]
pub use unsupported::run_event_loop;

#[cfg(target_os = "macos")]
mod macos {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc as std_mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    use core_foundation::runloop::{kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop};
    use core_graphics::event::{
        CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
        CGEventTapProxy, CGEventType, EventField,
    };
    use tokio::sync::mpsc;
    use tracing::{debug, error, info, trace, warn};

    use super::super::raw::{translate, RawKey};
    use super::super::{ListenerError, ListenerEvent, ListenerOptions};

    fn keycode_of(event: &CGEvent) -> u16 {
        event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE) as u16
    }

    /// Run the CFRunLoop with the event tap
    ///
    /// `ready` receives `Ok(())` once the tap is installed; setup errors are
    /// returned and reported by the caller.
    pub fn run_event_loop(
        event_tx: mpsc::Sender<ListenerEvent>,
        running: Arc<AtomicBool>,
        options: ListenerOptions,
        ready: std_mpsc::Sender<Result<(), ListenerError>>,
    ) -> Result<(), ListenerError> {
        let (callback_tx, callback_rx) = std_mpsc::channel::<RawKey>();

        // CGEventTap callback - must be fast and non-blocking
        let callback = move |_proxy: CGEventTapProxy,
                             event_type: CGEventType,
                             event: &CGEvent|
              -> Option<CGEvent> {
            let raw = match event_type {
                CGEventType::KeyDown => Some(RawKey::Down {
                    keycode: keycode_of(event),
                    autorepeat: event
                        .get_integer_value_field(EventField::KEYBOARD_EVENT_AUTOREPEAT)
                        != 0,
                }),
                CGEventType::KeyUp => Some(RawKey::Up {
                    keycode: keycode_of(event),
                }),
                CGEventType::FlagsChanged => Some(RawKey::FlagsChanged {
                    keycode: keycode_of(event),
                    flags: event.get_flags().bits(),
                }),
                CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                    Some(RawKey::TapDisabled)
                }
                _ => None,
            };
            if let Some(raw) = raw {
                let _ = callback_tx.send(raw);
            }
            Some(event.clone())
        };

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            vec![
                CGEventType::KeyDown,
                CGEventType::KeyUp,
                CGEventType::FlagsChanged,
            ],
            callback,
        )
        .map_err(|_| {
            error!("failed to create event tap - is Accessibility permission granted?");
            ListenerError::EventTapCreation
        })?;

        tap.enable();

        let run_loop_source = tap
            .mach_port
            .create_runloop_source(0)
            .map_err(|_| ListenerError::RunLoopSource)?;
        let run_loop = CFRunLoop::get_current();
        let common_modes = unsafe { kCFRunLoopCommonModes };
        run_loop.add_source(&run_loop_source, common_modes);

        info!("event tap created and enabled");
        let _ = ready.send(Ok(()));

        let default_mode = unsafe { kCFRunLoopDefaultMode };

        'outer: while running.load(Ordering::SeqCst) {
            CFRunLoop::run_in_mode(default_mode, Duration::from_millis(100), true);

            while let Ok(raw) = callback_rx.try_recv() {
                let Some(event) = translate(raw, options, || tap.enable()) else {
                    continue;
                };

                trace!(?event, "key event");

                if event_tx.blocking_send(event).is_err() {
                    warn!("failed to send key event - channel closed?");
                    break 'outer;
                }
            }
        }

        debug!("event tap run loop exited");

        Ok(())
    }
}

#[cfg(not(target_os = "macos"))]
mod unsupported {
    use std::sync::atomic::AtomicBool;
    use std::sync::mpsc as std_mpsc;
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::super::{ListenerError, ListenerEvent, ListenerOptions};

    pub fn run_event_loop(
        _event_tx: mpsc::Sender<ListenerEvent>,
        _running: Arc<AtomicBool>,
        _options: ListenerOptions,
        _ready: std_mpsc::Sender<Result<(), ListenerError>>,
    ) -> Result<(), ListenerError> {
        Err(ListenerError::Unsupported)
    }
}
