//! Global key listener using macOS CGEventTap
//!
//! Monitors system-wide KeyDown, KeyUp and FlagsChanged events, translates
//! them to HID usage codes and forwards them over a channel. Runs on a
//! dedicated thread with its own CFRunLoop.

pub mod keymap;
mod raw;
mod tap;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::events::KeyEvent;

/// Events sent from the key listener to the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListenerEvent {
    /// A key was pressed or released
    Key(KeyEvent),
    /// Event tap was disabled by macOS
    TapDisabled,
}

/// Listener tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Drop KeyDown events generated by key auto-repeat
    pub ignore_autorepeat: bool,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            ignore_autorepeat: true,
        }
    }
}

/// Global key listener feeding a [`KeyboardEventManager`](crate::keyboard::KeyboardEventManager)
pub struct KeyListener {
    event_tx: mpsc::Sender<ListenerEvent>,
    running: Arc<AtomicBool>,
    options: ListenerOptions,
}

impl KeyListener {
    pub fn new(event_tx: mpsc::Sender<ListenerEvent>, options: ListenerOptions) -> Self {
        Self {
            event_tx,
            running: Arc::new(AtomicBool::new(false)),
            options,
        }
    }

    /// Start the key listener
    ///
    /// Spawns a thread that owns the event tap and waits until the tap is
    /// installed, so setup failures (missing Accessibility permission) come
    /// back from here. The thread then runs until `stop()` is called, the
    /// receiving side of the channel is dropped, or the program exits.
    pub fn start(&self) -> Result<(), ListenerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ListenerError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let running = Arc::clone(&self.running);
        let options = self.options;
        let (ready_tx, ready_rx) = std_mpsc::channel();

        let spawned = thread::Builder::new()
            .name("key-listener".to_string())
            .spawn(move || {
                info!("key listener thread started");

                let result = tap::run_event_loop(
                    event_tx,
                    Arc::clone(&running),
                    options,
                    ready_tx.clone(),
                );
                running.store(false, Ordering::SeqCst);

                if let Err(e) = result {
                    error!(?e, "key listener error");
                    // Ignored once setup has been reported and `start` returned
                    let _ = ready_tx.send(Err(e));
                }

                info!("key listener thread stopped");
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(ListenerError::ThreadSpawn(e.to_string()));
        }

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.running.store(false, Ordering::SeqCst);
                Err(e)
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                Err(ListenerError::SetupAborted)
            }
        }
    }

    /// Ask the listener thread to exit; it notices within one run loop slice
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur in the key listener
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("key listener is already running")]
    AlreadyRunning,

    #[error("failed to create event tap - check Accessibility permissions")]
    EventTapCreation,

    #[error("failed to create run loop source for event tap")]
    RunLoopSource,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("listener thread exited before the event tap was set up")]
    SetupAborted,

    #[error("keyboard event taps are only available on macOS")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_creation() {
        let (tx, _rx) = mpsc::channel(32);
        let listener = KeyListener::new(tx, ListenerOptions::default());
        assert!(!listener.is_running());
    }

    #[test]
    fn test_default_options_drop_autorepeat() {
        assert!(ListenerOptions::default().ignore_autorepeat);
    }

    #[test]
    fn test_listener_event_serialization() {
        let json = serde_json::to_string(&ListenerEvent::TapDisabled).unwrap();
        assert_eq!(json, r#"{"type":"tap_disabled"}"#);

        let json = serde_json::to_string(&ListenerEvent::Key(KeyEvent::press(41))).unwrap();
        assert!(json.contains(r#""type":"key""#));
        assert!(json.contains(r#""key_code":41"#));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_start_unsupported_off_macos() {
        let (tx, _rx) = mpsc::channel(32);
        let listener = KeyListener::new(tx, ListenerOptions::default());
        assert!(matches!(listener.start(), Err(ListenerError::Unsupported)));
        assert!(!listener.is_running());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_failed_setup_allows_retry() {
        let (tx, _rx) = mpsc::channel(32);
        let listener = KeyListener::new(tx, ListenerOptions::default());

        assert!(listener.start().is_err());
        // A failed start must not leave the listener marked as running
        assert!(matches!(listener.start(), Err(ListenerError::Unsupported)));
        assert!(!listener.is_running());
    }
}
