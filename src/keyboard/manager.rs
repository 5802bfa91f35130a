//! Keyboard event manager
//!
//! Tracks the four left-hand modifier flags and relays raw key events to
//! the observers registered for each key code.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::events::KeyEvent;
use crate::listener::ListenerEvent;

use super::codes::KeyCode;
use super::modifiers::ModifierState;
use super::observer::{KeyObserver, ObserverTable};

static SHARED: OnceLock<KeyboardEventManager> = OnceLock::new();

/// Modifier state plus the observer table, guarded together
#[derive(Debug, Default)]
struct Inner {
    modifiers: ModifierState,
    observers: ObserverTable,
}

/// Modifier-state tracker and per-key observer relay
#[derive(Debug, Default)]
pub struct KeyboardEventManager {
    inner: Mutex<Inner>,
}

impl KeyboardEventManager {
    /// Create a manager with all modifiers up and no observers
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance, created on first use.
    ///
    /// Prefer owning a manager and passing it around; this exists for
    /// callers that need one ambient instance.
    pub fn shared() -> &'static KeyboardEventManager {
        SHARED.get_or_init(KeyboardEventManager::new)
    }

    pub fn is_left_command_down(&self) -> bool {
        self.lock().modifiers.left_command
    }

    pub fn is_left_option_down(&self) -> bool {
        self.lock().modifiers.left_option
    }

    pub fn is_left_shift_down(&self) -> bool {
        self.lock().modifiers.left_shift
    }

    pub fn is_left_ctrl_down(&self) -> bool {
        self.lock().modifiers.left_control
    }

    /// Snapshot of all four modifier flags
    pub fn modifiers(&self) -> ModifierState {
        self.lock().modifiers
    }

    /// Record a press/release for `key_code` and notify its observers.
    ///
    /// Observers run after the lock is released, in registration order, so
    /// they may query the manager or register more observers. Observers
    /// added while a dispatch is in flight first fire on the next event.
    pub fn handle_key(&self, key_code: KeyCode, pressed: bool) {
        let observers = {
            let mut inner = self.lock();
            if let Some(modifier) = inner.modifiers.apply(key_code, pressed) {
                debug!(
                    %modifier,
                    pressed,
                    all_released = inner.modifiers.is_empty(),
                    "modifier state changed"
                );
            }
            inner.observers.observers_for(key_code)
        };

        trace!(key_code, pressed, observers = observers.len(), "dispatching key");

        for observer in observers {
            observer.on_key_event(pressed);
        }
    }

    pub fn handle_event(&self, event: &KeyEvent) {
        self.handle_key(event.key_code, event.pressed);
    }

    /// Register `observer` for every future event on `key_code`.
    ///
    /// There is no way to remove an observer; registrations live as long as
    /// the manager.
    pub fn add_observer<O>(&self, key_code: KeyCode, observer: O)
    where
        O: KeyObserver + 'static,
    {
        let mut inner = self.lock();
        inner.observers.add(key_code, Arc::new(observer));
        debug!(
            key_code,
            count = inner.observers.count_for(key_code),
            "observer registered"
        );
    }

    /// Number of observers registered for `key_code`
    pub fn observer_count(&self, key_code: KeyCode) -> usize {
        self.lock().observers.count_for(key_code)
    }

    /// Apply listener events until the channel closes
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<ListenerEvent>) {
        info!("keyboard event manager started");

        while let Some(event) = events.recv().await {
            match event {
                ListenerEvent::Key(key) => {
                    self.handle_event(&key);
                }
                ListenerEvent::TapDisabled => {
                    warn!("event tap was disabled and re-enabled, key events in between were missed");
                }
            }
        }

        info!("keyboard event manager stopped");
    }

    // The guarded data is plain values, so a panic in another holder cannot
    // leave it half-written.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::codes::{
        ESC_CODE, LEFT_COMMAND_CODE, LEFT_CTRL_CODE, LEFT_OPTION_CODE, LEFT_SHIFT_CODE,
    };

    fn recorder() -> (Arc<Mutex<Vec<bool>>>, impl Fn(bool) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |pressed: bool| sink.lock().unwrap().push(pressed))
    }

    #[test]
    fn test_initial_state() {
        let manager = KeyboardEventManager::new();
        assert!(!manager.is_left_command_down());
        assert!(!manager.is_left_option_down());
        assert!(!manager.is_left_shift_down());
        assert!(!manager.is_left_ctrl_down());
        assert!(manager.modifiers().is_empty());
    }

    #[test]
    fn test_modifier_press_and_release() {
        let manager = KeyboardEventManager::new();
        let flags: [(KeyCode, fn(&KeyboardEventManager) -> bool); 4] = [
            (LEFT_CTRL_CODE, KeyboardEventManager::is_left_ctrl_down),
            (LEFT_SHIFT_CODE, KeyboardEventManager::is_left_shift_down),
            (LEFT_OPTION_CODE, KeyboardEventManager::is_left_option_down),
            (LEFT_COMMAND_CODE, KeyboardEventManager::is_left_command_down),
        ];

        for (code, is_down) in flags {
            manager.handle_key(code, true);
            assert!(is_down(&manager), "code {} should be down", code);
            manager.handle_key(code, false);
            assert!(!is_down(&manager), "code {} should be up", code);
        }
    }

    #[test]
    fn test_unknown_code_leaves_flags() {
        let manager = KeyboardEventManager::new();
        manager.handle_key(LEFT_SHIFT_CODE, true);
        let before = manager.modifiers();

        manager.handle_key(999, true);
        manager.handle_key(999, false);
        manager.handle_key(ESC_CODE, true);

        assert_eq!(manager.modifiers(), before);
    }

    #[test]
    fn test_observer_called_once() {
        let manager = KeyboardEventManager::new();
        let (calls, observer) = recorder();
        manager.add_observer(41, observer);

        manager.handle_key(41, true);

        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_two_observers_same_code() {
        let manager = KeyboardEventManager::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for id in ["first", "second"] {
            let order = Arc::clone(&order);
            manager.add_observer(ESC_CODE, move |pressed: bool| {
                order.lock().unwrap().push((id, pressed))
            });
        }

        manager.handle_key(ESC_CODE, false);

        assert_eq!(
            *order.lock().unwrap(),
            vec![("first", false), ("second", false)]
        );
        assert_eq!(manager.observer_count(ESC_CODE), 2);
    }

    #[test]
    fn test_observers_do_not_cross_codes() {
        let manager = KeyboardEventManager::new();
        let (esc_calls, esc_observer) = recorder();
        let (cmd_calls, cmd_observer) = recorder();
        manager.add_observer(ESC_CODE, esc_observer);
        manager.add_observer(LEFT_COMMAND_CODE, cmd_observer);

        manager.handle_key(LEFT_COMMAND_CODE, true);
        manager.handle_key(12, true);

        assert!(esc_calls.lock().unwrap().is_empty());
        assert_eq!(*cmd_calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_modifier_observer_sees_updated_flag() {
        let manager = Arc::new(KeyboardEventManager::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let handle = Arc::clone(&manager);
            let seen = Arc::clone(&seen);
            manager.add_observer(LEFT_COMMAND_CODE, move |_pressed: bool| {
                seen.lock().unwrap().push(handle.is_left_command_down())
            });
        }

        manager.handle_key(LEFT_COMMAND_CODE, true);
        manager.handle_key(LEFT_COMMAND_CODE, false);

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_observer_registered_during_dispatch() {
        let manager = Arc::new(KeyboardEventManager::new());
        let (late_calls, late_observer) = recorder();
        let late_observer = Arc::new(late_observer);
        {
            let handle = Arc::clone(&manager);
            manager.add_observer(ESC_CODE, move |_pressed: bool| {
                let late = Arc::clone(&late_observer);
                handle.add_observer(ESC_CODE, move |pressed: bool| late.on_key_event(pressed));
            });
        }

        manager.handle_key(ESC_CODE, true);
        assert!(late_calls.lock().unwrap().is_empty());
        assert_eq!(manager.observer_count(ESC_CODE), 2);

        manager.handle_key(ESC_CODE, false);
        assert_eq!(*late_calls.lock().unwrap(), vec![false]);
    }

    #[test]
    fn test_shared_instance_identity() {
        let a = KeyboardEventManager::shared();
        let b = KeyboardEventManager::shared();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_run_applies_channel_events() {
        let manager = Arc::new(KeyboardEventManager::new());
        let (calls, observer) = recorder();
        manager.add_observer(ESC_CODE, observer);

        let (tx, rx) = mpsc::channel(8);
        tx.try_send(ListenerEvent::Key(KeyEvent::press(LEFT_OPTION_CODE)))
            .unwrap();
        tx.try_send(ListenerEvent::TapDisabled).unwrap();
        tx.try_send(ListenerEvent::Key(KeyEvent::press(ESC_CODE)))
            .unwrap();
        tx.try_send(ListenerEvent::Key(KeyEvent::release(ESC_CODE)))
            .unwrap();
        drop(tx);

        tokio_test::block_on(Arc::clone(&manager).run(rx));

        assert!(manager.is_left_option_down());
        assert_eq!(*calls.lock().unwrap(), vec![true, false]);
    }
}
