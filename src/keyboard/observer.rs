//! Observer registration
//!
//! A per-key-code table of handlers. Registration is append-only and
//! handlers for a code keep the order they were added in.

use std::collections::HashMap;
use std::sync::Arc;

use super::codes::KeyCode;

/// Something that wants to hear about press/release of a key
pub trait KeyObserver: Send + Sync {
    fn on_key_event(&self, pressed: bool);
}

impl<F> KeyObserver for F
where
    F: Fn(bool) + Send + Sync,
{
    fn on_key_event(&self, pressed: bool) {
        self(pressed)
    }
}

/// Key code -> registered observers
#[derive(Default)]
pub struct ObserverTable {
    handlers: HashMap<KeyCode, Vec<Arc<dyn KeyObserver>>>,
}

impl ObserverTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer for `code`
    pub fn add(&mut self, code: KeyCode, observer: Arc<dyn KeyObserver>) {
        self.handlers.entry(code).or_default().push(observer);
    }

    /// Observers registered for `code`, in registration order.
    ///
    /// Returns owned handles so callers can invoke them without holding a
    /// borrow of the table.
    pub fn observers_for(&self, code: KeyCode) -> Vec<Arc<dyn KeyObserver>> {
        self.handlers.get(&code).cloned().unwrap_or_default()
    }

    pub fn count_for(&self, code: KeyCode) -> usize {
        self.handlers.get(&code).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for ObserverTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<(KeyCode, usize)> = self
            .handlers
            .iter()
            .map(|(code, list)| (*code, list.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("ObserverTable").field("counts", &counts).finish()
    }
}
