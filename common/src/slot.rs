use std::sync::{Arc, Mutex};

/// Single-value handoff between a sampler thread and the UI timer: the writer
/// replaces whatever is in the slot, the reader takes it. Only the newest
/// reading ever matters for display, so anything overwritten is simply lost.
#[derive(Clone, Default)]
pub struct Latest<T>(Arc<Mutex<Option<T>>>);

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }

    /// Publishes `value`, replacing any unread one.
    ///
    /// # Panics
    ///
    /// If the lock is poisoned.
    pub fn set(&self, value: T) {
        *self.0.lock().unwrap() = Some(value);
    }

    /// Takes the pending value, leaving the slot empty. `None` means nothing
    /// new arrived since the last take.
    ///
    /// # Panics
    ///
    /// If the lock is poisoned.
    pub fn take(&self) -> Option<T> {
        self.0.lock().unwrap().take()
    }
}
