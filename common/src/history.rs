use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// How many readings both consoles keep on screen.
pub const DEFAULT_CAPACITY: usize = 12;

/// Rolling buffer of the most recent readings, oldest first.
///
/// `record` appends and evicts from the front once the buffer is full, so the
/// length after any number of appends is `min(appends, capacity)`. Capacities
/// below 1 are clamped to 1.
#[derive(Clone, Debug)]
pub struct History<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, dropping the oldest one if the buffer is full.
    /// Never fails.
    pub fn record(&mut self, sample: T) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> History<T> {
    /// Current contents in arrival order. Does not mutate the buffer.
    pub fn snapshot(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// `History` behind a mutex, for the car console where the distance sampler
/// thread appends while the UI timer reads. The lock is held for the whole
/// append-and-evict span, so a reader sees either the buffer before or after
/// a record, never a half-applied one.
#[derive(Clone)]
pub struct SharedHistory<T>(Arc<Mutex<History<T>>>);

impl<T> SharedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self(Arc::new(Mutex::new(History::new(capacity))))
    }

    /// # Panics
    ///
    /// If the lock is poisoned.
    pub fn record(&self, sample: T) {
        self.0.lock().unwrap().record(sample);
    }
}

impl<T: Clone> SharedHistory<T> {
    /// # Panics
    ///
    /// If the lock is poisoned.
    pub fn snapshot(&self) -> Vec<T> {
        self.0.lock().unwrap().snapshot()
    }
}

impl<T> Default for SharedHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
