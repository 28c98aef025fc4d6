//! Single-writer observable cells.
//!
//! Shared values in the engine (the zoom scale, the focused page) have
//! exactly one designated writer and many readers. Ownership does the
//! heavy lifting: writers hold `&mut`, so a reader can never observe a
//! torn intermediate. What the cell adds is change tracking — a version
//! counter for pull-style consumers and a subscriber list for
//! push-style ones.

/// Handle returned by [`Observable::subscribe`]; pass it back to
/// [`Observable::unsubscribe`] on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// A value with a version counter and an explicit subscriber list.
///
/// `set` is a no-op (no notification, no version bump) when the new
/// value equals the old one, so followers can re-apply idempotently
/// without triggering storms downstream.
pub struct Observable<T> {
    value: T,
    version: u64,
    next_id: u64,
    subscribers: Vec<(SubscriberId, Box<dyn FnMut(&T)>)>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            version: 0,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Monotonically increasing counter, bumped on every effective write.
    /// Consumers that cache derived state recompute only when this
    /// changes, not on every poll.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Write a new value, notifying subscribers. Returns `false` when
    /// the value was equal to the current one and nothing happened.
    pub fn set(&mut self, value: T) -> bool {
        if value == self.value {
            return false;
        }
        self.value = value;
        self.version += 1;
        for (_, f) in &mut self.subscribers {
            f(&self.value);
        }
        true
    }

    pub fn subscribe(&mut self, f: impl FnMut(&T) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber. Returns `false` if the id was already gone,
    /// so double-teardown is harmless.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }
}
