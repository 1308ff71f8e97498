//! Explicit subscribe/notify change propagation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle returned by [`ObserverSet::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Arc<dyn Fn() + Send + Sync>;

/// A set of change callbacks.
///
/// Stores hold one of these and call [`Self::notify`] after every state
/// mutation. Callbacks receive no payload; subscribers re-read whatever
/// store state they render.
#[derive(Default)]
pub struct ObserverSet {
    observers: Mutex<Vec<(ObserverId, Callback)>>,
    next_id: AtomicU64,
}

impl ObserverSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, returning a handle for unsubscribing.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Unknown handles are ignored.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.lock().retain(|(observer_id, _)| *observer_id != id);
    }

    /// Invoke every registered callback.
    ///
    /// Callbacks run outside the internal lock, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = self
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ObserverId, Callback)>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.lock().len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_reaches_all_subscribers() {
        let set = ObserverSet::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            set.subscribe(move || {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }

        set.notify();
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let set = ObserverSet::new();
        let count = Arc::new(AtomicUsize::new(0));

        let id = {
            let count = Arc::clone(&count);
            set.subscribe(move || {
                count.fetch_add(1, Ordering::Relaxed);
            })
        };

        set.notify();
        set.unsubscribe(id);
        set.notify();
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_callback_may_subscribe_during_notify() {
        let set = Arc::new(ObserverSet::new());
        let inner = Arc::clone(&set);
        set.subscribe(move || {
            inner.subscribe(|| {});
        });
        set.notify();
    }
}
