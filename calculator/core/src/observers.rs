//! Observer Registry
//!
//! Synchronous change listeners. The engine notifies every registered
//! observer, in registration order, once per handled button and before the
//! call that caused the change returns. Observers take no arguments: they
//! re-read whatever state they need from the engine afterwards.

use std::fmt;

/// Identifier returned when an observer is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer_{}", self.0)
    }
}

type Callback = Box<dyn FnMut()>;

/// Ordered set of observer callbacks
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverId, Callback)>,
    next_id: u64,
}

impl ObserverRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn register<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut() + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        tracing::debug!(observer = %id, "Observer registered");
        id
    }

    /// Remove an observer; returns whether it was registered
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        let removed = self.observers.len() != before;
        if removed {
            tracing::debug!(observer = %id, "Observer unregistered");
        }
        removed
    }

    /// Number of registered observers
    #[must_use]
    pub fn count(&self) -> usize {
        self.observers.len()
    }

    /// Invoke every observer in registration order
    pub fn notify_all(&mut self) {
        for (_, observer) in &mut self.observers {
            observer();
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("count", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
