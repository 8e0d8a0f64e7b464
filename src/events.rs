//! Change notification
//!
//! Observers register a callback and are called synchronously, in
//! registration order, once per completed mutation.

use crate::manifest::ManifestRegistry;

/// Name of the process-wide change event
pub const WORKSPACE_CHANGE: &str = "workspace-change";

/// What kind of mutation produced the event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeCause {
    /// A workspace was activated and reconciled into the registry
    Activated { id: String },
    /// Editors of the active workspace changed
    Editors,
    /// Configuration or name of the active workspace changed
    Configuration,
    /// A manifest entry was removed
    EntryRemoved { id: String },
    /// A manifest entry was pointed at a new path
    EntryRelocated { id: String },
}

/// Payload delivered to observers: the cause plus a registry snapshot
#[derive(Debug, Clone)]
pub struct WorkspaceChange {
    pub cause: ChangeCause,
    pub registry: ManifestRegistry,
}

impl WorkspaceChange {
    pub fn name(&self) -> &'static str {
        WORKSPACE_CHANGE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&WorkspaceChange)>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&WorkspaceChange) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the subscription was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, change: &WorkspaceChange) {
        tracing::debug!(event = WORKSPACE_CHANGE, cause = ?change.cause, observers = self.observers.len(), "dispatch");
        for (_, observer) in self.observers.iter_mut() {
            observer(change);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn change() -> WorkspaceChange {
        WorkspaceChange {
            cause: ChangeCause::Editors,
            registry: ManifestRegistry::new(),
        }
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for n in 0..3 {
            let log = log.clone();
            bus.subscribe(move |_| log.borrow_mut().push(n));
        }

        bus.emit(&change());
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = count.clone();
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);

        bus.emit(&change());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&change());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.observer_count(), 0);
    }

    #[test]
    fn test_event_name() {
        assert_eq!(change().name(), "workspace-change");
    }
}
