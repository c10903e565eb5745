//! Storage change notifications.
//!
//! A `ChangeFeed` is shared (by cloning) between every `StorageService`
//! that should observe the same data, the way browser tabs observe one
//! origin's storage. Subscribers run synchronously after each successful
//! write; there is no ordering guarantee beyond "last write wins".

use std::cell::RefCell;
use std::rc::Rc;

/// Kind of mutation that triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Removed,
    Cleared,
}

/// One storage mutation. `key` is `None` for `Cleared`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: Option<String>,
    pub kind: ChangeKind,
}

impl StorageChange {
    pub fn set(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            kind: ChangeKind::Set,
        }
    }

    pub fn removed(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            kind: ChangeKind::Removed,
        }
    }

    pub fn cleared() -> Self {
        Self {
            key: None,
            kind: ChangeKind::Cleared,
        }
    }
}

/// Handle returned by `ChangeFeed::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&StorageChange)>;

#[derive(Default)]
struct FeedState {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Shared observer list; cloning yields another handle to the same list.
#[derive(Clone, Default)]
pub struct ChangeFeed {
    state: Rc<RefCell<FeedState>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every future change.
    pub fn subscribe(&self, listener: impl Fn(&StorageChange) + 'static) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Returns `false` when `id` was not (or no longer) subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Notifies all current subscribers.
    ///
    /// Listeners are snapshotted first, so a listener may subscribe or
    /// unsubscribe without affecting the ongoing dispatch.
    pub fn publish(&self, change: &StorageChange) {
        let listeners: Vec<Listener> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeFeed, ChangeKind, StorageChange};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn cloned_handles_share_subscribers() {
        let feed = ChangeFeed::new();
        let other_tab = feed.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let id = other_tab.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        feed.publish(&StorageChange::set("jarvis_todos"));
        feed.publish(&StorageChange::cleared());
        assert!(feed.unsubscribe(id));
        feed.publish(&StorageChange::removed("jarvis_notes"));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].key.as_deref(), Some("jarvis_todos"));
        assert_eq!(seen[1].kind, ChangeKind::Cleared);
    }

    #[test]
    fn listener_may_subscribe_during_dispatch() {
        let feed = ChangeFeed::new();
        let inner = feed.clone();
        feed.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        feed.publish(&StorageChange::set("k"));
        assert_eq!(feed.subscriber_count(), 2);
    }
}
