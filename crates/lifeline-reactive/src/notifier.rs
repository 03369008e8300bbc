#![forbid(unsafe_code)]

//! Per-property change notification for holder structs.
//!
//! # Design
//!
//! A holder struct owns its fields privately and embeds a [`ChangeNotifier`].
//! Its setters write the backing field first, then call
//! [`notify_changed`](ChangeNotifier::notify_changed) with the property
//! name. Listeners receive only the property identifier and re-read the
//! current value from the holder, which is why notification must follow the
//! write.
//!
//! Setters must write the backing field directly, never through their own
//! public setter: a setter that assigns through itself recurses without
//! bound. The notifier does not guard against a listener calling the same
//! setter again; that re-entry is the same hazard and is left to the caller.
//!
//! # Example
//!
//! ```
//! use lifeline_reactive::{ChangeNotifier, PropertyId};
//!
//! const AGE: PropertyId = "age";
//!
//! struct Person {
//!     age: u32,
//!     notifier: ChangeNotifier,
//! }
//!
//! impl Person {
//!     fn set_age(&mut self, age: u32) {
//!         self.age = age;
//!         self.notifier.notify_changed(AGE);
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// Identifier of a notifiable property.
pub type PropertyId = &'static str;

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub(crate) fn raw(self) -> u64 {
        self.0
    }
}

type Callback = Rc<dyn Fn(PropertyId)>;

struct ListenerEntry {
    id: ListenerId,
    property: PropertyId,
    callback: Callback,
}

struct NotifierInner {
    next_id: u64,
    listeners: Vec<ListenerEntry>,
}

/// Registry of per-property change listeners with synchronous fan-out.
///
/// Cloning a `ChangeNotifier` creates another handle to the same listener
/// set. Duplicate registrations of one callback are kept and invoked once
/// each; no deduplication happens anywhere in the dispatch path.
pub struct ChangeNotifier {
    inner: Rc<RefCell<NotifierInner>>,
}

impl Clone for ChangeNotifier {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl ChangeNotifier {
    /// Create a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(NotifierInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener for one property.
    ///
    /// Registering the same callback twice invokes it twice per
    /// notification.
    pub fn add_listener(
        &self,
        property: PropertyId,
        callback: impl Fn(PropertyId) + 'static,
    ) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push(ListenerEntry {
            id,
            property,
            callback: Rc::new(callback),
        });
        id
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|entry| entry.id != id);
        inner.listeners.len() != before
    }

    /// Invoke every listener registered for `property`, in registration
    /// order.
    ///
    /// Call this after writing the backing field, so listeners observe the
    /// committed value.
    pub fn notify_changed(&self, property: PropertyId) {
        let snapshot: Vec<Callback> = {
            let inner = self.inner.borrow();
            inner
                .listeners
                .iter()
                .filter(|entry| entry.property == property)
                .map(|entry| Rc::clone(&entry.callback))
                .collect()
        };
        trace!(property, listeners = snapshot.len(), "property changed");
        for callback in &snapshot {
            callback(property);
        }
    }

    /// Invoke every listener, each with its own property, in registration
    /// order.
    pub fn notify_all(&self) {
        let snapshot: Vec<(PropertyId, Callback)> = {
            let inner = self.inner.borrow();
            inner
                .listeners
                .iter()
                .map(|entry| (entry.property, Rc::clone(&entry.callback)))
                .collect()
        };
        for (property, callback) in &snapshot {
            callback(property);
        }
    }

    /// Number of registered listeners across all properties.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn notifies_matching_property_only() {
        let notifier = ChangeNotifier::new();
        let name_hits = Rc::new(Cell::new(0u32));
        let age_hits = Rc::new(Cell::new(0u32));

        {
            let hits = Rc::clone(&name_hits);
            notifier.add_listener("name", move |_| hits.set(hits.get() + 1));
        }
        {
            let hits = Rc::clone(&age_hits);
            notifier.add_listener("age", move |_| hits.set(hits.get() + 1));
        }

        notifier.notify_changed("age");
        assert_eq!(name_hits.get(), 0);
        assert_eq!(age_hits.get(), 1);
    }

    #[test]
    fn repeated_notification_is_not_deduplicated() {
        let notifier = ChangeNotifier::new();
        let hits = Rc::new(Cell::new(0u32));
        {
            let hits = Rc::clone(&hits);
            notifier.add_listener("age", move |_| hits.set(hits.get() + 1));
        }

        notifier.notify_changed("age");
        notifier.notify_changed("age");
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn duplicate_registration_fires_twice() {
        let notifier = ChangeNotifier::new();
        let hits = Rc::new(Cell::new(0u32));
        for _ in 0..2 {
            let hits = Rc::clone(&hits);
            notifier.add_listener("age", move |_| hits.set(hits.get() + 1));
        }

        notifier.notify_changed("age");
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn registration_order_is_dispatch_order() {
        let notifier = ChangeNotifier::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            notifier.add_listener("name", move |_| log.borrow_mut().push(tag));
        }

        notifier.notify_changed("name");
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn listener_receives_property_id() {
        let notifier = ChangeNotifier::new();
        let seen = Rc::new(RefCell::new(None));
        {
            let seen = Rc::clone(&seen);
            notifier.add_listener("member", move |property| {
                *seen.borrow_mut() = Some(property);
            });
        }

        notifier.notify_changed("member");
        assert_eq!(*seen.borrow(), Some("member"));
    }

    #[test]
    fn removal_stops_dispatch() {
        let notifier = ChangeNotifier::new();
        let hits = Rc::new(Cell::new(0u32));
        let id = {
            let hits = Rc::clone(&hits);
            notifier.add_listener("age", move |_| hits.set(hits.get() + 1))
        };

        notifier.notify_changed("age");
        assert!(notifier.remove_listener(id));
        notifier.notify_changed("age");

        assert_eq!(hits.get(), 1);
        assert!(!notifier.remove_listener(id));
    }

    #[test]
    fn notify_all_covers_every_property() {
        let notifier = ChangeNotifier::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for property in ["name", "age", "member"] {
            let log = Rc::clone(&log);
            notifier.add_listener(property, move |p| log.borrow_mut().push(p));
        }

        notifier.notify_all();
        assert_eq!(*log.borrow(), vec!["name", "age", "member"]);
    }

    #[test]
    fn add_during_dispatch_misses_current_pass() {
        let notifier = ChangeNotifier::new();
        let hits = Rc::new(Cell::new(0u32));
        {
            let notifier = notifier.clone();
            let hits = Rc::clone(&hits);
            notifier.clone().add_listener("age", move |_| {
                hits.set(hits.get() + 1);
                let inner_hits = Rc::clone(&hits);
                notifier.add_listener("age", move |_| {
                    inner_hits.set(inner_hits.get() + 1);
                });
            });
        }

        notifier.notify_changed("age");
        assert_eq!(hits.get(), 1);
    }
}
