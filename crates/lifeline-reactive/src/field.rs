#![forbid(unsafe_code)]

//! Named observable value wrapper.
//!
//! # Design
//!
//! [`ObservableField<T>`] pairs a value with its own listener list. The
//! mutator writes the backing slot inside the interior borrow, releases the
//! borrow, and only then fans out, so listeners that re-read the field
//! through a cloned handle always observe the committed value.
//!
//! Every committed `set` notifies. Writing a value equal to the current one
//! still fires listeners; the field is a pass-through, not a dedup point.
//! Callers that want change detection compare before setting.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: a listener that calls [`set`](ObservableField::set)
//!   on the same field recurses. With no dedup there is no fixpoint cutoff,
//!   so an unconditional re-entrant set never terminates. Listeners must
//!   only re-enter behind a condition that eventually fails.

use std::cell::RefCell;
use std::rc::Rc;

use crate::notifier::{ListenerId, PropertyId};

type Callback = Rc<dyn Fn(PropertyId)>;

struct FieldInner<T> {
    name: PropertyId,
    value: T,
    next_id: u64,
    listeners: Vec<(ListenerIdRaw, Callback)>,
}

// Listener ids are scoped to one field; the raw counter avoids clashing
// with ids minted by a ChangeNotifier.
type ListenerIdRaw = u64;

/// A named value with change notification on every committed mutation.
///
/// Cloning an `ObservableField` creates a new handle to the **same** value
/// and listener list.
pub struct ObservableField<T> {
    inner: Rc<RefCell<FieldInner<T>>>,
}

impl<T> Clone for ObservableField<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableField<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableField")
            .field("name", &inner.name)
            .field("value", &inner.value)
            .field("listener_count", &inner.listeners.len())
            .finish()
    }
}

impl<T: 'static> ObservableField<T> {
    /// Create a field named `name` holding `value`.
    #[must_use]
    pub fn new(name: PropertyId, value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(FieldInner {
                name,
                value,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// The property identifier listeners receive.
    #[must_use]
    pub fn name(&self) -> PropertyId {
        self.inner.borrow().name
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, then notify every listener in registration order.
    ///
    /// Notification is unconditional; setting a value equal to the current
    /// one fires listeners all the same.
    pub fn set(&self, value: T) {
        let snapshot: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner
                .listeners
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect()
        };
        let name = self.name();
        for callback in &snapshot {
            callback(name);
        }
    }

    /// Modify the value in place, then notify every listener.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner
                .listeners
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect()
        };
        let name = self.name();
        for callback in &snapshot {
            callback(name);
        }
    }

    /// Register a listener. Duplicates are kept and each fires per
    /// notification.
    pub fn add_listener(&self, callback: impl Fn(PropertyId) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let raw = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((raw, Rc::new(callback)));
        ListenerId::from_raw(raw)
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(raw, _)| *raw != id.raw());
        inner.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl<T: Clone + 'static> ObservableField<T> {
    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_basic() {
        let field = ObservableField::new("age", 18);
        assert_eq!(field.get(), 18);
        field.set(23);
        assert_eq!(field.get(), 23);
    }

    #[test]
    fn listener_fires_after_value_committed() {
        let field = ObservableField::new("age", 0);
        let seen = Rc::new(Cell::new(0));
        {
            let field = field.clone();
            let seen = Rc::clone(&seen);
            field.clone().add_listener(move |_| seen.set(field.get()));
        }

        field.set(23);
        assert_eq!(seen.get(), 23);
    }

    #[test]
    fn equal_value_still_notifies() {
        let field = ObservableField::new("age", 23);
        let hits = Rc::new(Cell::new(0u32));
        {
            let hits = Rc::clone(&hits);
            field.add_listener(move |_| hits.set(hits.get() + 1));
        }

        field.set(23);
        field.set(23);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn listener_receives_field_name() {
        let field = ObservableField::new("member", false);
        let seen = Rc::new(RefCell::new(None));
        {
            let seen = Rc::clone(&seen);
            field.add_listener(move |name| *seen.borrow_mut() = Some(name));
        }

        field.set(true);
        assert_eq!(*seen.borrow(), Some("member"));
    }

    #[test]
    fn update_in_place_notifies() {
        let field = ObservableField::new("tags", vec!["a"]);
        let hits = Rc::new(Cell::new(0u32));
        {
            let hits = Rc::clone(&hits);
            field.add_listener(move |_| hits.set(hits.get() + 1));
        }

        field.update(|tags| tags.push("b"));
        assert_eq!(field.get(), vec!["a", "b"]);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn removal_stops_dispatch() {
        let field = ObservableField::new("age", 0);
        let hits = Rc::new(Cell::new(0u32));
        let id = {
            let hits = Rc::clone(&hits);
            field.add_listener(move |_| hits.set(hits.get() + 1))
        };

        field.set(1);
        assert!(field.remove_listener(id));
        field.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn registration_order_is_dispatch_order() {
        let field = ObservableField::new("name", String::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b"] {
            let log = Rc::clone(&log);
            field.add_listener(move |_| log.borrow_mut().push(tag));
        }

        field.set("x".to_string());
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn clone_shares_value_and_listeners() {
        let a = ObservableField::new("age", 0);
        let b = a.clone();
        let hits = Rc::new(Cell::new(0u32));
        {
            let hits = Rc::clone(&hits);
            a.add_listener(move |_| hits.set(hits.get() + 1));
        }

        b.set(9);
        assert_eq!(a.get(), 9);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn conditional_reentrant_set_terminates() {
        let field = ObservableField::new("age", 0);
        {
            let field = field.clone();
            field.clone().add_listener(move |_| {
                if field.get() < 3 {
                    let next = field.get() + 1;
                    field.set(next);
                }
            });
        }

        field.set(1);
        assert_eq!(field.get(), 3);
    }
}
