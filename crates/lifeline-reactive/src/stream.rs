#![forbid(unsafe_code)]

//! Lifecycle-gated value stream.
//!
//! # Design
//!
//! [`StateStream<T>`] holds a current value and a list of subscribers, each
//! tied to an owner's [`LifecycleRegistry`]. Delivery is gated on owner
//! activity: a subscriber only receives values while its owner is at or
//! above `Started`. Updates made while the owner is inactive are not queued;
//! the stream keeps a version counter and each subscriber remembers the last
//! version it saw, so (re)activation delivers the current value exactly once
//! when anything was missed. Intermediate values set while inactive are
//! never replayed.
//!
//! The gate is wired through an internal bridge observer attached to the
//! owner's registry: activation triggers catch-up delivery, destruction
//! removes the subscription.
//!
//! # Invariants
//!
//! 1. Active subscribers are notified synchronously, in registration order,
//!    on every `set_value`, equal values included.
//! 2. An inactive subscriber misses intermediate values; on activation it
//!    receives the latest value exactly once.
//! 3. A new subscriber whose owner is already active receives the current
//!    value (if any) during [`observe`](StateStream::observe).
//! 4. Owner destruction removes the owner's subscriptions; no further
//!    delivery happens for them.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Observe with destroyed owner | Scope already ended | `Err(RegistryDestroyed)` |
//! | Callback panic | Bug in subscriber | Propagates to the caller |
//! | Re-entrant `set_value` from a callback | Subscriber feedback loop | Recurses; bounded only by the callback's own condition |

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use lifeline_core::{Event, LifecycleError, LifecycleObserver, LifecycleRegistry, ObserverId, State};
use tracing::{debug, trace};

/// Handle for removing a stream subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

struct SubscriberEntry<T> {
    id: u64,
    callback: Callback<T>,
    /// `None` for lifecycle-independent subscribers, which are always
    /// active.
    owner: Option<LifecycleRegistry>,
    /// Bridge observer attached to the owner's registry, detached when the
    /// subscription is removed explicitly.
    bridge: Option<ObserverId>,
    last_seen: u64,
}

impl<T> SubscriberEntry<T> {
    fn is_active(&self) -> bool {
        self.owner
            .as_ref()
            .is_none_or(|owner| owner.state().is_active())
    }
}

struct StreamInner<T> {
    value: Option<T>,
    version: u64,
    next_id: u64,
    subscribers: Vec<SubscriberEntry<T>>,
}

/// Observer planted on an owner registry to gate one subscription.
struct StreamBridge<T> {
    stream: Weak<RefCell<StreamInner<T>>>,
    subscriber: u64,
}

impl<T: Clone + 'static> LifecycleObserver for StreamBridge<T> {
    fn on_any(&mut self, _event: Event, state: State) {
        let Some(inner) = self.stream.upgrade() else {
            return;
        };
        if state.is_destroyed() {
            inner
                .borrow_mut()
                .subscribers
                .retain(|entry| entry.id != self.subscriber);
        } else if state.is_active() {
            StateStream::deliver_latest(&inner, self.subscriber);
        }
    }
}

/// A current-value holder with lifecycle-gated, latest-value-wins delivery.
///
/// Cloning a `StateStream` creates a new handle to the **same** value and
/// subscriber list.
pub struct StateStream<T> {
    inner: Rc<RefCell<StreamInner<T>>>,
}

impl<T> Clone for StateStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StateStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("StateStream")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for StateStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> StateStream<T> {
    /// Create an empty stream. [`value`](Self::value) is `None` until the
    /// first [`set_value`](Self::set_value).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StreamInner {
                value: None,
                version: 0,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Create a stream seeded with an initial value.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StreamInner {
                value: Some(value),
                version: 1,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }

    /// Number of committed updates, counting the seed value of
    /// [`with_value`](Self::with_value).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Commit a new value and deliver it to every active subscriber, in
    /// registration order. Inactive subscribers catch up on activation with
    /// whatever the latest value is by then.
    pub fn set_value(&self, value: T) {
        let (deliveries, current) = {
            let mut inner = self.inner.borrow_mut();
            inner.value = Some(value);
            inner.version += 1;
            let version = inner.version;

            let mut deliveries: Vec<Callback<T>> = Vec::new();
            // Split borrows: activity checks read the owner registries, not
            // the stream interior.
            for entry in &mut inner.subscribers {
                if entry.is_active() {
                    entry.last_seen = version;
                    deliveries.push(Rc::clone(&entry.callback));
                }
            }
            let current = if deliveries.is_empty() {
                None
            } else {
                inner.value.clone()
            };
            debug!(version, delivered = deliveries.len(), "stream value committed");
            (deliveries, current)
        };

        if let Some(current) = current {
            for callback in &deliveries {
                callback(&current);
            }
        }
    }

    /// Subscribe gated on `owner`'s lifecycle.
    ///
    /// If the owner is already active and the stream holds a value, the
    /// callback receives it synchronously before this method returns.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::RegistryDestroyed`] when the owner's lifecycle has
    /// already ended; nothing is registered.
    pub fn observe(
        &self,
        owner: &LifecycleRegistry,
        callback: impl Fn(&T) + 'static,
    ) -> Result<SubscriberId, LifecycleError> {
        let id = self.push_entry(Some(owner.clone()), callback);

        let bridge = StreamBridge {
            stream: Rc::downgrade(&self.inner),
            subscriber: id,
        };
        // Attaching replays the owner's forward history into the bridge,
        // which performs the initial delivery when the owner is active.
        match owner.add_observer(bridge) {
            Ok(observer_id) => {
                let mut inner = self.inner.borrow_mut();
                if let Some(entry) = inner.subscribers.iter_mut().find(|e| e.id == id) {
                    entry.bridge = Some(observer_id);
                }
                Ok(SubscriberId(id))
            }
            Err(err) => {
                self.inner
                    .borrow_mut()
                    .subscribers
                    .retain(|entry| entry.id != id);
                Err(err)
            }
        }
    }

    /// Subscribe independently of any lifecycle. The callback is treated as
    /// always active and receives the current value (if any) immediately.
    /// It stays registered until [`remove_observer`](Self::remove_observer).
    pub fn observe_forever(&self, callback: impl Fn(&T) + 'static) -> SubscriberId {
        let id = self.push_entry(None, callback);
        Self::deliver_latest(&self.inner, id);
        SubscriberId(id)
    }

    /// Remove a subscription. Returns `true` if it was registered.
    pub fn remove_observer(&self, id: SubscriberId) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let position = inner.subscribers.iter().position(|e| e.id == id.0);
            position.map(|index| inner.subscribers.remove(index))
        };
        match removed {
            Some(entry) => {
                if let (Some(owner), Some(bridge)) = (entry.owner, entry.bridge) {
                    owner.remove_observer(bridge);
                }
                true
            }
            None => false,
        }
    }

    /// Derive a stream that applies `f` to every value of this one.
    ///
    /// The link is a lifecycle-independent subscription on the source: the
    /// derived stream's value stays current for as long as the source stream
    /// is alive, and the derived stream gates its own subscribers as usual.
    #[must_use]
    pub fn map<U, F>(&self, f: F) -> StateStream<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let derived = StateStream::new();
        let feed = derived.clone();
        let _link = self.observe_forever(move |value| feed.set_value(f(value)));
        derived
    }

    fn push_entry(&self, owner: Option<LifecycleRegistry>, callback: impl Fn(&T) + 'static) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(SubscriberEntry {
            id,
            callback: Rc::new(callback),
            owner,
            bridge: None,
            last_seen: 0,
        });
        id
    }

    /// Deliver the current value to one subscriber if it has missed any
    /// update. Exactly-once per version is enforced by the version compare.
    fn deliver_latest(inner: &Rc<RefCell<StreamInner<T>>>, subscriber: u64) {
        let delivery = {
            let mut borrow = inner.borrow_mut();
            let version = borrow.version;
            let Some(entry) = borrow
                .subscribers
                .iter_mut()
                .find(|entry| entry.id == subscriber)
            else {
                return;
            };
            if entry.last_seen >= version {
                return;
            }
            entry.last_seen = version;
            let callback = Rc::clone(&entry.callback);
            borrow.value.clone().map(|value| (callback, value))
        };
        if let Some((callback, value)) = delivery {
            trace!(subscriber, "catch-up delivery");
            callback(&value);
        }
    }
}
