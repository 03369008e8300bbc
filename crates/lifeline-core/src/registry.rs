#![forbid(unsafe_code)]

//! Ordered observer registry driven by lifecycle events.
//!
//! # Design
//!
//! [`LifecycleRegistry`] wraps its state and observer list in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). Cloning a registry creates
//! another handle to the same owner lifecycle. Dispatch iterates a snapshot
//! of the observer list taken at pass start, with the interior borrow
//! released before any callback runs, so callbacks may attach or remove
//! observers; such changes take effect on subsequent passes only.
//!
//! # Invariants
//!
//! 1. Observers are dispatched in attachment order, one matching callback
//!    per legal transition, followed by `on_any`.
//! 2. A late-attached observer receives the forward events it missed,
//!    synchronously during [`add_observer`](LifecycleRegistry::add_observer),
//!    before any further transition.
//! 3. A rejected event leaves both the state and the observer list
//!    untouched.
//! 4. Reaching [`State::Destroyed`] evicts every observer after the final
//!    dispatch pass completes.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Illegal event | Wrong source state | `Err(IllegalTransition)`, no dispatch |
//! | Attach after destroy | Scope already ended | `Err(RegistryDestroyed)` |
//! | Observer panic | Bug in observer code | Propagates to the caller |
//! | Nested `handle_event` from a callback | Re-entrant dispatch | `RefCell` borrow panic |

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::observer::LifecycleObserver;
use crate::state::{Event, LifecycleError, State};

/// Handle for removing a previously attached observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type SharedObserver = Rc<RefCell<dyn LifecycleObserver>>;

struct Entry {
    id: ObserverId,
    observer: SharedObserver,
}

struct RegistryInner {
    state: State,
    next_id: u64,
    observers: Vec<Entry>,
}

/// Lifecycle state holder with ordered observer fan-out.
///
/// Cloning a `LifecycleRegistry` creates a new handle to the **same**
/// lifecycle; all handles see the same state and observer list.
///
/// # Example
///
/// ```
/// use lifeline_core::{Event, LifecycleRegistry, State, observer_fn};
///
/// let registry = LifecycleRegistry::new();
/// registry.handle_event(Event::Create).unwrap();
/// registry.handle_event(Event::Start).unwrap();
/// assert_eq!(registry.state(), State::Started);
/// ```
pub struct LifecycleRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl Clone for LifecycleRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for LifecycleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LifecycleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LifecycleRegistry")
            .field("state", &inner.state)
            .field("observer_count", &inner.observers.len())
            .finish()
    }
}

impl LifecycleRegistry {
    /// Create a registry in [`State::Initialized`] with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                state: State::Initialized,
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        self.inner.borrow().state
    }

    /// Number of currently attached observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Attach an observer.
    ///
    /// If the state has already moved past [`State::Initialized`], the
    /// observer receives the forward events it missed (`Create`, `Start`,
    /// `Resume`, as far as the current state) synchronously before this
    /// method returns, so every observer sees a consistent history.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::RegistryDestroyed`] when the registry has reached
    /// [`State::Destroyed`]. Ending a scope is permanent; attaching to a dead
    /// registry is a caller bug and is reported rather than ignored.
    pub fn add_observer(
        &self,
        observer: impl LifecycleObserver + 'static,
    ) -> Result<ObserverId, LifecycleError> {
        let (id, shared, state) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_destroyed() {
                return Err(LifecycleError::RegistryDestroyed);
            }
            let id = ObserverId(inner.next_id);
            inner.next_id += 1;
            let shared: SharedObserver = Rc::new(RefCell::new(observer));
            inner.observers.push(Entry {
                id,
                observer: Rc::clone(&shared),
            });
            (id, shared, inner.state)
        };

        // Replay missed forward events to the new observer only.
        for &event in state.catch_up_events() {
            trace!(observer = id.0, %event, "catch-up dispatch");
            Self::dispatch_to(&shared, event, event.target());
        }
        Ok(id)
    }

    /// Detach an observer.
    ///
    /// Returns `true` if the observer was attached. Removal during a
    /// dispatch pass affects subsequent passes only; the in-flight pass
    /// iterates the snapshot taken when it started.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.observers.len();
        inner.observers.retain(|entry| entry.id != id);
        inner.observers.len() != before
    }

    /// Apply a lifecycle event and dispatch it to every observer.
    ///
    /// Observers are invoked in attachment order: the per-event method, then
    /// `on_any`. When the event is [`Event::Destroy`], all observers are
    /// evicted after the dispatch pass.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::IllegalTransition`] when the event cannot fire from
    /// the current state. The state and observer list are left unchanged and
    /// nothing is dispatched.
    pub fn handle_event(&self, event: Event) -> Result<State, LifecycleError> {
        let (snapshot, state) = {
            let mut inner = self.inner.borrow_mut();
            let next = event.apply(inner.state)?;
            debug!(from = %inner.state, %event, to = %next, "lifecycle transition");
            inner.state = next;
            let snapshot: Vec<SharedObserver> = inner
                .observers
                .iter()
                .map(|entry| Rc::clone(&entry.observer))
                .collect();
            (snapshot, next)
        };

        for observer in &snapshot {
            Self::dispatch_to(observer, event, state);
        }

        if state.is_destroyed() {
            let evicted = {
                let mut inner = self.inner.borrow_mut();
                std::mem::take(&mut inner.observers).len()
            };
            debug!(evicted, "registry destroyed, observers evicted");
        }
        Ok(state)
    }

    fn dispatch_to(observer: &SharedObserver, event: Event, state: State) {
        let mut observer = observer.borrow_mut();
        match event {
            Event::Create => observer.on_create(state),
            Event::Start => observer.on_start(state),
            Event::Resume => observer.on_resume(state),
            Event::Pause => observer.on_pause(state),
            Event::Stop => observer.on_stop(state),
            Event::Destroy => observer.on_destroy(state),
        }
        observer.on_any(event, state);
    }
}
