#![forbid(unsafe_code)]

//! Observer capability traits for lifecycle dispatch.
//!
//! Observers implement whichever subset of the per-event methods they care
//! about; everything defaults to a no-op. The generic [`on_any`] hook fires
//! after the matching per-event method for every transition, so an observer
//! interested only in the raw event sequence implements `on_any` alone.
//!
//! [`on_any`]: LifecycleObserver::on_any

use crate::state::{Event, State};

/// Receiver of lifecycle transition callbacks.
///
/// Each per-event method receives the state the owner is in after the
/// transition. Dispatch order per transition: the matching per-event method,
/// then [`on_any`](Self::on_any).
///
/// Callbacks run synchronously on the dispatching thread and are not caught;
/// a panicking observer unwinds into the caller of
/// [`handle_event`](crate::registry::LifecycleRegistry::handle_event).
#[allow(unused_variables)]
pub trait LifecycleObserver {
    /// Owner was created.
    fn on_create(&mut self, state: State) {}

    /// Owner became visible.
    fn on_start(&mut self, state: State) {}

    /// Owner entered the foreground.
    fn on_resume(&mut self, state: State) {}

    /// Owner left the foreground.
    fn on_pause(&mut self, state: State) {}

    /// Owner is no longer visible.
    fn on_stop(&mut self, state: State) {}

    /// Owner is ending.
    fn on_destroy(&mut self, state: State) {}

    /// Called for every transition, after the matching per-event method.
    fn on_any(&mut self, event: Event, state: State) {}
}

/// Adapter turning a closure into an event observer.
///
/// The closure is invoked from [`on_any`](LifecycleObserver::on_any) only,
/// once per transition.
pub struct FnObserver<F: FnMut(Event, State)> {
    callback: F,
}

impl<F: FnMut(Event, State)> LifecycleObserver for FnObserver<F> {
    fn on_any(&mut self, event: Event, state: State) {
        (self.callback)(event, state);
    }
}

/// Wrap a closure as a [`LifecycleObserver`] receiving every transition.
///
/// # Example
///
/// ```
/// use lifeline_core::{LifecycleRegistry, Event, observer_fn};
///
/// let registry = LifecycleRegistry::new();
/// registry
///     .add_observer(observer_fn(|event, state| {
///         println!("{event} -> {state}");
///     }))
///     .unwrap();
/// registry.handle_event(Event::Create).unwrap();
/// ```
pub fn observer_fn<F: FnMut(Event, State)>(callback: F) -> FnObserver<F> {
    FnObserver { callback }
}
