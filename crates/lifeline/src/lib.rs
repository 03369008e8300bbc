#![forbid(unsafe_code)]

//! Lifeline: lifecycle-aware observable state.
//!
//! A small reactive core built from four pieces:
//!
//! - [`LifecycleRegistry`]: an owner's lifecycle state machine with ordered
//!   observer fan-out and catch-up for late attachment.
//! - [`ChangeNotifier`] / [`ObservableField`]: property-level change
//!   notification for holder structs.
//! - [`StateStream`]: a current-value stream whose delivery is gated on an
//!   owner's lifecycle activity.
//! - [`ViewModelStore`]: a scope-keyed, identity-preserving cache of state
//!   holders with teardown hooks.
//!
//! Everything dispatches synchronously on the calling thread; who drives
//! the lifecycle events, and when, is the embedding application's concern.
//!
//! # Example
//!
//! ```
//! use lifeline::prelude::*;
//!
//! let owner = LifecycleRegistry::new();
//! let count: StateStream<i64> = StateStream::with_value(0);
//!
//! owner.handle_event(Event::Create)?;
//! count.observe(&owner, |n| println!("count: {n}"))?;
//!
//! count.set_value(1); // held: owner not started yet
//! owner.handle_event(Event::Start)?; // prints "count: 1"
//! count.set_value(2); // prints "count: 2"
//! # Ok::<(), lifeline::LifecycleError>(())
//! ```

pub use lifeline_core::{
    Event, FnObserver, LifecycleError, LifecycleObserver, LifecycleRegistry, ObserverId, State,
    observer_fn,
};
pub use lifeline_reactive::{
    ChangeNotifier, ListenerId, ObservableField, PropertyId, StateStream, SubscriberId,
};
pub use lifeline_store::{
    ConstructionFailed, DefaultFactory, FnFactory, StoreError, ViewModel, ViewModelFactory,
    ViewModelStore,
};

/// Single-import convenience surface.
pub mod prelude {
    pub use super::{
        ChangeNotifier, DefaultFactory, Event, FnFactory, LifecycleObserver, LifecycleRegistry,
        ObservableField, State, StateStream, ViewModel, ViewModelFactory, ViewModelStore,
        observer_fn,
    };
}
