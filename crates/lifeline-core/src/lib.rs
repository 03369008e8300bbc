#![forbid(unsafe_code)]

//! Core: lifecycle states, transition events, and observer dispatch.
//!
//! # Role in Lifeline
//! `lifeline-core` is the ownership layer. It models the linear lifecycle an
//! owning scope moves through and fans transition events out to attached
//! observers in a deterministic order.
//!
//! # Primary responsibilities
//! - **State / Event**: the linear state machine and its legal transitions.
//! - **LifecycleObserver**: capability-set trait with no-op defaults.
//! - **LifecycleRegistry**: ordered observer list, snapshot dispatch, and
//!   synthesized catch-up events for late attachment.
//!
//! # How it fits in the system
//! The reactive layer (`lifeline-reactive`) attaches bridge observers to a
//! registry to gate value delivery on owner activity. The store
//! (`lifeline-store`) is driven by the same scope teardown that destroys a
//! registry. Who calls [`LifecycleRegistry::handle_event`] and when is the
//! embedding application's concern; this crate only validates and dispatches.

pub mod observer;
pub mod registry;
pub mod state;

pub use observer::{FnObserver, LifecycleObserver, observer_fn};
pub use registry::{LifecycleRegistry, ObserverId};
pub use state::{Event, LifecycleError, State};
