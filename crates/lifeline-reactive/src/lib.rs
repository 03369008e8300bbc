#![forbid(unsafe_code)]

//! Reactive data primitives for Lifeline.
//!
//! Three change-tracking primitives with synchronous, registration-order
//! fan-out:
//!
//! - [`ChangeNotifier`]: per-property listener registry for holder structs
//!   that manage their own backing fields.
//! - [`ObservableField`]: a named value wrapper that notifies after every
//!   committed mutation.
//! - [`StateStream`]: a current-value stream whose delivery is gated on an
//!   owner's lifecycle activity, coalescing updates made while the owner is
//!   inactive down to the latest value.
//!
//! # Architecture
//!
//! All three use `Rc<RefCell<..>>` for single-threaded shared ownership and
//! invoke callbacks outside the interior borrow, so callbacks may register,
//! remove, or mutate. Unlike a deduplicating observable, these primitives
//! deliver on every committed mutation, equal values included; holders that
//! want dedup compare before setting.
//!
//! # Invariants
//!
//! 1. Listeners fire after the backing value is updated, never before.
//! 2. Fan-out follows registration order.
//! 3. A dispatch pass iterates a snapshot of the listener set taken at pass
//!    start; add/remove during the pass affects later passes only.
//! 4. Stream delivery only reaches observers whose owner is at or above
//!    `Started`; earlier updates are held and delivered once, latest value
//!    wins, on (re)activation.

pub mod field;
pub mod notifier;
pub mod stream;

pub use field::ObservableField;
pub use notifier::{ChangeNotifier, ListenerId, PropertyId};
pub use stream::{StateStream, SubscriberId};
