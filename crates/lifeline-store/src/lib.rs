#![forbid(unsafe_code)]

//! Scope-keyed cache of lazily constructed state holders.
//!
//! # Role in Lifeline
//! `lifeline-store` keeps screen-level state alive across the UI layer's
//! churn. A state holder is constructed once per scope key, handed back
//! unchanged on every later request for that key, and torn down exactly once
//! when the owning scope ends for good.
//!
//! # Primary responsibilities
//! - **ViewModel**: the state-holder trait with an `on_cleared` teardown hook.
//! - **ViewModelFactory**: explicit construction objects; no ambient
//!   defaults.
//! - **ViewModelStore**: the identity-preserving cache keyed by scope.
//!
//! # How it fits in the system
//! Deciding *when* a scope has permanently ended (as opposed to being torn
//! down transiently for recreation) is the embedding application's call;
//! the store only acts on [`clear`](ViewModelStore::clear).

pub mod factory;
pub mod store;

pub use factory::{ConstructionFailed, DefaultFactory, FnFactory, ViewModelFactory};
pub use store::{StoreError, ViewModel, ViewModelStore};
