#![forbid(unsafe_code)]

//! Identity-preserving cache of state holders, keyed by scope.
//!
//! # Invariants
//!
//! 1. **One instance per scope key**: the factory runs on the first request
//!    for a key; every later request returns the same instance and ignores
//!    the supplied factory entirely.
//! 2. **Teardown exactly once**: [`clear`](ViewModelStore::clear) evicts the
//!    entry before running its `on_cleared` hook, so re-entrant store calls
//!    from the hook observe the key as absent and a second `clear` is a
//!    no-op.
//! 3. **Failed construction caches nothing**: after a factory error the key
//!    is still vacant and the next `get` constructs from scratch.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Factory error | Missing/invalid construction inputs | `Err(ConstructionFailed)`, key vacant |
//! | Type mismatch | Same key requested as two different types | `Err(TypeMismatch)`, cache untouched |
//! | Hook panic | Bug in `on_cleared` | Propagates; entry already evicted |

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::factory::{ConstructionFailed, ViewModelFactory};

/// A scope-owned state holder.
///
/// Implementations override [`on_cleared`](Self::on_cleared) to release
/// whatever the holder owns; the default does nothing.
pub trait ViewModel: Any {
    /// Called exactly once, when the owning scope is permanently destroyed.
    fn on_cleared(&mut self) {}
}

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The factory failed to build the requested holder.
    ConstructionFailed {
        scope: String,
        cause: ConstructionFailed,
    },
    /// The scope key holds an instance of a different concrete type.
    TypeMismatch {
        scope: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstructionFailed { scope, cause } => {
                write!(f, "scope '{scope}': {cause}")
            }
            Self::TypeMismatch {
                scope,
                expected,
                found,
            } => {
                write!(
                    f,
                    "scope '{scope}' holds '{found}', requested '{expected}'"
                )
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConstructionFailed { cause, .. } => Some(cause),
            Self::TypeMismatch { .. } => None,
        }
    }
}

struct Entry {
    /// Concretely an `Rc<RefCell<T>>`, type-erased for storage.
    instance: Rc<dyn Any>,
    /// Typed teardown closure captured at insertion time.
    clear_hook: Box<dyn Fn()>,
    type_name: &'static str,
}

/// Scope-keyed cache of lazily constructed [`ViewModel`]s.
///
/// Cloning a `ViewModelStore` creates a new handle to the **same** cache.
///
/// # Example
///
/// ```
/// use lifeline_store::{DefaultFactory, ViewModel, ViewModelStore};
///
/// #[derive(Default)]
/// struct CounterModel {
///     count: i64,
/// }
/// impl ViewModel for CounterModel {}
///
/// let store = ViewModelStore::new();
/// let a = store.get::<CounterModel, _>("main", &DefaultFactory).unwrap();
/// let b = store.get::<CounterModel, _>("main", &DefaultFactory).unwrap();
/// assert!(std::rc::Rc::ptr_eq(&a, &b));
/// ```
pub struct ViewModelStore {
    inner: Rc<RefCell<HashMap<String, Entry>>>,
}

impl Clone for ViewModelStore {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for ViewModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ViewModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModelStore")
            .field("len", &self.len())
            .finish()
    }
}

impl ViewModelStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Fetch the holder for `scope`, constructing it on first request.
    ///
    /// Later requests for the same key return the identical instance; the
    /// supplied factory is ignored once a holder is cached.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConstructionFailed`] when the factory fails (nothing is
    /// cached, not retried), [`StoreError::TypeMismatch`] when the key is
    /// already occupied by a different concrete type.
    pub fn get<T, F>(&self, scope: &str, factory: &F) -> Result<Rc<RefCell<T>>, StoreError>
    where
        T: ViewModel,
        F: ViewModelFactory<T>,
    {
        let cached = self
            .inner
            .borrow()
            .get(scope)
            .map(|entry| (Rc::clone(&entry.instance), entry.type_name));
        if let Some((instance, type_name)) = cached {
            return Rc::downcast::<RefCell<T>>(instance).map_err(|_| StoreError::TypeMismatch {
                scope: scope.to_string(),
                expected: std::any::type_name::<T>(),
                found: type_name,
            });
        }

        let instance = factory
            .create()
            .map_err(|cause| StoreError::ConstructionFailed {
                scope: scope.to_string(),
                cause,
            })?;
        let instance = Rc::new(RefCell::new(instance));
        let hook_target = Rc::clone(&instance);
        let entry = Entry {
            instance: instance.clone() as Rc<dyn Any>,
            clear_hook: Box::new(move || hook_target.borrow_mut().on_cleared()),
            type_name: std::any::type_name::<T>(),
        };
        debug!(scope, holder = entry.type_name, "holder constructed");
        self.inner.borrow_mut().insert(scope.to_string(), entry);
        Ok(instance)
    }

    /// Whether `scope` currently holds a cached instance.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.inner.borrow().contains_key(scope)
    }

    /// Number of cached holders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Evict the holder for `scope` and run its `on_cleared` hook.
    ///
    /// Returns `true` if a holder was evicted. Call this only on permanent
    /// scope destruction; transient teardown that will be followed by
    /// recreation must keep the store untouched.
    pub fn clear(&self, scope: &str) -> bool {
        let entry = self.inner.borrow_mut().remove(scope);
        match entry {
            Some(entry) => {
                debug!(scope, holder = entry.type_name, "holder cleared");
                (entry.clear_hook)();
                true
            }
            None => false,
        }
    }

    /// Evict every holder, running each `on_cleared` hook.
    pub fn clear_all(&self) {
        let entries: Vec<Entry> = {
            let mut inner = self.inner.borrow_mut();
            inner.drain().map(|(_, entry)| entry).collect()
        };
        debug!(count = entries.len(), "store cleared");
        for entry in &entries {
            (entry.clear_hook)();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{DefaultFactory, FnFactory};
    use std::cell::Cell;

    #[derive(Default, Debug)]
    struct CounterModel {
        count: i64,
        cleared: Option<Rc<Cell<u32>>>,
    }

    impl ViewModel for CounterModel {
        fn on_cleared(&mut self) {
            if let Some(cleared) = &self.cleared {
                cleared.set(cleared.get() + 1);
            }
        }
    }

    #[derive(Default, Debug)]
    struct OtherModel;
    impl ViewModel for OtherModel {}

    fn counting_factory(
        constructed: &Rc<Cell<u32>>,
        cleared: &Rc<Cell<u32>>,
    ) -> FnFactory<impl Fn() -> Result<CounterModel, ConstructionFailed>> {
        let constructed = Rc::clone(constructed);
        let cleared = Rc::clone(cleared);
        FnFactory::new(move || {
            constructed.set(constructed.get() + 1);
            Ok(CounterModel {
                count: 0,
                cleared: Some(Rc::clone(&cleared)),
            })
        })
    }

    #[test]
    fn same_key_returns_identical_instance() {
        let store = ViewModelStore::new();
        let a = store.get::<CounterModel, _>("scope_a", &DefaultFactory).unwrap();
        a.borrow_mut().count = 42;

        let b = store.get::<CounterModel, _>("scope_a", &DefaultFactory).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(b.borrow().count, 42);
    }

    #[test]
    fn cached_instance_ignores_later_factories() {
        let store = ViewModelStore::new();
        let constructed = Rc::new(Cell::new(0u32));
        let cleared = Rc::new(Cell::new(0u32));
        let factory = counting_factory(&constructed, &cleared);

        store.get::<CounterModel, _>("scope_a", &factory).unwrap();
        store.get::<CounterModel, _>("scope_a", &factory).unwrap();
        assert_eq!(constructed.get(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_instances() {
        let store = ViewModelStore::new();
        let a = store.get::<CounterModel, _>("scope_a", &DefaultFactory).unwrap();
        let b = store.get::<CounterModel, _>("scope_b", &DefaultFactory).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_runs_hook_once_and_reconstructs_on_next_get() {
        let store = ViewModelStore::new();
        let constructed = Rc::new(Cell::new(0u32));
        let cleared = Rc::new(Cell::new(0u32));
        let factory = counting_factory(&constructed, &cleared);

        let old = store.get::<CounterModel, _>("scope_a", &factory).unwrap();
        assert!(store.clear("scope_a"));
        assert_eq!(cleared.get(), 1);
        assert!(!store.contains("scope_a"));

        // A fresh request constructs anew; the old instance is untouched.
        let new = store.get::<CounterModel, _>("scope_a", &factory).unwrap();
        assert!(!Rc::ptr_eq(&old, &new));
        assert_eq!(constructed.get(), 2);
        assert_eq!(cleared.get(), 1);
    }

    #[test]
    fn clear_unknown_key_is_noop() {
        let store = ViewModelStore::new();
        assert!(!store.clear("missing"));
    }

    #[test]
    fn failed_construction_caches_nothing() {
        let store = ViewModelStore::new();
        let failing = FnFactory::new(|| -> Result<CounterModel, ConstructionFailed> {
            Err(ConstructionFailed::new("missing user argument"))
        });

        let err = store.get::<CounterModel, _>("scope_a", &failing).unwrap_err();
        assert!(matches!(err, StoreError::ConstructionFailed { .. }));
        assert!(err.to_string().contains("missing user argument"));
        assert!(store.is_empty());

        // The key stays usable with a working factory.
        store.get::<CounterModel, _>("scope_a", &DefaultFactory).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn mismatched_type_for_occupied_key_is_rejected() {
        let store = ViewModelStore::new();
        store.get::<CounterModel, _>("scope_a", &DefaultFactory).unwrap();

        let err = store
            .get::<OtherModel, _>("scope_a", &DefaultFactory)
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
        // The occupant survives.
        assert!(store.contains("scope_a"));
        store.get::<CounterModel, _>("scope_a", &DefaultFactory).unwrap();
    }

    #[test]
    fn clear_all_tears_down_every_holder() {
        let store = ViewModelStore::new();
        let constructed = Rc::new(Cell::new(0u32));
        let cleared = Rc::new(Cell::new(0u32));
        let factory = counting_factory(&constructed, &cleared);

        store.get::<CounterModel, _>("scope_a", &factory).unwrap();
        store.get::<CounterModel, _>("scope_b", &factory).unwrap();
        store.clear_all();

        assert!(store.is_empty());
        assert_eq!(cleared.get(), 2);
    }

    #[test]
    fn factory_arguments_reach_the_holder() {
        let store = ViewModelStore::new();
        let start = 25i64;
        let factory = FnFactory::new(move || {
            Ok(CounterModel {
                count: start,
                cleared: None,
            })
        });

        let holder = store.get::<CounterModel, _>("scope_a", &factory).unwrap();
        assert_eq!(holder.borrow().count, 25);
    }
}
