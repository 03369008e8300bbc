#![forbid(unsafe_code)]

//! Construction objects for state holders.
//!
//! Factories are passed explicitly to
//! [`ViewModelStore::get`](crate::store::ViewModelStore::get); there is no
//! ambient default instance. A factory that needs external arguments
//! captures them at construction time, the way a screen passes its
//! navigation arguments along.

/// A state holder could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionFailed {
    reason: String,
}

impl ConstructionFailed {
    /// Describe why construction failed.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The failure description.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl std::fmt::Display for ConstructionFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "construction failed: {}", self.reason)
    }
}

impl std::error::Error for ConstructionFailed {}

/// Constructs a state holder of type `T` on demand.
pub trait ViewModelFactory<T> {
    /// Build a fresh instance.
    ///
    /// # Errors
    ///
    /// [`ConstructionFailed`] when required inputs are missing or invalid.
    /// The store surfaces the error to the caller and caches nothing.
    fn create(&self) -> Result<T, ConstructionFailed>;
}

/// Factory for holders that construct from [`Default`].
///
/// The counterpart of a no-argument constructor: `get` with a
/// `DefaultFactory` never fails.
#[derive(Debug, Clone, Copy)]
pub struct DefaultFactory;

impl<T: Default> ViewModelFactory<T> for DefaultFactory {
    fn create(&self) -> Result<T, ConstructionFailed> {
        Ok(T::default())
    }
}

/// Adapter wrapping a closure as a factory.
///
/// # Example
///
/// ```
/// use lifeline_store::{FnFactory, ViewModelFactory};
///
/// struct Counter {
///     start: i64,
/// }
///
/// let factory = FnFactory::new(|| Ok(Counter { start: 10 }));
/// assert_eq!(factory.create().unwrap().start, 10);
/// ```
pub struct FnFactory<F> {
    create: F,
}

impl<T, F: Fn() -> Result<T, ConstructionFailed>> FnFactory<F> {
    /// Wrap `create` as a factory.
    pub fn new(create: F) -> Self {
        Self { create }
    }
}

impl<T, F: Fn() -> Result<T, ConstructionFailed>> ViewModelFactory<T> for FnFactory<F> {
    fn create(&self) -> Result<T, ConstructionFailed> {
        (self.create)()
    }
}
