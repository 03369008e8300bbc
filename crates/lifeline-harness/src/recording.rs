#![forbid(unsafe_code)]

//! Observer that records every callback it receives.

use std::cell::RefCell;
use std::rc::Rc;

use lifeline_core::{Event, LifecycleObserver, State};

/// Which observer method fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
    /// The generic hook, carrying the dispatched event.
    Any(Event),
}

/// Shared, cloneable log of recorded callbacks.
///
/// The log outlives the observer that feeds it: the registry consumes the
/// [`RecordingObserver`] on attach, while the test keeps a `CallbackLog`
/// handle for assertions.
#[derive(Debug, Clone, Default)]
pub struct CallbackLog {
    entries: Rc<RefCell<Vec<(Recorded, State)>>>,
}

impl CallbackLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded callback with the state it observed, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Recorded, State)> {
        self.entries.borrow().clone()
    }

    /// Only the per-event callbacks, in order, without the generic hook.
    #[must_use]
    pub fn callbacks(&self) -> Vec<Recorded> {
        self.entries
            .borrow()
            .iter()
            .filter(|(recorded, _)| !matches!(recorded, Recorded::Any(_)))
            .map(|(recorded, _)| *recorded)
            .collect()
    }

    /// The event sequence as seen by the generic hook, in order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|(recorded, _)| match recorded {
                Recorded::Any(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop all recorded entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn push(&self, recorded: Recorded, state: State) {
        self.entries.borrow_mut().push((recorded, state));
    }
}

/// Observer recording every callback into a [`CallbackLog`].
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    log: CallbackLog,
}

impl RecordingObserver {
    /// Create an observer with a fresh log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to this observer's log, for assertions after the observer
    /// has been moved into a registry.
    #[must_use]
    pub fn log(&self) -> CallbackLog {
        self.log.clone()
    }
}

impl LifecycleObserver for RecordingObserver {
    fn on_create(&mut self, state: State) {
        self.log.push(Recorded::Create, state);
    }

    fn on_start(&mut self, state: State) {
        self.log.push(Recorded::Start, state);
    }

    fn on_resume(&mut self, state: State) {
        self.log.push(Recorded::Resume, state);
    }

    fn on_pause(&mut self, state: State) {
        self.log.push(Recorded::Pause, state);
    }

    fn on_stop(&mut self, state: State) {
        self.log.push(Recorded::Stop, state);
    }

    fn on_destroy(&mut self, state: State) {
        self.log.push(Recorded::Destroy, state);
    }

    fn on_any(&mut self, event: Event, state: State) {
        self.log.push(Recorded::Any(event), state);
    }
}
