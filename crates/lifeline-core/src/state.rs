#![forbid(unsafe_code)]

//! Lifecycle states and transition events.
//!
//! # Invariants
//!
//! 1. **Linearity**: live states form a total order
//!    `Initialized < Created < Started < Resumed`. [`State::Destroyed`] is
//!    terminal and unordered; it only compares equal to itself.
//!
//! 2. **Adjacency**: every event moves the state exactly one step along the
//!    order, except [`Event::Destroy`], which is accepted from any live state.
//!
//! 3. **Rejection leaves state untouched**: [`Event::apply`] on an illegal
//!    source returns [`LifecycleError::IllegalTransition`] and nothing else
//!    happens. Illegal transitions are caller bugs, not recoverable
//!    conditions.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Illegal transition | Event from wrong source state | `IllegalTransition`, state unchanged |
//! | Event on destroyed | Any event after `Destroy` | `IllegalTransition` |
//! | Attach on destroyed | `add_observer` after `Destroy` | `RegistryDestroyed` |

/// Position of an owning scope along its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Constructed, no lifecycle event applied yet.
    Initialized,
    /// Created but not visible.
    Created,
    /// Visible but not in the foreground.
    Started,
    /// In the foreground, fully interactive.
    Resumed,
    /// Terminal. No further events are accepted.
    Destroyed,
}

impl State {
    /// Rank of a live state along the linear order. `Destroyed` has none.
    fn live_rank(self) -> Option<u8> {
        match self {
            Self::Initialized => Some(0),
            Self::Created => Some(1),
            Self::Started => Some(2),
            Self::Resumed => Some(3),
            Self::Destroyed => None,
        }
    }

    /// Whether this state is at or past `floor` on the live order.
    ///
    /// `Destroyed` is never at least anything, and nothing is at least
    /// `Destroyed`; the terminal state opts out of the ordering entirely.
    #[must_use]
    pub fn is_at_least(self, floor: State) -> bool {
        match (self.live_rank(), floor.live_rank()) {
            (Some(own), Some(floor)) => own >= floor,
            _ => false,
        }
    }

    /// Whether observers gated on visibility should receive deliveries.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.is_at_least(Self::Started)
    }

    /// Whether the owning scope has ended.
    #[must_use]
    pub fn is_destroyed(self) -> bool {
        self == Self::Destroyed
    }

    /// Forward events an observer attached in this state has missed,
    /// in the order they would have been observed.
    #[must_use]
    pub fn catch_up_events(self) -> &'static [Event] {
        match self {
            Self::Initialized | Self::Destroyed => &[],
            Self::Created => &[Event::Create],
            Self::Started => &[Event::Create, Event::Start],
            Self::Resumed => &[Event::Create, Event::Start, Event::Resume],
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Initialized => "initialized",
            Self::Created => "created",
            Self::Started => "started",
            Self::Resumed => "resumed",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// A lifecycle transition, named for the callback it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
}

impl Event {
    /// The state an owner is in after this event.
    #[must_use]
    pub fn target(self) -> State {
        match self {
            Self::Create => State::Created,
            Self::Start => State::Started,
            Self::Resume => State::Resumed,
            Self::Pause => State::Started,
            Self::Stop => State::Created,
            Self::Destroy => State::Destroyed,
        }
    }

    /// The single state this event may fire from, or `None` for
    /// [`Event::Destroy`], which is legal from any live state.
    #[must_use]
    pub fn source(self) -> Option<State> {
        match self {
            Self::Create => Some(State::Initialized),
            Self::Start => Some(State::Created),
            Self::Resume => Some(State::Started),
            Self::Pause => Some(State::Resumed),
            Self::Stop => Some(State::Started),
            Self::Destroy => None,
        }
    }

    /// Validate this event against `from` and return the resulting state.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::IllegalTransition`] when `from` is not this event's
    /// source state, or when `from` is already [`State::Destroyed`].
    pub fn apply(self, from: State) -> Result<State, LifecycleError> {
        if from.is_destroyed() {
            return Err(LifecycleError::IllegalTransition { from, event: self });
        }
        match self.source() {
            Some(source) if source != from => {
                Err(LifecycleError::IllegalTransition { from, event: self })
            }
            _ => Ok(self.target()),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

/// Errors from lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// An event was applied from a state it cannot fire from.
    IllegalTransition { from: State, event: Event },
    /// An observer was attached to a registry that already reached
    /// [`State::Destroyed`].
    RegistryDestroyed,
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalTransition { from, event } => {
                write!(f, "illegal transition: event '{event}' from state '{from}'")
            }
            Self::RegistryDestroyed => {
                write!(f, "cannot attach observer to a destroyed registry")
            }
        }
    }
}

impl std::error::Error for LifecycleError {}
