#![forbid(unsafe_code)]

//! Deterministic lifecycle driver.
//!
//! [`ScriptedOwner`] stands in for the platform layer that decides when
//! lifecycle events fire. Tests script the sequence explicitly, so dispatch
//! order and gating behavior can be asserted without any UI framework in the
//! loop.

use lifeline_core::{Event, LifecycleError, LifecycleRegistry, State};

/// An owner whose lifecycle is driven by explicit test code.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOwner {
    registry: LifecycleRegistry,
}

impl ScriptedOwner {
    /// Create an owner in [`State::Initialized`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: LifecycleRegistry::new(),
        }
    }

    /// The owner's registry handle, for attaching observers or gating
    /// streams.
    #[must_use]
    pub fn registry(&self) -> &LifecycleRegistry {
        &self.registry
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        self.registry.state()
    }

    /// Apply events in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// The first [`LifecycleError`] returned by the registry. Events already
    /// applied stay applied.
    pub fn drive(&self, events: &[Event]) -> Result<State, LifecycleError> {
        let mut state = self.state();
        for &event in events {
            state = self.registry.handle_event(event)?;
        }
        Ok(state)
    }

    /// Walk the owner to `target` one legal step at a time.
    ///
    /// Upward walks issue `Create`/`Start`/`Resume`, downward walks
    /// `Pause`/`Stop`, and a `Destroyed` target issues a single `Destroy`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::IllegalTransition`] when no event path exists: the
    /// owner is already destroyed, or the target is `Initialized` and the
    /// owner has moved past it (no event leads back).
    pub fn bring_to(&self, target: State) -> Result<State, LifecycleError> {
        loop {
            let current = self.state();
            if current == target {
                return Ok(current);
            }
            let step = Self::step_toward(current, target)?;
            self.registry.handle_event(step)?;
        }
    }

    /// Create, start, and resume: the path a foregrounded screen takes.
    ///
    /// # Errors
    ///
    /// Propagates the registry's rejection if the owner is not freshly
    /// initialized.
    pub fn launch(&self) -> Result<State, LifecycleError> {
        self.drive(&[Event::Create, Event::Start, Event::Resume])
    }

    /// The complete six-event pass from initialized to destroyed.
    ///
    /// # Errors
    ///
    /// Propagates the registry's rejection if the owner is not freshly
    /// initialized.
    pub fn full_cycle(&self) -> Result<State, LifecycleError> {
        self.drive(&[
            Event::Create,
            Event::Start,
            Event::Resume,
            Event::Pause,
            Event::Stop,
            Event::Destroy,
        ])
    }

    /// End the owner's lifecycle.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::IllegalTransition`] when already destroyed.
    pub fn destroy(&self) -> Result<State, LifecycleError> {
        self.registry.handle_event(Event::Destroy)
    }

    fn step_toward(current: State, target: State) -> Result<Event, LifecycleError> {
        if target.is_destroyed() {
            return Ok(Event::Destroy);
        }
        let event = match current {
            State::Initialized => Some(Event::Create),
            State::Created if target.is_at_least(State::Started) => Some(Event::Start),
            State::Started if target.is_at_least(State::Resumed) => Some(Event::Resume),
            State::Resumed => Some(Event::Pause),
            State::Started => Some(Event::Stop),
            // Created walking down, or already destroyed: no path.
            _ => None,
        };
        event.ok_or(LifecycleError::IllegalTransition {
            from: current,
            event: Event::Stop,
        })
    }
}
