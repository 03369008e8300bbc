#![forbid(unsafe_code)]

//! Observers attached to a full owner lifecycle.
//!
//! Three observer shapes: one implementing every per-event method, one
//! built from a closure on the generic hook, and one reacting only to
//! start/stop to manage a connection.

use lifeline::prelude::*;
use tracing::info;

use super::SampleResult;

/// Logs every per-event callback with the state the owner landed in.
struct LoggingObserver {
    tag: &'static str,
}

impl LifecycleObserver for LoggingObserver {
    fn on_create(&mut self, state: State) {
        info!(tag = self.tag, %state, "on_create");
    }

    fn on_start(&mut self, state: State) {
        info!(tag = self.tag, %state, "on_start");
    }

    fn on_resume(&mut self, state: State) {
        info!(tag = self.tag, %state, "on_resume");
    }

    fn on_pause(&mut self, state: State) {
        info!(tag = self.tag, %state, "on_pause");
    }

    fn on_stop(&mut self, state: State) {
        info!(tag = self.tag, %state, "on_stop");
    }

    fn on_destroy(&mut self, state: State) {
        info!(tag = self.tag, %state, "on_destroy");
    }
}

/// Keeps an external connection open exactly while the owner is visible.
#[derive(Default)]
struct ConnectionListener {
    connected: bool,
}

impl LifecycleObserver for ConnectionListener {
    fn on_start(&mut self, _state: State) {
        self.connected = true;
        info!("connection opened");
    }

    fn on_stop(&mut self, _state: State) {
        let was_connected = std::mem::replace(&mut self.connected, false);
        info!(was_connected, "connection closed");
    }
}

pub fn run() -> SampleResult {
    info!("-- lifecycle sample --");
    let registry = LifecycleRegistry::new();

    registry.add_observer(LoggingObserver { tag: "screen" })?;
    registry.add_observer(observer_fn(|event, state| {
        info!(%event, %state, "on_any");
    }))?;
    registry.add_observer(ConnectionListener::default())?;

    for event in [
        Event::Create,
        Event::Start,
        Event::Resume,
        Event::Pause,
        Event::Stop,
        Event::Destroy,
    ] {
        registry.handle_event(event)?;
    }

    // Late attachment on a second owner: history is replayed on attach.
    let second = LifecycleRegistry::new();
    second.handle_event(Event::Create)?;
    second.handle_event(Event::Start)?;
    second.add_observer(LoggingObserver { tag: "late" })?;
    second.handle_event(Event::Destroy)?;

    Ok(())
}
