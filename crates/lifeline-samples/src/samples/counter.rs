#![forbid(unsafe_code)]

//! Counter screen state behind a scope-keyed store.
//!
//! One counter model serves every view attached to its scope. The count
//! lives in a gated stream, so a backgrounded view misses nothing but the
//! intermediate values.

use lifeline::prelude::*;
use tracing::info;

use super::SampleResult;

struct CounterModel {
    count: StateStream<i64>,
}

impl CounterModel {
    fn increase(&self) {
        self.count.set_value(self.count.value().unwrap_or(0) + 1);
    }

    fn decrease(&self) {
        self.count.set_value(self.count.value().unwrap_or(0) - 1);
    }
}

impl Default for CounterModel {
    fn default() -> Self {
        Self {
            count: StateStream::with_value(0),
        }
    }
}

impl ViewModel for CounterModel {
    fn on_cleared(&mut self) {
        info!("counter model cleared");
    }
}

pub fn run() -> SampleResult {
    info!("-- counter sample --");

    let store = ViewModelStore::new();
    let owner = LifecycleRegistry::new();
    owner.handle_event(Event::Create)?;
    owner.handle_event(Event::Start)?;
    owner.handle_event(Event::Resume)?;

    // Two views of the same screen resolve the same model instance.
    let model = store.get::<CounterModel, _>("counter_screen", &DefaultFactory)?;
    let same = store.get::<CounterModel, _>("counter_screen", &DefaultFactory)?;
    assert!(std::rc::Rc::ptr_eq(&model, &same));

    model
        .borrow()
        .count
        .observe(&owner, |count| info!(count, "text view updated"))?;

    model.borrow().increase();
    model.borrow().increase();

    // Backgrounded: updates accrue silently.
    owner.handle_event(Event::Pause)?;
    owner.handle_event(Event::Stop)?;
    model.borrow().increase();
    model.borrow().decrease();

    // Returning shows only the latest count.
    owner.handle_event(Event::Start)?;

    // Permanent teardown.
    owner.handle_event(Event::Destroy)?;
    store.clear("counter_screen");

    Ok(())
}
