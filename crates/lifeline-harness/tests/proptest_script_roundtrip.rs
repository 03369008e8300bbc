//! Property tests for JSONL scripts and the scripted owner.
//!
//! 1. Any legal event sequence survives a write/parse roundtrip.
//! 2. Replaying the parsed script produces the same dispatch record as
//!    driving the events directly.
//! 3. `bring_to` reaches any live target from a fresh owner.

use lifeline_core::{Event, State};
use lifeline_harness::{RecordingObserver, ScriptedOwner, parse_script, write_script};
use proptest::prelude::*;

fn legal_events(state: State) -> &'static [Event] {
    match state {
        State::Initialized => &[Event::Create, Event::Destroy],
        State::Created => &[Event::Start, Event::Destroy],
        State::Started => &[Event::Resume, Event::Stop, Event::Destroy],
        State::Resumed => &[Event::Pause, Event::Destroy],
        State::Destroyed => &[],
    }
}

fn legal_sequence(max_len: usize) -> impl Strategy<Value = Vec<Event>> {
    proptest::collection::vec(0usize..=4, 0..=max_len).prop_map(|choices| {
        let mut state = State::Initialized;
        let mut events = Vec::new();
        for choice in choices {
            let legal = legal_events(state);
            if legal.is_empty() {
                break;
            }
            let event = legal[choice % legal.len()];
            state = event.apply(state).expect("event drawn from legal set");
            events.push(event);
        }
        events
    })
}

fn live_state(index: usize) -> State {
    [
        State::Initialized,
        State::Created,
        State::Started,
        State::Resumed,
    ][index % 4]
}

proptest! {
    #[test]
    fn script_roundtrip_is_lossless(events in legal_sequence(24)) {
        let script = write_script(&events);
        prop_assert_eq!(parse_script(&script).unwrap(), events);
    }

    #[test]
    fn replay_matches_direct_drive(events in legal_sequence(24)) {
        let direct = ScriptedOwner::new();
        let direct_log = {
            let observer = RecordingObserver::new();
            let log = observer.log();
            direct.registry().add_observer(observer).unwrap();
            direct.drive(&events).unwrap();
            log
        };

        let replayed = ScriptedOwner::new();
        let replay_log = {
            let observer = RecordingObserver::new();
            let log = observer.log();
            replayed.registry().add_observer(observer).unwrap();
            let parsed = parse_script(&write_script(&events)).unwrap();
            replayed.drive(&parsed).unwrap();
            log
        };

        prop_assert_eq!(direct.state(), replayed.state());
        prop_assert_eq!(direct_log.entries(), replay_log.entries());
    }

    #[test]
    fn bring_to_reaches_any_live_target(index in 0usize..4) {
        let target = live_state(index);
        let owner = ScriptedOwner::new();
        prop_assert_eq!(owner.bring_to(target).unwrap(), target);
        prop_assert_eq!(owner.state(), target);
    }
}
