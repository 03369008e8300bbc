#![forbid(unsafe_code)]

//! Test harness for Lifeline: deterministic owners, recording observers,
//! and JSONL lifecycle scripts.
//!
//! In production the sequence and timing of lifecycle events comes from the
//! embedding UI framework. Tests need that driver to be deterministic, so
//! this crate provides [`ScriptedOwner`], which walks a registry through
//! explicit event sequences, plus [`RecordingObserver`] for asserting on
//! what was dispatched and a JSONL script format for replaying captured
//! event sequences in CI.

pub mod owner;
pub mod recording;
pub mod script;

pub use owner::ScriptedOwner;
pub use recording::{CallbackLog, Recorded, RecordingObserver};
pub use script::{ScriptError, parse_script, write_script};
