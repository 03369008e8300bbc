#![forbid(unsafe_code)]

//! Command-line argument parsing for the samples binary.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Lifeline Samples — headless walkthroughs of the state core

USAGE:
    lifeline-samples [OPTIONS]

OPTIONS:
    --sample=NAME   Which sample to run (default: all)
    --help, -h      Show this help message
    --version, -V   Show version

SAMPLES:
    lifecycle    Observers logging a full owner lifecycle
    observable   Property change notification on a user profile
    counter      Counter screen state behind a scope-keyed store
    user         Derived name stream over a user model
    all          Every sample in order
";

/// Parsed command-line options.
pub struct Opts {
    pub sample: String,
}

impl Opts {
    /// Parse `std::env::args`, exiting on `--help`/`--version` or bad input.
    pub fn parse() -> Self {
        let mut sample = "all".to_string();

        for arg in env::args().skip(1) {
            if let Some(value) = arg.strip_prefix("--sample=") {
                sample = value.to_string();
            } else {
                match arg.as_str() {
                    "--help" | "-h" => {
                        print!("{HELP_TEXT}");
                        process::exit(0);
                    }
                    "--version" | "-V" => {
                        println!("lifeline-samples {VERSION}");
                        process::exit(0);
                    }
                    other => {
                        eprintln!("Unknown option '{other}'. Try --help.");
                        process::exit(2);
                    }
                }
            }
        }

        Self { sample }
    }
}
