#![forbid(unsafe_code)]

//! Lifeline samples binary entry point.

use tracing_subscriber::EnvFilter;

mod cli;
mod samples;

fn main() {
    let opts = cli::Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let result = match opts.sample.as_str() {
        "lifecycle" => samples::lifecycle::run(),
        "observable" => samples::observable::run(),
        "counter" => samples::counter::run(),
        "user" => samples::user::run(),
        "all" => samples::lifecycle::run()
            .and_then(|()| samples::observable::run())
            .and_then(|()| samples::counter::run())
            .and_then(|()| samples::user::run()),
        other => {
            eprintln!("Unknown sample '{other}'. Try --help.");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("Sample error: {e}");
        std::process::exit(1);
    }
}
