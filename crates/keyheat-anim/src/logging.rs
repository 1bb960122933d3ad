#![forbid(unsafe_code)]

//! Subscriber setup. Stdout carries the protocol, so logs go to stderr.

use tracing_subscriber::EnvFilter;

use crate::cli::DEFAULT_LOG_FILTER;

/// Build the filter from `directives`, falling back to the default on
/// malformed input.
#[must_use]
pub fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("Invalid log filter {directives:?}: {err}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

/// Install the global stderr subscriber. A second call is a no-op.
pub fn init(directives: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init();
}
