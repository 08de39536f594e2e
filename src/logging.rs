//! Diagnostic logging to stderr, controlled by `KEYS_LOG`.
//!
//! Defaults to `warn` so interactive screens are never painted over. Values
//! are never logged, only key names and profiles.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "KEYS_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Filter from `KEYS_LOG`, falling back to `warn` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
