//! Tracing subscriber initialization.
//!
//! # Priority (highest to lowest)
//!
//! 1. `DECKTEXT_LOG` env var (per-target directives, e.g. `decktext_package=debug`)
//! 2. `RUST_LOG` env var
//! 3. `--log-level`

use crate::types::LogLevel;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "DECKTEXT_LOG";

/// Install the global subscriber writing to stderr. A second call is a no-op.
pub fn init(level: LogLevel) {
    let use_ansi = std::io::stderr().is_terminal();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(true)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(fmt_layer)
        .try_init();
}

fn build_env_filter(level: LogLevel) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(level.to_string())
}
