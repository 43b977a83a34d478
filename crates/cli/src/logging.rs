//! tracing subscriber setup: filtered stderr output, plus an unfiltered
//! `log.txt` layer when a diagnostics directory is in use.

use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::diag::DiagDir;

const DEFAULT_LEVEL: &str = "warn";

/// `level` overrides `RUST_LOG`; with neither set only warnings are shown.
pub(crate) fn init(level: Option<&str>, diag: Option<&DiagDir>) -> Result<(), String> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| format!("invalid log level '{}': {}", directive, e))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    };

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let file = match diag {
        Some(dir) => Some(
            fmt::layer()
                .with_writer(Mutex::new(dir.log_file()?))
                .with_ansi(false)
                .with_filter(LevelFilter::TRACE),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .try_init()
        .map_err(|e| format!("could not install logger: {}", e))
}

