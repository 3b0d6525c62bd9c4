//! Tracing setup for the binary.
//!
//! `URHOBO_LOG` takes an `EnvFilter` directive (default `warn`); events go to
//! stderr. With `URHOBO_LOG_FILE=1` they are also appended to
//! `${URHOBO_HOME}/logs/urhobo.log`.

use std::fs;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use urhobo_core::config::paths;

const LOG_ENV: &str = "URHOBO_LOG";
const LOG_FILE_ENV: &str = "URHOBO_LOG_FILE";

/// Installs the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = if file_logging_enabled() {
        let dir = paths::logs_dir();
        match fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::never(&dir, "urhobo.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().with_writer(writer).with_ansi(false)),
                    Some(guard),
                )
            }
            Err(e) => {
                eprintln!("Warning: cannot create log dir {}: {e}", dir.display());
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .try_init();

    guard
}

fn file_logging_enabled() -> bool {
    std::env::var(LOG_FILE_ENV).is_ok_and(|v| v.trim() == "1")
}
