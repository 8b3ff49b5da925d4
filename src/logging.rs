//! Diagnostic tracing setup.
//!
//! Filter comes from `RUST_LOG`, defaulting to `warn`. Command line runs log to
//! stderr. The terminal UI owns the screen, so it logs to a file instead.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where diagnostic output goes.
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Log file used by the terminal UI: `<data file>.log` beside the data file.
pub fn log_path_for(data_file: &Path) -> PathBuf {
    let mut name = data_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".log");
    data_file.with_file_name(name)
}

/// Install the global subscriber. Never panics; a second call or an
/// unopenable log file leaves diagnostics disabled.
pub fn init(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .try_init(),
        LogTarget::File(path) => {
            let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
                return;
            };
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init()
        }
    };
    // Already initialised (tests, repeated runs in one process): keep the first.
    let _ = result;
}
