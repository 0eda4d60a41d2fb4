use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use super::LOG_FILE;

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "TILEWORK_LOG";

const DEFAULT_FILTER: &str = "tilework=info";

/// Route `tracing` output to the workspace log file. The terminal belongs to
/// the TUI, so nothing is written to stderr.
///
/// Calling this twice is harmless; the second subscriber is ignored.
pub fn init(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}
