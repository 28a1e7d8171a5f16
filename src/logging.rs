use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GLANCE_LOG";

/// Filter from `GLANCE_LOG`, `info` when unset or unparsable
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber writing to `path`. The terminal belongs to
/// the TUI, so logs never go to stdout or stderr. Failure leaves logging off.
pub fn init(path: &Path) -> bool {
    let file = match open_log(path) {
        Ok(file) => file,
        Err(_) => return false,
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .try_init()
        .is_ok()
}
