//! Logging
//!
//! env_logger handles stderr (filter via `RUST_LOG`, default `info`).
//! Milestone events are also appended to a log file under the user data
//! directory so problems can be reported after the fact.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

static LOG_FILE: Lazy<PathBuf> = Lazy::new(|| {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("patchdeck")
        .join("logs")
        .join("patchdeck.log")
});

/// Initialize logging - env_logger on stderr plus the log file directory.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Some(parent) = LOG_FILE.parent() {
        let _ = fs::create_dir_all(parent);
    }
}

/// Append a timestamped line to the log file. Write failures are ignored.
pub fn append(level: &str, module: &str, message: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&*LOG_FILE) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp, level, module, message);
    }
}

/// Path of the log file.
pub fn log_file_path() -> &'static Path {
    &LOG_FILE
}
