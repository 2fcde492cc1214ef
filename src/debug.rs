//! File-backed logger
//!
//! A TUI owns the terminal, so log output goes to a file instead:
//! `cppad_debug.log` in the system temp directory. The level comes from the
//! `--log-level` flag, then the `CPPAD_LOG` environment variable, and is off
//! otherwise.
//!
//! Lines look like `[1712345678.123456] [INFO ] [cppad::compile] message`.

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Environment variable consulted when no level is passed explicitly
pub const LOG_ENV_VAR: &str = "CPPAD_LOG";

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        let mut file = self.file.lock();
        let _ = file.write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = self.file.lock().flush();
    }
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Where the log file is written
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("cppad_debug.log")
}

/// Resolve the effective level: explicit value, then `CPPAD_LOG`, then off
pub fn resolve_level(explicit: Option<LevelFilter>) -> LevelFilter {
    explicit
        .or_else(|| {
            std::env::var(LOG_ENV_VAR)
                .ok()
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(LevelFilter::Off)
}

/// Install the file logger. Does nothing when the level is off or the file
/// cannot be opened.
pub fn init(level: Option<LevelFilter>) {
    let level = resolve_level(level);
    if level == LevelFilter::Off {
        return;
    }

    let path = log_path();
    let file = match OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
    {
        Ok(file) => file,
        // Nowhere to report this without corrupting the TUI
        Err(_) => return,
    };

    let logger = FileLogger {
        level,
        file: Mutex::new(file),
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
        log::info!("cppad debug session started (level={}, file={:?})", level, path);
    }
}
