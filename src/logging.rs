//! File logging
//!
//! The terminal belongs to the UI, so log records go to
//! `~/.acumen-tui/acumen-tui.log`.

use crate::config::Config;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, File};

/// Parse a level name from the config, falling back to `Info`
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the file logger. Returns false when no log file could be opened;
/// the app then runs without logging.
pub fn init(config: &Config) -> bool {
    let level = parse_level(&config.log_level);
    if level == LevelFilter::Off {
        return false;
    }

    let Some(path) = Config::log_path() else {
        return false;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return false;
        }
    }

    let Ok(file) = File::create(&path) else {
        return false;
    };

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    WriteLogger::init(level, log_config, file).is_ok()
}
