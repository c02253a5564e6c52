//! File logging. The terminal belongs to the UI, so log records go to
//! `latest.log` in the cache directory.

use std::fs::{self, File};
use std::path::Path;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::paths;

/// Start logging at `level`. Logging is skipped when the log file can't be created.
pub fn init(level: LevelFilter) {
    if level == LevelFilter::Off {
        return;
    }
    let Some(path) = paths::log_file() else { return };
    init_at(&path, level);
}

fn init_at(path: &Path, level: LevelFilter) {
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
        paths::rotate_logs(dir);
    }
    let Ok(file) = File::create(path) else { return };
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();
    // A logger may already be installed (tests); keep that one.
    let _ = WriteLogger::init(level, config, file);
}
