//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "atlastable";
const APPLICATION: &str = "atlastable";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// - Linux: `$XDG_CONFIG_HOME/atlastable` or `~/.config/atlastable`
/// - macOS: `~/Library/Application Support/org.atlastable.atlastable`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// - Linux: `$XDG_CACHE_HOME/atlastable` or `~/.cache/atlastable`
/// - macOS: `~/Library/Caches/org.atlastable.atlastable`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Rename `latest.log` in `dir` to a timestamped name and prune old archives.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs(dir: &Path) {
    let latest = dir.join("latest.log");
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{}.log", timestamp)));
    }
    cleanup_old_logs(dir, MAX_OLD_LOGS);
}

fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    // Oldest first; archive names sort chronologically.
    logs.sort_by_key(|e| e.file_name());

    if logs.len() > keep {
        for entry in logs.iter().take(logs.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rotate_archives_latest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("latest.log"), "old run").unwrap();
        rotate_logs(dir.path());
        assert!(!dir.path().join("latest.log").exists());
        let archived: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(archived.len(), 1);
    }

    #[test]
    fn cleanup_keeps_newest_archives() {
        let dir = TempDir::new().unwrap();
        for day in 1..=5 {
            fs::write(dir.path().join(format!("2026010{}_000000.log", day)), "").unwrap();
        }
        fs::write(dir.path().join("latest.log"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        cleanup_old_logs(dir.path(), 2);

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "20260104_000000.log",
                "20260105_000000.log",
                "latest.log",
                "notes.txt"
            ]
        );
    }
}
