//! The `key: value` settings file.
//!
//! Lines starting with `#` and blank lines are ignored. Unknown keys are
//! skipped with a warning so older binaries can read newer files.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use log::{LevelFilter, warn};

pub const DEFAULT_DATA_PATH: &str = "data/regions.json";
pub const MIN_NAME_WIDTH: u16 = 12;
pub const MIN_ATLAS_WIDTH: u16 = 4;
/// Upper bound for either configured column width.
pub const MAX_COLUMN_WIDTH: u16 = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Dataset location, relative to the working directory unless absolute.
    pub data: PathBuf,
    pub log_level: LevelFilter,
    /// Preferred width of the region name column.
    pub name_width: u16,
    pub atlas_width: u16,
    /// Draw tree guide lines in the name column.
    pub tree_lines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_PATH),
            log_level: LevelFilter::Info,
            name_width: 36,
            atlas_width: 14,
            tree_lines: true,
        }
    }
}

pub fn parse(content: &str) -> Result<Config> {
    let mut config = Config::default();

    for (idx, raw) in content.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("config line {}: expected `key: value`", line_num);
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "data" => {
                if value.is_empty() {
                    bail!("config line {}: `data` must not be empty", line_num);
                }
                config.data = PathBuf::from(value);
            }
            "log_level" => {
                config.log_level = LevelFilter::from_str(value).map_err(|_| {
                    anyhow!(
                        "config line {}: unknown log level `{}` (off|error|warn|info|debug|trace)",
                        line_num,
                        value
                    )
                })?;
            }
            "name_width" => {
                config.name_width = parse_width(value, MIN_NAME_WIDTH)
                    .with_context(|| format!("config line {}: invalid name_width", line_num))?;
            }
            "atlas_width" => {
                config.atlas_width = parse_width(value, MIN_ATLAS_WIDTH)
                    .with_context(|| format!("config line {}: invalid atlas_width", line_num))?;
            }
            "tree_lines" => {
                config.tree_lines = parse_bool(value)
                    .with_context(|| format!("config line {}: invalid tree_lines", line_num))?;
            }
            other => warn!("config line {}: ignoring unknown key `{}`", line_num, other),
        }
    }

    Ok(config)
}

fn parse_width(value: &str, min: u16) -> Result<u16> {
    let width: u16 = value
        .parse()
        .with_context(|| format!("`{}` is not a column width", value))?;
    if width < min {
        bail!("width {} is below the minimum of {}", width, min);
    }
    if width > MAX_COLUMN_WIDTH {
        bail!("width {} is above the maximum of {}", width, MAX_COLUMN_WIDTH);
    }
    Ok(width)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => bail!("`{}` is not a boolean", other),
    }
}

/// Read the config at `path`, falling back to defaults when it does not exist.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&content).with_context(|| format!("in {}", path.display()))
}

pub fn serialize(config: &Config) -> String {
    format!(
        "\
# atlastable configuration

# Region dataset (JSON). Relative paths resolve against the working directory.
data: {}

# Log verbosity: off | error | warn | info | debug | trace
log_level: {}

# Preferred width of the region name column
name_width: {}

# Width of each atlas column
atlas_width: {}

# Draw tree guide lines next to region names
tree_lines: {}
",
        config.data.display(),
        config.log_level.as_str().to_lowercase(),
        config.name_width,
        config.atlas_width,
        config.tree_lines
    )
}

/// Write the default config to `path` unless a file is already there.
///
/// Returns whether a file was written.
pub fn init(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, serialize(&Config::default()))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
