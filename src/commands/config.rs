//! `atlastable config`: show or initialise the configuration file.

use std::path::Path;

use anyhow::{Result, bail};

use crate::config::{self, Config};

pub fn run(path: Option<&Path>, effective: &Config, init: bool) -> Result<()> {
    let Some(path) = path else {
        bail!("no config directory available on this platform; pass --config <path>");
    };

    if init {
        if config::init(path)? {
            println!("  Wrote default config to {}", path.display());
        } else {
            println!("  Config already exists at {}", path.display());
        }
        return Ok(());
    }

    let state = if path.exists() { "" } else { " (not present, using defaults)" };
    println!("# {}{}", path.display(), state);
    print!("{}", config::serialize(effective));
    Ok(())
}
