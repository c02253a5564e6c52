mod commands;
mod config;
mod engine;
mod logging;
mod paths;
mod region;
mod tui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use crate::region::dataset::DataSource;

#[derive(Parser)]
#[command(
    name = "atlastable",
    about = "Compare brain-region naming across anatomical atlases"
)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the configured log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Default)]
struct DataArgs {
    /// Region dataset (JSON); defaults to the configured `data` path
    #[arg(long)]
    data: Option<PathBuf>,
    /// Use the built-in sample dataset
    #[arg(long, conflicts_with = "data")]
    demo: bool,
}

impl DataArgs {
    fn source(&self, cfg: &config::Config) -> DataSource {
        if self.demo {
            DataSource::Demo
        } else {
            DataSource::File(self.data.clone().unwrap_or_else(|| cfg.data.clone()))
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive region table
    View {
        #[command(flatten)]
        data: DataArgs,
        /// Start with this search already entered
        #[arg(long)]
        query: Option<String>,
    },
    /// Print the regions matching a query
    Search {
        query: String,
        #[command(flatten)]
        data: DataArgs,
        /// Emit the filtered tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the atlases in the dataset
    Atlases {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(paths::config_file);
    let mut cfg = match &config_path {
        Some(path) => config::load(path)?,
        None => config::Config::default(),
    };
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }
    logging::init(cfg.log_level);
    log::debug!("using config {:?}", config_path);

    match cli.command {
        Command::View { data, query } => commands::view::run(data.source(&cfg), query, cfg),
        Command::Search { query, data, json } => {
            commands::search::run(&data.source(&cfg), &query, json)
        }
        Command::Atlases { data } => commands::atlases::run(&data.source(&cfg)),
        Command::Config { init } => commands::config::run(config_path.as_deref(), &cfg, init),
    }
}
