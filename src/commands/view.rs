use anyhow::Result;

use crate::config::Config;
use crate::region::dataset::DataSource;
use crate::tui::app;

pub fn run(source: DataSource, query: Option<String>, config: Config) -> Result<()> {
    app::run(source, query, config)
}
