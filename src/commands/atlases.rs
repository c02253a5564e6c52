//! `atlastable atlases`: print the atlas catalog.

use anyhow::Result;

use crate::region::dataset::{self, DataSource};
use crate::region::model::RegionDataset;

pub fn run(source: &DataSource) -> Result<()> {
    let data = dataset::load_source(source)?;
    for line in describe(&data) {
        println!("  {}", line);
    }
    Ok(())
}

fn describe(data: &RegionDataset) -> Vec<String> {
    let width = data
        .catalog
        .names
        .iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = data
        .catalog
        .entries()
        .map(|(name, key)| format!("{:<width$}  {}", name, key, width = width))
        .collect();
    if lines.is_empty() {
        lines.push("No atlases.".to_string());
    }

    let counted = data.counted_regions();
    if counted as u64 == data.total_regions {
        lines.push(format!("{} regions", counted));
    } else {
        lines.push(format!(
            "{} regions (dataset declares {})",
            counted, data.total_regions
        ));
    }
    lines
}
