//! `atlastable search <query>`: print the filtered region tree.

use std::io::IsTerminal;

use anyhow::{Result, bail};
use crossterm::style::Stylize;
use log::info;
use serde_json::json;

use crate::engine::filter::filter_tree;
use crate::engine::highlight::highlight;
use crate::engine::traverse::collect_keys;
use crate::region::dataset::{self, DataSource};
use crate::region::model::{AtlasCatalog, RegionNode};

pub fn run(source: &DataSource, query: &str, as_json: bool) -> Result<()> {
    if query.trim().is_empty() {
        bail!("search query is blank; use `atlastable view` to browse every region");
    }
    let data = dataset::load_source(source)?;
    let filtered = filter_tree(&data.regions, query);
    let matches = collect_keys(&filtered).len();
    info!("search {:?} kept {} regions", query, matches);

    if as_json {
        let regions: Vec<_> = filtered
            .iter()
            .map(|n| dataset::node_to_json(n, &data.catalog))
            .collect();
        let out = json!({
            "query": query,
            "matches": matches,
            "regions": regions,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let styled = std::io::stdout().is_terminal();
    let emphasis = |text: &str| {
        if styled {
            text.black().on_yellow().to_string()
        } else {
            text.to_string()
        }
    };

    for line in format_tree(&filtered, &data.catalog, query, &emphasis) {
        println!("{}", line);
    }
    if matches == 0 {
        println!("  No regions match \"{}\".", query);
    } else {
        println!();
        println!("  {} {}", matches, if matches == 1 { "match" } else { "matches" });
    }
    Ok(())
}

/// One line per node, indented by depth, with matched spans passed through `emphasis`.
fn format_tree(
    nodes: &[RegionNode],
    catalog: &AtlasCatalog,
    query: &str,
    emphasis: &dyn Fn(&str) -> String,
) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(nodes, catalog, query, emphasis, 0, &mut lines);
    lines
}

fn push_lines(
    nodes: &[RegionNode],
    catalog: &AtlasCatalog,
    query: &str,
    emphasis: &dyn Fn(&str) -> String,
    depth: usize,
    out: &mut Vec<String>,
) {
    for node in nodes {
        let mut line = format!("  {}", "  ".repeat(depth));
        line.push_str(&marked(&node.name, query, emphasis));

        let atlases: Vec<String> = catalog
            .keys
            .iter()
            .enumerate()
            .map(|(idx, key)| match node.atlas_value(idx) {
                Some(value) => format!("{} {}", key, marked(value, query, emphasis)),
                None => format!("{} -", key),
            })
            .collect();
        if !atlases.is_empty() {
            line.push_str("  (");
            line.push_str(&atlases.join(" · "));
            line.push(')');
        }
        out.push(line);
        push_lines(node.child_nodes(), catalog, query, emphasis, depth + 1, out);
    }
}

fn marked(text: &str, query: &str, emphasis: &dyn Fn(&str) -> String) -> String {
    highlight(text, query)
        .into_iter()
        .map(|seg| {
            if seg.is_matched() {
                emphasis(seg.text)
            } else {
                seg.text.to_string()
            }
        })
        .collect()
}
