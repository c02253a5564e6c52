//! Flattening the displayed forest into table rows.

use crate::engine::expansion::ExpansionSet;
use crate::region::model::RegionNode;

/// One table row: a node reached through expanded ancestors only.
#[derive(Debug, Clone)]
pub struct VisibleRow<'a> {
    pub node: &'a RegionNode,
    pub depth: usize,
    /// Row index of the parent, `None` for top-level regions.
    pub parent: Option<usize>,
    pub expanded: bool,
    /// Whether each ancestor below the top level, and the row itself, is the
    /// last of its siblings. Empty at depth 0.
    pub is_last: Vec<bool>,
}

impl VisibleRow<'_> {
    pub fn has_children(&self) -> bool {
        self.node.has_children()
    }
}

pub fn visible_rows<'a>(nodes: &'a [RegionNode], expanded: &ExpansionSet) -> Vec<VisibleRow<'a>> {
    let mut rows = Vec::new();
    push_rows(nodes, expanded, None, 0, &[], &mut rows);
    rows
}

fn push_rows<'a>(
    nodes: &'a [RegionNode],
    expanded: &ExpansionSet,
    parent: Option<usize>,
    depth: usize,
    is_last_stack: &[bool],
    out: &mut Vec<VisibleRow<'a>>,
) {
    for (idx, node) in nodes.iter().enumerate() {
        let mut is_last = is_last_stack.to_vec();
        if depth > 0 {
            is_last.push(idx + 1 == nodes.len());
        }
        let open = node.has_children() && expanded.contains(&node.key);
        let row_idx = out.len();
        out.push(VisibleRow {
            node,
            depth,
            parent,
            expanded: open,
            is_last: is_last.clone(),
        });
        if open {
            push_rows(node.child_nodes(), expanded, Some(row_idx), depth + 1, &is_last, out);
        }
    }
}

/// Indentation, guide lines and expand marker for the name column.
pub fn tree_prefix(row: &VisibleRow<'_>, lines: bool) -> String {
    let mut prefix = String::new();
    if lines {
        if let Some((own, ancestors)) = row.is_last.split_last() {
            for last in ancestors {
                prefix.push_str(if *last { "   " } else { "│  " });
            }
            prefix.push_str(if *own { "└─ " } else { "├─ " });
        }
    } else {
        prefix.push_str(&"   ".repeat(row.depth));
    }
    prefix.push_str(match (row.has_children(), row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    });
    prefix
}
