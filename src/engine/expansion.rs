//! The set of expanded rows and the transitions that change it.

use std::collections::HashSet;

use crate::engine::traverse::collect_keys;
use crate::region::model::RegionNode;

/// Keys of the rows that are currently expanded. Membership only; no order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    keys: HashSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Replace the set with every key in `nodes`.
    pub fn expand_all(&mut self, nodes: &[RegionNode]) {
        self.replace_with(collect_keys(nodes));
    }

    pub fn collapse_all(&mut self) {
        self.keys.clear();
    }

    /// Apply a row expand/collapse event.
    pub fn toggle(&mut self, key: &str, expanded: bool) {
        if expanded {
            self.keys.insert(key.to_string());
        } else {
            self.keys.remove(key);
        }
    }

    pub fn replace_with<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        self.keys = keys.into_iter().map(str::to_string).collect();
    }
}

impl ExpansionSet {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
impl ExpansionSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}
