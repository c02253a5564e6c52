//! Search filtering over the region forest.
//!
//! A node survives filtering when its name or any present atlas value contains
//! the query (case-insensitively), or when one of its descendants survives.
//! Ancestors kept only for a descendant carry just the surviving children.

use std::borrow::Cow;

use crate::region::model::RegionNode;

/// A lower-cased search needle. Only built for queries that are not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatcher {
    needle: String,
}

impl QueryMatcher {
    /// `None` when the query is empty or whitespace only.
    pub fn new(query: &str) -> Option<Self> {
        if query.trim().is_empty() {
            return None;
        }
        Some(Self {
            needle: fold_case(query),
        })
    }

    pub fn matches_text(&self, text: &str) -> bool {
        fold_case(text).contains(&self.needle)
    }

    /// The node matches on its own, without looking at descendants.
    pub fn self_matches(&self, node: &RegionNode) -> bool {
        self.matches_text(&node.name) || node.present_atlas_values().any(|v| self.matches_text(v))
    }
}

/// Lower-case `text` one character at a time.
///
/// Unlike `str::to_lowercase` this has no context-sensitive rules, so folded
/// positions line up with the characters they came from.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Prune `nodes` down to the matches for `query` and their ancestors.
///
/// A blank query borrows the input unchanged.
pub fn filter_tree<'a>(nodes: &'a [RegionNode], query: &str) -> Cow<'a, [RegionNode]> {
    match QueryMatcher::new(query) {
        None => Cow::Borrowed(nodes),
        Some(matcher) => Cow::Owned(filter_with(nodes, &matcher)),
    }
}

/// Same as [`filter_tree`] with a prepared matcher.
pub fn filter_with(nodes: &[RegionNode], matcher: &QueryMatcher) -> Vec<RegionNode> {
    nodes
        .iter()
        .filter_map(|node| filter_node(node, matcher))
        .collect()
}

fn filter_node(node: &RegionNode, matcher: &QueryMatcher) -> Option<RegionNode> {
    let filtered_children = match &node.children {
        Some(children) => filter_with(children, matcher),
        None => Vec::new(),
    };

    if !matcher.self_matches(node) && filtered_children.is_empty() {
        return None;
    }

    Some(RegionNode {
        key: node.key.clone(),
        id: node.id,
        name: node.name.clone(),
        children: (!filtered_children.is_empty()).then_some(filtered_children),
        atlas_values: node.atlas_values.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::traverse::collect_keys;
    use crate::region::dataset;

    fn scenario() -> Vec<RegionNode> {
        vec![
            RegionNode::new("r1", 1, "Cortex")
                .with_atlas_values(vec![None])
                .with_children(vec![
                    RegionNode::new("r2", 2, "Visual Cortex")
                        .with_atlas_values(vec![Some("VISp".into())]),
                ]),
        ]
    }

    fn find<'a>(nodes: &'a [RegionNode], key: &str) -> Option<&'a RegionNode> {
        for node in nodes {
            if node.key == key {
                return Some(node);
            }
            if let Some(found) = find(node.child_nodes(), key) {
                return Some(found);
            }
        }
        None
    }

    fn has_matching_descendant(node: &RegionNode, matcher: &QueryMatcher) -> bool {
        node.child_nodes()
            .iter()
            .any(|c| matcher.self_matches(c) || has_matching_descendant(c, matcher))
    }

    #[test]
    fn blank_query_borrows_input() {
        let nodes = scenario();
        for query in ["", "   ", "\t"] {
            let filtered = filter_tree(&nodes, query);
            assert!(matches!(filtered, Cow::Borrowed(_)));
            assert_eq!(&*filtered, nodes.as_slice());
        }
    }

    #[test]
    fn atlas_match_keeps_pass_through_parent() {
        let nodes = scenario();
        let filtered = filter_tree(&nodes, "visp");
        assert_eq!(filtered.len(), 1);
        let parent = &filtered[0];
        assert_eq!(parent.key, "r1");
        assert_eq!(parent.name, "Cortex");
        let children = parent.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].key, "r2");
        assert_eq!(children[0].atlas_value(0), Some("VISp"));
        assert_eq!(collect_keys(&filtered), vec!["r1", "r2"]);
    }

    #[test]
    fn matching_parent_without_matching_children_becomes_leaf() {
        let nodes = scenario();
        let filtered = filter_tree(&nodes, "cortex");
        // Both match by name, so the child is retained too.
        assert_eq!(collect_keys(&filtered), vec!["r1", "r2"]);

        let nodes = vec![
            RegionNode::new("p", 1, "Thalamus")
                .with_children(vec![RegionNode::new("c", 2, "Geniculate")]),
        ];
        let filtered = filter_tree(&nodes, "thal");
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].children.is_none());
    }

    #[test]
    fn non_matching_subtree_is_pruned() {
        let nodes = vec![
            RegionNode::new("a", 1, "Cerebellum")
                .with_children(vec![RegionNode::new("b", 2, "Vermis")]),
            RegionNode::new("c", 3, "Striatum"),
        ];
        let filtered = filter_tree(&nodes, "striat");
        assert_eq!(collect_keys(&filtered), vec!["c"]);
    }

    #[test]
    fn null_atlas_value_never_matches() {
        let nodes = vec![RegionNode::new("r", 1, "Pons").with_atlas_values(vec![None, None])];
        assert!(filter_tree(&nodes, "null").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let nodes = scenario();
        assert_eq!(collect_keys(&filter_tree(&nodes, "VISUAL")), vec!["r1", "r2"]);
        assert_eq!(collect_keys(&filter_tree(&nodes, "vIsP")), vec!["r1", "r2"]);
    }

    #[test]
    fn order_is_preserved() {
        let nodes = vec![
            RegionNode::new("z", 1, "Zona incerta area"),
            RegionNode::new("a", 2, "Amygdalar area"),
            RegionNode::new("m", 3, "Midbrain"),
        ];
        assert_eq!(collect_keys(&filter_tree(&nodes, "area")), vec!["z", "a"]);
    }

    #[test]
    fn filtered_nodes_are_sound_and_complete() {
        let data = dataset::demo();
        for query in ["ca", "visual", "m1", "th", "cc", "geniculate", "x"] {
            let matcher = QueryMatcher::new(query).unwrap();
            let filtered = filter_tree(&data.regions, query);
            let kept = collect_keys(&filtered);

            // Soundness: everything kept matches itself or has a matching descendant.
            for key in &kept {
                let original = find(&data.regions, key).unwrap();
                assert!(
                    matcher.self_matches(original) || has_matching_descendant(original, &matcher),
                    "{key} kept for {query:?} without a match"
                );
            }

            // Completeness: every self-matching node survives.
            for key in collect_keys(&data.regions) {
                let original = find(&data.regions, key).unwrap();
                if matcher.self_matches(original) {
                    assert!(kept.contains(&key), "{key} missing for {query:?}");
                }
            }
        }
    }

    #[test]
    fn blank_query_has_no_matcher() {
        assert!(QueryMatcher::new(" ").is_none());
        let matcher = QueryMatcher::new("CAMP").unwrap();
        assert!(matcher.matches_text("Hippocampus"));
        assert!(!matcher.matches_text("Cortex"));
    }
}
