//! Pre-order flattening of a region forest.

use crate::region::model::RegionNode;

/// Every node key in `nodes`, pre-order: a node's key, then its children's keys in order.
pub fn collect_keys(nodes: &[RegionNode]) -> Vec<&str> {
    let mut keys = Vec::new();
    push_keys(nodes, &mut keys);
    keys
}

fn push_keys<'a>(nodes: &'a [RegionNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        out.push(node.key.as_str());
        push_keys(node.child_nodes(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<RegionNode> {
        vec![
            RegionNode::new("a", 1, "A").with_children(vec![
                RegionNode::new("a1", 2, "A1")
                    .with_children(vec![RegionNode::new("a1x", 3, "A1x")]),
                RegionNode::new("a2", 4, "A2"),
            ]),
            RegionNode::new("b", 5, "B").with_children(Vec::new()),
            RegionNode::new("c", 6, "C").with_children(vec![RegionNode::new("c1", 7, "C1")]),
        ]
    }

    #[test]
    fn keys_come_out_in_pre_order() {
        assert_eq!(
            collect_keys(&forest()),
            vec!["a", "a1", "a1x", "a2", "b", "c", "c1"]
        );
    }

    #[test]
    fn empty_forest_has_no_keys() {
        assert!(collect_keys(&[]).is_empty());
    }

    #[test]
    fn every_node_is_visited_exactly_once() {
        let nodes = forest();
        let keys = collect_keys(&nodes);
        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
        assert_eq!(keys.len(), 7);
    }
}
