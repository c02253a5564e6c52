/// One anatomical region: a row in the comparison table.
///
/// Atlas values are stored index-aligned with [`AtlasCatalog::keys`]; `None`
/// means the atlas has no label for this region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionNode {
    /// Globally unique, stable identifier.
    pub key: String,
    pub id: i64,
    pub name: String,
    /// `None` for a leaf. `Some(vec![])` is treated the same as a leaf.
    pub children: Option<Vec<RegionNode>>,
    pub atlas_values: Vec<Option<String>>,
}

#[cfg(test)]
impl RegionNode {
    pub fn new(key: impl Into<String>, id: i64, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id,
            name: name.into(),
            children: None,
            atlas_values: Vec::new(),
        }
    }

    pub fn with_atlas_values(mut self, values: Vec<Option<String>>) -> Self {
        self.atlas_values = values;
        self
    }

    pub fn with_children(mut self, children: Vec<RegionNode>) -> Self {
        self.children = Some(children);
        self
    }
}

impl RegionNode {
    /// The children of this node, empty for a leaf.
    pub fn child_nodes(&self) -> &[RegionNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.child_nodes().is_empty()
    }

    /// The value this node carries for the atlas at `index`, if any.
    pub fn atlas_value(&self, index: usize) -> Option<&str> {
        self.atlas_values.get(index).and_then(|v| v.as_deref())
    }

    /// Every present (non-null) atlas value on this node.
    pub fn present_atlas_values(&self) -> impl Iterator<Item = &str> {
        self.atlas_values.iter().filter_map(|v| v.as_deref())
    }
}

/// Display names and machine keys of the atlases, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtlasCatalog {
    pub names: Vec<String>,
    pub keys: Vec<String>,
}

impl AtlasCatalog {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// `(display name, key)` pairs in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.keys.iter().map(String::as_str))
    }
}

#[cfg(test)]
impl AtlasCatalog {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The whole read-only input: catalog plus region forest.
///
/// Built once at startup and never mutated; filtering derives new trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionDataset {
    pub catalog: AtlasCatalog,
    /// The region count as declared by the producer of the input file.
    pub total_regions: u64,
    pub regions: Vec<RegionNode>,
}

impl RegionDataset {
    /// Number of nodes actually present in the tree.
    pub fn counted_regions(&self) -> usize {
        fn count(nodes: &[RegionNode]) -> usize {
            nodes.iter().map(|n| 1 + count(n.child_nodes())).sum()
        }
        count(&self.regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_children_behave_like_leaf() {
        let leaf = RegionNode::new("a", 1, "A");
        let empty = RegionNode::new("b", 2, "B").with_children(Vec::new());
        assert!(!leaf.has_children());
        assert!(!empty.has_children());
        assert!(leaf.child_nodes().is_empty());
        assert!(empty.child_nodes().is_empty());
    }

    #[test]
    fn atlas_value_out_of_range_is_none() {
        let node = RegionNode::new("a", 1, "A").with_atlas_values(vec![Some("X".into()), None]);
        assert_eq!(node.atlas_value(0), Some("X"));
        assert_eq!(node.atlas_value(1), None);
        assert_eq!(node.atlas_value(7), None);
        assert_eq!(node.present_atlas_values().collect::<Vec<_>>(), vec!["X"]);
    }

    #[test]
    fn counted_regions_walks_whole_forest() {
        let dataset = RegionDataset {
            catalog: AtlasCatalog::default(),
            total_regions: 4,
            regions: vec![
                RegionNode::new("a", 1, "A").with_children(vec![
                    RegionNode::new("b", 2, "B"),
                    RegionNode::new("c", 3, "C").with_children(vec![RegionNode::new("d", 4, "D")]),
                ]),
                RegionNode::new("e", 5, "E"),
            ],
        };
        assert_eq!(dataset.counted_regions(), 5);
    }

    #[test]
    fn catalog_entries_are_index_aligned() {
        let catalog = AtlasCatalog {
            names: vec!["Allen CCF".into(), "Paxinos".into()],
            keys: vec!["ccf".into(), "pax".into()],
        };
        let entries: Vec<_> = catalog.entries().collect();
        assert_eq!(entries, vec![("Allen CCF", "ccf"), ("Paxinos", "pax")]);
        assert_eq!(catalog.len(), 2);
    }
}
