//! The browser's state: dataset, query and expanded rows, plus everything
//! derived from them.
//!
//! All writes go through the methods here. After each change that affects the
//! filtered tree, [`ViewState::refresh`] re-derives it from scratch.

use std::borrow::Cow;

use log::{debug, error, info};

use crate::engine::expansion::ExpansionSet;
use crate::engine::filter::filter_tree;
use crate::engine::traverse::collect_keys;
use crate::region::dataset::DatasetError;
use crate::region::model::{AtlasCatalog, RegionDataset, RegionNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready(RegionDataset),
    /// Loading failed. The error was logged; the view shows no data.
    Failed,
}

#[derive(Debug)]
pub struct ViewState {
    load: LoadState,
    query: String,
    expanded: ExpansionSet,
    /// `None` while the query is blank and the full forest is shown.
    filtered: Option<Vec<RegionNode>>,
}

/// The pruned forest for `query`, or `None` when the query is blank.
pub fn derive_filtered(regions: &[RegionNode], query: &str) -> Option<Vec<RegionNode>> {
    match filter_tree(regions, query) {
        Cow::Borrowed(_) => None,
        Cow::Owned(nodes) => Some(nodes),
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            load: LoadState::Loading,
            query: String::new(),
            expanded: ExpansionSet::new(),
            filtered: None,
        }
    }

    /// Start with a query already typed in.
    pub fn with_query(query: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.query = query.into();
        state
    }

    /// Accept the one-shot result of the background load.
    pub fn dataset_loaded(&mut self, outcome: Result<RegionDataset, DatasetError>) {
        match outcome {
            Ok(dataset) => {
                info!(
                    "dataset ready: {} regions across {} atlases",
                    dataset.counted_regions(),
                    dataset.catalog.len()
                );
                self.load = LoadState::Ready(dataset);
            }
            Err(err) => {
                error!("failed to load region dataset: {err:#}");
                self.load = LoadState::Failed;
            }
        }
        self.refresh();
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn dataset(&self) -> Option<&RegionDataset> {
        match &self.load {
            LoadState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn catalog(&self) -> Option<&AtlasCatalog> {
        self.dataset().map(|d| &d.catalog)
    }

    fn all_regions(&self) -> &[RegionNode] {
        self.dataset().map(|d| d.regions.as_slice()).unwrap_or(&[])
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        debug!("query changed to {query:?}");
        self.query = query;
        self.refresh();
    }

    /// The forest the table should display.
    pub fn visible_tree(&self) -> &[RegionNode] {
        match &self.filtered {
            Some(nodes) => nodes,
            None => self.all_regions(),
        }
    }

    /// Number of rows that survive the active query, if any.
    pub fn match_count(&self) -> Option<usize> {
        self.filtered.as_ref().map(|nodes| collect_keys(nodes).len())
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expanded
    }

    /// Open every row of the full dataset, regardless of the active query.
    pub fn expand_all(&mut self) {
        match &self.load {
            LoadState::Ready(dataset) => self.expanded.expand_all(&dataset.regions),
            _ => self.expanded.collapse_all(),
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.collapse_all();
    }

    /// A row was expanded or collapsed by the user.
    pub fn toggle_row(&mut self, key: &str, expanded: bool) {
        self.expanded.toggle(key, expanded);
    }

    /// Re-derive the filtered forest and, while searching, force every
    /// surviving row open.
    ///
    /// Clearing the query leaves the expansion set as it was.
    pub fn refresh(&mut self) {
        self.filtered = derive_filtered(self.all_regions(), &self.query);
        if let Some(nodes) = &self.filtered {
            self.expanded.replace_with(collect_keys(nodes));
            debug!("query {:?} keeps {} rows", self.query, self.expanded.len());
        }
    }
}
