//! Reading and validating the region dataset document.
//!
//! The input is a JSON object with `atlases`, `atlasKeys`, `totalRegions` and
//! `regions`. Each region carries its atlas labels as extra properties named by
//! the entries of `atlasKeys`. Validation is all-or-nothing: any malformed node
//! rejects the whole document.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::region::model::{AtlasCatalog, RegionDataset, RegionNode};

const DEMO_DOCUMENT: &str = include_str!("../../assets/demo_regions.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has {names} atlas names but {keys} atlas keys")]
    CatalogMismatch { names: usize, keys: usize },
    #[error("atlas key `{0}` is declared more than once")]
    DuplicateAtlasKey(String),
    #[error("region key `{0}` appears more than once")]
    DuplicateRegionKey(String),
    #[error("region `{region}` has a {found} value for atlas `{atlas}` (expected string or null)")]
    InvalidAtlasValue {
        region: String,
        atlas: String,
        found: &'static str,
    },
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    /// The small built-in sample bundled with the binary.
    Demo,
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Demo => "built-in demo dataset".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    atlases: Vec<String>,
    atlas_keys: Vec<String>,
    total_regions: u64,
    regions: Vec<RawNode>,
}

#[derive(Deserialize)]
struct RawNode {
    key: String,
    id: i64,
    name: String,
    #[serde(default)]
    children: Option<Vec<RawNode>>,
    #[serde(flatten)]
    properties: Map<String, Value>,
}

/// Parse and validate a dataset document.
pub fn parse(input: &str) -> Result<RegionDataset, DatasetError> {
    let raw: RawDocument = serde_json::from_str(input)?;

    if raw.atlases.len() != raw.atlas_keys.len() {
        return Err(DatasetError::CatalogMismatch {
            names: raw.atlases.len(),
            keys: raw.atlas_keys.len(),
        });
    }
    let mut seen_atlas_keys = HashSet::new();
    for key in &raw.atlas_keys {
        if !seen_atlas_keys.insert(key.as_str()) {
            return Err(DatasetError::DuplicateAtlasKey(key.clone()));
        }
    }

    let catalog = AtlasCatalog {
        names: raw.atlases,
        keys: raw.atlas_keys,
    };
    let mut seen_region_keys = HashSet::new();
    let regions = convert_nodes(raw.regions, &catalog, &mut seen_region_keys)?;

    let dataset = RegionDataset {
        catalog,
        total_regions: raw.total_regions,
        regions,
    };
    let counted = dataset.counted_regions();
    if counted as u64 != dataset.total_regions {
        warn!(
            "dataset declares {} regions but contains {}",
            dataset.total_regions, counted
        );
    }
    Ok(dataset)
}

fn convert_nodes(
    raw: Vec<RawNode>,
    catalog: &AtlasCatalog,
    seen: &mut HashSet<String>,
) -> Result<Vec<RegionNode>, DatasetError> {
    raw.into_iter()
        .map(|node| convert_node(node, catalog, seen))
        .collect()
}

fn convert_node(
    raw: RawNode,
    catalog: &AtlasCatalog,
    seen: &mut HashSet<String>,
) -> Result<RegionNode, DatasetError> {
    if !seen.insert(raw.key.clone()) {
        return Err(DatasetError::DuplicateRegionKey(raw.key));
    }

    let mut atlas_values = Vec::with_capacity(catalog.len());
    for atlas in &catalog.keys {
        let value = match raw.properties.get(atlas) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(DatasetError::InvalidAtlasValue {
                    region: raw.key,
                    atlas: atlas.clone(),
                    found: json_kind(other),
                });
            }
        };
        atlas_values.push(value);
    }

    let children = match raw.children {
        Some(children) => Some(convert_nodes(children, catalog, seen)?),
        None => None,
    };

    Ok(RegionNode {
        key: raw.key,
        id: raw.id,
        name: raw.name,
        children,
        atlas_values,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read and validate the dataset at `path`.
pub fn load(path: &Path) -> Result<RegionDataset, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

pub fn demo() -> RegionDataset {
    // The bundled document is covered by tests.
    parse(DEMO_DOCUMENT).unwrap_or_default()
}

pub fn load_source(source: &DataSource) -> Result<RegionDataset, DatasetError> {
    match source {
        DataSource::File(path) => load(path),
        DataSource::Demo => Ok(demo()),
    }
}

/// Load `source` on a worker thread. The receiver yields exactly one outcome.
pub fn spawn_load(source: DataSource) -> Receiver<Result<RegionDataset, DatasetError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        info!("loading regions from {}", source.describe());
        let outcome = load_source(&source);
        if let Ok(dataset) = &outcome {
            debug!(
                "loaded {} top-level regions, {} atlases",
                dataset.regions.len(),
                dataset.catalog.len()
            );
        }
        // The view may already be gone; nothing to do then.
        let _ = tx.send(outcome);
    });
    rx
}

/// Render `node` back into the document's node shape.
pub fn node_to_json(node: &RegionNode, catalog: &AtlasCatalog) -> Value {
    let mut object = Map::new();
    object.insert("key".into(), Value::from(node.key.clone()));
    object.insert("id".into(), Value::from(node.id));
    object.insert("name".into(), Value::from(node.name.clone()));
    for (idx, atlas) in catalog.keys.iter().enumerate() {
        let value = node
            .atlas_value(idx)
            .map(|v| Value::from(v.to_string()))
            .unwrap_or(Value::Null);
        object.insert(atlas.clone(), value);
    }
    if let Some(children) = &node.children {
        object.insert(
            "children".into(),
            Value::Array(children.iter().map(|c| node_to_json(c, catalog)).collect()),
        );
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    const SCENARIO: &str = r#"{
        "atlases": ["Atlas One"],
        "atlasKeys": ["A1"],
        "totalRegions": 2,
        "regions": [
            {"key": "r1", "id": 1, "name": "Cortex", "A1": null, "children": [
                {"key": "r2", "id": 2, "name": "Visual Cortex", "A1": "VISp"}
            ]}
        ]
    }"#;

    #[test]
    fn parses_nested_regions_with_atlas_values() {
        let dataset = parse(SCENARIO).unwrap();
        assert_eq!(dataset.catalog.names, vec!["Atlas One"]);
        assert_eq!(dataset.catalog.keys, vec!["A1"]);
        assert_eq!(dataset.total_regions, 2);
        let cortex = &dataset.regions[0];
        assert_eq!(cortex.key, "r1");
        assert_eq!(cortex.atlas_values, vec![None]);
        let visual = &cortex.child_nodes()[0];
        assert_eq!(visual.name, "Visual Cortex");
        assert_eq!(visual.atlas_value(0), Some("VISp"));
        assert!(visual.children.is_none());
    }

    #[test]
    fn missing_atlas_property_reads_as_null() {
        let doc = r#"{"atlases":["A","B"],"atlasKeys":["a","b"],"totalRegions":1,
            "regions":[{"key":"k","id":1,"name":"N","a":"x"}]}"#;
        let dataset = parse(doc).unwrap();
        assert_eq!(dataset.regions[0].atlas_values, vec![Some("x".to_string()), None]);
    }

    #[test]
    fn unrelated_properties_are_ignored() {
        let doc = r#"{"atlases":["A"],"atlasKeys":["a"],"totalRegions":1,
            "regions":[{"key":"k","id":1,"name":"N","a":"x","color":42}]}"#;
        assert!(parse(doc).is_ok());
    }

    #[test]
    fn rejects_catalog_length_mismatch() {
        let doc = r#"{"atlases":["A","B"],"atlasKeys":["a"],"totalRegions":0,"regions":[]}"#;
        assert!(matches!(
            parse(doc),
            Err(DatasetError::CatalogMismatch { names: 2, keys: 1 })
        ));
    }

    #[test]
    fn rejects_duplicate_atlas_key() {
        let doc = r#"{"atlases":["A","B"],"atlasKeys":["a","a"],"totalRegions":0,"regions":[]}"#;
        assert!(matches!(parse(doc), Err(DatasetError::DuplicateAtlasKey(k)) if k == "a"));
    }

    #[test]
    fn rejects_duplicate_region_key_across_levels() {
        let doc = r#"{"atlases":[],"atlasKeys":[],"totalRegions":2,
            "regions":[{"key":"k","id":1,"name":"N","children":[{"key":"k","id":2,"name":"M"}]}]}"#;
        assert!(matches!(parse(doc), Err(DatasetError::DuplicateRegionKey(k)) if k == "k"));
    }

    #[test]
    fn rejects_non_string_atlas_value() {
        let doc = r#"{"atlases":["A"],"atlasKeys":["a"],"totalRegions":1,
            "regions":[{"key":"k","id":1,"name":"N","a":7}]}"#;
        match parse(doc) {
            Err(DatasetError::InvalidAtlasValue {
                region,
                atlas,
                found,
            }) => {
                assert_eq!(region, "k");
                assert_eq!(atlas, "a");
                assert_eq!(found, "number");
            }
            other => panic!("expected invalid atlas value, got {other:?}"),
        }
    }

    #[test]
    fn rejects_node_without_name() {
        let doc = r#"{"atlases":[],"atlasKeys":[],"totalRegions":1,
            "regions":[{"key":"k","id":1}]}"#;
        assert!(matches!(parse(doc), Err(DatasetError::Json(_))));
    }

    #[test]
    fn empty_children_array_is_kept_as_leaf() {
        let doc = r#"{"atlases":[],"atlasKeys":[],"totalRegions":1,
            "regions":[{"key":"k","id":1,"name":"N","children":[]}]}"#;
        let dataset = parse(doc).unwrap();
        assert!(!dataset.regions[0].has_children());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("regions.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regions.json");
        fs::write(&path, SCENARIO).unwrap();
        let dataset = load(&path).unwrap();
        assert_eq!(dataset.counted_regions(), 2);
    }

    #[test]
    fn demo_document_is_valid() {
        let dataset = parse(DEMO_DOCUMENT).expect("bundled demo dataset must parse");
        assert!(!dataset.regions.is_empty());
        assert!(!dataset.catalog.is_empty());
        assert_eq!(dataset.counted_regions() as u64, dataset.total_regions);
    }

    #[test]
    fn spawn_load_delivers_one_outcome() {
        let rx = spawn_load(DataSource::Demo);
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(outcome.is_ok());
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn spawn_load_delivers_failure() {
        let dir = TempDir::new().unwrap();
        let rx = spawn_load(DataSource::File(dir.path().join("missing.json")));
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(outcome.is_err());
    }

    #[test]
    fn node_to_json_mirrors_input_shape() {
        let dataset = parse(SCENARIO).unwrap();
        let value = node_to_json(&dataset.regions[0], &dataset.catalog);
        assert_eq!(value["key"], "r1");
        assert_eq!(value["A1"], Value::Null);
        assert_eq!(value["children"][0]["A1"], "VISp");
        assert!(value["children"][0].get("children").is_none());
    }
}
