use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// One article in the serialized knowledge graph. `id` is the article URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub published_date: String,
}

/// "`target` is among the k nearest neighbors of `source`". `value` is the
/// embedding distance, smaller = more similar. Reciprocal links are kept as
/// two separate entries and never merged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: f32,
}

/// The graph document written by the builder and consumed by the viewer.
/// Node order is corpus enumeration order. Immutable once written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl KnowledgeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

pub fn load_document(path: &Path) -> Result<KnowledgeGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph document {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid graph document JSON in {}", path.display()))
}

/// Writes the document in a single atomic step: serialize to a sibling
/// temporary file, then rename over the destination. A failure anywhere
/// leaves the previous document untouched and removes the temporary.
pub fn write_document(path: &Path, graph: &KnowledgeGraph) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("output path {} has no file name", path.display()))?;

    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = match parent {
        Some(parent) => parent.join(&tmp_name),
        None => Path::new(&tmp_name).to_path_buf(),
    };

    let serialized =
        serde_json::to_string(graph).context("failed to serialize knowledge graph")?;

    let write_result = fs::write(&tmp_path, serialized)
        .with_context(|| format!("failed to write {}", tmp_path.display()))
        .and_then(|()| {
            fs::rename(&tmp_path, path).with_context(|| {
                format!(
                    "failed to move {} into place at {}",
                    tmp_path.display(),
                    path.display()
                )
            })
        });

    if write_result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    write_result
}
