//! Graph snapshot files (JSON or YAML) and their conversion into a [`Graph`]

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::graph::Graph;
use crate::model::{Classification, GraphEdge, GraphNode, Properties};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub containment: Vec<ContainmentRecord>,
    pub triggers: Vec<TriggerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainmentRecord {
    pub parent: String,
    pub child: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerRecord {
    pub source: String,
    pub target: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl GraphSnapshot {
    /// Build the in-memory graph. Node keys must be unique and every edge
    /// must reference a known key.
    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::new();
        let mut seen = HashSet::new();

        for record in self.nodes {
            if !seen.insert(record.id.clone()) {
                return Err(CoreError::DuplicateKey(record.id));
            }
            let mut node = GraphNode::new(record.id, record.name, record.classification);
            node.properties = record.properties;
            graph.add_node(node);
        }

        let lookup = |graph: &Graph, key: &str| graph.find_node_by_key(key).ok_or_else(|| CoreError::UnknownKey(key.to_string()));

        for edge in &self.containment {
            let parent = lookup(&graph, &edge.parent)?;
            let child = lookup(&graph, &edge.child)?;
            graph.add_edge(GraphEdge::contains(parent, child));
        }

        for edge in self.triggers {
            let source = lookup(&graph, &edge.source)?;
            let target = lookup(&graph, &edge.target)?;
            let mut trigger = GraphEdge::triggers(source, target, edge.name);
            trigger.properties = edge.properties;
            graph.add_edge(trigger);
        }

        Ok(graph)
    }
}

/// Parse a snapshot file, picking the format from its extension.
pub fn read_snapshot(path: &Path) -> Result<GraphSnapshot> {
    let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|source| CoreError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some("yml") | Some("yaml") => serde_yaml::from_str(&content).map_err(|source| CoreError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(CoreError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load a snapshot file straight into a graph.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let graph = read_snapshot(path)?.into_graph()?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "snapshot loaded"
    );
    Ok(graph)
}
