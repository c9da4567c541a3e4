//! Graph access seam and the petgraph-backed in-memory graph

use crate::model::*;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Read-only view of a source graph snapshot.
///
/// Everything downstream (resolver, matrix builder, catalog) only talks to
/// the graph through this trait and never mutates it.
pub trait GraphAccessor {
    /// Look up a node by handle.
    fn node(&self, id: NodeId) -> Option<&GraphNode>;

    /// All nodes accepted by `filter`, in insertion order.
    fn list_nodes(&self, filter: &dyn Fn(&GraphNode) -> bool) -> Vec<&GraphNode>;

    /// Containment edges whose child is `id` (i.e. the parent side).
    fn incoming_containment(&self, id: NodeId) -> Vec<ContainmentEdge>;

    /// Every trigger edge of the model, unfiltered.
    fn trigger_edges(&self) -> Vec<TriggerEdge>;

    /// Ordered values of a possibly repeated property key on an edge.
    fn property_values(&self, edge: EdgeId, key: &str) -> Vec<String>;

    fn classification_of(&self, id: NodeId) -> Option<&Classification> {
        self.node(id).and_then(|n| n.classification.as_ref())
    }
}

/// The architecture graph — a directed multigraph with stable node/edge indices.
pub struct Graph {
    inner: StableDiGraph<GraphNode, GraphEdge>,
    by_key: HashMap<String, NodeId>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            by_key: HashMap::new(),
        }
    }

    /// Add a node to graph. Returns assigned NodeId.
    pub fn add_node(&mut self, node: GraphNode) -> NodeId {
        let key = node.key.clone();
        let idx = self.inner.add_node(node);
        let id = NodeId(idx.index() as u64);
        if let Some(weight) = self.inner.node_weight_mut(idx) {
            weight.id = id;
        }
        self.by_key.insert(key, id);
        id
    }

    /// Add an edge to graph. Returns assigned EdgeId.
    pub fn add_edge(&mut self, edge: GraphEdge) -> EdgeId {
        let source = NodeIndex::new(edge.source.0 as usize);
        let target = NodeIndex::new(edge.target.0 as usize);
        let idx = self.inner.add_edge(source, target, edge);
        let id = EdgeId(idx.index() as u64);
        if let Some(weight) = self.inner.edge_weight_mut(idx) {
            weight.id = id;
        }
        id
    }

    /// Get an edge by ID.
    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        let idx = EdgeIndex::new(id.0 as usize);
        self.inner.edge_weight(idx)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes.
    pub fn all_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges.
    pub fn all_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
    }

    /// Get all incoming edges to a node.
    pub fn edges_to(&self, target: NodeId) -> impl Iterator<Item = &GraphEdge> {
        let idx = NodeIndex::new(target.0 as usize);
        self.inner
            .edges_directed(idx, Direction::Incoming)
            .filter_map(move |edge_ref| self.inner.edge_weight(edge_ref.id()))
    }

    /// Find a node by its snapshot key.
    pub fn find_node_by_key(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }
}

impl GraphAccessor for Graph {
    fn node(&self, id: NodeId) -> Option<&GraphNode> {
        let idx = NodeIndex::new(id.0 as usize);
        self.inner.node_weight(idx)
    }

    fn list_nodes(&self, filter: &dyn Fn(&GraphNode) -> bool) -> Vec<&GraphNode> {
        self.all_nodes().filter(|n| filter(n)).collect()
    }

    fn incoming_containment(&self, id: NodeId) -> Vec<ContainmentEdge> {
        // petgraph yields incoming edges newest first; flip for insertion order
        let mut edges: Vec<ContainmentEdge> = self
            .edges_to(id)
            .filter(|e| e.kind == EdgeKind::Contains)
            .map(|e| ContainmentEdge {
                parent: e.source,
                child: e.target,
            })
            .collect();
        edges.reverse();
        edges
    }

    fn trigger_edges(&self) -> Vec<TriggerEdge> {
        self.all_edges()
            .filter(|e| e.kind == EdgeKind::Triggers)
            .map(|e| TriggerEdge {
                id: e.id,
                source: e.source,
                target: e.target,
                name: e.name.clone(),
            })
            .collect()
    }

    fn property_values(&self, edge: EdgeId, key: &str) -> Vec<String> {
        self.edge(edge)
            .and_then(|e| e.properties.get(key))
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
