//! Test utilities for Trellis

use crate::graph::Graph;
use crate::matrix::ConnectivityTable;
use crate::model::{Classification, GraphEdge, GraphNode, NodeId};
use crate::snapshot::GraphSnapshot;
use std::path::PathBuf;
use tempfile::TempDir;

/// Small builder for hand-written graphs.
#[derive(Default)]
pub struct GraphFixture {
    pub graph: Graph,
}

impl GraphFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, key: &str, name: &str, class: Option<&str>) -> NodeId {
        self.graph
            .add_node(GraphNode::new(key, name, class.map(Classification::from)))
    }

    pub fn domain(&mut self, name: &str) -> NodeId {
        self.node(&format!("dom:{name}"), name, Some("Domain"))
    }

    pub fn area(&mut self, name: &str) -> NodeId {
        self.node(&format!("ba:{name}"), name, Some("BusinessArea"))
    }

    pub fn app(&mut self, name: &str) -> NodeId {
        self.node(&format!("app:{name}"), name, Some("Application"))
    }

    pub fn contains(&mut self, parent: NodeId, child: NodeId) {
        self.graph.add_edge(GraphEdge::contains(parent, child));
    }

    pub fn trigger(&mut self, source: NodeId, target: NodeId, name: &str, interfaces: &[&str]) {
        let edge = interfaces
            .iter()
            .fold(GraphEdge::triggers(source, target, name), |edge, interface| {
                edge.with_property("Interface", *interface)
            });
        self.graph.add_edge(edge);
    }
}

/// Two domains under one business area; an order system in Sales triggered
/// by a portal in Sales and a ledger in Finance.
///
/// ```text
/// Enterprise (BusinessArea)
/// ├── Sales (Domain) ── Order System, Portal
/// └── Finance (Domain) ── Ledger
/// ```
pub fn create_sample_graph() -> Graph {
    let mut fx = GraphFixture::new();
    let enterprise = fx.area("Enterprise");
    let sales = fx.domain("Sales");
    let finance = fx.domain("Finance");
    fx.contains(enterprise, sales);
    fx.contains(enterprise, finance);

    let orders = fx.app("Order System");
    let portal = fx.app("Portal");
    let ledger = fx.app("Ledger");
    fx.contains(sales, orders);
    fx.contains(sales, portal);
    fx.contains(finance, ledger);

    fx.trigger(portal, orders, "IF-order-entry", &["REST"]);
    fx.trigger(ledger, orders, "IF-billing", &["SOAP", "REST"]);
    fx.trigger(orders, ledger, "calls", &["internal"]);
    fx.graph
}

/// Build a table from (element, element domain, interface, target, target domain) tuples.
pub fn table(rows: &[(&str, &str, &str, &str, &str)]) -> ConnectivityTable {
    let mut table = ConnectivityTable::new();
    for (element, element_domain, interface, target, target_domain) in rows {
        table.insert(element, element_domain, interface, target, target_domain);
    }
    table
}

/// Write a snapshot as pretty JSON to a fresh temp directory; returns the
/// dir guard and file path.
pub fn write_snapshot_file(snapshot: &GraphSnapshot, file_name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    std::fs::write(&path, serde_json::to_string_pretty(snapshot).unwrap()).unwrap();
    (temp_dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphAccessor;

    #[test]
    fn test_create_sample_graph() {
        let graph = create_sample_graph();

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.trigger_edges().len(), 3);
        assert!(graph.find_node_by_key("app:Order System").is_some());
    }
}
