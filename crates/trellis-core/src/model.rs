//! Core data structures for the architecture graph

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle for a node, assigned by the graph that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque edge handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct EdgeId(pub u64);

/// What a node is classified as in the architecture model.
///
/// Serialised as a plain string: `"Domain"`, `"BusinessArea"`, and any other
/// value is taken as an application-kind tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Classification {
    // ── Grouping ancestors ──────────────────────────────────
    Domain,
    BusinessArea,

    // ── Application kinds ───────────────────────────────────
    Application(String),
}

impl Classification {
    pub fn as_str(&self) -> &str {
        match self {
            Classification::Domain => "Domain",
            Classification::BusinessArea => "BusinessArea",
            Classification::Application(tag) => tag,
        }
    }
}

impl From<String> for Classification {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Domain" => Classification::Domain,
            "BusinessArea" => Classification::BusinessArea,
            _ => Classification::Application(tag),
        }
    }
}

impl From<&str> for Classification {
    fn from(tag: &str) -> Self {
        Classification::from(tag.to_string())
    }
}

impl From<Classification> for String {
    fn from(class: Classification) -> Self {
        match class {
            Classification::Application(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-valued property bag. Repeated keys keep their insertion order.
pub type Properties = BTreeMap<String, Vec<String>>;

/// A single node in the architecture graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    /// External identity from the snapshot. Unique within one graph.
    pub key: String,
    /// Display name. Not guaranteed unique.
    pub name: String,
    pub classification: Option<Classification>,
    pub properties: Properties,
}

impl GraphNode {
    pub fn new(key: impl Into<String>, name: impl Into<String>, classification: Option<Classification>) -> Self {
        GraphNode {
            id: NodeId::default(),
            key: key.into(),
            name: name.into(),
            classification,
            properties: Properties::new(),
        }
    }

    pub fn has_classification(&self, class: &Classification) -> bool {
        self.classification.as_ref() == Some(class)
    }
}

/// What kind of relationship this edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Parent contains or aggregates child. Runs parent → child.
    Contains,
    /// One application triggers another through an interface.
    Triggers,
}

/// A directed edge in the architecture graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    /// Relationship name. Empty for containment.
    pub name: String,
    pub properties: Properties,
}

impl GraphEdge {
    pub fn contains(parent: NodeId, child: NodeId) -> Self {
        GraphEdge {
            id: EdgeId::default(),
            source: parent,
            target: child,
            kind: EdgeKind::Contains,
            name: String::new(),
            properties: Properties::new(),
        }
    }

    pub fn triggers(source: NodeId, target: NodeId, name: impl Into<String>) -> Self {
        GraphEdge {
            id: EdgeId::default(),
            source,
            target,
            kind: EdgeKind::Triggers,
            name: name.into(),
            properties: Properties::new(),
        }
    }

    /// Append a value under a (possibly repeated) property key.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.entry(key.into()).or_default().push(value.into());
        self
    }
}

/// Accessor-level view of a containment edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainmentEdge {
    pub parent: NodeId,
    pub child: NodeId,
}

/// Accessor-level view of a trigger edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub name: String,
}
