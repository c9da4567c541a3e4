//! Classification ancestor resolution over containment edges

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::Labels;
use crate::error::{CoreError, Result};
use crate::graph::GraphAccessor;
use crate::model::{Classification, GraphNode, NodeId};

/// Outcome of resolving one node for one classification kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Matching ancestor names, ascending, each exactly once.
    pub names: Vec<String>,
    /// A containment cycle was reachable from the node.
    pub cycle: bool,
}

/// What a resolution renders as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "names", rename_all = "snake_case")]
pub enum ResolvedValue {
    Names(Vec<String>),
    NotFound,
    Cycle,
}

impl Resolution {
    /// A cycle wins over any names found alongside it.
    pub fn value(&self) -> ResolvedValue {
        if self.cycle {
            ResolvedValue::Cycle
        } else if self.names.is_empty() {
            ResolvedValue::NotFound
        } else {
            ResolvedValue::Names(self.names.clone())
        }
    }

    /// Domain string as stored in a connectivity table: empty when nothing
    /// was found, the cycle sentinel on cycles, joined names otherwise.
    pub fn domain_label(&self, labels: &Labels) -> String {
        match self.value() {
            ResolvedValue::NotFound => String::new(),
            other => other.render(labels),
        }
    }
}

impl ResolvedValue {
    pub fn render(&self, labels: &Labels) -> String {
        match self {
            ResolvedValue::Names(names) => names.join(&labels.separator),
            ResolvedValue::NotFound => labels.none_found.clone(),
            ResolvedValue::Cycle => labels.cycle.clone(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, ResolvedValue::Names(_))
    }

    /// Real values first, then sentinels; lexical within each group.
    pub fn compare(&self, other: &ResolvedValue, labels: &Labels) -> Ordering {
        self.is_sentinel()
            .cmp(&other.is_sentinel())
            .then_with(|| self.render(labels).cmp(&other.render(labels)))
    }
}

struct Frame {
    node: NodeId,
    parents: Vec<NodeId>,
    next: usize,
}

#[derive(Default)]
struct Walk {
    names: BTreeSet<String>,
    visited: HashSet<NodeId>,
    on_path: HashSet<NodeId>,
    stack: Vec<Frame>,
    cycle: bool,
}

/// Walks containment edges upward collecting ancestors of one classification.
pub struct AncestorResolver<'g, G: GraphAccessor + ?Sized> {
    graph: &'g G,
}

impl<'g, G: GraphAccessor + ?Sized> AncestorResolver<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        AncestorResolver { graph }
    }

    /// Depth-first walk from `start` towards its parents.
    ///
    /// Matching nodes are recorded but not treated as terminals, so nested
    /// classifications (a domain inside a business area) are all reported.
    /// A parent already on the active path flags a cycle and is not entered;
    /// other branches keep contributing.
    pub fn resolve(&self, start: NodeId, target: &Classification) -> Result<Resolution> {
        let node = self.graph.node(start).ok_or(CoreError::MissingNode(start))?;
        let mut walk = Walk::default();
        self.enter(&mut walk, node, target);

        loop {
            let Some(frame) = walk.stack.last_mut() else {
                break;
            };
            let next = frame.parents.get(frame.next).copied();
            frame.next += 1;

            match next {
                Some(parent) if walk.on_path.contains(&parent) => {
                    walk.cycle = true;
                }
                Some(parent) if walk.visited.contains(&parent) => {}
                Some(parent) => {
                    let parent_node = self
                        .graph
                        .node(parent)
                        .ok_or(CoreError::MissingNode(parent))?;
                    self.enter(&mut walk, parent_node, target);
                }
                None => {
                    let done = frame.node;
                    walk.stack.pop();
                    walk.on_path.remove(&done);
                }
            }
        }

        if walk.cycle {
            tracing::warn!(node = %node.name, kind = %target, "containment cycle reached during resolution");
        }

        Ok(Resolution {
            names: walk.names.into_iter().collect(),
            cycle: walk.cycle,
        })
    }

    fn enter(&self, walk: &mut Walk, node: &GraphNode, target: &Classification) {
        walk.visited.insert(node.id);
        walk.on_path.insert(node.id);
        if node.has_classification(target) {
            walk.names.insert(node.name.clone());
        }
        let parents = self
            .graph
            .incoming_containment(node.id)
            .into_iter()
            .map(|edge| edge.parent)
            .collect();
        walk.stack.push(Frame {
            node: node.id,
            parents,
            next: 0,
        });
    }
}
