//! Connectivity table construction from trigger edges

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{Labels, MatrixConfig};
use crate::error::{CoreError, Result};
use crate::graph::GraphAccessor;
use crate::model::{Classification, NodeId};
use crate::resolver::AncestorResolver;

/// (A-element name, interface name).
pub type RowKey = (String, String);

/// Which side of the matrix an element name lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Row elements (trigger edge targets).
    A,
    /// Column elements (trigger edge sources).
    B,
}

/// Same-named element seen with two different domains within one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DomainConflict {
    pub side: Side,
    pub element: String,
    pub kept: String,
    pub ignored: String,
}

/// Whether a row's connections stay inside the element's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locality {
    Intern,
    Extern,
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locality::Intern => f.write_str("intern"),
            Locality::Extern => f.write_str("extern"),
        }
    }
}

/// One (A-element, interface) row with its element's domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityEntry {
    pub domain: String,
    pub targets: BTreeSet<String>,
}

/// A-elements × interfaces × B-elements, keyed by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityTable {
    /// A-element name → domain.
    pub elements: BTreeMap<String, String>,
    /// (A-element, interface) → connected B-element names.
    pub rows: BTreeMap<RowKey, BTreeSet<String>>,
    /// B-element name → domain.
    pub columns: BTreeMap<String, String>,
    pub conflicts: BTreeSet<DomainConflict>,
    /// Domain strings that mark a failed resolution (a containment cycle)
    /// rather than a real domain.
    pub sentinels: BTreeSet<String>,
}

impl ConnectivityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Upsert one connection. The first domain recorded for a name sticks;
    /// a later different value is kept as a conflict.
    pub fn insert(&mut self, element: &str, element_domain: &str, interface: &str, target: &str, target_domain: &str) {
        record_domain(&mut self.elements, &mut self.conflicts, Side::A, element, element_domain);
        record_domain(&mut self.columns, &mut self.conflicts, Side::B, target, target_domain);
        self.rows
            .entry((element.to_string(), interface.to_string()))
            .or_default()
            .insert(target.to_string());
    }

    /// Record that `domain` is a resolution marker, not a domain name.
    pub fn mark_sentinel(&mut self, domain: &str) {
        if !self.sentinels.contains(domain) {
            self.sentinels.insert(domain.to_string());
        }
    }

    /// Non-empty and not a resolution marker.
    pub fn is_real_domain(&self, domain: &str) -> bool {
        !domain.is_empty() && !self.sentinels.contains(domain)
    }

    pub fn element_domain(&self, element: &str) -> Option<&str> {
        self.elements.get(element).map(String::as_str)
    }

    pub fn column_domain(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    pub fn targets(&self, element: &str, interface: &str) -> Option<&BTreeSet<String>> {
        self.rows.get(&(element.to_string(), interface.to_string()))
    }

    pub fn entry(&self, element: &str, interface: &str) -> Option<ConnectivityEntry> {
        let targets = self.targets(element, interface)?;
        Some(ConnectivityEntry {
            domain: self.element_domain(element).unwrap_or_default().to_string(),
            targets: targets.clone(),
        })
    }

    /// Row elements by domain (markers, then empty, last), then name.
    pub fn ordered_elements(&self) -> Vec<&str> {
        presentation_order(&self.elements, &self.sentinels)
    }

    /// Column elements by domain (markers, then empty, last), then name.
    pub fn ordered_columns(&self) -> Vec<&str> {
        presentation_order(&self.columns, &self.sentinels)
    }

    /// Interfaces of one element, ascending.
    pub fn interfaces_of(&self, element: &str) -> Vec<&str> {
        self.rows
            .range((element.to_string(), String::new())..)
            .take_while(|((name, _), _)| name == element)
            .map(|((_, interface), _)| interface.as_str())
            .collect()
    }

    /// `Intern` when every target shares the element's real domain, `Extern`
    /// as soon as one does not, `None` for a row without targets. Empty and
    /// marker domains are never shared.
    pub fn locality(&self, element: &str, interface: &str) -> Option<Locality> {
        let targets = self.targets(element, interface)?;
        if targets.is_empty() {
            return None;
        }
        let domain = self.element_domain(element).unwrap_or_default();
        let all_intern = targets.iter().all(|target| {
            let target_domain = self.column_domain(target).unwrap_or_default();
            self.is_real_domain(domain) && target_domain == domain
        });
        Some(if all_intern { Locality::Intern } else { Locality::Extern })
    }
}

fn record_domain(
    domains: &mut BTreeMap<String, String>,
    conflicts: &mut BTreeSet<DomainConflict>,
    side: Side,
    name: &str,
    domain: &str,
) {
    match domains.get(name) {
        None => {
            domains.insert(name.to_string(), domain.to_string());
        }
        Some(kept) if kept != domain => {
            tracing::warn!(element = name, kept = %kept, ignored = domain, "conflicting domain for same-named element");
            conflicts.insert(DomainConflict {
                side,
                element: name.to_string(),
                kept: kept.clone(),
                ignored: domain.to_string(),
            });
        }
        Some(_) => {}
    }
}

/// Sort names by (real domains, then markers, then empty; domain; name).
fn presentation_order<'t>(domains: &'t BTreeMap<String, String>, sentinels: &BTreeSet<String>) -> Vec<&'t str> {
    let rank = |domain: &String| {
        if domain.is_empty() {
            2
        } else if sentinels.contains(domain) {
            1
        } else {
            0
        }
    };
    let mut names: Vec<(&String, &String)> = domains.iter().collect();
    names.sort_by(|(a_name, a_dom), (b_name, b_dom)| {
        rank(a_dom)
            .cmp(&rank(b_dom))
            .then_with(|| a_dom.cmp(b_dom))
            .then_with(|| a_name.cmp(b_name))
    });
    names.into_iter().map(|(name, _)| name.as_str()).collect()
}

/// Turns trigger edges of one snapshot into a connectivity table.
pub struct MatrixBuilder<'c> {
    config: &'c MatrixConfig,
    labels: &'c Labels,
}

impl<'c> MatrixBuilder<'c> {
    pub fn new(config: &'c MatrixConfig, labels: &'c Labels) -> Self {
        MatrixBuilder { config, labels }
    }

    /// Each qualifying edge contributes one row per interface value, with the
    /// edge target as A-element and the edge source as B-element.
    pub fn build<G: GraphAccessor + ?Sized>(&self, graph: &G) -> Result<ConnectivityTable> {
        let resolver = AncestorResolver::new(graph);
        let mut domains: HashMap<NodeId, (String, bool)> = HashMap::new();
        let mut table = ConnectivityTable::new();
        let mut edge_count = 0usize;

        for edge in graph.trigger_edges() {
            if !edge.name.starts_with(&self.config.trigger_prefix) {
                continue;
            }
            edge_count += 1;

            let a_name = &graph.node(edge.target).ok_or(CoreError::MissingNode(edge.target))?.name;
            let b_name = &graph.node(edge.source).ok_or(CoreError::MissingNode(edge.source))?.name;
            let (a_domain, a_cycle) = self.domain_of(&resolver, &mut domains, edge.target)?;
            let (b_domain, b_cycle) = self.domain_of(&resolver, &mut domains, edge.source)?;
            if a_cycle {
                table.mark_sentinel(&a_domain);
            }
            if b_cycle {
                table.mark_sentinel(&b_domain);
            }

            let mut interfaces = graph.property_values(edge.id, &self.config.interface_key);
            if interfaces.is_empty() {
                interfaces.push(self.config.not_applicable.clone());
            }
            for interface in &interfaces {
                table.insert(a_name, &a_domain, interface, b_name, &b_domain);
            }
        }

        tracing::debug!(
            edges = edge_count,
            elements = table.elements.len(),
            rows = table.rows.len(),
            columns = table.columns.len(),
            "connectivity table built"
        );
        Ok(table)
    }

    /// Domain label of `node` and whether its walk hit a cycle; each node is
    /// resolved at most once per `build`.
    fn domain_of<G: GraphAccessor + ?Sized>(
        &self,
        resolver: &AncestorResolver<'_, G>,
        memo: &mut HashMap<NodeId, (String, bool)>,
        node: NodeId,
    ) -> Result<(String, bool)> {
        if let Some(known) = memo.get(&node) {
            return Ok(known.clone());
        }
        let resolution = resolver.resolve(node, &Classification::Domain)?;
        let known = (resolution.domain_label(self.labels), resolution.cycle);
        memo.insert(node, known.clone());
        Ok(known)
    }
}
