//! Application catalog: every application with its domain and business area

use serde::Serialize;

use crate::config::TrellisConfig;
use crate::error::Result;
use crate::graph::GraphAccessor;
use crate::model::{Classification, GraphNode};
use crate::resolver::{AncestorResolver, ResolvedValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationRecord {
    pub name: String,
    pub type_tag: String,
    pub domain: ResolvedValue,
    pub business_area: ResolvedValue,
}

/// Resolve every accepted application node and sort the result by business
/// area, domain, type and name. Sentinel values sort after real ones.
pub fn build_catalog<G: GraphAccessor + ?Sized>(graph: &G, config: &TrellisConfig) -> Result<Vec<ApplicationRecord>> {
    let resolver = AncestorResolver::new(graph);
    let applications = graph.list_nodes(&|node: &GraphNode| match &node.classification {
        Some(Classification::Application(tag)) => config.catalog.accepts(tag),
        _ => false,
    });

    let mut records = Vec::with_capacity(applications.len());
    for node in applications {
        let domain = resolver.resolve(node.id, &Classification::Domain)?;
        let business_area = resolver.resolve(node.id, &Classification::BusinessArea)?;
        records.push(ApplicationRecord {
            name: node.name.clone(),
            type_tag: node
                .classification
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            domain: domain.value(),
            business_area: business_area.value(),
        });
    }

    sort_catalog(&mut records, config);
    tracing::debug!(applications = records.len(), "catalog built");
    Ok(records)
}

pub fn sort_catalog(records: &mut [ApplicationRecord], config: &TrellisConfig) {
    let labels = &config.labels;
    records.sort_by(|a, b| {
        a.business_area
            .compare(&b.business_area, labels)
            .then_with(|| a.domain.compare(&b.domain, labels))
            .then_with(|| a.type_tag.cmp(&b.type_tag))
            .then_with(|| a.name.cmp(&b.name))
    });
}
