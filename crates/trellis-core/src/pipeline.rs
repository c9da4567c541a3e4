//! Entry points tying the stages together for one run

use crate::catalog::{build_catalog, ApplicationRecord};
use crate::config::TrellisConfig;
use crate::diff::{classify, DiffAnnotations};
use crate::error::Result;
use crate::graph::GraphAccessor;
use crate::matrix::{ConnectivityTable, MatrixBuilder};
use crate::merge::merge;

/// A connectivity table ready for rendering.
#[derive(Debug, Clone)]
pub struct MatrixReport {
    /// Merged table when a baseline was given, the current table otherwise.
    pub table: ConnectivityTable,
    /// Present only in comparison mode.
    pub diff: Option<DiffAnnotations>,
}

#[derive(Debug, Clone)]
pub enum MatrixOutcome {
    /// No qualifying trigger edges in any snapshot; nothing to write.
    NoRelationships,
    Report(MatrixReport),
}

#[derive(Debug, Clone)]
pub enum CatalogOutcome {
    /// No qualifying application nodes; nothing to write.
    NoApplications,
    Catalog(Vec<ApplicationRecord>),
}

/// Build the connectivity matrix for `current`, and when `baseline` is given
/// merge both tables and classify the differences.
pub fn run_matrix<C, B>(current: &C, baseline: Option<&B>, config: &TrellisConfig) -> Result<MatrixOutcome>
where
    C: GraphAccessor + ?Sized,
    B: GraphAccessor + ?Sized,
{
    let builder = MatrixBuilder::new(&config.matrix, &config.labels);
    let current_table = builder.build(current)?;

    let report = match baseline {
        None => MatrixReport {
            table: current_table,
            diff: None,
        },
        Some(baseline) => {
            let base_table = builder.build(baseline)?;
            let merged = merge(&base_table, &current_table);
            let diff = classify(&base_table, &current_table, &merged);
            MatrixReport {
                table: merged,
                diff: Some(diff),
            }
        }
    };

    if report.table.is_empty() {
        tracing::info!("no relationships found");
        return Ok(MatrixOutcome::NoRelationships);
    }
    if !report.table.conflicts.is_empty() {
        tracing::warn!(conflicts = report.table.conflicts.len(), "same-named elements carry conflicting domains");
    }
    Ok(MatrixOutcome::Report(report))
}

pub fn run_catalog<G: GraphAccessor + ?Sized>(graph: &G, config: &TrellisConfig) -> Result<CatalogOutcome> {
    let records = build_catalog(graph, config)?;
    if records.is_empty() {
        tracing::info!("no applications found");
        return Ok(CatalogOutcome::NoApplications);
    }
    Ok(CatalogOutcome::Catalog(records))
}
