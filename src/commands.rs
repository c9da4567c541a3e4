//! CLI command implementations

use anyhow::Context;
use std::path::Path;
use trellis_core::{
    load_graph, run_catalog, run_matrix, AncestorResolver, CatalogOutcome, Classification, MatrixOutcome,
    TrellisConfig,
};
use trellis_report::{catalog_rows, render_catalog_csv, render_json, render_matrix_csv, write_output, MatrixSheet};

use crate::{Format, Kind};

const MATRIX_STEM: &str = "connectivity-matrix";
const CATALOG_STEM: &str = "application-catalog";

fn output_path(dir: &Path, stem: &str, format: Format) -> std::path::PathBuf {
    let ext = match format {
        Format::Csv => "csv",
        Format::Json => "json",
    };
    dir.join(format!("{stem}.{ext}"))
}

fn load(path: &Path) -> anyhow::Result<trellis_core::Graph> {
    load_graph(path).with_context(|| format!("Failed to load model snapshot: {}", path.display()))
}

pub fn matrix(
    config: &TrellisConfig,
    model: &Path,
    baseline: Option<&Path>,
    output: &Path,
    format: Format,
) -> anyhow::Result<()> {
    tracing::info!("Building connectivity matrix for: {}", model.display());

    let current = load(model)?;
    let baseline = baseline.map(load).transpose()?;

    let report = match run_matrix(&current, baseline.as_ref(), config)? {
        MatrixOutcome::NoRelationships => {
            println!("No relationships found; no report written.");
            return Ok(());
        }
        MatrixOutcome::Report(report) => report,
    };

    if let Some(diff) = &report.diff {
        let summary = diff.summary();
        tracing::info!(
            "Compared to baseline: {} new, {} removed connections, {} changed rows, {} changed columns",
            summary.new_cells,
            summary.removed_cells,
            summary.changed_rows,
            summary.changed_columns
        );
    }
    for conflict in &report.table.conflicts {
        tracing::warn!(
            "Element '{}' has conflicting domains: kept '{}', ignored '{}'",
            conflict.element,
            conflict.kept,
            conflict.ignored
        );
    }

    let sheet = MatrixSheet::layout(&report);
    let content = match format {
        Format::Csv => render_matrix_csv(&sheet)?,
        Format::Json => render_json(&sheet)?,
    };
    let path = output_path(output, MATRIX_STEM, format);
    write_output(&path, &content)?;

    println!("{} rows written to {}", sheet.rows.len(), path.display());
    Ok(())
}

pub fn catalog(config: &TrellisConfig, model: &Path, output: &Path, format: Format) -> anyhow::Result<()> {
    tracing::info!("Building application catalog for: {}", model.display());

    let graph = load(model)?;
    let records = match run_catalog(&graph, config)? {
        CatalogOutcome::NoApplications => {
            println!("No applications found; no report written.");
            return Ok(());
        }
        CatalogOutcome::Catalog(records) => records,
    };

    let rows = catalog_rows(&records, &config.labels);
    let content = match format {
        Format::Csv => render_catalog_csv(&rows)?,
        Format::Json => render_json(&rows)?,
    };
    let path = output_path(output, CATALOG_STEM, format);
    write_output(&path, &content)?;

    println!("{} applications written to {}", rows.len(), path.display());
    Ok(())
}

pub fn resolve(config: &TrellisConfig, model: &Path, key: &str, kind: Kind) -> anyhow::Result<()> {
    let graph = load(model)?;
    let node = graph
        .find_node_by_key(key)
        .with_context(|| format!("No node with key '{}' in {}", key, model.display()))?;

    let target = match kind {
        Kind::Domain => Classification::Domain,
        Kind::BusinessArea => Classification::BusinessArea,
    };
    let resolution = AncestorResolver::new(&graph).resolve(node, &target)?;

    println!("{}", resolution.value().render(&config.labels));
    Ok(())
}
