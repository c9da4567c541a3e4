//! CSV and JSON report writers

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use trellis_core::ChangeTag;

use crate::layout::{CatalogRow, MatrixSheet};

/// Marker written into a connected cell.
pub const CONNECTED: &str = "x";

fn with_tag(text: &str, tag: Option<ChangeTag>) -> String {
    match tag {
        Some(tag) if tag != ChangeTag::Unchanged => format!("{text} [{tag}]"),
        _ => text.to_string(),
    }
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().context("Failed to flush CSV buffer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Render the matrix: a header row of column names, a row of column domains,
/// then one line per sheet row. Tags are appended in brackets.
pub fn render_matrix_csv(sheet: &MatrixSheet) -> Result<String> {
    let mut writer = csv_writer();

    let mut header = vec!["Domain".to_string(), "Element".to_string(), "Interface".to_string(), "Scope".to_string()];
    let mut domains = vec![String::new(); header.len()];
    if sheet.compared {
        header.push("Change".to_string());
        domains.push(String::new());
    }
    for column in &sheet.columns {
        header.push(with_tag(&column.name, column.tag));
        domains.push(column.domain.clone());
    }
    writer.write_record(&header)?;
    writer.write_record(&domains)?;

    for row in &sheet.rows {
        let mut record = vec![
            row.domain.clone(),
            with_tag(&row.element, row.element_tag),
            row.interface.clone(),
            row.locality.map(|l| l.to_string()).unwrap_or_default(),
        ];
        if sheet.compared {
            record.push(row.row_tag.map(|t| t.to_string()).unwrap_or_default());
        }
        for cell in &row.cells {
            record.push(cell.map(|c| with_tag(CONNECTED, c.tag)).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    finish(writer)
}

pub fn render_catalog_csv(rows: &[CatalogRow]) -> Result<String> {
    let mut writer = csv_writer();
    writer.write_record(["Business Area", "Domain", "Type", "Name"])?;
    for row in rows {
        writer.write_record([&row.business_area, &row.domain, &row.type_tag, &row.name])?;
    }
    finish(writer)
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    generator: &'static str,
    version: &'static str,
    generated_at: String,
    data: &'a T,
}

/// Pretty JSON wrapped with generator metadata and a timestamp.
pub fn render_json<T: Serialize>(data: &T) -> Result<String> {
    let envelope = Envelope {
        generator: "trellis",
        version: env!("CARGO_PKG_VERSION"),
        generated_at: chrono::Utc::now().to_rfc3339(),
        data,
    };
    serde_json::to_string_pretty(&envelope).context("Failed to serialize report")
}

/// Write rendered output, creating the parent directory when needed.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::info!("Report written: {}", path.display());
    Ok(())
}
