//! Lays a classified connectivity table out as rows and columns

use serde::Serialize;
use trellis_core::{ApplicationRecord, ChangeTag, DomainConflict, Labels, Locality, MatrixReport};

/// One B-element column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeader {
    pub name: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<ChangeTag>,
}

/// A connected cell. Unconnected cells are `None` in [`SheetRow::cells`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellMark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<ChangeTag>,
}

/// One (A-element, interface) row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    pub element: String,
    pub domain: String,
    pub interface: String,
    pub locality: Option<Locality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_tag: Option<ChangeTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_tag: Option<ChangeTag>,
    /// Parallel to [`MatrixSheet::columns`].
    pub cells: Vec<Option<CellMark>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSheet {
    pub compared: bool,
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<SheetRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<DomainConflict>,
}

impl MatrixSheet {
    /// Rows follow element presentation order, then interfaces ascending;
    /// columns follow column presentation order.
    pub fn layout(report: &MatrixReport) -> Self {
        let table = &report.table;
        let diff = report.diff.as_ref();

        let column_names = table.ordered_columns();
        let columns = column_names
            .iter()
            .map(|name| ColumnHeader {
                name: name.to_string(),
                domain: table.column_domain(name).unwrap_or_default().to_string(),
                tag: diff.map(|d| d.column_tag(name)),
            })
            .collect();

        let mut rows = Vec::with_capacity(table.rows.len());
        for element in table.ordered_elements() {
            let domain = table.element_domain(element).unwrap_or_default();
            for interface in table.interfaces_of(element) {
                let targets = table.targets(element, interface);
                let cells = column_names
                    .iter()
                    .map(|column| {
                        let connected = targets.is_some_and(|t| t.contains(*column));
                        connected.then(|| CellMark {
                            tag: diff.and_then(|d| d.cell_tag(element, interface, column)),
                        })
                    })
                    .collect();

                rows.push(SheetRow {
                    element: element.to_string(),
                    domain: domain.to_string(),
                    interface: interface.to_string(),
                    locality: table.locality(element, interface),
                    element_tag: diff.map(|d| d.element_tag(element)),
                    row_tag: diff.map(|d| d.row_tag(element, interface)),
                    cells,
                });
            }
        }

        MatrixSheet {
            compared: diff.is_some(),
            columns,
            rows,
            conflicts: table.conflicts.iter().cloned().collect(),
        }
    }
}

/// Catalog entry with resolution results already rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRow {
    pub business_area: String,
    pub domain: String,
    pub type_tag: String,
    pub name: String,
}

/// Keeps the order of `records`, which the catalog already sorted.
pub fn catalog_rows(records: &[ApplicationRecord], labels: &Labels) -> Vec<CatalogRow> {
    records
        .iter()
        .map(|record| CatalogRow {
            business_area: record.business_area.render(labels),
            domain: record.domain.render(labels),
            type_tag: record.type_tag.clone(),
            name: record.name.clone(),
        })
        .collect()
}
