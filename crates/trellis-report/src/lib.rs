//! Trellis report rendering
//!
//! Turns classified connectivity tables and application catalogs into
//! sheet layouts and writes them as CSV or JSON.

pub mod layout;
pub mod writer;


pub use layout::{catalog_rows, CatalogRow, CellMark, ColumnHeader, MatrixSheet, SheetRow};
pub use writer::{render_catalog_csv, render_json, render_matrix_csv, write_output, CONNECTED};
