//! Trellis Core — architecture graph model, ancestor resolution, connectivity matrix and diff engine

pub mod graph;
pub mod model;
pub mod resolver;
pub mod matrix;
pub mod merge;
pub mod diff;
pub mod catalog;
pub mod pipeline;
pub mod snapshot;
pub mod config;
pub mod error;


#[cfg(test)]
pub mod test_utils;

pub use model::{NodeId, EdgeId, Classification, EdgeKind, GraphNode, GraphEdge, ContainmentEdge, TriggerEdge, Properties};
pub use graph::{Graph, GraphAccessor};
pub use resolver::{AncestorResolver, Resolution, ResolvedValue};
pub use matrix::{ConnectivityTable, ConnectivityEntry, MatrixBuilder, Locality, DomainConflict, Side, RowKey};
pub use merge::merge;
pub use diff::{classify, ChangeTag, DiffAnnotations, DiffSummary, CellKey};
pub use catalog::{build_catalog, sort_catalog, ApplicationRecord};
pub use pipeline::{run_matrix, run_catalog, MatrixOutcome, MatrixReport, CatalogOutcome};
pub use snapshot::{GraphSnapshot, NodeRecord, ContainmentRecord, TriggerRecord, read_snapshot, load_graph};
pub use config::{TrellisConfig, MatrixConfig, Labels, CatalogConfig, CONFIG_FILE};
pub use error::CoreError;
