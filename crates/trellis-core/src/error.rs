//! Error types for the core pipeline

use std::path::PathBuf;

use crate::model::NodeId;

/// Failures that abort a run.
///
/// Cycles and conflicting domain assignments are not errors; they are
/// encoded in the values the pipeline returns.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("node {0} is not part of the graph")]
    MissingNode(NodeId),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON snapshot {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML snapshot {path}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported snapshot format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("duplicate node key '{0}' in snapshot")]
    DuplicateKey(String),

    #[error("edge references unknown node key '{0}'")]
    UnknownKey(String),

    #[error("invalid config {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
