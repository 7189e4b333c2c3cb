//! Error types for the confgraph-load crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed export: {0}")]
    MalformedInput(String),

    #[error("Record {index} has no session identifier")]
    MissingSessionId { index: usize },

    #[error("Schema setup failed: {0}")]
    Schema(#[source] confgraph_graph::GraphError),

    #[error("Write failed for record {index} (session {session_id}): {source}")]
    Write {
        index: usize,
        session_id: String,
        #[source]
        source: confgraph_graph::GraphError,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] confgraph_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;
