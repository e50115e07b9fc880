//! Graph-service error type.
//!
//! Every variant is a load-time failure: once a graph is loaded, queries
//! never error (an unroutable query simply yields no itineraries).

use thiserror::Error;

/// Errors produced while loading a routing graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph file {path}: {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("graph CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("connection on line {line} references unknown stop {stop:?}")]
    UnknownStop { stop: String, line: u64 },

    #[error("duplicate stop id {0:?}")]
    DuplicateStop(String),

    #[error("invalid connection on line {line}: {reason}")]
    InvalidConnection { line: u64, reason: String },

    #[error("graph has no {0}")]
    Empty(&'static str),

    #[error("no graph registered under id {0:?}")]
    UnknownGraph(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
