//! confgraph-load: loads a conference program export into the graph.
//!
//! Reads the export, normalizes every session record, plans its merges and
//! hands each plan to a graph sink as one unit of work. Produces a run
//! summary with the export's content hash for every run.

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod report;
