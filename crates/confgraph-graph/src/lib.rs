//! confgraph-graph: the write side of the conference program loader.
//!
//! Every graph write goes through a [`GraphSink`]. Two sinks exist:
//! [`GraphClient`] talks to Neo4j over Bolt, [`MemoryGraph`] keeps the graph
//! in process for dry runs and tests. Both apply one upsert plan per
//! transaction with match-or-create semantics.

pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod schema;
pub mod sink;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryGraph;
pub use sink::GraphSink;
