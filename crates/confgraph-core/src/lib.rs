//! confgraph-core: the transformation half of the conference program loader.
//!
//! This crate turns loosely structured session records into graph writes:
//! - Raw and normalized session types, graph labels and relationship types
//! - The record normalizer (list splitting, timestamp parsing)
//! - Uniqueness constraint declarations for every node label
//! - The upsert planner that orders merge operations per session
//! - Layered configuration loading and common error types

pub mod config;
pub mod error;
pub mod normalize;
pub mod plan;
pub mod schema;
pub mod types;

pub use error::CoreError;
pub use normalize::{normalize, parse_timestamp, split_list};
pub use plan::{plan_session, PlanOp, UpsertPlan};
pub use schema::{uniqueness_constraints, UniquenessConstraint};
pub use types::{Affiliation, NodeLabel, NodeRef, RawSession, RelType, Session};
