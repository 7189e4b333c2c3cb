//! The write boundary between the loader and a graph store.

use std::future::Future;

use confgraph_core::{UniquenessConstraint, UpsertPlan};

use crate::client::{GraphClient, GraphError};

/// A graph store the loader can write to.
///
/// Implementations must give `apply` match-or-create semantics for every
/// node and relationship, and must apply a plan atomically: either every
/// operation in it lands or none does.
pub trait GraphSink {
    /// Declare uniqueness constraints. Re-declaring an existing constraint is
    /// not an error.
    fn ensure_constraints(
        &mut self,
        constraints: &[UniquenessConstraint],
    ) -> impl Future<Output = Result<(), GraphError>>;

    /// Apply one session's plan as a single unit of work.
    fn apply(&mut self, plan: &UpsertPlan) -> impl Future<Output = Result<(), GraphError>>;
}

impl GraphSink for GraphClient {
    async fn ensure_constraints(
        &mut self,
        constraints: &[UniquenessConstraint],
    ) -> Result<(), GraphError> {
        self.declare_constraints(constraints).await
    }

    async fn apply(&mut self, plan: &UpsertPlan) -> Result<(), GraphError> {
        self.apply_plan(plan).await
    }
}
