//! Idempotent schema setup: one uniqueness constraint per node label.
//!
//! Safe to run on every load. `IF NOT EXISTS` covers the usual case; a
//! constraint that exists under another name is reported by Neo4j as an
//! "equivalent" schema rule, which is skipped as well.

use neo4rs::query;

use confgraph_core::UniquenessConstraint;

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Declare every constraint in order, stopping at the first real failure.
    pub async fn declare_constraints(
        &self,
        constraints: &[UniquenessConstraint],
    ) -> Result<(), GraphError> {
        for constraint in constraints {
            self.run_ignoring_exists(&constraint_cypher(constraint))
                .await?;
        }
        tracing::info!(count = constraints.len(), "Uniqueness constraints ensured");
        Ok(())
    }

    async fn run_ignoring_exists(&self, cypher: &str) -> Result<(), GraphError> {
        match self.run(query(cypher)).await {
            Ok(()) => Ok(()),
            Err(GraphError::Query(e)) => {
                let msg = e.to_string().to_lowercase();
                if msg.contains("already exists") || msg.contains("equivalent") {
                    tracing::warn!(
                        statement = %cypher.chars().take(80).collect::<String>(),
                        "Already exists (skipped)"
                    );
                    Ok(())
                } else {
                    Err(GraphError::Schema(format!("{cypher}: {e}")))
                }
            }
            Err(e) => Err(e),
        }
    }
}

/// Cypher statement declaring one uniqueness constraint.
pub fn constraint_cypher(constraint: &UniquenessConstraint) -> String {
    format!(
        "CREATE CONSTRAINT {name} IF NOT EXISTS FOR (n:{label}) REQUIRE n.{property} IS UNIQUE",
        name = constraint.name,
        label = constraint.label,
        property = constraint.property(),
    )
}
