//! Write operations for the program graph.
//!
//! All mutations use MERGE (upsert) semantics so that loading the same
//! export again converges on the same graph. Nodes are identified by their
//! label's key property; TimeSlot keys are stored as Neo4j `datetime` values.

use neo4rs::{query, Query};

use confgraph_core::{NodeLabel, PlanOp, UpsertPlan};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Apply one session's plan inside a single transaction.
    ///
    /// Operations run in plan order. If any of them fails the transaction is
    /// rolled back and the error names the failing operation.
    pub async fn apply_plan(&self, plan: &UpsertPlan) -> Result<(), GraphError> {
        let mut txn = self.start_txn().await?;

        for op in &plan.ops {
            if let Err(source) = txn.run(op_query(op)).await {
                if let Err(e) = txn.rollback().await {
                    tracing::warn!(error = %e, session_id = %plan.session_id, "Rollback failed");
                }
                return Err(GraphError::Write {
                    operation: op.describe(),
                    source,
                });
            }
        }

        txn.commit().await?;
        tracing::debug!(session_id = %plan.session_id, ops = plan.len(), "Plan committed");
        Ok(())
    }
}

/// Build the parameterized Cypher query for one plan operation.
pub fn op_query(op: &PlanOp) -> Query {
    match op {
        PlanOp::MergeNode { node, properties } => {
            let mut q =
                query(&merge_node_cypher(node.label, properties)).param("key", node.key.clone());
            for (name, value) in properties {
                q = q.param(&format!("p_{name}"), value.clone());
            }
            q
        }
        PlanOp::MergeEdge { rel, from, to } => query(&format!(
            "MATCH (a:{from_label} {{{from_key}: {from_value}}})
             MATCH (b:{to_label} {{{to_key}: {to_value}}})
             MERGE (a)-[:{rel}]->(b)",
            from_label = from.label,
            from_key = from.label.key_property(),
            from_value = key_expr(from.label, "from"),
            to_label = to.label,
            to_key = to.label.key_property(),
            to_value = key_expr(to.label, "to"),
        ))
        .param("from", from.key.clone())
        .param("to", to.key.clone()),
    }
}

fn merge_node_cypher(label: NodeLabel, properties: &[(&'static str, Option<String>)]) -> String {
    let mut cypher = format!(
        "MERGE (n:{label} {{{key}: {value}}})",
        key = label.key_property(),
        value = key_expr(label, "key"),
    );
    if !properties.is_empty() {
        let assignments: Vec<String> = properties
            .iter()
            .map(|(name, _)| format!("n.{name} = $p_{name}"))
            .collect();
        cypher.push_str("\n SET ");
        cypher.push_str(&assignments.join(", "));
    }
    cypher
}

/// Cypher expression for a key parameter of the given label.
pub(crate) fn key_expr(label: NodeLabel, param: &str) -> String {
    match label {
        NodeLabel::TimeSlot => format!("datetime(${param})"),
        _ => format!("${param}"),
    }
}
