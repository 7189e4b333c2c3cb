//! Read operations used to report on and verify a load.

use neo4rs::query;

use confgraph_core::{NodeLabel, NodeRef, RelType};

use crate::client::{GraphClient, GraphError};
use crate::mutations::key_expr;

impl GraphClient {
    /// Count nodes carrying a label.
    pub async fn count_nodes(&self, label: NodeLabel) -> Result<i64, GraphError> {
        let q = query(&format!("MATCH (n:{label}) RETURN count(n) AS cnt"));
        self.count(q).await
    }

    /// Count relationships of one type.
    pub async fn count_relationships(&self, rel: RelType) -> Result<i64, GraphError> {
        let q = query(&format!("MATCH ()-[r:{rel}]->() RETURN count(r) AS cnt"));
        self.count(q).await
    }

    /// Count relationships of one type touching a specific node.
    pub async fn count_relationships_of(
        &self,
        node: &NodeRef,
        rel: RelType,
    ) -> Result<i64, GraphError> {
        let q = query(&format!(
            "MATCH (n:{label} {{{key}: {value}}})-[r:{rel}]-() RETURN count(r) AS cnt",
            label = node.label,
            key = node.label.key_property(),
            value = key_expr(node.label, "key"),
        ))
        .param("key", node.key.clone());
        self.count(q).await
    }

    /// Read one string property of a node. `Ok(None)` when the node is
    /// missing or the property is unset.
    pub async fn node_property(
        &self,
        node: &NodeRef,
        property: &str,
    ) -> Result<Option<String>, GraphError> {
        let q = query(&format!(
            "MATCH (n:{label} {{{key}: {value}}}) RETURN n.{property} AS value",
            label = node.label,
            key = node.label.key_property(),
            value = key_expr(node.label, "key"),
        ))
        .param("key", node.key.clone());

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<Option<String>>("value").unwrap_or(None)),
            None => Ok(None),
        }
    }

    async fn count(&self, q: neo4rs::Query) -> Result<i64, GraphError> {
        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }
}
