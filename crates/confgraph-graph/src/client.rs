//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Write failed at {operation}: {source}")]
    Write {
        operation: String,
        #[source]
        source: neo4rs::Error,
    },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Missing endpoint {node} for {operation}")]
    MissingEndpoint { node: String, operation: String },
}

/// Configuration for connecting to Neo4j.
///
/// Loaded from the `[neo4j]` config section or `CONFGRAPH__NEO4J__*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Logical database the program graph lives in.
    pub database: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "confgraph-dev".to_string(),
            database: "neo4j".to_string(),
            max_connections: 4,
            fetch_size: 256,
        }
    }
}

/// Neo4j graph client with connection pooling.
///
/// One client is opened per load run; dropping it closes the pool.
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    database: String,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self {
            graph,
            database: config.database.clone(),
        })
    }

    /// Name of the database this client writes to.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }

    /// Begin a transaction.
    pub async fn start_txn(&self) -> Result<neo4rs::Txn, GraphError> {
        Ok(self.graph.start_txn().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.uri, "bolt://localhost:7687");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.database, "neo4j");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GraphConfig = serde_json::from_value(serde_json::json!({
            "uri": "bolt://graph.internal:7687",
            "database": "ai-eng-worldfair"
        }))
        .unwrap();
        assert_eq!(config.uri, "bolt://graph.internal:7687");
        assert_eq!(config.database, "ai-eng-worldfair");
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.fetch_size, 256);
    }
}
