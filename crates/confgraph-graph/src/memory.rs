//! In-process graph store with the same merge semantics as the Neo4j sink.
//!
//! Used for dry runs and for exercising the loader without a database.
//! Nodes are keyed by (label, key), so uniqueness holds by construction;
//! writes to a label without a declared constraint are refused, mirroring
//! the rule that the schema is in place before any data is written.

use std::collections::{BTreeMap, BTreeSet};

use confgraph_core::{NodeLabel, NodeRef, PlanOp, RelType, UniquenessConstraint, UpsertPlan};

use crate::client::GraphError;
use crate::sink::GraphSink;

type Properties = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
struct GraphState {
    nodes: BTreeMap<NodeRef, Properties>,
    edges: BTreeSet<(RelType, NodeRef, NodeRef)>,
}

/// An in-memory property graph.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    constraints: BTreeMap<NodeLabel, &'static str>,
    state: GraphState,
    committed_plans: usize,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels that have a uniqueness constraint declared.
    pub fn constrained_labels(&self) -> Vec<NodeLabel> {
        self.constraints.keys().copied().collect()
    }

    pub fn node_count(&self, label: NodeLabel) -> usize {
        self.state.nodes.keys().filter(|n| n.label == label).count()
    }

    pub fn edge_count(&self, rel: RelType) -> usize {
        self.state.edges.iter().filter(|(r, _, _)| *r == rel).count()
    }

    pub fn total_nodes(&self) -> usize {
        self.state.nodes.len()
    }

    pub fn total_edges(&self) -> usize {
        self.state.edges.len()
    }

    /// Number of plans committed so far.
    pub fn committed_plans(&self) -> usize {
        self.committed_plans
    }

    pub fn has_node(&self, node: &NodeRef) -> bool {
        self.state.nodes.contains_key(node)
    }

    pub fn has_edge(&self, rel: RelType, from: &NodeRef, to: &NodeRef) -> bool {
        self.state
            .edges
            .contains(&(rel, from.clone(), to.clone()))
    }

    /// A property value, or `None` when the node or property is missing.
    pub fn property(&self, node: &NodeRef, name: &str) -> Option<&str> {
        self.state
            .nodes
            .get(node)
            .and_then(|props| props.get(name))
            .map(String::as_str)
    }

    /// Relationships of `rel` leaving `from`, as target nodes.
    pub fn targets(&self, rel: RelType, from: &NodeRef) -> Vec<&NodeRef> {
        self.state
            .edges
            .iter()
            .filter(|(r, f, _)| *r == rel && f == from)
            .map(|(_, _, to)| to)
            .collect()
    }

    /// Relationships of `rel` arriving at `to`, as source nodes.
    pub fn sources(&self, rel: RelType, to: &NodeRef) -> Vec<&NodeRef> {
        self.state
            .edges
            .iter()
            .filter(|(r, _, t)| *r == rel && t == to)
            .map(|(_, from, _)| from)
            .collect()
    }

    fn check_constrained(&self, node: &NodeRef, op: &PlanOp) -> Result<(), GraphError> {
        if self.constraints.contains_key(&node.label) {
            Ok(())
        } else {
            Err(GraphError::Schema(format!(
                "no uniqueness constraint declared for {} before {}",
                node.label,
                op.describe()
            )))
        }
    }

    /// Apply every operation to a scratch copy and swap it in only when all
    /// of them succeed.
    fn apply_plan(&mut self, plan: &UpsertPlan) -> Result<(), GraphError> {
        let mut next = self.state.clone();

        for op in &plan.ops {
            match op {
                PlanOp::MergeNode { node, properties } => {
                    self.check_constrained(node, op)?;
                    let props = next.nodes.entry(node.clone()).or_default();
                    for (name, value) in properties {
                        match value {
                            Some(v) => {
                                props.insert((*name).to_string(), v.clone());
                            }
                            None => {
                                props.remove(*name);
                            }
                        }
                    }
                }
                PlanOp::MergeEdge { rel, from, to } => {
                    for endpoint in [from, to] {
                        if !next.nodes.contains_key(endpoint) {
                            return Err(GraphError::MissingEndpoint {
                                node: endpoint.to_string(),
                                operation: op.describe(),
                            });
                        }
                    }
                    next.edges.insert((*rel, from.clone(), to.clone()));
                }
            }
        }

        self.state = next;
        self.committed_plans += 1;
        Ok(())
    }
}

impl GraphSink for MemoryGraph {
    async fn ensure_constraints(
        &mut self,
        constraints: &[UniquenessConstraint],
    ) -> Result<(), GraphError> {
        for constraint in constraints {
            self.constraints
                .entry(constraint.label)
                .or_insert(constraint.name);
        }
        Ok(())
    }

    async fn apply(&mut self, plan: &UpsertPlan) -> Result<(), GraphError> {
        self.apply_plan(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgraph_core::{normalize, plan_session, uniqueness_constraints, RawSession};

    fn constrained() -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        for c in uniqueness_constraints() {
            graph.constraints.insert(c.label, c.name);
        }
        graph
    }

    fn plan(raw: RawSession) -> UpsertPlan {
        plan_session(&normalize(&raw)).unwrap()
    }

    fn session(id: &str, speakers: &str) -> RawSession {
        RawSession {
            session_id: Some(id.into()),
            title: Some(format!("Session {id}")),
            track: Some("Evals".into()),
            speakers: Some(speakers.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_constraints_are_idempotent() {
        let mut graph = MemoryGraph::new();
        graph.ensure_constraints(&uniqueness_constraints()).await.unwrap();
        graph.ensure_constraints(&uniqueness_constraints()).await.unwrap();
        assert_eq!(graph.constrained_labels().len(), NodeLabel::ALL.len());
    }

    #[test]
    fn test_write_before_constraints_is_refused() {
        let mut graph = MemoryGraph::new();
        let err = graph.apply_plan(&plan(session("s-1", "Alice"))).unwrap_err();
        assert!(matches!(err, GraphError::Schema(_)));
        assert_eq!(graph.total_nodes(), 0);
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let mut graph = constrained();
        let p = plan(session("s-1", "Alice, Bob"));

        graph.apply_plan(&p).unwrap();
        let (nodes, edges) = (graph.total_nodes(), graph.total_edges());
        graph.apply_plan(&p).unwrap();

        assert_eq!(graph.total_nodes(), nodes);
        assert_eq!(graph.total_edges(), edges);
        assert_eq!(graph.node_count(NodeLabel::Speaker), 2);
        assert_eq!(graph.edge_count(RelType::PartOf), 1);
        assert_eq!(graph.committed_plans(), 2);
    }

    #[test]
    fn test_shared_speaker_single_node() {
        let mut graph = constrained();
        graph.apply_plan(&plan(session("s-1", "Alice"))).unwrap();
        graph.apply_plan(&plan(session("s-2", "Alice, Bob"))).unwrap();

        let alice = NodeRef::new(NodeLabel::Speaker, "Alice");
        assert_eq!(graph.node_count(NodeLabel::Speaker), 2);
        assert_eq!(graph.targets(RelType::SpeaksAt, &alice).len(), 2);
        assert_eq!(graph.node_count(NodeLabel::Track), 1);
    }

    #[test]
    fn test_latest_values_win() {
        let mut graph = constrained();
        graph
            .apply_plan(&plan(RawSession {
                companies: Some("Acme".into()),
                company_domains: Some("acme.io".into()),
                level: Some("Beginner".into()),
                ..session("s-1", "Alice")
            }))
            .unwrap();
        graph
            .apply_plan(&plan(RawSession {
                companies: Some("Acme".into()),
                ..session("s-1", "Alice")
            }))
            .unwrap();

        let acme = NodeRef::new(NodeLabel::Company, "Acme");
        let s1 = NodeRef::new(NodeLabel::Session, "s-1");
        assert_eq!(graph.property(&acme, "domain"), None);
        assert_eq!(graph.property(&s1, "level"), None);
        assert_eq!(graph.property(&s1, "title"), Some("Session s-1"));
    }

    #[test]
    fn test_failed_plan_leaves_graph_untouched() {
        let mut graph = constrained();
        let bad = UpsertPlan {
            session_id: "s-9".into(),
            ops: vec![
                PlanOp::MergeNode {
                    node: NodeRef::new(NodeLabel::Session, "s-9"),
                    properties: Vec::new(),
                },
                PlanOp::MergeEdge {
                    rel: RelType::SpeaksAt,
                    from: NodeRef::new(NodeLabel::Speaker, "Ghost"),
                    to: NodeRef::new(NodeLabel::Session, "s-9"),
                },
            ],
        };

        let err = graph.apply_plan(&bad).unwrap_err();
        assert!(matches!(err, GraphError::MissingEndpoint { .. }));
        assert_eq!(graph.total_nodes(), 0);
        assert_eq!(graph.committed_plans(), 0);
    }
}
