//! Upsert planning: normalized `Session` → ordered merge operations.
//!
//! A plan is the complete write set for one session. Operations are ordered
//! so that every relationship is preceded by the merges of both of its
//! endpoints, which lets a sink apply them front to back inside a single
//! transaction.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::normalize::format_instant;
use crate::types::{NodeLabel, NodeRef, RelType, Session};

/// A property assignment on a merged node. `None` writes a null, which
/// clears the property in the store.
pub type Property = (&'static str, Option<String>);

/// One merge operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlanOp {
    /// Match-or-create the node, then overwrite the listed properties.
    MergeNode {
        node: NodeRef,
        properties: Vec<Property>,
    },
    /// Match-or-create a relationship between two already merged nodes.
    MergeEdge {
        rel: RelType,
        from: NodeRef,
        to: NodeRef,
    },
}

impl PlanOp {
    /// Short human-readable form used in logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::MergeNode { node, .. } => format!("MERGE {node}"),
            Self::MergeEdge { rel, from, to } => format!("MERGE {from}-[:{rel}]->{to}"),
        }
    }
}

/// The ordered write set for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertPlan {
    pub session_id: String,
    pub ops: Vec<PlanOp>,
}

impl UpsertPlan {
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Nodes merged by this plan, in plan order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRef> {
        self.ops.iter().filter_map(|op| match op {
            PlanOp::MergeNode { node, .. } => Some(node),
            PlanOp::MergeEdge { .. } => None,
        })
    }

    /// Relationships merged by this plan, in plan order.
    pub fn edges(&self) -> impl Iterator<Item = (RelType, &NodeRef, &NodeRef)> {
        self.ops.iter().filter_map(|op| match op {
            PlanOp::MergeEdge { rel, from, to } => Some((*rel, from, to)),
            PlanOp::MergeNode { .. } => None,
        })
    }

    /// Check that every relationship's endpoints are merged earlier in the
    /// plan and carry the labels the relationship type expects. Returns the
    /// first offending operation.
    pub fn validate_order(&self) -> Result<(), &PlanOp> {
        let mut merged: HashSet<&NodeRef> = HashSet::new();
        for op in &self.ops {
            match op {
                PlanOp::MergeNode { node, .. } => {
                    merged.insert(node);
                }
                PlanOp::MergeEdge { rel, from, to } => {
                    let (from_label, to_label) = rel.endpoints();
                    if from.label != from_label
                        || to.label != to_label
                        || !merged.contains(from)
                        || !merged.contains(to)
                    {
                        return Err(op);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Build the merge plan for one normalized session.
///
/// Fails only when the session identifier is missing. Every other absent
/// value just drops the corresponding node and relationship.
pub fn plan_session(session: &Session) -> Result<UpsertPlan, CoreError> {
    let session_id = session
        .session_id
        .clone()
        .ok_or(CoreError::MissingSessionId)?;
    let session_node = NodeRef::new(NodeLabel::Session, session_id.clone());

    let mut ops = vec![PlanOp::MergeNode {
        node: session_node.clone(),
        properties: vec![
            ("title", session.title.clone()),
            ("description", session.description.clone()),
            ("session_format", session.format.clone()),
            ("level", session.level.clone()),
            ("scope", session.scope.clone()),
        ],
    }];

    let categorical = [
        (NodeLabel::Track, RelType::PartOf, session.track.clone()),
        (NodeLabel::Room, RelType::LocatedIn, session.room.clone()),
        (
            NodeLabel::TimeSlot,
            RelType::ScheduledAt,
            session.scheduled_at.as_ref().map(format_instant),
        ),
    ];
    for (label, rel, value) in categorical {
        let Some(key) = value else {
            continue;
        };
        let node = NodeRef::new(label, key);
        ops.push(PlanOp::MergeNode {
            node: node.clone(),
            properties: Vec::new(),
        });
        ops.push(PlanOp::MergeEdge {
            rel,
            from: session_node.clone(),
            to: node,
        });
    }

    for affiliation in session.affiliations() {
        let speaker = NodeRef::new(NodeLabel::Speaker, affiliation.speaker);
        ops.push(PlanOp::MergeNode {
            node: speaker.clone(),
            properties: Vec::new(),
        });
        ops.push(PlanOp::MergeEdge {
            rel: RelType::SpeaksAt,
            from: speaker.clone(),
            to: session_node.clone(),
        });

        if let Some(company_name) = affiliation.company {
            let company = NodeRef::new(NodeLabel::Company, company_name);
            ops.push(PlanOp::MergeNode {
                node: company.clone(),
                properties: vec![("domain", affiliation.domain.map(String::from))],
            });
            ops.push(PlanOp::MergeEdge {
                rel: RelType::Represents,
                from: speaker,
                to: company,
            });
        }
    }

    Ok(UpsertPlan { session_id, ops })
}
