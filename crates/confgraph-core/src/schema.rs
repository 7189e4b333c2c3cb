//! Uniqueness constraints for the program graph.

use crate::types::NodeLabel;

/// A store-level guarantee that at most one node of `label` carries a given
/// value of the label's key property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniquenessConstraint {
    pub name: &'static str,
    pub label: NodeLabel,
}

impl UniquenessConstraint {
    pub fn property(&self) -> &'static str {
        self.label.key_property()
    }
}

/// All constraints, in the order they are declared.
pub fn uniqueness_constraints() -> [UniquenessConstraint; 6] {
    [
        UniquenessConstraint {
            name: "session_id_unique",
            label: NodeLabel::Session,
        },
        UniquenessConstraint {
            name: "speaker_name_unique",
            label: NodeLabel::Speaker,
        },
        UniquenessConstraint {
            name: "company_name_unique",
            label: NodeLabel::Company,
        },
        UniquenessConstraint {
            name: "track_name_unique",
            label: NodeLabel::Track,
        },
        UniquenessConstraint {
            name: "room_name_unique",
            label: NodeLabel::Room,
        },
        UniquenessConstraint {
            name: "time_unique",
            label: NodeLabel::TimeSlot,
        },
    ]
}
