//! Core domain types for the conference program graph.
//!
//! `RawSession` mirrors one record of the program export as delivered;
//! `Session` is the normalized form the planner works from. Node labels and
//! relationship types name the shape of the target graph.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

// ── Raw Export Record ─────────────────────────────────────────────

/// One session record exactly as it appears in the export.
///
/// Every field is optional and defaults to `None`. Scalar values that arrive
/// as numbers or booleans are kept as their text rendering; `null`, arrays and
/// objects are treated as absent. Keys not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSession {
    #[serde(rename = "Session ID", default, deserialize_with = "lenient_text")]
    pub session_id: Option<String>,
    #[serde(rename = "Title", default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "Session Format", default, deserialize_with = "lenient_text")]
    pub format: Option<String>,
    #[serde(rename = "Level", default, deserialize_with = "lenient_text")]
    pub level: Option<String>,
    #[serde(rename = "Scope", default, deserialize_with = "lenient_text")]
    pub scope: Option<String>,
    #[serde(rename = "Assigned Track", default, deserialize_with = "lenient_text")]
    pub track: Option<String>,
    #[serde(rename = "Room", default, deserialize_with = "lenient_text")]
    pub room: Option<String>,
    #[serde(rename = "Scheduled At", default, deserialize_with = "lenient_text")]
    pub scheduled_at: Option<String>,
    /// Comma-delimited speaker names.
    #[serde(rename = "Speakers", default, deserialize_with = "lenient_text")]
    pub speakers: Option<String>,
    /// Comma-delimited company names, positionally aligned with `speakers`.
    #[serde(rename = "Companies", default, deserialize_with = "lenient_text")]
    pub companies: Option<String>,
    /// Comma-delimited company domains, positionally aligned with `companies`.
    #[serde(rename = "Company Domains", default, deserialize_with = "lenient_text")]
    pub company_domains: Option<String>,
    /// Comma-delimited job titles, positionally aligned with `speakers`.
    #[serde(rename = "Titles", default, deserialize_with = "lenient_text")]
    pub job_titles: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ── Normalized Session ────────────────────────────────────────────

/// A session record after normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Merge key. `None` when the record carried no usable identifier.
    pub session_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub level: Option<String>,
    pub scope: Option<String>,
    /// Trimmed track name; never `Some("")`.
    pub track: Option<String>,
    /// Trimmed room name; never `Some("")`.
    pub room: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub speakers: Vec<String>,
    pub companies: Vec<String>,
    pub domains: Vec<String>,
    pub job_titles: Vec<String>,
}

/// One speaker together with whatever sits at the same index in the
/// companion lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affiliation<'a> {
    pub speaker: &'a str,
    pub company: Option<&'a str>,
    pub domain: Option<&'a str>,
    pub job_title: Option<&'a str>,
}

impl Session {
    /// Zip the speaker list with the company, domain and job title lists by
    /// index. Companion lists shorter than the speaker list leave the tail
    /// speakers with `None`; extra companion entries are ignored.
    pub fn affiliations(&self) -> Vec<Affiliation<'_>> {
        self.speakers
            .iter()
            .enumerate()
            .map(|(i, speaker)| Affiliation {
                speaker,
                company: self.companies.get(i).map(String::as_str),
                domain: self.domains.get(i).map(String::as_str),
                job_title: self.job_titles.get(i).map(String::as_str),
            })
            .collect()
    }
}

// ── Graph Shape ───────────────────────────────────────────────────

/// Node labels in the program graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Session,
    Speaker,
    Company,
    Track,
    Room,
    TimeSlot,
}

impl NodeLabel {
    pub const ALL: [NodeLabel; 6] = [
        NodeLabel::Session,
        NodeLabel::Speaker,
        NodeLabel::Company,
        NodeLabel::Track,
        NodeLabel::Room,
        NodeLabel::TimeSlot,
    ];

    /// The label as written in Cypher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "Session",
            Self::Speaker => "Speaker",
            Self::Company => "Company",
            Self::Track => "Track",
            Self::Room => "Room",
            Self::TimeSlot => "TimeSlot",
        }
    }

    /// The property that uniquely identifies a node of this label.
    pub fn key_property(&self) -> &'static str {
        match self {
            Self::Session => "session_id",
            Self::TimeSlot => "datetime",
            Self::Speaker | Self::Company | Self::Track | Self::Room => "name",
        }
    }
}

impl std::fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship types in the program graph. None carry properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelType {
    /// Session → Track
    PartOf,
    /// Session → Room
    LocatedIn,
    /// Session → TimeSlot
    ScheduledAt,
    /// Speaker → Session
    SpeaksAt,
    /// Speaker → Company
    Represents,
}

impl RelType {
    pub const ALL: [RelType; 5] = [
        RelType::PartOf,
        RelType::LocatedIn,
        RelType::ScheduledAt,
        RelType::SpeaksAt,
        RelType::Represents,
    ];

    /// The relationship type as written in Cypher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PartOf => "PART_OF",
            Self::LocatedIn => "LOCATED_IN",
            Self::ScheduledAt => "SCHEDULED_AT",
            Self::SpeaksAt => "SPEAKS_AT",
            Self::Represents => "REPRESENTS",
        }
    }

    /// Source and target labels for this relationship type.
    pub fn endpoints(&self) -> (NodeLabel, NodeLabel) {
        match self {
            Self::PartOf => (NodeLabel::Session, NodeLabel::Track),
            Self::LocatedIn => (NodeLabel::Session, NodeLabel::Room),
            Self::ScheduledAt => (NodeLabel::Session, NodeLabel::TimeSlot),
            Self::SpeaksAt => (NodeLabel::Speaker, NodeLabel::Session),
            Self::Represents => (NodeLabel::Speaker, NodeLabel::Company),
        }
    }
}

impl std::fmt::Display for RelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node identified by label and unique key value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub label: NodeLabel,
    pub key: String,
}

impl NodeRef {
    pub fn new(label: NodeLabel, key: impl Into<String>) -> Self {
        Self {
            label,
            key: key.into(),
        }
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} {{{}: {:?}}})",
            self.label,
            self.label.key_property(),
            self.key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_session_from_export_keys() {
        let raw: RawSession = serde_json::from_value(serde_json::json!({
            "Session ID": 1042,
            "Title": "Evals in Production",
            "Assigned Track": "Evals",
            "Speakers": "Alice, Bob",
            "Room": null,
            "Unrelated": "ignored"
        }))
        .unwrap();

        assert_eq!(raw.session_id.as_deref(), Some("1042"));
        assert_eq!(raw.title.as_deref(), Some("Evals in Production"));
        assert_eq!(raw.track.as_deref(), Some("Evals"));
        assert_eq!(raw.speakers.as_deref(), Some("Alice, Bob"));
        assert_eq!(raw.room, None);
        assert_eq!(raw.scheduled_at, None);
    }

    #[test]
    fn test_non_scalar_values_are_absent() {
        let raw: RawSession = serde_json::from_value(serde_json::json!({
            "Session ID": "s-1",
            "Speakers": ["Alice"],
            "Level": {"value": 3}
        }))
        .unwrap();

        assert_eq!(raw.speakers, None);
        assert_eq!(raw.level, None);
    }

    #[test]
    fn test_affiliations_align_by_index() {
        let session = Session {
            speakers: vec!["A".into(), "B".into(), "C".into()],
            companies: vec!["Acme".into(), "Globex".into()],
            domains: vec!["acme.io".into()],
            ..Default::default()
        };

        let aff = session.affiliations();
        assert_eq!(aff.len(), 3);
        assert_eq!(aff[0].company, Some("Acme"));
        assert_eq!(aff[0].domain, Some("acme.io"));
        assert_eq!(aff[1].company, Some("Globex"));
        assert_eq!(aff[1].domain, None);
        assert_eq!(aff[2].company, None);
        assert_eq!(aff[2].job_title, None);
    }

    #[test]
    fn test_labels_and_keys() {
        assert_eq!(NodeLabel::Session.key_property(), "session_id");
        assert_eq!(NodeLabel::TimeSlot.key_property(), "datetime");
        assert_eq!(NodeLabel::Company.key_property(), "name");
        assert_eq!(RelType::SpeaksAt.as_str(), "SPEAKS_AT");
        assert_eq!(
            RelType::SpeaksAt.endpoints(),
            (NodeLabel::Speaker, NodeLabel::Session)
        );
    }
}
