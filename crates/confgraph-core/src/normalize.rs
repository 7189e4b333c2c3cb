//! Record normalization: raw export record → typed `Session`.
//!
//! Normalization never fails. Missing fields stay absent, list fields become
//! empty lists and an unparseable schedule becomes `None`. Whether a record is
//! usable at all (it needs a session identifier) is decided by the planner.

use chrono::NaiveDateTime;

use crate::types::{RawSession, Session};

/// Input layout of the export's schedule field, e.g. `15 Jun 2025 09:30 AM`.
pub const SCHEDULE_FORMAT: &str = "%d %b %Y %I:%M %p";

/// Output layout for TimeSlot keys (ISO-8601, second precision, no offset).
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Normalize one raw record.
pub fn normalize(raw: &RawSession) -> Session {
    Session {
        session_id: non_empty(raw.session_id.as_deref()),
        title: raw.title.clone(),
        description: raw.description.clone(),
        format: raw.format.clone(),
        level: raw.level.clone(),
        scope: raw.scope.clone(),
        track: non_empty(raw.track.as_deref()),
        room: non_empty(raw.room.as_deref()),
        scheduled_at: raw.scheduled_at.as_deref().and_then(parse_timestamp),
        speakers: split_list(raw.speakers.as_deref().unwrap_or_default()),
        companies: split_list(raw.companies.as_deref().unwrap_or_default()),
        domains: split_list(raw.company_domains.as_deref().unwrap_or_default()),
        job_titles: split_list(raw.job_titles.as_deref().unwrap_or_default()),
    }
}

/// Parse a schedule string such as `15 Jun 2025 09:30 AM`.
///
/// Returns `None` for anything that does not match [`SCHEDULE_FORMAT`],
/// including the empty string.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(text, SCHEDULE_FORMAT).ok()
}

/// Render an instant the way TimeSlot keys are stored.
pub fn format_instant(instant: &NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Split a comma-delimited field, trimming each piece and dropping empty
/// ones.
///
/// Blank pieces are dropped rather than kept as placeholders, so
/// `"Acme, , Globex"` becomes `["Acme", "Globex"]` and shifts every later
/// entry one position left relative to a parallel list.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_timestamp_morning() {
        let ts = parse_timestamp("15 Jun 2025 09:30 AM").unwrap();
        assert_eq!(format_instant(&ts), "2025-06-15T09:30:00");
    }

    #[test]
    fn test_parse_timestamp_afternoon_and_padding() {
        let ts = parse_timestamp("  3 Jun 2025 1:05 PM ").unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2025, 6, 3)
                .unwrap()
                .and_hms_opt(13, 5, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_noon_and_midnight() {
        assert_eq!(parse_timestamp("4 Jun 2025 12:00 PM").unwrap().hour(), 12);
        assert_eq!(parse_timestamp("4 Jun 2025 12:15 AM").unwrap().hour(), 0);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2025-06-15T09:30:00"), None);
        assert_eq!(parse_timestamp("15 Jun 2025"), None);
        assert_eq!(parse_timestamp("31 Feb 2025 09:30 AM"), None);
    }

    #[test]
    fn test_split_list_drops_blank_pieces() {
        assert_eq!(split_list("Alice, , Bob"), vec!["Alice", "Bob"]);
        assert_eq!(split_list(" Alice ,Bob,"), vec!["Alice", "Bob"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn test_normalize_full_record() {
        let raw = RawSession {
            session_id: Some(" 1042 ".into()),
            title: Some("Evals in Production".into()),
            description: Some("How we ship evals".into()),
            format: Some("Talk".into()),
            level: Some("Intermediate".into()),
            scope: Some("Technical".into()),
            track: Some(" Evals ".into()),
            room: Some("Golden Gate B".into()),
            scheduled_at: Some("15 Jun 2025 09:30 AM".into()),
            speakers: Some("Alice Smith, Bob Jones".into()),
            companies: Some("Acme".into()),
            company_domains: Some("acme.io".into()),
            job_titles: Some("CTO, Engineer".into()),
        };

        let session = normalize(&raw);
        assert_eq!(session.session_id.as_deref(), Some("1042"));
        assert_eq!(session.track.as_deref(), Some("Evals"));
        assert_eq!(session.room.as_deref(), Some("Golden Gate B"));
        assert_eq!(
            session.scheduled_at.as_ref().map(format_instant).as_deref(),
            Some("2025-06-15T09:30:00")
        );
        assert_eq!(session.speakers, vec!["Alice Smith", "Bob Jones"]);
        assert_eq!(session.companies, vec!["Acme"]);
        assert_eq!(session.domains, vec!["acme.io"]);
        assert_eq!(session.job_titles, vec!["CTO", "Engineer"]);
    }

    #[test]
    fn test_normalize_empty_record() {
        let session = normalize(&RawSession::default());
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_blank_categoricals_are_absent() {
        let raw = RawSession {
            session_id: Some("   ".into()),
            track: Some("".into()),
            room: Some("  ".into()),
            scheduled_at: Some("not a date".into()),
            ..Default::default()
        };

        let session = normalize(&raw);
        assert_eq!(session.session_id, None);
        assert_eq!(session.track, None);
        assert_eq!(session.room, None);
        assert_eq!(session.scheduled_at, None);
    }
}
