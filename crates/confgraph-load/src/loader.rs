//! The load loop: export → normalize → plan → sink.
//!
//! Constraints are declared once before the first record. Records are then
//! processed strictly in export order, each plan applied as its own unit of
//! work. A write failure stops the run; records committed before it stay in
//! the store.

use confgraph_core::{normalize, plan_session, uniqueness_constraints, CoreError};
use confgraph_graph::GraphSink;

use crate::config::MissingIdPolicy;
use crate::error::{LoadError, Result};
use crate::export::Export;
use crate::report::{LoadSummary, SkippedRecord};

/// Options controlling a single run.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub on_missing_id: MissingIdPolicy,
    pub dry_run: bool,
}

/// Load every record of `export` into `sink`.
pub async fn run_load<S: GraphSink>(
    sink: &mut S,
    export: &Export,
    options: &LoadOptions,
) -> Result<LoadSummary> {
    let mut summary =
        LoadSummary::new(&export.content_hash, export.repaired, export.records.len());
    summary.dry_run = options.dry_run;

    tracing::info!(
        run_id = %summary.run_id,
        records = export.records.len(),
        repaired = export.repaired,
        "Starting load"
    );

    sink.ensure_constraints(&uniqueness_constraints())
        .await
        .map_err(LoadError::Schema)?;

    for (index, raw) in export.records.iter().enumerate() {
        let session = normalize(raw);

        let has_schedule_text = raw
            .scheduled_at
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if has_schedule_text && session.scheduled_at.is_none() {
            summary.unparsed_schedules += 1;
            tracing::debug!(
                index,
                scheduled_at = raw.scheduled_at.as_deref().unwrap_or_default(),
                "Unparseable schedule, no time slot"
            );
        }

        let plan = match plan_session(&session) {
            Ok(plan) => plan,
            Err(CoreError::MissingSessionId) => match options.on_missing_id {
                MissingIdPolicy::Skip => {
                    tracing::warn!(
                        index,
                        title = session.title.as_deref().unwrap_or_default(),
                        "Skipping record without session identifier"
                    );
                    summary.skipped.push(SkippedRecord {
                        index,
                        reason: "missing session identifier".to_string(),
                    });
                    continue;
                }
                MissingIdPolicy::Abort => return Err(LoadError::MissingSessionId { index }),
            },
            Err(e) => return Err(e.into()),
        };

        sink.apply(&plan).await.map_err(|source| LoadError::Write {
            index,
            session_id: plan.session_id.clone(),
            source,
        })?;

        summary.sessions_written += 1;
        summary.operations_applied += plan.len();
        tracing::debug!(index, session_id = %plan.session_id, ops = plan.len(), "Session upserted");
    }

    summary.finish();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::parse_export;
    use confgraph_graph::MemoryGraph;

    #[tokio::test]
    async fn test_skip_policy_lists_record() {
        let export = parse_export(
            r#"[{"Title": "No id"}, {"Session ID": "s-1", "Speakers": "Alice"}]"#,
        )
        .unwrap();
        let mut graph = MemoryGraph::new();

        let summary = run_load(&mut graph, &export, &LoadOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.sessions_written, 1);
        assert_eq!(
            summary.skipped,
            vec![SkippedRecord {
                index: 0,
                reason: "missing session identifier".to_string()
            }]
        );
        assert!(summary.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_abort_policy_names_record() {
        let export = parse_export(
            r#"[{"Session ID": "s-1"}, {"Session ID": "  ", "Title": "Blank id"}]"#,
        )
        .unwrap();
        let mut graph = MemoryGraph::new();
        let options = LoadOptions {
            on_missing_id: MissingIdPolicy::Abort,
            dry_run: false,
        };

        let err = run_load(&mut graph, &export, &options).await.unwrap_err();
        assert!(matches!(err, LoadError::MissingSessionId { index: 1 }));
        assert_eq!(graph.committed_plans(), 1);
    }

    #[tokio::test]
    async fn test_unparsed_schedules_are_counted() {
        let export = parse_export(
            r#"[
              {"Session ID": "s-1", "Scheduled At": "not a date"},
              {"Session ID": "s-2", "Scheduled At": ""},
              {"Session ID": "s-3", "Scheduled At": "15 Jun 2025 09:30 AM"}
            ]"#,
        )
        .unwrap();
        let mut graph = MemoryGraph::new();

        let summary = run_load(&mut graph, &export, &LoadOptions::default())
            .await
            .unwrap();
        assert_eq!(summary.unparsed_schedules, 1);
        assert_eq!(summary.sessions_written, 3);
    }
}
