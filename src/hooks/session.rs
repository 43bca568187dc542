// src/hooks/session.rs
// SessionStart hook handler - post-compaction context or fresh orientation

use super::HookInput;
use crate::context::{render_compaction, render_fresh_session};
use crate::invocation::Invocation;

/// SessionStart source the host sends after compacting the conversation
const COMPACT_SOURCE: &str = "compact";

/// Compaction restores the task context; every other source (startup,
/// resume, clear) resets the record and orients a fresh session.
pub async fn handle(inv: &Invocation, input: &HookInput) -> Option<String> {
    let source = input.source.as_deref().unwrap_or("startup");

    if source == COMPACT_SOURCE {
        let mut record = inv.load_record();
        record.apply_compaction();
        inv.save_record(&record);
        tracing::debug!(
            compactions = record.reflection.compactions,
            "Compaction detected, rebuilding task context"
        );
        return Some(render_compaction(&record, inv));
    }

    tracing::debug!(source, "Fresh session, resetting record");
    inv.reset_record();
    Some(render_fresh_session(inv).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetacogConfig;
    use crate::context::templates::{COMPACTION_BANNER, FRESH_SESSION};
    use crate::state::{SessionRecord, TaskPhase};
    use tempfile::TempDir;

    fn source(s: &str) -> HookInput {
        HookInput {
            source: Some(s.to_string()),
            ..Default::default()
        }
    }

    fn invocation(root: &std::path::Path) -> Invocation {
        Invocation::with_settings(root, "s", MetacogConfig::default(), None)
            .unwrap()
            .with_memory_capability(false)
    }

    #[tokio::test]
    async fn test_compact_increments_and_renders() {
        let dir = TempDir::new().unwrap();
        let inv = invocation(dir.path());
        let mut record = SessionRecord::default();
        record.apply_prompt("ship the release", inv.now);
        record.take_reflection();
        inv.save_record(&record);

        let out = handle(&inv, &source("compact")).await.unwrap();
        assert!(out.starts_with(COMPACTION_BANNER));
        assert!(out.contains("ship the release"));

        let record = inv.load_record();
        assert_eq!(record.reflection.compactions, 1);
        assert!(record.reflection.due);
        assert_eq!(record.phase, TaskPhase::Active);
    }

    #[tokio::test]
    async fn test_startup_resets_record() {
        let dir = TempDir::new().unwrap();
        let inv = invocation(dir.path());
        let mut record = SessionRecord::default();
        record.apply_prompt("old task", inv.now);
        inv.save_record(&record);

        let out = handle(&inv, &source("resume")).await.unwrap();
        assert!(out.contains(FRESH_SESSION));
        assert_eq!(inv.load_record(), SessionRecord::default());
    }

    #[tokio::test]
    async fn test_missing_source_is_fresh() {
        let dir = TempDir::new().unwrap();
        let inv = invocation(dir.path());
        let out = handle(&inv, &HookInput::default()).await.unwrap();
        assert!(out.contains(FRESH_SESSION));
    }
}
