// src/state/store.rs
// Crash-safe per-session record store under <project>/.claude/metacognition

use super::record::SessionRecord;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Record directory, relative to the project root
pub const STATE_DIR: &[&str] = &[".claude", "metacognition"];

/// Records kept per project unless configured otherwise
pub const DEFAULT_MAX_RECORDS: usize = 10;

/// Accept a host session id as a file stem only when it is already made of
/// `[A-Za-z0-9_-]`. Ids are never rewritten, so two sessions can't share a
/// record file.
pub fn validate_session_id(session_id: &str) -> Option<String> {
    let usable = !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    usable.then(|| session_id.to_string())
}

/// One project's record directory
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
    max_records: usize,
}

impl StateStore {
    pub fn new(project_root: &Path) -> Self {
        let mut dir = project_root.to_path_buf();
        for part in STATE_DIR {
            dir.push(part);
        }
        Self {
            dir,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for a validated session id
    pub fn record_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }

    /// Load a session record. Never fails: a missing or unreadable file
    /// yields a fresh default, and readable fields of a partial record are
    /// merged over the defaults.
    pub fn load(&self, session_id: &str, diags: &Diagnostics) -> SessionRecord {
        let path = self.record_path(session_id);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No record for session {}, using defaults", session_id);
                return SessionRecord::default();
            }
            Err(e) => {
                diags.warn(
                    DiagnosticKind::StateLoad,
                    format!("failed to read {}: {}", path.display(), e),
                );
                return SessionRecord::default();
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(v) => v,
            Err(e) => {
                diags.warn(
                    DiagnosticKind::StateLoad,
                    format!("corrupt record {}: {}", path.display(), e),
                );
                return SessionRecord::default();
            }
        };

        let (record, rejected) = SessionRecord::from_value(value);
        if !rejected.is_empty() {
            diags.warn(
                DiagnosticKind::StateLoad,
                format!(
                    "ignored unreadable fields in {}: {}",
                    path.display(),
                    rejected.join(", ")
                ),
            );
        }
        record
    }

    /// Persist a record atomically: serialize into a uniquely named temp file
    /// in the same directory, then rename it over the target. Concurrent
    /// writers each replace the whole file; the last rename wins.
    pub fn save(&self, session_id: &str, record: &SessionRecord) -> crate::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(session_id);

        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .suffix(".partial")
            .tempfile_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, record)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;
        Ok(())
    }

    /// Save, reporting failure on the diagnostic channel. Returns success.
    pub fn save_or_report(
        &self,
        session_id: &str,
        record: &SessionRecord,
        diags: &Diagnostics,
    ) -> bool {
        match self.save(session_id, record) {
            Ok(()) => true,
            Err(e) => {
                diags.warn(
                    DiagnosticKind::StateSave,
                    format!("failed to save record for {}: {}", session_id, e),
                );
                false
            }
        }
    }

    /// Overwrite a session's record with defaults
    pub fn reset(&self, session_id: &str, diags: &Diagnostics) -> bool {
        self.save_or_report(session_id, &SessionRecord::default(), diags)
    }

    /// Delete the oldest records (by mtime) until at most `max_records`
    /// remain. Best-effort: errors are reported and otherwise ignored.
    pub fn cleanup(&self, diags: &Diagnostics) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    diags.warn(
                        DiagnosticKind::Cleanup,
                        format!("cannot list {}: {}", self.dir.display(), e),
                    );
                }
                return 0;
            }
        };

        let mut records: Vec<(PathBuf, std::time::SystemTime)> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .filter_map(|path| {
                let mtime = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
                Some((path, mtime))
            })
            .collect();

        if records.len() <= self.max_records {
            return 0;
        }

        // oldest first
        records.sort_by(|a, b| a.1.cmp(&b.1));
        let excess = records.len() - self.max_records;

        let mut removed = 0;
        for (path, _) in records.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                // a concurrent cleanup got there first
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => diags.warn(
                    DiagnosticKind::Cleanup,
                    format!("failed to remove {}: {}", path.display(), e),
                ),
            }
        }
        if removed > 0 {
            tracing::debug!("Cleaned up {} old session record(s)", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::{AccessKind, TaskPhase};
    use filetime::FileTime;
    use tempfile::TempDir;

    fn store() -> (TempDir, StateStore) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());
        (dir, store)
    }

    // ============================================================================
    // validate_session_id tests
    // ============================================================================

    #[test]
    fn test_validate_keeps_uuid() {
        assert_eq!(
            validate_session_id("3f2a9c1e-77b0-4d1f-9a8e-2c5d6e7f8a9b").as_deref(),
            Some("3f2a9c1e-77b0-4d1f-9a8e-2c5d6e7f8a9b")
        );
        assert_eq!(validate_session_id("run_01").as_deref(), Some("run_01"));
    }

    #[test]
    fn test_validate_rejects_path_tricks() {
        assert_eq!(validate_session_id("../../etc/passwd"), None);
        assert_eq!(validate_session_id("../.."), None);
        assert_eq!(validate_session_id(""), None);
        assert_eq!(validate_session_id(" abc"), None);
    }

    #[test]
    fn test_distinct_ids_never_share_a_file() {
        // "a.b" would collapse onto "ab" if it were rewritten
        assert_eq!(validate_session_id("a.b"), None);
        assert_eq!(validate_session_id("ab").as_deref(), Some("ab"));
    }

    // ============================================================================
    // load / save tests
    // ============================================================================

    #[test]
    fn test_load_unknown_session_twice_is_default() {
        let (_dir, store) = store();
        let diags = Diagnostics::new();
        let a = store.load("never-seen", &diags);
        let b = store.load("never-seen", &diags);
        assert_eq!(a, b);
        assert_eq!(a, SessionRecord::default());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = store();
        let diags = Diagnostics::new();
        let mut record = SessionRecord::default();
        record.phase = TaskPhase::Active;
        record.initial_prompt = Some("refactor the parser".to_string());
        record
            .file_access
            .insert("src/parser.rs".to_string(), vec![AccessKind::Read]);

        store.save("s1", &record).unwrap();
        assert!(store.record_path("s1").exists());
        assert_eq!(store.load("s1", &diags), record);
    }

    #[test]
    fn test_corrupt_record_loads_default_with_diagnostic() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.record_path("bad"), "{ not json").unwrap();

        let diags = Diagnostics::new();
        assert_eq!(store.load("bad", &diags), SessionRecord::default());
        assert!(diags.has(DiagnosticKind::StateLoad));
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (_dir, store) = store();
        store.save("s1", &SessionRecord::default()).unwrap();
        store.save("s1", &SessionRecord::default()).unwrap();
        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["s1.json".to_string()]);
    }

    #[test]
    fn test_concurrent_saves_leave_one_whole_record() {
        let (_dir, store) = store();
        let mut a = SessionRecord::default();
        a.initial_prompt = Some("A".repeat(4096));
        let mut b = SessionRecord::default();
        b.initial_prompt = Some("B".repeat(4096));
        b.phase = TaskPhase::Active;

        std::thread::scope(|s| {
            for i in 0..8 {
                let store = store.clone();
                let rec = if i % 2 == 0 { a.clone() } else { b.clone() };
                s.spawn(move || {
                    for _ in 0..20 {
                        store.save("race", &rec).unwrap();
                    }
                });
            }
        });

        let contents = fs::read_to_string(store.record_path("race")).unwrap();
        let parsed: SessionRecord = serde_json::from_str(&contents).unwrap();
        assert!(parsed == a || parsed == b);
    }

    #[test]
    fn test_reset_overwrites_with_defaults() {
        let (_dir, store) = store();
        let diags = Diagnostics::new();
        let mut record = SessionRecord::default();
        record.initial_prompt = Some("old task".to_string());
        store.save("s1", &record).unwrap();

        assert!(store.reset("s1", &diags));
        assert_eq!(store.load("s1", &diags), SessionRecord::default());
    }

    // ============================================================================
    // cleanup tests
    // ============================================================================

    #[test]
    fn test_cleanup_keeps_ten_most_recent() {
        let (_dir, store) = store();
        let diags = Diagnostics::new();
        for i in 0..12 {
            let id = format!("session-{i:02}");
            store.save(&id, &SessionRecord::default()).unwrap();
            let mtime = FileTime::from_unix_time(1_700_000_000 + i * 60, 0);
            filetime::set_file_mtime(store.record_path(&id), mtime).unwrap();
        }

        assert_eq!(store.cleanup(&diags), 2);

        let mut remaining: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 10);
        assert!(!remaining.contains(&"session-00.json".to_string()));
        assert!(!remaining.contains(&"session-01.json".to_string()));
        assert!(remaining.contains(&"session-11.json".to_string()));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_cleanup_under_limit_is_noop() {
        let (_dir, store) = store();
        let diags = Diagnostics::new();
        for i in 0..3 {
            store.save(&format!("s{i}"), &SessionRecord::default()).unwrap();
        }
        assert_eq!(store.cleanup(&diags), 0);
    }

    #[test]
    fn test_cleanup_missing_dir_is_silent() {
        let (_dir, store) = store();
        let diags = Diagnostics::new();
        assert_eq!(store.cleanup(&diags), 0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_cleanup_ignores_non_record_files() {
        let (_dir, store) = store();
        let store = store.with_max_records(1);
        let diags = Diagnostics::new();
        store.save("a", &SessionRecord::default()).unwrap();
        fs::write(store.dir().join("notes.txt"), "keep me").unwrap();
        assert_eq!(store.cleanup(&diags), 0);
        assert!(store.dir().join("notes.txt").exists());
    }
}
