// src/invocation.rs
// Explicit per-invocation context threaded through every hook path

use crate::capability::{detect_memory_capability, settings_path};
use crate::config::MetacogConfig;
use crate::diagnostics::Diagnostics;
use crate::state::{SessionRecord, StateStore, validate_session_id};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Everything one hook call needs, built once and passed down.
///
/// Nothing here outlives the process; the memory capability flag is
/// computed at most once per invocation and never cached across calls.
pub struct Invocation {
    pub project_root: PathBuf,
    /// Sanitized, safe to use as a file name
    pub session_id: String,
    pub config: MetacogConfig,
    pub store: StateStore,
    pub diagnostics: Diagnostics,
    /// Wall clock captured at the start of the call
    pub now: DateTime<Local>,
    settings_path: Option<PathBuf>,
    memory_capability: OnceLock<bool>,
}

impl Invocation {
    /// Returns None when the session id is not a valid record file stem
    pub fn new(project_root: &Path, session_id: &str, config: MetacogConfig) -> Option<Self> {
        Self::with_settings(project_root, session_id, config, settings_path())
    }

    /// Like `new`, reading host settings from an explicit location
    pub fn with_settings(
        project_root: &Path,
        session_id: &str,
        config: MetacogConfig,
        settings_path: Option<PathBuf>,
    ) -> Option<Self> {
        let session_id = validate_session_id(session_id)?;
        let store = StateStore::new(project_root).with_max_records(config.max_records);
        Some(Self {
            project_root: project_root.to_path_buf(),
            session_id,
            config,
            store,
            diagnostics: Diagnostics::new(),
            now: Local::now(),
            settings_path,
            memory_capability: OnceLock::new(),
        })
    }

    /// Continue a diagnostics channel opened before the invocation existed
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Pin the capability flag instead of reading host settings
    pub fn with_memory_capability(self, present: bool) -> Self {
        let _ = self.memory_capability.set(present);
        self
    }

    /// Whether the sibling memory plugin is enabled
    pub fn memory_capability(&self) -> bool {
        *self.memory_capability.get_or_init(|| {
            detect_memory_capability(
                self.settings_path.as_deref(),
                &self.config.memory_plugin_pattern,
                &self.diagnostics,
            )
        })
    }

    pub fn load_record(&self) -> SessionRecord {
        self.store.load(&self.session_id, &self.diagnostics)
    }

    pub fn save_record(&self, record: &SessionRecord) -> bool {
        self.store
            .save_or_report(&self.session_id, record, &self.diagnostics)
    }

    pub fn reset_record(&self) -> bool {
        self.store.reset(&self.session_id, &self.diagnostics)
    }

    /// Best-effort retention pass over this project's records
    pub fn cleanup(&self) -> usize {
        self.store.cleanup(&self.diagnostics)
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.config.git_timeout_secs)
    }
}
