// src/diagnostics.rs
// Structured channel for failures that degrade to a fallback value

use std::fmt;
use std::sync::Mutex;

/// Which subsystem swallowed a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    MalformedInput,
    StateLoad,
    StateSave,
    Cleanup,
    Scan,
    Git,
    Capability,
    Config,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedInput => "malformed_input",
            DiagnosticKind::StateLoad => "state_load",
            DiagnosticKind::StateSave => "state_save",
            DiagnosticKind::Cleanup => "cleanup",
            DiagnosticKind::Scan => "scan",
            DiagnosticKind::Git => "git",
            DiagnosticKind::Capability => "capability",
            DiagnosticKind::Config => "config",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub context: String,
}

/// Collects diagnostics for one invocation.
///
/// Every component that falls back to a neutral value reports here instead of
/// failing. Entries are mirrored to the log so hook runs stay debuggable from
/// stderr, and tests can assert on `entries()`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a degraded path that the user may want to know about.
    pub fn warn(&self, kind: DiagnosticKind, context: impl Into<String>) {
        let context = context.into();
        tracing::warn!(kind = %kind, "{}", context);
        self.push(kind, context);
    }

    /// Record an expected fallback (missing file, no upstream, ...).
    pub fn note(&self, kind: DiagnosticKind, context: impl Into<String>) {
        let context = context.into();
        tracing::debug!(kind = %kind, "{}", context);
        self.push(kind, context);
    }

    fn push(&self, kind: DiagnosticKind, context: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Diagnostic { kind, context });
        }
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries
            .lock()
            .map(|e| e.iter().any(|d| d.kind == kind))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|e| e.is_empty()).unwrap_or(true)
    }
}
