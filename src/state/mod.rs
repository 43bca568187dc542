// src/state/mod.rs
// Session record persistence, task lifecycle, and file access tracking

pub mod file_access;
pub mod lifecycle;
pub mod record;
pub mod store;

pub use lifecycle::PromptOutcome;
pub use record::{AccessKind, FileAccessMap, Intervention, Reflection, SessionRecord, TaskPhase};
pub use store::{StateStore, validate_session_id};
