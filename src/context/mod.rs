// src/context/mod.rs
// Outward messages built from session state and workspace scans

mod compose;
pub mod templates;

pub use compose::{render_compaction, render_fresh_session, render_reflection, repeat_message};
