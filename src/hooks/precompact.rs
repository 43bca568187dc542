// src/hooks/precompact.rs
// PreCompact hook handler - nothing survives compaction, so only log it

use super::HookInput;
use crate::invocation::Invocation;

/// Log the compaction trigger. State changes happen on the SessionStart
/// that follows the compaction.
pub fn handle(inv: &Invocation, input: &HookInput) -> Option<String> {
    tracing::info!(
        session = %inv.session_id,
        trigger = input.trigger.as_deref().unwrap_or("unknown"),
        "Compaction starting"
    );
    None
}
