// src/hooks/stop.rs
// Stop hook handler - the assistant finished responding

use super::HookInput;
use crate::invocation::Invocation;

/// Mark the current task complete so the next prompt starts a new one
pub fn handle(inv: &Invocation, _input: &HookInput) -> Option<String> {
    let mut record = inv.load_record();
    record.apply_response_complete();
    inv.save_record(&record);
    tracing::debug!(session = %inv.session_id, "Task marked complete");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetacogConfig;
    use crate::state::{PromptOutcome, TaskPhase};
    use tempfile::TempDir;

    #[test]
    fn test_next_prompt_after_stop_is_new_task() {
        let dir = TempDir::new().unwrap();
        let inv =
            Invocation::with_settings(dir.path(), "s", MetacogConfig::default(), None).unwrap();

        let mut record = inv.load_record();
        record.apply_prompt("first", inv.now);
        inv.save_record(&record);

        assert!(handle(&inv, &HookInput::default()).is_none());

        let mut record = inv.load_record();
        assert_eq!(record.phase, TaskPhase::NoTask);
        assert_eq!(record.apply_prompt("second", inv.now), PromptOutcome::NewTask);
    }
}
