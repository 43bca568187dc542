// src/hooks/user_prompt.rs
// UserPromptSubmit hook handler - task tracking and the reflection nudge

use super::HookInput;
use crate::context::render_reflection;
use crate::invocation::Invocation;
use crate::utils::truncate_chars;

/// Record the prompt as a new task or an intervention, then emit the
/// reflection nudge if one is due.
pub fn handle(inv: &Invocation, input: &HookInput) -> Option<String> {
    let prompt = input.prompt.as_deref()?;

    let mut record = inv.load_record();
    let outcome = record.apply_prompt(prompt, inv.now);
    let reflect = record.take_reflection();
    inv.save_record(&record);

    let removed = inv.cleanup();
    tracing::debug!(
        ?outcome,
        reflect,
        removed,
        prompt = %truncate_chars(prompt, 60),
        "Prompt recorded"
    );

    reflect.then(|| render_reflection(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetacogConfig;
    use crate::state::TaskPhase;
    use tempfile::TempDir;

    fn prompt(text: &str) -> HookInput {
        HookInput {
            prompt: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn invocation(root: &std::path::Path) -> Invocation {
        Invocation::with_settings(root, "sess-1", MetacogConfig::default(), None).unwrap()
    }

    #[test]
    fn test_first_prompt_starts_task_and_reflects() {
        let dir = TempDir::new().unwrap();
        let inv = invocation(dir.path());

        let out = handle(&inv, &prompt("build the parser")).expect("reflection");
        assert!(out.contains("build the parser"));

        let record = inv.load_record();
        assert_eq!(record.phase, TaskPhase::Active);
        assert_eq!(record.initial_prompt.as_deref(), Some("build the parser"));
        assert!(!record.reflection.due);
    }

    #[test]
    fn test_second_prompt_is_silent_intervention() {
        let dir = TempDir::new().unwrap();
        handle(&invocation(dir.path()), &prompt("X"));

        let inv = invocation(dir.path());
        assert!(handle(&inv, &prompt("Y")).is_none());

        let record = inv.load_record();
        assert_eq!(record.initial_prompt.as_deref(), Some("X"));
        assert_eq!(record.interventions.len(), 1);
        assert_eq!(record.interventions[0].text, "Y");
    }

    #[test]
    fn test_missing_prompt_does_nothing() {
        let dir = TempDir::new().unwrap();
        let inv = invocation(dir.path());
        assert!(handle(&inv, &HookInput::default()).is_none());
        assert!(!inv.store.record_path(&inv.session_id).exists());
    }
}
