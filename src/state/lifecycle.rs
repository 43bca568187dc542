// src/state/lifecycle.rs
// Task lifecycle and reflection timing transitions

use super::record::{Intervention, SessionRecord, TaskPhase};
use chrono::{DateTime, Local};

/// What a submitted prompt turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The prompt opened a new task
    NewTask,
    /// The prompt arrived while a task was active
    Intervention,
}

impl SessionRecord {
    /// Apply a user prompt.
    ///
    /// With no active task the prompt becomes the task's initial prompt and
    /// the previous task's interventions and file accesses are cleared. During an active task it is
    /// appended as an intervention and the initial prompt is left alone.
    pub fn apply_prompt(&mut self, text: &str, at: DateTime<Local>) -> PromptOutcome {
        match self.phase {
            TaskPhase::NoTask => {
                self.phase = TaskPhase::Active;
                self.initial_prompt = Some(text.to_string());
                self.initial_timestamp = Some(at);
                self.interventions.clear();
                self.file_access.clear();
                PromptOutcome::NewTask
            }
            TaskPhase::Active => {
                self.interventions.push(Intervention {
                    timestamp: at,
                    text: text.to_string(),
                });
                PromptOutcome::Intervention
            }
        }
    }

    /// The assistant finished responding; the next prompt starts a new task
    pub fn apply_response_complete(&mut self) {
        self.phase = TaskPhase::NoTask;
    }

    /// The host compacted the conversation
    pub fn apply_compaction(&mut self) {
        self.reflection.compactions = self.reflection.compactions.saturating_add(1);
        self.reflection.due = true;
    }

    /// Consume the pending reflection, if any. Returns true when the nudge
    /// should be shown for this prompt.
    pub fn take_reflection(&mut self) -> bool {
        if !self.reflection.due {
            return false;
        }
        self.reflection.due = false;
        self.reflection.compactions = 0;
        true
    }
}
