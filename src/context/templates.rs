// src/context/templates.rs
// Fixed wording for injected reminders

pub const COMPACTION_BANNER: &str = "CONTEXT COMPACTED";

pub const COMPACTION_EXPLANATION: &str = "The conversation was compressed. You received a summary, \
but it captures WHAT you were doing and rarely WHY.";

pub const NO_TASK_CONTEXT: &str = "(No task context captured)";

pub const OTHER_FILES_NOTE: &str = "   (subagents, other instances, external tools)";

pub const POST_COMPACTION_REMINDER: &str = "\
While you work, you MUST regularly ask yourself:
- Do you still understand WHY you are doing what you are doing?
- Are you simplifying or cutting corners?
- Could you break something that existed before?

If an answer worries you, STOP and check in with the user:
- What has been fully done?
- What is left to do?
- What are you unsure you understand?

Reminder: after a compaction you tend to become hyper-focused on \"the task\" and lose the wider context. Resist that.";

pub const MEMORY_POINTER: &str = "\
PROJECT MEMORY
A memory plugin is installed. Before assuming how something works, search it for past \
decisions, earlier sessions, and project conventions related to the files above.";

pub const FRESH_SESSION: &str = "\
NEW SESSION

You are starting a new session. You have no history with this user in this project.

If the user refers to earlier work, you MUST ask yourself:
- What exactly are they talking about? (do not assume)
- What existing material should you check? (files, documents, project context)
- What are you missing in order to understand?";

pub const PROJECT_TREE_HEADER: &str = "PROJECT STRUCTURE (collapsed directories show file types and last change)";

pub const NO_REPO_MUTATION: &str = "\
Never commit, push, create branches, stash, reset, or otherwise change any repository \
unless the user explicitly asks for it.";

pub const PRE_TASK_REFLECTION: &str = "\
REFLECTION: BEFORE AND AFTER

BEFORE YOU START, state explicitly:
1. What are ALL the elements of the request? (none of them is optional)
2. What do you understand of each element?
3. What are you INTERPRETING? (ambiguous terms, assumed context)
4. What do you NOT KNOW that might be needed?
5. What existing material should you consult? (documents, previous work, project context)

If point 4 holds anything critical, ask for clarification before diving in.

BEFORE YOU CONCLUDE, check:
1. What did you NOT address from the prompt? (no element is optional)
2. Did you produce something USABLE or only a sketch?
3. What is left to make it complete?
4. Is anything waiting on something else? (dependencies, approvals)
5. Which assumptions did you make that deserve to be flagged?

If you were selective or made assumptions, say so explicitly.

Reminder: \"plausible\" is your trap. A senior engineer would address the WHOLE prompt, \
ask rather than assume, and flag what remains unclear.";

/// Separator between repeated copies of an emphasized message
pub const REPEAT_SEPARATOR: &str = "\n\n---\n\n";
