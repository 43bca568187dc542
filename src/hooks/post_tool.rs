// src/hooks/post_tool.rs
// PostToolUse hook handler - records which files the session touched

use super::HookInput;
use crate::invocation::Invocation;
use crate::state::AccessKind;

/// Record a file operation. Tools that don't touch files are ignored.
pub fn handle(inv: &Invocation, input: &HookInput) -> Option<String> {
    let tool = input.tool_name.as_deref()?;
    let Some(kind) = AccessKind::from_tool(tool) else {
        tracing::debug!(tool, "Ignoring non-file tool");
        return None;
    };
    let path = input.file_path.as_deref()?;

    let mut record = inv.load_record();
    record.record_access(path, kind, &inv.project_root);
    inv.save_record(&record);

    tracing::debug!(tool, path, kind = kind.as_str(), "File access recorded");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetacogConfig;
    use tempfile::TempDir;

    fn tool(name: &str, path: &str) -> HookInput {
        HookInput {
            tool_name: Some(name.to_string()),
            file_path: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_records_normalized_access() {
        let dir = TempDir::new().unwrap();
        let inv =
            Invocation::with_settings(dir.path(), "s", MetacogConfig::default(), None).unwrap();
        let abs = dir.path().join("src").join("main.rs");

        handle(&inv, &tool("Read", &abs.to_string_lossy()));
        handle(&inv, &tool("MultiEdit", "src/main.rs"));
        handle(&inv, &tool("Write", "docs\\notes.md"));

        let record = inv.load_record();
        assert_eq!(
            record.file_access["src/main.rs"],
            vec![AccessKind::Read, AccessKind::Update]
        );
        assert_eq!(record.file_access["docs/notes.md"], vec![AccessKind::Write]);
    }

    #[test]
    fn test_other_tools_ignored() {
        let dir = TempDir::new().unwrap();
        let inv =
            Invocation::with_settings(dir.path(), "s", MetacogConfig::default(), None).unwrap();
        assert!(handle(&inv, &tool("Bash", "ls")).is_none());
        assert!(!inv.store.record_path("s").exists());
    }
}
