// src/state/record.rs
// Persisted per-session record and its on-disk shape

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Kind of file operation the assistant performed through a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Read,
    Write,
    Update,
}

impl AccessKind {
    /// Map a host tool name to an access kind. Unknown tools are ignored.
    pub fn from_tool(tool_name: &str) -> Option<Self> {
        match tool_name {
            "Read" => Some(AccessKind::Read),
            "Write" => Some(AccessKind::Write),
            "Edit" | "MultiEdit" | "NotebookEdit" => Some(AccessKind::Update),
            _ => None,
        }
    }

    /// Display priority: read < update < write
    pub fn priority(&self) -> u8 {
        match self {
            AccessKind::Read => 0,
            AccessKind::Update => 1,
            AccessKind::Write => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::Read => "read",
            AccessKind::Write => "write",
            AccessKind::Update => "update",
        }
    }
}

/// path -> kinds, both in first-seen order
pub type FileAccessMap = IndexMap<String, Vec<AccessKind>>;

/// A user prompt that arrived while a task was already active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Local>,
    #[serde(alias = "prompt")]
    pub text: String,
}

/// Whether a task is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskPhase {
    #[default]
    NoTask,
    Active,
}

/// Reflection timing, independent from the task phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reflection {
    /// The next prompt should receive the reflection nudge
    pub due: bool,
    /// Compactions seen since the nudge last fired
    pub compactions: u32,
}

impl Default for Reflection {
    fn default() -> Self {
        Self {
            due: true,
            compactions: 0,
        }
    }
}

/// Everything metacog remembers about one session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RecordFile", into = "RecordFile")]
pub struct SessionRecord {
    pub phase: TaskPhase,
    pub reflection: Reflection,
    pub initial_prompt: Option<String>,
    pub initial_timestamp: Option<DateTime<Local>>,
    pub interventions: Vec<Intervention>,
    pub file_access: FileAccessMap,
}

impl SessionRecord {
    /// The last `n` interventions, oldest first
    pub fn recent_interventions(&self, n: usize) -> &[Intervention] {
        let start = self.interventions.len().saturating_sub(n);
        &self.interventions[start..]
    }

    /// Rebuild a record from a JSON value, keeping every recognized field
    /// that parses and defaulting the rest.
    ///
    /// Returns the record and the names of fields that were present but
    /// could not be read.
    pub fn from_value(value: Value) -> (Self, Vec<String>) {
        match value {
            Value::Object(map) => {
                let (file, rejected) = RecordFile::merge_over_defaults(map);
                (file.into(), rejected)
            }
            _ => (Self::default(), vec!["<root>".to_string()]),
        }
    }
}

/// On-disk shape. Older records written with only a subset of these keys
/// remain valid; absent keys take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RecordFile {
    task_started: bool,
    compaction_count: u32,
    task_completed: bool,
    initial_prompt: Option<String>,
    #[serde(with = "timestamp::option")]
    initial_timestamp: Option<DateTime<Local>>,
    interventions: Vec<Intervention>,
    file_access: FileAccessMap,
}

impl Default for RecordFile {
    fn default() -> Self {
        Self {
            task_started: false,
            compaction_count: 0,
            // first prompt of a session always starts a task
            task_completed: true,
            initial_prompt: None,
            initial_timestamp: None,
            interventions: Vec::new(),
            file_access: FileAccessMap::new(),
        }
    }
}

impl RecordFile {
    fn merge_over_defaults(map: Map<String, Value>) -> (Self, Vec<String>) {
        let mut file = Self::default();
        let mut rejected = Vec::new();

        for (key, value) in map {
            let ok = match key.as_str() {
                "task_started" => take(value, &mut file.task_started),
                "compaction_count" => take(value, &mut file.compaction_count),
                "task_completed" => take(value, &mut file.task_completed),
                "initial_prompt" => take(value, &mut file.initial_prompt),
                "initial_timestamp" => match value {
                    Value::Null => {
                        file.initial_timestamp = None;
                        true
                    }
                    Value::String(s) => match timestamp::parse(&s) {
                        Some(ts) => {
                            file.initial_timestamp = Some(ts);
                            true
                        }
                        None => false,
                    },
                    _ => false,
                },
                "interventions" => take(value, &mut file.interventions),
                "file_access" => take(value, &mut file.file_access),
                // unknown keys from newer or foreign writers are ignored
                _ => true,
            };
            if !ok {
                rejected.push(key);
            }
        }

        (file, rejected)
    }
}

fn take<T: serde::de::DeserializeOwned>(value: Value, slot: &mut T) -> bool {
    match serde_json::from_value(value) {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => false,
    }
}

impl From<RecordFile> for SessionRecord {
    fn from(file: RecordFile) -> Self {
        Self {
            phase: if file.task_completed {
                TaskPhase::NoTask
            } else {
                TaskPhase::Active
            },
            reflection: Reflection {
                due: !file.task_started || file.compaction_count > 0,
                compactions: file.compaction_count,
            },
            initial_prompt: file.initial_prompt,
            initial_timestamp: file.initial_timestamp,
            interventions: file.interventions,
            file_access: file.file_access,
        }
    }
}

impl From<SessionRecord> for RecordFile {
    fn from(record: SessionRecord) -> Self {
        // due with no pending compaction only happens before the first nudge
        let task_started = !(record.reflection.due && record.reflection.compactions == 0);
        Self {
            task_started,
            compaction_count: record.reflection.compactions,
            task_completed: record.phase == TaskPhase::NoTask,
            initial_prompt: record.initial_prompt,
            initial_timestamp: record.initial_timestamp,
            interventions: record.interventions,
            file_access: record.file_access,
        }
    }
}

/// RFC 3339 timestamps, tolerating the naive ISO-8601 form older records used
pub mod timestamp {
    use super::*;

    pub fn parse(s: &str) -> Option<DateTime<Local>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Local));
        }
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()?;
        Local.from_local_datetime(&naive).earliest()
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Local>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => s.serialize_some(&ts.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Local>>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            match raw {
                None => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_record_starts_a_task_on_first_prompt() {
        let record = SessionRecord::default();
        assert_eq!(record.phase, TaskPhase::NoTask);
        assert!(record.reflection.due);
        assert_eq!(record.reflection.compactions, 0);
        assert!(record.initial_prompt.is_none());
        assert!(record.file_access.is_empty());
    }

    #[test]
    fn test_default_serializes_to_original_flags() {
        let value = serde_json::to_value(SessionRecord::default()).unwrap();
        assert_eq!(value["task_started"], json!(false));
        assert_eq!(value["compaction_count"], json!(0));
        assert_eq!(value["task_completed"], json!(true));
        assert_eq!(value["interventions"], json!([]));
    }

    #[test]
    fn test_reflection_flags_survive_disk_shape() {
        let cases = [
            Reflection { due: true, compactions: 0 },
            Reflection { due: false, compactions: 0 },
            Reflection { due: true, compactions: 3 },
        ];
        for reflection in cases {
            let record = SessionRecord {
                reflection,
                ..Default::default()
            };
            let json = serde_json::to_string(&record).unwrap();
            let back: SessionRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(back.reflection, reflection);
        }
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let (record, rejected) = SessionRecord::from_value(json!({
            "initial_prompt": "fix the login bug",
            "interventions": []
        }));
        assert!(rejected.is_empty());
        assert_eq!(record.initial_prompt.as_deref(), Some("fix the login bug"));
        assert_eq!(record.phase, TaskPhase::NoTask);
        assert!(record.reflection.due);
    }

    #[test]
    fn test_bad_field_is_dropped_and_reported() {
        let (record, rejected) = SessionRecord::from_value(json!({
            "task_completed": false,
            "compaction_count": "many",
            "mystery": 1
        }));
        assert_eq!(rejected, vec!["compaction_count".to_string()]);
        assert_eq!(record.phase, TaskPhase::Active);
        assert_eq!(record.reflection.compactions, 0);
    }

    #[test]
    fn test_non_object_root_is_default() {
        let (record, rejected) = SessionRecord::from_value(json!([1, 2, 3]));
        assert_eq!(record, SessionRecord::default());
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_legacy_intervention_key_and_naive_timestamp() {
        let (record, rejected) = SessionRecord::from_value(json!({
            "initial_timestamp": "2026-03-02T09:15:00.123456",
            "interventions": [
                {"timestamp": "2026-03-02T09:20:00", "prompt": "also update docs"}
            ]
        }));
        assert!(rejected.is_empty());
        assert_eq!(record.interventions.len(), 1);
        assert_eq!(record.interventions[0].text, "also update docs");
        let start = record.initial_timestamp.unwrap();
        assert_eq!(start.format("%H:%M").to_string(), "09:15");
    }

    #[test]
    fn test_file_access_keeps_insertion_order() {
        let (record, _) = SessionRecord::from_value(json!({
            "file_access": {"z.rs": ["update"], "a.rs": ["read", "write"]}
        }));
        let keys: Vec<&String> = record.file_access.keys().collect();
        assert_eq!(keys, vec!["z.rs", "a.rs"]);
        assert_eq!(
            record.file_access["a.rs"],
            vec![AccessKind::Read, AccessKind::Write]
        );
    }

    #[test]
    fn test_access_kind_from_tool() {
        assert_eq!(AccessKind::from_tool("Read"), Some(AccessKind::Read));
        assert_eq!(AccessKind::from_tool("Write"), Some(AccessKind::Write));
        assert_eq!(AccessKind::from_tool("Edit"), Some(AccessKind::Update));
        assert_eq!(AccessKind::from_tool("MultiEdit"), Some(AccessKind::Update));
        assert_eq!(AccessKind::from_tool("Bash"), None);
    }

    #[test]
    fn test_recent_interventions() {
        let now = Local::now();
        let record = SessionRecord {
            interventions: (0..7)
                .map(|i| Intervention {
                    timestamp: now,
                    text: format!("p{i}"),
                })
                .collect(),
            ..Default::default()
        };
        let recent: Vec<&str> = record
            .recent_interventions(5)
            .iter()
            .map(|i| i.text.as_str())
            .collect();
        assert_eq!(recent, vec!["p2", "p3", "p4", "p5", "p6"]);
        assert_eq!(SessionRecord::default().recent_interventions(5).len(), 0);
    }
}
