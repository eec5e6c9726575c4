use crate::domain::{Priority, Task};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Wire shape of a task record; field names match the stored JSON
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Record<'a> {
    id: &'a Uuid,
    title: &'a str,
    completed: bool,
    created_at: &'a DateTime<Local>,
    updated_at: &'a DateTime<Local>,
    due_date: Option<&'a NaiveDate>,
    priority: Priority,
    order: usize,
}

/// Serialize the task list to a single JSON blob
pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    let records: Vec<Record<'_>> = tasks
        .iter()
        .map(|t| Record {
            id: &t.id,
            title: &t.title,
            completed: t.completed,
            created_at: &t.created_at,
            updated_at: &t.updated_at,
            due_date: t.due_date.as_ref(),
            priority: t.priority,
            order: t.order,
        })
        .collect();

    serde_json::to_string(&records)
}

/// Deserialize a blob leniently. A malformed blob yields an empty list;
/// partially-shaped records are coerced field by field, with defaults for
/// anything missing or mistyped. Records without a usable title are dropped.
pub fn decode_tasks(blob: &str, now: DateTime<Local>) -> Vec<Task> {
    let value: Value = match serde_json::from_str(blob) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };

    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| coerce_record(item, position, now))
        .collect()
}

fn coerce_record(item: &Value, position: usize, now: DateTime<Local>) -> Option<Task> {
    let obj = item.as_object()?;

    let title = obj.get("title").and_then(Value::as_str)?.trim();
    if title.is_empty() {
        return None;
    }

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let completed = obj.get("completed").and_then(Value::as_bool).unwrap_or(false);

    let created_at = obj.get("createdAt").and_then(parse_timestamp).unwrap_or(now);
    let updated_at = obj.get("updatedAt").and_then(parse_timestamp).unwrap_or(now);

    let due_date = obj
        .get("dueDate")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

    let priority = obj
        .get("priority")
        .and_then(Value::as_str)
        .and_then(Priority::from_tag)
        .unwrap_or_default();

    // Missing or non-numeric order falls back to the record's position
    let order = obj
        .get("order")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(position);

    Some(Task {
        id,
        title: title.to_string(),
        completed,
        created_at,
        updated_at,
        due_date,
        priority,
        order,
    })
}

/// Accept RFC 3339 strings, or legacy integer millisecond timestamps
fn parse_timestamp(value: &Value) -> Option<DateTime<Local>> {
    if let Some(s) = value.as_str() {
        return DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Local));
    }
    if let Some(millis) = value.as_i64() {
        return Local.timestamp_millis_opt(millis).single();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Local> {
        Local::now()
    }

    fn create_test_task(title: &str, order: usize) -> Task {
        Task::new(title.to_string(), None, Priority::Medium, order, now())
    }

    #[test]
    fn test_round_trip_preserves_tasks() {
        let mut task = create_test_task("Water plants", 0);
        task.completed = true;
        task.due_date = NaiveDate::from_ymd_opt(2024, 7, 1);
        task.priority = Priority::High;
        let tasks = vec![task, create_test_task("Buy milk", 1)];

        let blob = encode_tasks(&tasks).unwrap();
        let loaded = decode_tasks(&blob, now());

        assert_eq!(loaded, tasks);
    }

    #[test]
    fn test_decode_malformed_blob_yields_empty() {
        assert_eq!(decode_tasks("not json", now()), vec![]);
        assert_eq!(decode_tasks("{\"title\": \"not an array\"}", now()), vec![]);
        assert_eq!(decode_tasks("42", now()), vec![]);
        assert_eq!(decode_tasks("", now()), vec![]);
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let blob = r#"[{"title": "Bare task"}]"#;
        let loaded = decode_tasks(blob, now());

        assert_eq!(loaded.len(), 1);
        let task = &loaded[0];
        assert_eq!(task.title, "Bare task");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.due_date.is_none());
        assert_eq!(task.order, 0);
    }

    #[test]
    fn test_decode_drops_records_without_title() {
        let blob = r#"[{"title": "Kept"}, {"completed": true}, {"title": "   "}, null]"#;
        let loaded = decode_tasks(blob, now());

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Kept");
    }

    #[test]
    fn test_decode_non_numeric_order_uses_position() {
        let blob = r#"[
            {"title": "a", "order": "first"},
            {"title": "b"},
            {"title": "c", "order": 7}
        ]"#;
        let loaded = decode_tasks(blob, now());

        assert_eq!(loaded[0].order, 0);
        assert_eq!(loaded[1].order, 1);
        assert_eq!(loaded[2].order, 7);
    }

    #[test]
    fn test_decode_coerces_mistyped_fields() {
        let blob = r#"[{
            "id": "not-a-uuid",
            "title": "Odd record",
            "completed": "yes",
            "createdAt": "not a time",
            "dueDate": "07/01/2024",
            "priority": "urgent"
        }]"#;
        let reference = now();
        let loaded = decode_tasks(blob, reference);

        assert_eq!(loaded.len(), 1);
        let task = &loaded[0];
        assert!(!task.completed);
        assert_eq!(task.created_at, reference);
        assert!(task.due_date.is_none());
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_decode_accepts_legacy_millisecond_timestamps() {
        let blob = r#"[{"title": "Old", "createdAt": 1718409600000, "updatedAt": 1718409600000}]"#;
        let loaded = decode_tasks(blob, now());

        assert_eq!(loaded.len(), 1);
        let expected = Local.timestamp_millis_opt(1_718_409_600_000).unwrap();
        assert_eq!(loaded[0].created_at, expected);
    }
}
