use crate::config::Config;
use crate::error::{Result, RouteError};
use crate::paths;
use serde_json::{json, Map, Value};

/// Schema version written into every slot envelope.
///
/// - v1: bare JSON as produced by the browser (no envelope, old records may
///   lack fields added later)
/// - v2: `{version, data}` envelope, every record carries its full field set
pub const SCHEMA_VERSION: u32 = 2;

/// Run any pending schema migrations on a loaded [`Config`].
///
/// Config schema v1 has no migrations yet. Add a match arm on `cfg.version`
/// when the layout changes.
pub fn migrate_config(cfg: Config) -> Result<Config> {
    Ok(cfg)
}

/// Upgrade slot `data` stored at `version` to [`SCHEMA_VERSION`].
pub fn migrate_slot(key: &str, version: u32, data: Value) -> Result<Value> {
    if version > SCHEMA_VERSION {
        return Err(RouteError::Storage(format!(
            "slot '{key}' was written by schema v{version}, newer than v{SCHEMA_VERSION}"
        )));
    }
    let mut data = data;
    if version < 2 {
        data = v1_to_v2(key, data);
    }
    Ok(data)
}

// ---------------------------------------------------------------------------
// v1 -> v2
// ---------------------------------------------------------------------------

fn v1_to_v2(key: &str, data: Value) -> Value {
    let Value::Array(items) = data else {
        return data;
    };
    let kind = slot_kind(key);
    let items = items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut obj) => {
                if !obj.contains_key("id") {
                    obj.insert("id".into(), json!(crate::list::generate_id()));
                }
                fill_defaults(kind, &mut obj);
                Value::Object(obj)
            }
            other => other,
        })
        .collect();
    Value::Array(items)
}

fn slot_kind(key: &str) -> &str {
    match paths::split_project_slot(key) {
        Some(("tasks", _)) => paths::TASKS_SLOT,
        Some(("resources", _)) => paths::RESOURCES_SLOT,
        Some(("reflections", _)) => paths::REFLECTIONS_SLOT,
        _ => key,
    }
}

fn fill(obj: &mut Map<String, Value>, field: &str, value: Value) {
    if !obj.contains_key(field) || obj[field].is_null() {
        obj.insert(field.to_string(), value);
    }
}

fn fill_defaults(kind: &str, obj: &mut Map<String, Value>) {
    match kind {
        paths::HABITS_SLOT => {
            fill(obj, "streak", json!(0));
            let streak = obj["streak"].clone();
            fill(obj, "bestStreak", streak);
            fill(obj, "completedDates", json!([]));
            fill(obj, "color", json!("blue"));
        }
        paths::RESOURCES_SLOT => {
            fill(obj, "type", json!("Note"));
            fill(obj, "tags", json!([]));
            fill(obj, "isPinned", json!(false));
            fill(obj, "createdAt", json!(0));
            if obj["type"] != json!("Link") {
                fill(obj, "content", json!(""));
            }
        }
        paths::PROJECTS_SLOT => {
            fill(obj, "description", json!(""));
            fill(obj, "status", json!("Planning"));
            fill(obj, "progress", json!(0));
            fill(obj, "taskCount", json!(0));
            fill(obj, "docCount", json!(0));
            fill(obj, "coverColor", json!("indigo"));
        }
        paths::CLIENTS_SLOT => {
            fill(obj, "company", json!(""));
            fill(obj, "status", json!("Lead"));
        }
        paths::TASKS_SLOT => {
            fill(obj, "status", json!("Todo"));
            fill(obj, "priority", json!("Medium"));
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
