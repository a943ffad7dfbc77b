use crate::error::{Result, RouteError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ROUTE_DIR: &str = ".route";
pub const SLOTS_DIR: &str = ".route/slots";
pub const CONFIG_FILE: &str = ".route/config.yaml";
pub const REDB_FILE: &str = ".route/slots.redb";

pub const SLOT_EXTENSION: &str = "json";

// ---------------------------------------------------------------------------
// Slot keys
// ---------------------------------------------------------------------------

pub const TASKS_SLOT: &str = "lifepath_tasks";
pub const PROJECTS_SLOT: &str = "lifepath_projects";
pub const CLIENTS_SLOT: &str = "lifepath_clients";
pub const RESOURCES_SLOT: &str = "lifepath_resources";
pub const HABITS_SLOT: &str = "lifepath_habits";
pub const NETWORK_SLOT: &str = "lifepath_network";
pub const PERFORMANCE_SLOT: &str = "lifepath_performance";
pub const ROADMAP_SLOT: &str = "lifepath_roadmap";
pub const SPENDING_SLOT: &str = "lifepath_spending";
pub const VENTURE_SLOT: &str = "lifepath_venture";
pub const REFLECTIONS_SLOT: &str = "lifepath_reflections";
pub const INSPIRATIONS_SLOT: &str = "lifepath_inspirations";
pub const USER_NAME_SLOT: &str = "lifepath_user_name";

const PROJECT_TASKS_PREFIX: &str = "lifepath_project_tasks_";
const PROJECT_RESOURCES_PREFIX: &str = "lifepath_project_resources_";
const PROJECT_REFLECTIONS_PREFIX: &str = "lifepath_project_reflections_";

/// Map a project id into the slot key alphabet. Lowercase letters, digits
/// and `-` pass through; every other byte becomes `_` plus two hex digits,
/// so generated ids keep their browser keys and distinct ids never share one.
pub fn encode_project_id(project_id: &str) -> String {
    let mut out = String::with_capacity(project_id.len());
    for b in project_id.bytes() {
        match b {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => out.push(char::from(b)),
            _ => out.push_str(&format!("_{b:02x}")),
        }
    }
    out
}

pub fn project_tasks_slot(project_id: &str) -> String {
    format!("{PROJECT_TASKS_PREFIX}{}", encode_project_id(project_id))
}

pub fn project_resources_slot(project_id: &str) -> String {
    format!("{PROJECT_RESOURCES_PREFIX}{}", encode_project_id(project_id))
}

pub fn project_reflections_slot(project_id: &str) -> String {
    format!("{PROJECT_REFLECTIONS_PREFIX}{}", encode_project_id(project_id))
}

/// All namespaced slots owned by one project.
pub fn project_slots(project_id: &str) -> [String; 3] {
    [
        project_tasks_slot(project_id),
        project_resources_slot(project_id),
        project_reflections_slot(project_id),
    ]
}

/// Strip a per-project prefix, returning `(kind, project_id)`.
pub fn split_project_slot(key: &str) -> Option<(&'static str, &str)> {
    [
        ("tasks", PROJECT_TASKS_PREFIX),
        ("resources", PROJECT_RESOURCES_PREFIX),
        ("reflections", PROJECT_REFLECTIONS_PREFIX),
    ]
    .into_iter()
    .find_map(|(kind, prefix)| key.strip_prefix(prefix).map(|id| (kind, id)))
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn route_dir(root: &Path) -> PathBuf {
    root.join(ROUTE_DIR)
}

pub fn slots_dir(root: &Path) -> PathBuf {
    root.join(SLOTS_DIR)
}

pub fn slot_path(root: &Path, key: &str) -> PathBuf {
    slots_dir(root).join(format!("{key}.{SLOT_EXTENSION}"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn redb_path(root: &Path) -> PathBuf {
    root.join(REDB_FILE)
}

// ---------------------------------------------------------------------------
// Slot key validation
// ---------------------------------------------------------------------------

static SLOT_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn slot_key_re() -> &'static Regex {
    SLOT_KEY_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_\-]*$").unwrap())
}

pub fn validate_slot_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > 128 || !slot_key_re().is_match(key) {
        return Err(RouteError::InvalidSlotKey(key.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slot_keys() {
        for key in [
            CLIENTS_SLOT,
            USER_NAME_SLOT,
            "lifepath_project_tasks_1712345678901-ab12cd34",
            "a",
        ] {
            validate_slot_key(key).unwrap_or_else(|_| panic!("expected valid: {key}"));
        }
        validate_slot_key(&project_tasks_slot("p1")).unwrap();
    }

    #[test]
    fn project_ids_are_encoded_into_valid_keys() {
        assert_eq!(
            project_tasks_slot("1712345678901-ab12cd34"),
            "lifepath_project_tasks_1712345678901-ab12cd34"
        );
        assert_eq!(encode_project_id("Proj-1"), "_50roj-1");
        assert_ne!(encode_project_id("Proj-1"), encode_project_id("proj-1"));
        assert_eq!(encode_project_id("a_b c"), "a_5fb_20c");
        for id in ["Proj-1", "ÜBER", "with space", "../up"] {
            for key in project_slots(id) {
                validate_slot_key(&key).unwrap_or_else(|_| panic!("expected valid: {key}"));
            }
        }
    }

    #[test]
    fn invalid_slot_keys() {
        for key in ["", "_leading", "has space", "UPPER", "../escape", "a/b", "a.json"] {
            assert!(validate_slot_key(key).is_err(), "expected invalid: {key}");
        }
        assert!(validate_slot_key(&"k".repeat(129)).is_err());
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.route/config.yaml")
        );
        assert_eq!(
            slot_path(root, CLIENTS_SLOT),
            PathBuf::from("/tmp/proj/.route/slots/lifepath_clients.json")
        );
        assert_eq!(redb_path(root), PathBuf::from("/tmp/proj/.route/slots.redb"));
    }

    #[test]
    fn project_slot_names_round_trip() {
        let key = project_resources_slot("p-42");
        assert_eq!(key, "lifepath_project_resources_p-42");
        assert_eq!(split_project_slot(&key), Some(("resources", "p-42")));
        assert_eq!(split_project_slot(CLIENTS_SLOT), None);
        assert_eq!(project_slots("x")[0], "lifepath_project_tasks_x");
    }
}
