#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn route(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("route").unwrap();
    cmd.current_dir(dir.path())
        .env("ROUTE_ROOT", dir.path())
        .env_remove("ROUTE_SERVER")
        .env_remove("RUST_LOG");
    cmd
}

fn init(dir: &TempDir) {
    route(dir).arg("init").assert().success();
}

/// Run with `--json` and parse stdout.
fn json(dir: &TempDir, args: &[&str]) -> Value {
    let out = route(dir).arg("--json").args(args).assert().success();
    serde_json::from_slice(&out.get_output().stdout).unwrap()
}

// ---------------------------------------------------------------------------
// route init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_seeds_slots() {
    let dir = TempDir::new().unwrap();
    route(&dir)
        .args(["init", "--name", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .route/config.yaml"))
        .stdout(predicate::str::contains("seeded:  lifepath_clients"));

    assert!(dir.path().join(".route/config.yaml").exists());
    assert!(dir.path().join(".route/slots/lifepath_roadmap.json").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .route/config.yaml"))
        .stdout(predicate::str::contains("seeded:").not());
}

// ---------------------------------------------------------------------------
// route client
// ---------------------------------------------------------------------------

#[test]
fn client_add_then_list() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    std::fs::write(
        dir.path().join(".route/slots/lifepath_clients.json"),
        r#"{"version":2,"data":[]}"#,
    )
    .unwrap();

    let created = json(
        &dir,
        &[
            "client", "add", "John Doe", "--company", "Acme", "--email", "john@acme.com",
            "--status", "Lead",
        ],
    );
    assert!(!created["id"].as_str().unwrap().is_empty());

    let list = json(&dir, &["client", "list"]);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["status"], "Lead");
    assert_eq!(list[0]["name"], "John Doe");
}

#[test]
fn client_validation_fails_with_message() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .args(["client", "add", "Nobody", "--email", "not-an-email"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));

    route(&dir)
        .args(["client", "remove", "missing-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing-id"));
}

#[test]
fn client_list_filters_by_status() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .args(["client", "list", "--status", "Partner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Priya Natarajan"))
        .stdout(predicate::str::contains("Sarah Chen").not());
}

// ---------------------------------------------------------------------------
// route habit
// ---------------------------------------------------------------------------

#[test]
fn habit_toggle_twice_restores_streak() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let on = json(&dir, &["habit", "toggle", "habit-2", "--date", "2026-05-01"]);
    assert_eq!(on["streak"], 1);
    let off = json(&dir, &["habit", "toggle", "habit-2", "--date", "2026-05-01"]);
    assert_eq!(off["streak"], 0);
    assert_eq!(off["completedDates"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// route project / task
// ---------------------------------------------------------------------------

#[test]
fn project_tasks_drive_progress() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let project = json(&dir, &["project", "add", "Launch"]);
    let pid = project["id"].as_str().unwrap().to_string();

    let task = json(&dir, &["task", "add", "Write", "copy", "--project", &pid]);
    let tid = task["id"].as_str().unwrap().to_string();
    json(&dir, &["task", "add", "Ship", "--project", &pid]);
    json(&dir, &["task", "status", &tid, "Done", "--project", &pid]);

    let shown = json(&dir, &["project", "show", &pid]);
    assert_eq!(shown["project"]["progress"], 50);
    assert_eq!(shown["project"]["taskCount"], 2);

    route(&dir)
        .args(["project", "remove", &pid])
        .assert()
        .success();
    assert!(!dir
        .path()
        .join(format!(".route/slots/lifepath_project_tasks_{pid}.json"))
        .exists());
}

#[test]
fn task_status_without_value_cycles() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let task = json(&dir, &["task", "add", "Call", "Sarah"]);
    let tid = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["status"], "Todo");
    assert_eq!(json(&dir, &["task", "status", &tid])["status"], "InProgress");
    assert_eq!(json(&dir, &["task", "status", &tid])["status"], "Done");
    assert_eq!(json(&dir, &["task", "status", &tid])["status"], "Todo");
}

// ---------------------------------------------------------------------------
// route roadmap / kpi / spend
// ---------------------------------------------------------------------------

#[test]
fn roadmap_move_reorders() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let moved = json(&dir, &["roadmap", "move", "milestone-3", "1"]);
    let ids: Vec<&str> = moved
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["milestone-3", "milestone-1", "milestone-2"]);
}

#[test]
fn kpi_numbers_parse_leniently() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    let kpi = json(&dir, &["kpi", "add", "MRR", "--value", "abc", "--target", "1,000"]);
    assert_eq!(kpi["value"], 0.0);
    assert_eq!(kpi["target"], 1000.0);
}

#[test]
fn spend_summary_nets_income_and_expense() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    std::fs::write(
        dir.path().join(".route/slots/lifepath_spending.json"),
        r#"{"version":2,"data":[]}"#,
    )
    .unwrap();
    json(&dir, &["spend", "add", "Invoice", "--amount", "500", "--kind", "Income"]);
    json(&dir, &["spend", "add", "Hosting", "--amount", "120"]);
    let s = json(&dir, &["spend", "summary"]);
    assert_eq!(s["income"], 500.0);
    assert_eq!(s["expense"], 120.0);
    assert_eq!(s["net"], 380.0);
}

// ---------------------------------------------------------------------------
// route search / access / slot / config
// ---------------------------------------------------------------------------

#[test]
fn search_spans_categories() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .args(["search", "northwind"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Client"))
        .stdout(predicate::str::contains("Sarah Chen"));
}

#[test]
fn access_codes() {
    let dir = TempDir::new().unwrap();
    route(&dir)
        .args(["access", "founder100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Founder plan"));
    route(&dir)
        .args(["access", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not recognized"));
}

#[test]
fn slot_export_then_import() {
    let src = TempDir::new().unwrap();
    init(&src);
    let dump = src.path().join("dump.json");
    route(&src)
        .args(["slot", "export", "--out", dump.to_str().unwrap()])
        .assert()
        .success();

    let dst = TempDir::new().unwrap();
    route(&dst)
        .args(["slot", "import", dump.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 12 slots"));
    let roadmap = json(&dst, &["slot", "show", "lifepath_roadmap"]);
    assert_eq!(roadmap["origin"], "stored");
}

#[test]
fn bad_slot_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    route(&dir)
        .args(["slot", "show", "Bad Key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bad Key"));
}

#[test]
fn config_validate_passes_on_defaults() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config OK"));
}

// ---------------------------------------------------------------------------
// route chat
// ---------------------------------------------------------------------------

#[test]
fn chat_without_key_fails() {
    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .env_remove("ANTHROPIC_API_KEY")
        .args(["chat", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn chat_through_running_server() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(r#"{"text":"Follow up with Marcus."}"#)
        .create();

    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .args(["chat", "who", "next?", "--server", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Follow up with Marcus."));
}

#[test]
fn chat_server_failure_prints_apology() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/chat")
        .with_status(502)
        .with_body(r#"{"error":"upstream down"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    init(&dir);
    route(&dir)
        .args(["chat", "hi", "--server", &server.url()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("having trouble connecting"))
        .stderr(predicate::str::contains("upstream down"));
}
