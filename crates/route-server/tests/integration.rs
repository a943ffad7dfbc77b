use axum::http::StatusCode;
use http_body_util::BodyExt;
use route_core::config::Config;
use route_core::{Store, Workspace};
use route_server::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize a workspace on disk and build a state over it with no secrets.
fn workspace_state(dir: &TempDir) -> AppState {
    let (ws, _) = Workspace::init(dir.path(), "test-route").unwrap();
    AppState::from_parts(dir.path().to_path_buf(), ws.config, ws.store)
}

fn memory_state(config: Config) -> AppState {
    AppState::from_parts("/tmp/route-test".into(), config, Store::in_memory())
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slot_reads_seed_and_clear_reseeds() {
    let app = build_router(memory_state(Config::default()));

    let (status, view) = get(&app, "/api/slots/lifepath_clients").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["origin"], "seeded");
    assert_eq!(view["data"].as_array().unwrap().len(), 3);

    let (_, view) = get(&app, "/api/slots/lifepath_clients").await;
    assert_eq!(view["origin"], "stored");

    let (status, _) = send(&app, "PUT", "/api/slots/lifepath_clients", Some(json!([]))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, view) = get(&app, "/api/slots/lifepath_clients").await;
    assert_eq!(view["data"], json!([]));

    let (_, cleared) = send(&app, "DELETE", "/api/slots/lifepath_clients", None).await;
    assert_eq!(cleared["cleared"], true);
    let (_, view) = get(&app, "/api/slots/lifepath_clients").await;
    assert_eq!(view["origin"], "seeded");
}

#[tokio::test]
async fn bad_slot_key_is_400() {
    let app = build_router(memory_state(Config::default()));
    let (status, body) = send(&app, "PUT", "/api/slots/..%2Fescape", Some(json!(1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn put_slot_keeps_records_missing_optional_fields() {
    let app = build_router(memory_state(Config::default()));
    let body = json!([{"id": "c9", "name": "Jane", "email": "j@x.io", "status": "Lead"}]);
    let (status, _) = send(&app, "PUT", "/api/slots/lifepath_clients", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, clients) = get(&app, "/api/clients").await;
    assert_eq!(ids(&clients), vec!["c9"]);
    assert_eq!(clients[0]["company"], "");

    let (_, view) = get(&app, "/api/slots/lifepath_clients").await;
    assert_eq!(view["origin"], "stored");
    assert_eq!(view["data"][0]["name"], "Jane");
}

#[tokio::test]
async fn slot_listing_reflects_writes() {
    let dir = TempDir::new().unwrap();
    let app = build_router(workspace_state(&dir));
    let (status, keys) = get(&app, "/api/slots").await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = keys.as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert!(keys.contains(&"lifepath_roadmap"));
    assert!(!keys.contains(&"lifepath_user_name"));
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_crud_and_derived_view() {
    let app = build_router(memory_state(Config::default()));

    let (status, created) = send(
        &app,
        "POST",
        "/api/clients",
        Some(json!({"name": "Ada Park", "company": "Zed Co", "email": "ada@zed.co"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "Lead");
    let id = created["id"].as_str().unwrap().to_string();

    let (_, leads) = get(&app, "/api/clients?status=Lead&sort=name-asc").await;
    let names: Vec<&str> = leads
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada Park", "Marcus Webb"]);

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/clients/{id}"),
        Some(json!({"status": "Active"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Active");

    let (_, found) = get(&app, "/api/clients?search=zed").await;
    assert_eq!(ids(&found), vec![id.as_str()]);

    let (status, _) = send(&app, "DELETE", &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_validation_errors_are_400() {
    let app = build_router(memory_state(Config::default()));
    let (status, _) = send(
        &app,
        "POST",
        "/api/clients",
        Some(json!({"name": "  ", "email": "x@y.z"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/clients?status=Whale").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/api/clients?sort=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Habits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn habit_toggle_twice_restores_streak() {
    let app = build_router(memory_state(Config::default()));
    let uri = "/api/habits/habit-1/toggle";

    let (status, on) = send(&app, "POST", uri, Some(json!({"date": "2026-03-02"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(on["streak"], 1);
    assert_eq!(on["completedDates"], json!(["2026-03-02"]));

    let (_, off) = send(&app, "POST", uri, Some(json!({"date": "2026-03-02"}))).await;
    assert_eq!(off["streak"], 0);
    assert_eq!(off["bestStreak"], 1);
    assert_eq!(off["completedDates"], json!([]));

    let (status, today) = send(&app, "POST", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today["completedDates"].as_array().unwrap().len(), 1);

    let (_, board) = get(&app, "/api/habits").await;
    assert_eq!(board["doneToday"], 1);
    assert_eq!(board["total"], 3);
}

#[tokio::test]
async fn toggling_unknown_habit_is_404() {
    let app = build_router(memory_state(Config::default()));
    let (status, _) = send(&app, "POST", "/api/habits/nope/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pinned_resources_stay_on_top() {
    let app = build_router(memory_state(Config::default()));

    let (_, all) = get(&app, "/api/resources?sort=name-asc").await;
    assert_eq!(all[0]["isPinned"], true);

    let (status, link) = send(
        &app,
        "POST",
        "/api/resources",
        Some(json!({"title": "Aardvark notes", "type": "Link", "url": "https://a.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = link["id"].as_str().unwrap().to_string();
    send(&app, "POST", &format!("/api/resources/{id}/pin"), None).await;

    let (_, links) = get(&app, "/api/resources?type=Link&sort=name-desc").await;
    assert_eq!(ids(&links)[0], id);
    assert!(links.as_array().unwrap().iter().all(|r| r["type"] == "Link"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/resources",
        Some(json!({"title": "Broken", "type": "Link"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_progress_follows_task_status() {
    let dir = TempDir::new().unwrap();
    let app = build_router(workspace_state(&dir));

    let (_, project) = send(&app, "POST", "/api/projects", Some(json!({"title": "Launch"}))).await;
    let pid = project["id"].as_str().unwrap().to_string();
    let tasks_uri = format!("/api/projects/{pid}/tasks");

    send(&app, "POST", &tasks_uri, Some(json!({"title": "Write copy"}))).await;
    let (status, view) = send(&app, "POST", &tasks_uri, Some(json!({"title": "Ship"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["project"]["taskCount"], 2);
    assert_eq!(view["project"]["progress"], 0);

    let tid = view["tasks"][0]["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/projects/{pid}/tasks/{tid}/status");
    let (_, view) = send(&app, "POST", &status_uri, Some(json!({"status": "Done"}))).await;
    assert_eq!(view["project"]["progress"], 50);

    // Empty body cycles Done -> Todo.
    let (_, view) = send(&app, "POST", &status_uri, None).await;
    assert_eq!(view["tasks"][0]["status"], "Todo");
    assert_eq!(view["project"]["progress"], 0);

    let (status, _) = send(&app, "DELETE", &format!("/api/projects/{pid}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &tasks_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let tasks_slot = route_core::paths::project_tasks_slot(&pid);
    assert!(!route_core::paths::slot_path(dir.path(), &tasks_slot).exists());
}

#[tokio::test]
async fn mixed_case_project_ids_are_listed_and_tracked() {
    let app = build_router(memory_state(Config::default()));
    let projects = json!([{"id": "Proj-1", "title": "Launch", "status": "Active"}]);
    send(&app, "PUT", "/api/slots/lifepath_projects", Some(projects)).await;

    let (status, list) = get(&app, "/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec!["Proj-1"]);

    let (status, view) = send(
        &app,
        "POST",
        "/api/projects/Proj-1/tasks",
        Some(json!({"title": "Ship"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["project"]["taskCount"], 1);
}

#[tokio::test]
async fn tasks_for_unknown_project_are_404() {
    let app = build_router(memory_state(Config::default()));
    let (status, _) = send(
        &app,
        "POST",
        "/api/projects/ghost/tasks",
        Some(json!({"title": "Boo"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Roadmap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn roadmap_reorder_requires_every_id() {
    let app = build_router(memory_state(Config::default()));

    let (_, roadmap) = get(&app, "/api/roadmap").await;
    assert_eq!(roadmap["quarters"].as_array().unwrap().len(), 3);

    let order = json!({"order": ["milestone-3", "milestone-1", "milestone-2"]});
    let (status, roadmap) = send(&app, "PUT", "/api/roadmap/order", Some(order)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&roadmap["milestones"]), vec!["milestone-3", "milestone-1", "milestone-2"]);

    let partial = json!({"order": ["milestone-1"]});
    let (status, _) = send(&app, "PUT", "/api/roadmap/order", Some(partial)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Palette and access
// ---------------------------------------------------------------------------

#[tokio::test]
async fn palette_searches_across_categories() {
    let dir = TempDir::new().unwrap();
    let app = build_router(workspace_state(&dir));

    let (_, items) = get(&app, "/api/palette?q=sarah").await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "Client");

    let (_, first) = get(&app, "/api/palette").await;
    assert_eq!(first.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn palette_does_not_seed() {
    let app = build_router(memory_state(Config::default()));
    let (status, items) = get(&app, "/api/palette?q=a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn access_codes() {
    let app = build_router(memory_state(Config::default()));
    let founder100 = json!({"code": "founder100"});
    let (_, founder) = send(&app, "POST", "/api/access/check", Some(founder100)).await;
    assert_eq!(founder, json!({"grant": "founder", "granted": true}));
    let (_, denied) = send(&app, "POST", "/api/access/check", Some(json!({"code": "nope"}))).await;
    assert_eq!(denied["granted"], false);
    let (status, _) = send(&app, "POST", "/api/access/check", Some(json!({"code": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Companion proxy
// ---------------------------------------------------------------------------

fn companion_config(base: &str) -> Config {
    let mut cfg = Config::default();
    cfg.companion.base_url = base.to_string();
    cfg
}

#[tokio::test]
async fn chat_forwards_to_completion_api() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":[{"type":"text","text":"Call Sarah today."}]}"#)
        .create_async()
        .await;

    let state = memory_state(companion_config(&server.url())).with_companion_key("sk-test");
    let app = build_router(state);
    let body = json!({"messages": [{"role": "user", "content": "Who should I call?"}]});
    let (status, reply) = send(&app, "POST", "/api/chat", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["text"], "Call Sarah today.");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_failures_map_to_status_codes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body(r#"{"error":{"message":"boom"}}"#)
        .create_async()
        .await;

    let ask = json!({"messages": [{"role": "user", "content": "hi"}]});

    let no_key = build_router(memory_state(companion_config(&server.url())));
    let (status, _) = send(&no_key, "POST", "/api/chat", Some(ask.clone())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let app = build_router(memory_state(companion_config(&server.url())).with_companion_key("k"));
    let (status, body) = send(&app, "POST", "/api/chat", Some(ask)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("boom"));

    let blank = json!({"messages": [{"role": "user", "content": "   "}]});
    let (status, _) = send(&app, "POST", "/api/chat", Some(blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

fn billing_config(base: &str) -> Config {
    let mut cfg = Config::default();
    cfg.billing.stripe_base = base.to_string();
    cfg
}

#[tokio::test]
async fn checkout_returns_gateway_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/checkout/sessions")
        .match_header("authorization", "Bearer sk_test_123")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("mode".into(), "subscription".into()),
            mockito::Matcher::UrlEncoded("line_items[0][price]".into(), "price_pro_monthly".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"cs_1","url":"https://checkout.example/cs_1"}"#)
        .create_async()
        .await;

    let state = memory_state(billing_config(&server.url())).with_billing_secret("sk_test_123");
    let app = build_router(state);
    let body = json!({"planId": "pro", "priceId": "price_pro_monthly"});
    let (status, session) = send(&app, "POST", "/api/create-checkout-session", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["url"], "https://checkout.example/cs_1");
    mock.assert_async().await;
}

#[tokio::test]
async fn checkout_rejects_unknown_plans_and_reports_gateway_failures() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/checkout/sessions")
        .with_status(402)
        .with_body(r#"{"error":{"message":"card declined"}}"#)
        .create_async()
        .await;

    let app = build_router(memory_state(billing_config(&server.url())).with_billing_secret("sk"));

    let unknown = json!({"planId": "enterprise", "priceId": "price_x"});
    let (status, _) = send(&app, "POST", "/api/create-checkout-session", Some(unknown)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let pro = json!({"planId": "pro", "priceId": "price_pro_monthly"});
    let (status, body) =
        send(&app, "POST", "/api/create-checkout-session", Some(pro.clone())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("card declined"));

    let unconfigured = build_router(memory_state(billing_config(&server.url())));
    let (status, _) = send(&unconfigured, "POST", "/api/create-checkout-session", Some(pro)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
