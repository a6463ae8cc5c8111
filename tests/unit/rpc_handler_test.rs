//! Unit tests for the JSON-RPC method handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cobrowse::app::App;
use cobrowse::managers::session_registry::SessionRegistryTrait;
use cobrowse::managers::session_store::SessionStoreTrait;
use cobrowse::rpc_events::{EventForwarders, SESSION_UPDATED};
use cobrowse::rpc_handler::handle_method;
use cobrowse::services::advisory_service::AdvisoryService;
use cobrowse::types::advisory::{AdvisoryRequest, AdvisoryResponse};
use cobrowse::types::config::SimulatorConfig;
use cobrowse::types::errors::AdvisoryError;
use cobrowse::types::session::SessionId;
use serde_json::{json, Value};
use tokio::sync::mpsc;

struct EchoService;

#[async_trait]
impl AdvisoryService for EchoService {
    async fn generate(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        if request.prompt_text.contains("\"PROFILE\" page") {
            Ok(AdvisoryResponse {
                text: "Ask them to fill in the email field.".to_string(),
            })
        } else {
            Ok(AdvisoryResponse { text: "Point at the menu.".to_string() })
        }
    }
}

fn app() -> App {
    app_with(SimulatorConfig::default())
}

fn app_with(config: SimulatorConfig) -> App {
    App::with_service(config, Arc::new(EchoService))
}

async fn create(app: &App) -> String {
    let created = handle_method(app, "session.create", &json!({})).await.unwrap();
    created["session_id"].as_str().unwrap().to_string()
}

async fn call(app: &App, method: &str, params: Value) -> Value {
    handle_method(app, method, &params).await.unwrap()
}

#[tokio::test]
async fn test_ping() {
    let app = app();
    assert_eq!(call(&app, "ping", json!({})).await, json!({"pong": true}));
}

#[tokio::test]
async fn test_unknown_method() {
    let app = app();
    let err = handle_method(&app, "user.fly", &json!({})).await.unwrap_err();
    assert_eq!(err, "unknown method: user.fly");
}

#[tokio::test]
async fn test_session_create_returns_initial_state() {
    let app = app();
    let created = call(&app, "session.create", json!({})).await;
    assert_eq!(created["revision"], json!(0));
    assert_eq!(created["cue_phase"], json!("idle"));
    assert_eq!(created["user"], json!("John Doe"));
    assert_eq!(created["device"], json!("iPhone SE"));
    assert_eq!(created["state"]["route"], json!("DASHBOARD"));
    assert_eq!(created["state"]["formState"]["notifications"], json!(true));
    assert_eq!(created["state"]["scrollPosition"], json!(0.0));
    assert_eq!(created["state"]["cueActive"], json!(false));
}

#[tokio::test]
async fn test_session_list_and_end() {
    let app = app();
    let first = create(&app).await;
    let second = create(&app).await;
    let listed = call(&app, "session.list", json!({})).await;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["session_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert!(listed[0]["created_at"].as_i64().unwrap() > 0);

    call(&app, "session.end", json!({"session_id": first})).await;
    let listed = call(&app, "session.list", json!({})).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["session_id"], json!(second));

    let err = handle_method(&app, "session.state", &json!({"session_id": first}))
        .await
        .unwrap_err();
    assert!(err.starts_with("Session not initialized"));
}

#[tokio::test]
async fn test_missing_and_invalid_session_id() {
    let app = app();
    let err = handle_method(&app, "session.state", &json!({})).await.unwrap_err();
    assert_eq!(err, "missing session_id");

    let err = handle_method(&app, "session.state", &json!({"session_id": "abc"}))
        .await
        .unwrap_err();
    assert!(err.starts_with("invalid session_id"));
}

#[tokio::test]
async fn test_user_writes_update_state() {
    let app = app();
    let id = create(&app).await;

    let navigated = call(&app, "user.navigate", json!({"session_id": id, "route": "profile"})).await;
    assert_eq!(navigated["state"]["route"], json!("PROFILE"));
    assert_eq!(navigated["revision"], json!(1));

    let edited = call(
        &app,
        "user.set_field",
        json!({"session_id": id, "key": "fullName", "value": "Ada"}),
    )
    .await;
    assert_eq!(edited["state"]["formState"]["fullName"], json!("Ada"));

    let toggled = call(
        &app,
        "user.toggle_field",
        json!({"session_id": id, "key": "notifications"}),
    )
    .await;
    assert_eq!(toggled, json!({"key": "notifications", "value": false}));

    let scrolled = call(&app, "user.scroll", json!({"session_id": id, "position": 240.0})).await;
    assert_eq!(scrolled["state"]["scrollPosition"], json!(240.0));
    assert_eq!(scrolled["revision"], json!(4));
}

#[tokio::test]
async fn test_user_write_rejects_bad_params() {
    let app = app();
    let id = create(&app).await;

    let err = handle_method(&app, "user.navigate", &json!({"session_id": id, "route": "home"}))
        .await
        .unwrap_err();
    assert!(err.contains("home"));

    let err = handle_method(
        &app,
        "user.set_field",
        &json!({"session_id": id, "key": "email", "value": 7}),
    )
    .await
    .unwrap_err();
    assert_eq!(err, "value must be a string or boolean");

    let err = handle_method(&app, "user.scroll", &json!({"session_id": id}))
        .await
        .unwrap_err();
    assert_eq!(err, "missing position");
}

#[tokio::test(start_paused = true)]
async fn test_admin_cue_expires() {
    let app = app();
    let id = create(&app).await;

    let cued = call(&app, "admin.cue", json!({"session_id": id, "x": 50.0, "y": 25.0})).await;
    assert_eq!(cued["coordinate"], json!({"x": 50.0, "y": 25.0}));
    assert_eq!(cued["cue_phase"], json!("active"));

    tokio::time::sleep(Duration::from_millis(5001)).await;

    let state = call(&app, "session.state", json!({"session_id": id})).await;
    assert_eq!(state["cue_phase"], json!("idle"));
    assert_eq!(state["state"]["cueActive"], json!(false));
}

#[tokio::test(start_paused = true)]
async fn test_admin_cue_click_maps_pointer() {
    let app = app();
    let id = create(&app).await;

    let cued = call(
        &app,
        "admin.cue_click",
        json!({
            "session_id": id,
            "offset_x": 100.0,
            "offset_y": 100.0,
            "surface_width": 200.0,
            "surface_height": 400.0
        }),
    )
    .await;
    assert_eq!(cued["coordinate"], json!({"x": 50.0, "y": 25.0}));

    let err = handle_method(
        &app,
        "admin.cue_click",
        &json!({
            "session_id": id,
            "offset_x": 1.0,
            "offset_y": 1.0,
            "surface_width": 0.0,
            "surface_height": 400.0
        }),
    )
    .await
    .unwrap_err();
    assert!(err.starts_with("Invalid surface dimensions"));
}

#[tokio::test(start_paused = true)]
async fn test_view_frames_per_role() {
    let app = app();
    let id = create(&app).await;
    call(&app, "user.scroll", json!({"session_id": id, "position": 120.0})).await;
    call(&app, "admin.cue", json!({"session_id": id, "x": 50.0, "y": 50.0})).await;

    let user = call(
        &app,
        "view.frame",
        json!({"session_id": id, "role": "user", "surface_width": 400.0, "surface_height": 800.0}),
    )
    .await;
    assert_eq!(user["interactive"], json!(true));
    assert_eq!(user["scroll_offset"], json!(120.0));
    assert_eq!(user["cue_pixels"], json!([200.0, 400.0]));

    let admin = call(
        &app,
        "view.frame",
        json!({"session_id": id, "role": "admin", "surface_width": 200.0, "surface_height": 400.0}),
    )
    .await;
    assert_eq!(admin["interactive"], json!(false));
    assert_eq!(admin["scroll_offset"], json!(120.0));
    assert_eq!(admin["cue_pixels"], json!([100.0, 200.0]));

    let err = handle_method(&app, "view.frame", &json!({"session_id": id, "role": "guest"}))
        .await
        .unwrap_err();
    assert!(err.contains("guest"));
}

#[tokio::test]
async fn test_view_frame_defaults_to_reference_surface() {
    let app = app();
    let id = create(&app).await;
    call(&app, "admin.cue", json!({"session_id": id, "x": 100.0, "y": 100.0})).await;

    let user = call(&app, "view.frame", json!({"session_id": id, "role": "user"})).await;
    assert_eq!(user["cue_pixels"], json!([375.0, 667.0]));
}

#[tokio::test]
async fn test_advice_request_records_transcript() {
    let app = app();
    let id = create(&app).await;
    call(&app, "user.navigate", json!({"session_id": id, "route": "PROFILE"})).await;

    let advice = call(
        &app,
        "advice.request",
        json!({"session_id": id, "query": "What next?"}),
    )
    .await;
    assert_eq!(advice, json!({"advice": "Ask them to fill in the email field."}));

    let transcript = call(&app, "advice.transcript", json!({"session_id": id})).await;
    let entries = transcript.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["role"], json!("admin"));
    assert_eq!(entries[0]["text"], json!("What next?"));
    assert_eq!(entries[1]["role"], json!("system"));
    assert_eq!(entries[1]["text"], json!("Ask them to fill in the email field."));
}

#[tokio::test]
async fn test_advice_request_blank_query_uses_default() {
    let app = app();
    let id = create(&app).await;

    let advice = call(&app, "advice.request", json!({"session_id": id})).await;
    assert_eq!(advice["advice"], json!("Point at the menu."));

    let transcript = call(&app, "advice.transcript", json!({"session_id": id})).await;
    assert_eq!(transcript[0]["text"], json!("How do I help the user?"));
}

#[tokio::test]
async fn test_advice_request_does_not_touch_state() {
    let app = app();
    let id = create(&app).await;
    call(&app, "advice.request", json!({"session_id": id, "query": "hi"})).await;

    let state = call(&app, "session.state", json!({"session_id": id})).await;
    assert_eq!(state["revision"], json!(0));
}

#[tokio::test]
async fn test_config_get() {
    let app = app();
    let config = call(&app, "config.get", json!({})).await;
    assert_eq!(config["cue"]["duration_ms"], json!(5000));
    assert_eq!(config["surface"]["device_name"], json!("iPhone SE"));
}

// ─── Event streams ───

/// Creates a session through the handler and starts its event stream.
async fn create_streamed(
    app: &App,
    forwarders: &mut EventForwarders,
    out: &mpsc::UnboundedSender<Value>,
) -> String {
    let created = call(app, "session.create", json!({})).await;
    forwarders.track(app, "session.create", &json!({}), &created, out);
    created["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_event_stream_follows_mutation_order() {
    let app = app();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut forwarders = EventForwarders::new();
    let id = create_streamed(&app, &mut forwarders, &tx).await;

    call(&app, "user.navigate", json!({"session_id": id, "route": "PROFILE"})).await;
    call(&app, "user.set_field", json!({"session_id": id, "key": "fullName", "value": "Ada"})).await;
    call(&app, "user.toggle_field", json!({"session_id": id, "key": "notifications"})).await;
    call(&app, "user.scroll", json!({"session_id": id, "position": 80.0})).await;

    let mut lines = Vec::new();
    for _ in 0..4 {
        lines.push(rx.recv().await.unwrap());
    }
    for line in &lines {
        assert_eq!(line["event"], json!(SESSION_UPDATED));
        assert_eq!(line["session_id"], json!(id));
    }
    let revisions: Vec<u64> = lines.iter().map(|l| l["revision"].as_u64().unwrap()).collect();
    assert_eq!(revisions, vec![1, 2, 3, 4]);
    assert_eq!(lines[0]["state"]["route"], json!("PROFILE"));
    assert_eq!(lines[1]["state"]["formState"]["fullName"], json!("Ada"));
    assert_eq!(lines[2]["state"]["formState"]["notifications"], json!(false));
    assert_eq!(lines[3]["state"]["scrollPosition"], json!(80.0));

    forwarders.stop_all();
}

#[tokio::test]
async fn test_lagging_event_stream_resyncs_with_latest_snapshot() {
    let mut config = SimulatorConfig::default();
    config.session.event_buffer = 1;
    let app = app_with(config);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut forwarders = EventForwarders::new();
    let id = create_streamed(&app, &mut forwarders, &tx).await;

    // The forwarder has not run yet, so it falls behind the one-slot buffer.
    for position in [10.0, 20.0, 30.0] {
        call(&app, "user.scroll", json!({"session_id": id, "position": position})).await;
    }

    let first = rx.recv().await.unwrap();
    assert_eq!(first["event"], json!(SESSION_UPDATED));
    assert_eq!(first["revision"], json!(3));
    assert_eq!(first["state"]["scrollPosition"], json!(30.0));

    forwarders.stop_all();
}

#[tokio::test]
async fn test_session_end_stops_event_stream() {
    let app = app();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut forwarders = EventForwarders::new();
    let id = create_streamed(&app, &mut forwarders, &tx).await;
    let session_id: SessionId = id.parse().unwrap();
    assert!(forwarders.is_running(&session_id));

    let handle = app.registry.get_session(&session_id).unwrap();
    let params = json!({"session_id": id});
    let ended = call(&app, "session.end", params.clone()).await;
    forwarders.track(&app, "session.end", &params, &ended, &tx);
    drop(tx);

    assert!(!forwarders.is_running(&session_id));
    handle.store.set_scroll_position(50.0);

    // Only the stopped forwarder held another sender, so the channel closes
    // without delivering the late change.
    let next = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
    assert!(next.is_none());
    assert_eq!(handle.store.subscriber_count(), 0);
}

#[tokio::test]
async fn test_stream_for_unknown_session_is_not_started() {
    let app = app();
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut forwarders = EventForwarders::new();
    let missing = SessionId::new();
    assert!(!forwarders.start(&app, missing, tx));
    assert!(!forwarders.is_running(&missing));
    assert!(!forwarders.stop(&missing));
}
