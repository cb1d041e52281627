use std::sync::Arc;

use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use setdesk_core::collab::OktaGroups;
use setdesk_core::testing::{
    computer, employee, manual_setting, FixedPassword, RecordingIdentity, RecordingMessenger,
};
use setdesk_core::types::{ActionKind, ActionStatus, ComputerStatus, OnboardingType};
use setdesk_core::{Executor, MemoryStore, RecordStore};
use setdesk_server::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct TestApp {
    store: Arc<MemoryStore>,
    identity: Arc<RecordingIdentity>,
    messenger: Arc<RecordingMessenger>,
    state: AppState,
}

impl TestApp {
    fn router(&self) -> axum::Router {
        setdesk_server::build_router(self.state.clone())
    }
}

fn test_app(api_token: Option<&str>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(RecordingIdentity::new());
    let messenger = Arc::new(RecordingMessenger::new());
    let executor = Executor::new(
        store.clone(),
        identity.clone(),
        messenger.clone(),
        Arc::new(FixedPassword("AAAAA-11111-22222".into())),
        OktaGroups::default(),
    );
    let state = AppState::new(Arc::new(executor), api_token.map(str::to_string));
    TestApp {
        store,
        identity,
        messenger,
        state,
    }
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut req = axum::http::Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => req.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, None).await
}

async fn patch_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, Some(body), None).await
}

fn new_setting_body() -> serde_json::Value {
    json!({
        "user_name": "Kim",
        "user_email": "kim@example.com",
        "os": "Windows",
        "model": "ThinkPad X1",
        "serial": "SN-100",
        "device_type": "EDP002",
        "network_type": "sec",
        "urgency": true,
        "onboarding_type": "new",
        "status": "pending",
        "company": "core"
    })
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_setting() {
    let app = test_app(None);
    app.store.put_employee(&employee("kim@example.com")).unwrap();

    let (status, body) = send(
        app.router(),
        "POST",
        "/api/settings",
        Some(new_setting_body()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = get(app.router(), &format!("/api/settings/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serial"], "SN-100");
    assert_eq!(body["is_manual"], true);

    let actions = body["quick_actions"].as_array().unwrap();
    assert_eq!(actions.len(), 6);
    let kinds: Vec<&str> = actions
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "okta-setting",
            "win-setting",
            "o365-intune",
            "password-notice",
            "pickup-notice",
            "okta-activate"
        ]
    );
    assert_eq!(actions[1]["status"], "pending");
    assert_eq!(actions[5]["status"], "not-applicable");
}

#[tokio::test]
async fn create_with_unknown_employee_is_404() {
    let app = test_app(None);
    let (status, body) = send(
        app.router(),
        "POST",
        "/api/settings",
        Some(new_setting_body()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("kim@example.com"));
}

#[tokio::test]
async fn get_missing_setting_is_404() {
    let app = test_app(None);
    let (status, body) = get(app.router(), "/api/settings/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = test_app(None);
    let a = manual_setting("a@example.com", OnboardingType::New, "macOS");
    let mut b = manual_setting("b@example.com", OnboardingType::New, "macOS");
    b.status = setdesk_core::types::SettingStatus::Shipped;
    app.store.put_setting(&a).unwrap();
    app.store.put_setting(&b).unwrap();

    let (status, body) = get(app.router(), "/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = get(app.router(), "/api/settings?status=shipped").await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], b.id);
}

#[tokio::test]
async fn delete_setting_then_404() {
    let app = test_app(None);
    let s = manual_setting("kim@example.com", OnboardingType::New, "macOS");
    app.store.put_setting(&s).unwrap();
    let uri = format!("/api/settings/{}", s.id);

    let (status, body) = send(app.router(), "DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "deleted");

    let (status, _) = send(app.router(), "DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_update_regenerates_and_completes() {
    let app = test_app(None);
    app.store.put_employee(&employee("kim@example.com")).unwrap();
    let c = computer("SN-7", "kim@example.com", "macOS");
    app.store.put_computer(&c).unwrap();
    let derived = setdesk_core::Setting::from_computer(
        &c,
        setdesk_core::types::Role::Team,
        setdesk_core::types::Company::Core,
        OnboardingType::Pending,
        setdesk_core::types::SettingStatus::Setting,
    );
    app.store.put_setting(&derived).unwrap();

    let (status, body) = patch_json(
        app.router(),
        "/api/settings",
        json!({
            "updates": [
                { "id": derived.id, "data": { "onboarding_type": "replace", "status": "completed" } },
                { "id": "ghost", "data": { "memo": "x" } },
                { "data": { "memo": "no id" } }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requested_count"], 3);
    assert_eq!(body["updated_count"], 1);
    assert_eq!(body["results"][1]["reason"], "not_found");

    let saved = app.store.get_setting(&derived.id).unwrap().unwrap();
    assert_eq!(
        saved.quick_actions.get(ActionKind::PickupNotice).status(),
        ActionStatus::Pending
    );
    assert_eq!(
        app.store.get_computer("SN-7").unwrap().unwrap().status,
        ComputerStatus::Use
    );
}

// ---------------------------------------------------------------------------
// Quick actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_action_reports_counts() {
    let app = test_app(None);
    for email in ["done@example.com", "fresh@example.com"] {
        app.store.put_employee(&employee(email)).unwrap();
    }
    let mut done = manual_setting("done@example.com", OnboardingType::New, "macOS");
    let qa = done.quick_actions.get_mut(ActionKind::OktaSetting);
    qa.begin("earlier", chrono::Utc::now());
    qa.succeed();
    let fresh = manual_setting("fresh@example.com", OnboardingType::New, "macOS");
    app.store.put_setting(&done).unwrap();
    app.store.put_setting(&fresh).unwrap();

    let (status, body) = patch_json(
        app.router(),
        "/api/settings/action/okta-setting",
        json!({
            "setting_ids": ["missing", done.id, fresh.id],
            "requested_by": "it-admin"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "failed": ["done"], "failed_count": 1, "success_count": 1 })
    );
    assert_eq!(app.identity.calls().len(), 2);

    let saved = app.store.get_setting(&fresh.id).unwrap().unwrap();
    let qa = saved.quick_actions.get(ActionKind::OktaSetting);
    assert_eq!(qa.status(), ActionStatus::Done);
    assert_eq!(qa.requested_by(), Some("it-admin"));
}

#[tokio::test]
async fn notice_action_sends_messages() {
    let app = test_app(None);
    app.store.put_employee(&employee("kim@example.com")).unwrap();
    let s = manual_setting("kim@example.com", OnboardingType::Replace, "macOS");
    app.store.put_setting(&s).unwrap();

    let (status, body) = patch_json(
        app.router(),
        "/api/settings/action/pickup-notice",
        json!({ "setting_ids": [s.id], "requested_by": "it-admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 1);
    assert_eq!(app.messenger.sent().len(), 2);
}

#[tokio::test]
async fn not_applicable_action_counts_as_failed() {
    let app = test_app(None);
    app.store.put_employee(&employee("kim@example.com")).unwrap();
    let s = manual_setting("kim@example.com", OnboardingType::New, "macOS");
    app.store.put_setting(&s).unwrap();

    let (_, body) = patch_json(
        app.router(),
        "/api/settings/action/okta-activate",
        json!({ "setting_ids": [s.id], "requested_by": "it-admin" }),
    )
    .await;
    assert_eq!(body["failed_count"], 1);
    assert_eq!(body["success_count"], 0);

    let saved = app.store.get_setting(&s.id).unwrap().unwrap();
    let qa = saved.quick_actions.get(ActionKind::OktaActivate);
    assert_eq!(qa.status(), ActionStatus::NotApplicable);
    assert!(qa.error_message().is_some());
}

#[tokio::test]
async fn unknown_action_kind_is_400() {
    let app = test_app(None);
    let (status, body) = patch_json(
        app.router(),
        "/api/settings/action/reboot",
        json!({ "setting_ids": ["x"], "requested_by": "it-admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("reboot"));
}

#[tokio::test]
async fn empty_setting_ids_is_400() {
    let app = test_app(None);
    let (status, _) = patch_json(
        app.router(),
        "/api/settings/action/okta-setting",
        json!({ "setting_ids": [], "requested_by": "it-admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_actor_is_400() {
    let app = test_app(None);
    let (status, _) = patch_json(
        app.router(),
        "/api/settings/action/okta-setting",
        json!({ "setting_ids": ["x"], "requested_by": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_required_when_configured() {
    let app = test_app(Some("s3cret"));

    let (status, body) = send(app.router(), "GET", "/api/settings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(app.router(), "GET", "/api/settings", None, Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(app.router(), "GET", "/api/settings", None, Some("s3creT")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(app.router(), "GET", "/api/settings", None, Some("s3cret2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(app.router(), "GET", "/api/settings", None, Some("s3cret")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app(Some("s3cret"));
    let (status, body) = get(app.router(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
