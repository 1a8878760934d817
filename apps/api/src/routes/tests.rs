use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::accounts::session::SessionStore;
use crate::export::PdfRenderer;
use crate::llm_client::{ChatModel, LlmError};
use crate::routes::build_router;
use crate::state::AppState;
use crate::testing::{
    sample_profile, test_state, EchoModel, FailingModel, MemorySessionStore, MemoryUserStore,
};

/// Echoes the prompt, but destroys `token`'s session while answering.
struct LogoutMidCall {
    sessions: Arc<MemorySessionStore>,
    token: Mutex<Option<Uuid>>,
}

#[async_trait]
impl ChatModel for LogoutMidCall {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        let token = *self.token.lock().unwrap();
        if let Some(token) = token {
            self.sessions.destroy(token).await.unwrap();
        }
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

fn app(model: Arc<dyn ChatModel>) -> Router {
    build_router(test_state(model))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    Reply { status, headers, body }
}

async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let reply = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);

    let reply = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.json()["token"].as_str().unwrap().to_string()
}

async fn save_sample_profile(app: &Router, token: &str) {
    let body = serde_json::to_value(sample_profile()).unwrap();
    let reply = send(app, "PUT", "/api/v1/profile", Some(token), Some(body)).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_model() {
    let app = app(Arc::new(EchoModel));
    let reply = send(&app, "GET", "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "ok");
    assert_eq!(reply.json()["model"], "echo");
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = app(Arc::new(EchoModel));
    let body = json!({"username": "ada", "password": "analytical-engine"});

    let first = send(&app, "POST", "/api/v1/auth/register", None, Some(body.clone())).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = send(&app, "POST", "/api/v1/auth/register", None, Some(body)).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.json()["error"]["code"], "DUPLICATE_USER");
}

#[tokio::test]
async fn test_mismatched_confirmation_is_rejected() {
    let app = app(Arc::new(EchoModel));
    let reply = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({"username": "ada", "password": "a", "confirm_password": "b"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = app(Arc::new(EchoModel));
    register_and_login(&app, "ada", "analytical-engine").await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "ada", "password": "difference-engine"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json()["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = app(Arc::new(EchoModel));
    let reply = send(&app, "GET", "/api/v1/profile", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, "GET", "/api/v1/documents", Some("not-a-token"), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_new_user_has_empty_profile() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "grace", "pw").await;

    let reply = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["personal_info"]["full_name"], "");
    assert_eq!(reply.json()["experience"], json!([]));
}

#[tokio::test]
async fn test_profile_survives_relogin() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;
    save_sample_profile(&app, &token).await;

    send(&app, "POST", "/api/v1/auth/logout", Some(&token), None).await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "ada", "password": "pw"})),
    )
    .await;
    let expected = serde_json::to_value(sample_profile()).unwrap();
    assert_eq!(reply.json()["profile"], expected);
}

#[tokio::test]
async fn test_invalid_profile_is_not_saved() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;

    let mut profile = sample_profile();
    profile.personal_info.email = "not-an-email".to_string();
    let body = serde_json::to_value(profile).unwrap();
    let reply = send(&app, "PUT", "/api/v1/profile", Some(&token), Some(body)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;
    assert_eq!(reply.json()["personal_info"]["full_name"], "");
}

#[tokio::test]
async fn test_generated_resume_mentions_profile() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;
    save_sample_profile(&app, &token).await;

    let reply = send(&app, "POST", "/api/v1/documents/resume", Some(&token), Some(json!({}))).await;
    assert_eq!(reply.status, StatusCode::OK);
    let doc = reply.json();
    assert_eq!(doc["kind"], "resume");
    assert_eq!(doc["model"], "echo");
    let content = doc["content"].as_str().unwrap();
    assert!(content.contains("Ada Lovelace"));
    assert!(content.contains("C++"));
}

#[tokio::test]
async fn test_regenerating_replaces_session_document() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;
    save_sample_profile(&app, &token).await;

    send(&app, "POST", "/api/v1/documents/resume", Some(&token), Some(json!({}))).await;
    send(
        &app,
        "POST",
        "/api/v1/documents/resume",
        Some(&token),
        Some(json!({"style": "minimalist"})),
    )
    .await;

    let reply = send(&app, "GET", "/api/v1/documents", Some(&token), None).await;
    let docs = reply.json();
    assert_eq!(docs.as_array().unwrap().len(), 1);
    assert!(docs[0]["content"]
        .as_str()
        .unwrap()
        .contains("Resume style: Minimalist"));

    let reply = send(&app, "GET", "/api/v1/documents/resume", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), docs[0]);
}

#[tokio::test]
async fn test_cover_letter_without_job_fields_is_bad_request() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;
    save_sample_profile(&app, &token).await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/documents/cover-letter",
        Some(&token),
        Some(json!({"company": "Acme", "job_title": "", "job_description": ""})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(
        &app,
        "POST",
        "/api/v1/documents/cover-letter",
        Some(&token),
        Some(json!({"company": "Acme"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_markdown_is_stable() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;
    send(
        &app,
        "POST",
        "/api/v1/documents/achievement-statement",
        Some(&token),
        Some(json!({"text": "Responsible for databases"})),
    )
    .await;

    let uri = "/api/v1/documents/achievement-statement/export?format=markdown";
    let first = send(&app, "GET", uri, Some(&token), None).await;
    let second = send(&app, "GET", uri, Some(&token), None).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
    assert_eq!(
        first.headers[header::CONTENT_TYPE],
        "text/markdown; charset=utf-8"
    );
    assert_eq!(
        first.headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"achievement_statement.md\""
    );
}

#[tokio::test]
async fn test_export_without_document_is_not_found() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;

    let uri = "/api/v1/documents/cover-letter/export";
    let reply = send(&app, "GET", uri, Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pdf_without_renderer_is_unavailable() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;
    send(
        &app,
        "POST",
        "/api/v1/documents/achievement-statement",
        Some(&token),
        Some(json!({"text": "Led migrations"})),
    )
    .await;

    let uri = "/api/v1/documents/achievement-statement/export?format=pdf";
    let reply = send(&app, "GET", uri, Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(reply.json()["error"]["code"], "EXPORT_UNAVAILABLE");
}

#[tokio::test]
async fn test_model_failure_is_service_unavailable() {
    let app = app(Arc::new(FailingModel));
    let token = register_and_login(&app, "ada", "pw").await;
    save_sample_profile(&app, &token).await;

    let reply = send(&app, "POST", "/api/v1/documents/resume", Some(&token), Some(json!({}))).await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(reply.json()["error"]["code"], "MODEL_UNAVAILABLE");

    let reply = send(&app, "GET", "/api/v1/documents", Some(&token), None).await;
    assert_eq!(reply.json(), json!([]));
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let app = app(Arc::new(EchoModel));
    let token = register_and_login(&app, "ada", "pw").await;

    let reply = send(&app, "POST", "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_during_generation_stays_logged_out() {
    let sessions = Arc::new(MemorySessionStore::default());
    let model = Arc::new(LogoutMidCall {
        sessions: sessions.clone(),
        token: Mutex::new(None),
    });
    let app = build_router(AppState {
        users: Arc::new(MemoryUserStore::default()),
        sessions,
        model: model.clone(),
        pdf: PdfRenderer::new("portfolio-test-renderer-that-does-not-exist"),
    });
    let token = register_and_login(&app, "ada", "pw").await;
    *model.token.lock().unwrap() = Some(Uuid::parse_str(&token).unwrap());

    let reply = send(
        &app,
        "POST",
        "/api/v1/documents/achievement-statement",
        Some(&token),
        Some(json!({"text": "Managed databases"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let app = app(Arc::new(EchoModel));

    let reply = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({"username": "x"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["error"]["code"], "VALIDATION_ERROR");

    let token = register_and_login(&app, "ada", "pw").await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/documents/poem",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["error"]["code"], "VALIDATION_ERROR");

    let uri = "/api/v1/documents/resume/export?format=docx";
    let reply = send(&app, "GET", uri, Some(&token), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["error"]["code"], "VALIDATION_ERROR");

    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/profile")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}
