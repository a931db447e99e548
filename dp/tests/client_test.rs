//! Plan service client tests against an in-process axum stub

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, response::IntoResponse};
use serde_json::{Value, json};
use tokio::sync::mpsc;

use dayplan::api::{ClientError, PlanServiceClient};
use dayplan::health::{HealthMonitor, HealthStatus};
use daytypes::{Goal, Mood, PlanRequest, Priority};

async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> PlanServiceClient {
    PlanServiceClient::new(base_url, Duration::from_secs(5), Duration::from_millis(500)).unwrap()
}

fn health_stub(status: StatusCode, body: Value) -> Router {
    Router::new().route("/api/health", get(move || async move { (status, Json(body)) }))
}

fn plan_stub(status: StatusCode, body: Value) -> Router {
    Router::new().route("/api/generate-plan", post(move || async move { (status, Json(body)) }))
}

fn request() -> PlanRequest {
    PlanRequest::new(Mood::Focused, 4, 8.0, [Goal::Work, Goal::Exercise]).unwrap()
}

#[tokio::test]
async fn test_check_health_ok() {
    let url = spawn_stub(health_stub(
        StatusCode::OK,
        json!({"status": "healthy", "message": "Plan service is running", "timestamp": "2026-10-18T09:00:00Z"}),
    ))
    .await;

    let health = client(&url).check_health().await.unwrap();
    assert_eq!(health.message, "Plan service is running");
    assert!(health.timestamp.is_some());
}

#[tokio::test]
async fn test_check_health_rejects_other_status_field() {
    let url = spawn_stub(health_stub(StatusCode::OK, json!({"status": "degraded"}))).await;

    let err = client(&url).check_health().await.unwrap_err();
    assert!(matches!(&err, ClientError::Unhealthy(s) if s == "degraded"), "{:?}", err);
}

#[tokio::test]
async fn test_check_health_reports_unreadable_body() {
    let url = spawn_stub(health_stub(StatusCode::OK, json!({"message": "up"}))).await;

    let err = client(&url).check_health().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidHealthFormat(_)), "{:?}", err);
    assert!(!err.to_string().contains("Could not reach"));
}

#[tokio::test]
async fn test_check_health_rejects_error_status() {
    let url = spawn_stub(health_stub(StatusCode::SERVICE_UNAVAILABLE, json!({"status": "healthy"}))).await;

    let err = client(&url).check_health().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 503, .. }), "{:?}", err);
}

#[tokio::test]
async fn test_check_health_connection_refused() {
    // Grab a free port, then close it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr)).check_health().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn test_check_health_times_out() {
    let router = Router::new().route(
        "/api/health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"status": "healthy"}))
        }),
    );
    let url = spawn_stub(router).await;

    let err = client(&url).check_health().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)), "{:?}", err);
}

#[tokio::test]
async fn test_generate_plan_sends_request_and_decodes_plan() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));

    async fn handler(State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>) -> impl IntoResponse {
        *seen.lock().unwrap() = Some(body);
        Json(json!({"plan": [
            {"time": "09:00", "activity": "Deep work", "description": "Focus block", "duration": 120, "priority": 1, "completed": false},
            {"time": "11:00", "activity": "Run", "description": "Easy 5k", "duration": 30, "priority": 3, "completed": false}
        ]}))
    }

    let router = Router::new()
        .route("/api/generate-plan", post(handler))
        .with_state(seen.clone());
    let url = spawn_stub(router).await;

    let plan = client(&url).generate_plan(&request()).await.unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(plan.get(0).unwrap().activity, "Deep work");
    assert_eq!(plan.get(1).unwrap().priority, Priority::Low);

    let body = seen.lock().unwrap().clone().unwrap();
    assert_eq!(body["mood"], "focused");
    assert_eq!(body["energy"], 4);
    assert_eq!(body["available_time"], 8.0);
    assert_eq!(body["goals"], json!(["work", "exercise"]));
}

#[tokio::test]
async fn test_generate_plan_surfaces_service_error() {
    let url = spawn_stub(plan_stub(
        StatusCode::BAD_GATEWAY,
        json!({"error": "Failed to generate plan: No activities in response"}),
    ))
    .await;

    let err = client(&url).generate_plan(&request()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to generate plan: No activities in response");
}

#[tokio::test]
async fn test_generate_plan_rejects_non_array_plan() {
    let url = spawn_stub(plan_stub(StatusCode::OK, json!({"plan": {"time": "09:00"}}))).await;

    let err = client(&url).generate_plan(&request()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidPlanFormat));
}

#[tokio::test]
async fn test_monitor_reports_live_service() {
    let url = spawn_stub(health_stub(StatusCode::OK, json!({"status": "healthy"}))).await;
    let (tx, mut rx) = mpsc::channel(4);

    let handle = HealthMonitor::spawn(
        Arc::new(client(&url)),
        Duration::from_secs(5),
        Duration::from_secs(1),
        tx,
    );
    let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(update.status, HealthStatus::Connected);
    handle.stop().await;
}
