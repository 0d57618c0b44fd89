//! Stand-in HeadwayOS application for the harness tests

#![allow(dead_code)]

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;

use headway_e2e::config::{ApiConfig, DashboardConfig};

/// Serve `router` on an ephemeral port, returning its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn api_config(base_url: &str, report: &Path) -> ApiConfig {
    ApiConfig {
        base_url: format!("{}/api", base_url),
        timeout_secs: 2,
        report_path: report.to_path_buf(),
        ..ApiConfig::default()
    }
}

pub fn dashboard_config(base_url: &str, report: &Path) -> DashboardConfig {
    DashboardConfig {
        base_url: base_url.to_string(),
        headers: BTreeMap::new(),
        timeout_secs: 2,
        report_path: report.to_path_buf(),
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

async fn create_status(Json(body): Json<Value>) -> Response {
    match body.get("client_name").and_then(Value::as_str) {
        Some(name) => Json(json!({
            "id": "6f1c2a9e-3b7d-4c55-9a0e-1d2f3b4c5d6e",
            "client_name": name,
            "timestamp": "2026-10-18T09:30:00Z",
        }))
        .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "client_name is required" })),
        )
            .into_response(),
    }
}

async fn list_status() -> Json<Value> {
    Json(json!([
        { "id": "a", "client_name": "one", "timestamp": "2026-10-17T08:00:00Z" },
        { "id": "b", "client_name": "two", "timestamp": "2026-10-17T09:00:00Z" },
        { "id": "c", "client_name": "three", "timestamp": "2026-10-17T10:00:00Z" },
    ]))
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}

pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" class="dark">
<body class="bg-black text-white">
  <div id="theme-provider"><button class="ThemeToggle cursor-pointer transition hover:bg-gray-800">Theme</button></div>
  <nav>
    <a>Home</a><a>Resume</a><a>Roadmap</a><a>Modules</a>
    <a>Jobs</a><a>Calendar</a><a>Insights</a><a>Settings</a>
  </nav>
  <header><h1>WELCOME BACK, Aarav</h1><p>HeadwayOS</p><p>Backend SWE in San Francisco</p></header>
  <section>
    <div class="cursor-pointer">MATCH <span>78%</span></div>
    <div class="cursor-pointer">MARKET FIT <span>84%</span></div>
    <div class="cursor-pointer">INTERVIEWS <span>3</span></div>
    <div class="cursor-pointer">MODULES <span>12</span></div>
  </section>
  <section>
    <h2>Weekly Progress</h2>
    <div class="CircularProgress">Readiness 72%</div>
    <div class="progress" style="width: 64%">Coverage</div>
  </section>
  <ul>
    <li>Complete API design patterns - 2 hours <button>Edit</button></li>
    <li>System design mock interview - 1 hours</li>
    <li>Database optimization project - 3 hours</li>
  </ul>
  <button>Add Task</button>
</body>
</html>
"#;

pub const LOADING_HTML: &str = r#"<!DOCTYPE html>
<html><body><div class="spinner">Loading your dashboard...</div>
<p>WELCOME BACK HeadwayOS Aarav MATCH MARKET FIT</p></body></html>
"#;

/// Everything behaves as the checks expect
pub fn healthy_app() -> Router {
    Router::new()
        .route("/api/root", get(root))
        .route(
            "/api/status",
            get(list_status).post(create_status).options(preflight),
        )
        .route("/dashboard", get(|| async { Html(DASHBOARD_HTML) }))
        .fallback(not_found)
}

/// Every endpoint answers, but with the wrong contract
pub fn broken_app() -> Router {
    Router::new()
        .route("/api/root", get(|| async { Json(json!({ "message": "Goodbye" })) }))
        .route(
            "/api/status",
            get(|| async { Json(json!({ "items": [] })) })
                .post(|| async { Json(json!({ "id": 7 })) }),
        )
        .route("/dashboard", get(|| async { Html(LOADING_HTML) }))
        .fallback(|| async { (StatusCode::OK, "nothing here") })
}

/// Healthy, except `GET /api/root` answers only after `delay`
pub fn slow_root_app(delay: std::time::Duration) -> Router {
    Router::new()
        .route(
            "/api/root",
            get(move || async move {
                tokio::time::sleep(delay).await;
                Json(json!({ "message": "Hello World" }))
            }),
        )
        .route(
            "/api/status",
            get(list_status).post(create_status).options(preflight),
        )
        .fallback(not_found)
}

/// Every endpoint answers 200 with a body that is not JSON
pub fn plain_text_app() -> Router {
    Router::new().fallback(|| async { (StatusCode::OK, "<html>maintenance</html>") })
}

/// Status create echoes a different client name
pub fn renaming_app() -> Router {
    Router::new()
        .route(
            "/api/status",
            get(list_status).post(|| async {
                Json(json!({
                    "id": "x1",
                    "client_name": "Other",
                    "timestamp": "2026-10-18T09:30:00Z",
                }))
            }),
        )
        .fallback(not_found)
}

/// Dashboard that fails to render
pub fn erroring_dashboard() -> Router {
    Router::new()
        .route(
            "/dashboard",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream down") }),
        )
        .route("/api/root", get(root))
}
