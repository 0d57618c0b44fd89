//! REST API checks

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};

use crate::check::{Check, Verdict};
use crate::client::TargetClient;
use crate::config::ApiConfig;
use crate::error::HarnessResult;
use crate::runner::Harness;

pub const TEST_CLIENT_NAME: &str = "HeadwayOS_Test_Client";

const STATUS_FIELDS: [&str; 3] = ["id", "client_name", "timestamp"];

const CORS_HEADERS: [&str; 3] = [
    "Access-Control-Allow-Origin",
    "Access-Control-Allow-Methods",
    "Access-Control-Allow-Headers",
];

pub struct ApiContext {
    pub client: TargetClient,
    /// Id returned by a successful status create
    pub created_status_id: Option<String>,
}

impl ApiContext {
    pub fn new(client: TargetClient) -> Self {
        Self {
            client,
            created_status_id: None,
        }
    }
}

/// API suite in its fixed run order
pub fn harness(config: &ApiConfig) -> Harness<ApiContext> {
    Harness::new("HeadwayOS Backend API Tests", config.base_url.clone(), config.report_path.clone())
        .check(RootEndpoint)
        .check(StatusPostValidation)
        .check(StatusPost)
        .check(StatusGet)
        .check(InvalidRoute)
        .check(CorsHeaders)
}

fn text_field<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field).and_then(Value::as_str)
}

/// `GET /root` answers with the greeting
pub struct RootEndpoint;

#[async_trait]
impl Check<ApiContext> for RootEndpoint {
    fn name(&self) -> &str {
        "Root Endpoint"
    }

    async fn run(&self, ctx: &mut ApiContext) -> HarnessResult<Verdict> {
        let response = ctx.client.get("/root").await?;
        if response.status != StatusCode::OK {
            return Ok(Verdict::fail(response.describe()));
        }

        let data = response.json()?;
        if text_field(&data, "message") == Some("Hello World") {
            Ok(Verdict::pass("Successfully returned 'Hello World' message").with_response(data))
        } else {
            Ok(Verdict::fail(format!("Unexpected response: {}", data)))
        }
    }
}

/// `POST /status` without `client_name` is rejected
pub struct StatusPostValidation;

#[async_trait]
impl Check<ApiContext> for StatusPostValidation {
    fn name(&self) -> &str {
        "Status POST Validation"
    }

    async fn run(&self, ctx: &mut ApiContext) -> HarnessResult<Verdict> {
        let response = ctx.client.post_json("/status", &json!({})).await?;
        if response.status != StatusCode::BAD_REQUEST {
            return Ok(Verdict::fail(format!(
                "Expected 400 status, got {}: {}",
                response.status.as_u16(),
                response.body
            )));
        }

        let data = response.json()?;
        match text_field(&data, "error") {
            Some(error) if error.contains("client_name is required") => {
                Ok(Verdict::pass("Correctly validates missing client_name").with_response(data))
            }
            _ => Ok(Verdict::fail(format!("Unexpected error message: {}", data))),
        }
    }
}

/// `POST /status` creates a status check and echoes it back
pub struct StatusPost;

#[async_trait]
impl Check<ApiContext> for StatusPost {
    fn name(&self) -> &str {
        "Status POST"
    }

    async fn run(&self, ctx: &mut ApiContext) -> HarnessResult<Verdict> {
        let payload = json!({ "client_name": TEST_CLIENT_NAME });
        let response = ctx.client.post_json("/status", &payload).await?;
        if response.status != StatusCode::OK {
            return Ok(Verdict::fail(response.describe()));
        }

        let data = response.json()?;
        let missing: Vec<&str> = STATUS_FIELDS
            .iter()
            .copied()
            .filter(|f| data.get(*f).is_none())
            .collect();
        if !missing.is_empty() {
            return Ok(Verdict::fail(format!("Missing required fields: {:?}", missing)));
        }

        if data["client_name"] != TEST_CLIENT_NAME {
            return Ok(Verdict::fail(format!(
                "Client name mismatch: expected {}, got {}",
                TEST_CLIENT_NAME,
                raw_text(&data["client_name"])
            )));
        }

        let id = raw_text(&data["id"]);
        let message = format!("Successfully created status check with ID: {}", id);
        ctx.created_status_id = Some(id);

        Ok(Verdict::pass(message).with_response(data))
    }
}

/// `GET /status` lists status checks
pub struct StatusGet;

#[async_trait]
impl Check<ApiContext> for StatusGet {
    fn name(&self) -> &str {
        "Status GET"
    }

    async fn run(&self, ctx: &mut ApiContext) -> HarnessResult<Verdict> {
        let response = ctx.client.get("/status").await?;
        if response.status != StatusCode::OK {
            return Ok(Verdict::fail(response.describe()));
        }

        match response.json()? {
            Value::Array(items) => {
                let sample: Vec<Value> = items.iter().take(2).cloned().collect();
                Ok(
                    Verdict::pass(format!("Successfully retrieved {} status checks", items.len()))
                        .with_response(json!({ "count": items.len(), "sample": sample })),
                )
            }
            other => Ok(Verdict::fail(format!(
                "Expected array response, got: {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Strings without JSON quotes, anything else as JSON
fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Unknown paths answer 404 with a "not found" error
pub struct InvalidRoute;

#[async_trait]
impl Check<ApiContext> for InvalidRoute {
    fn name(&self) -> &str {
        "Invalid Route Handling"
    }

    async fn run(&self, ctx: &mut ApiContext) -> HarnessResult<Verdict> {
        let response = ctx.client.get("/nonexistent").await?;
        if response.status != StatusCode::NOT_FOUND {
            return Ok(Verdict::fail(format!(
                "Expected 404 status, got {}: {}",
                response.status.as_u16(),
                response.body
            )));
        }

        let data = response.json()?;
        match text_field(&data, "error") {
            Some(error) if error.to_lowercase().contains("not found") => {
                Ok(Verdict::pass("Correctly returns 404 for invalid routes").with_response(data))
            }
            _ => Ok(Verdict::fail(format!("Unexpected error message: {}", data))),
        }
    }
}

/// Preflight on `/status` advertises CORS
pub struct CorsHeaders;

#[async_trait]
impl Check<ApiContext> for CorsHeaders {
    fn name(&self) -> &str {
        "CORS Headers"
    }

    async fn run(&self, ctx: &mut ApiContext) -> HarnessResult<Verdict> {
        let response = ctx.client.options("/status").await?;

        let mut present = Map::new();
        for name in CORS_HEADERS {
            if let Some(value) = response.header(name) {
                present.insert(name.to_string(), Value::String(value.to_string()));
            }
        }
        let names: Vec<&String> = present.keys().collect();

        if present.len() >= 2 {
            Ok(Verdict::pass(format!("CORS headers present: {:?}", names))
                .with_response(Value::Object(present)))
        } else {
            Ok(Verdict::fail(format!("Missing CORS headers. Found: {:?}", names)))
        }
    }
}
