//! HTTP access to the target application

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::{HarnessError, HarnessResult};

/// Client bound to one target base URL
#[derive(Clone)]
pub struct TargetClient {
    client: reqwest::Client,
    base_url: String,
}

/// A fully read response
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Fetched {
    /// Parse the body as JSON
    pub fn json(&self) -> HarnessResult<Value> {
        serde_json::from_str(&self.body).map_err(HarnessError::from)
    }

    /// Header value as text, if present and printable
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `HTTP <code>: <body>` as the checks report unexpected statuses
    pub fn describe(&self) -> String {
        format!("HTTP {}: {}", self.status.as_u16(), self.body)
    }
}

impl TargetClient {
    pub fn new(config: &HttpConfig) -> HarnessResult<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                HarnessError::Setup(format!("invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                HarnessError::Setup(format!("invalid value for header '{}': {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> HarnessResult<Fetched> {
        self.send(self.client.request(Method::GET, self.url(path))).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> HarnessResult<Fetched> {
        self.send(self.client.request(Method::POST, self.url(path)).json(body)).await
    }

    pub async fn options(&self, path: &str) -> HarnessResult<Fetched> {
        self.send(self.client.request(Method::OPTIONS, self.url(path))).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> HarnessResult<Fetched> {
        let start = Instant::now();
        let response = request.send().await?;

        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!(
            "{} {} ({} bytes, {} ms)",
            status.as_u16(),
            url,
            body.len(),
            start.elapsed().as_millis()
        );

        Ok(Fetched { status, headers, body })
    }
}
