//! Error types for the check harness

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Failed to write report to {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", describe_http(.0))]
    Http(#[from] reqwest::Error),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
}

pub type HarnessResult<T> = Result<T, HarnessError>;

/// Transport failure with its kind and full cause chain
fn describe_http(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        format!("Request timed out: {}", err)
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else {
        err.to_string()
    };

    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
