//! Harness configuration
//!
//! Every value has a compiled-in default matching the deployed targets. A
//! `headway-e2e.toml` in the working directory may override any subset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::HarnessResult;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "headway-e2e.toml";

/// Top-level configuration, one section per suite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    pub browser: BrowserConfig,
}

impl HarnessConfig {
    /// Load configuration from file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> HarnessResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}

/// What a [`TargetClient`](crate::client::TargetClient) needs to reach a target
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL; check paths are appended verbatim
    pub base_url: String,

    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,

    /// Per-request timeout
    pub timeout: Duration,
}

/// REST API suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,

    pub headers: BTreeMap<String, String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Where the JSON report is written
    pub report_path: PathBuf,
}

impl ApiConfig {
    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            headers: self.headers.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            base_url: "https://pdf-theme-impl.preview.emergentagent.com/api".to_string(),
            headers,
            timeout_secs: 10,
            report_path: PathBuf::from("/app/api_test_results.json"),
        }
    }
}

/// Dashboard HTML suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,

    pub headers: BTreeMap<String, String>,

    pub timeout_secs: u64,

    pub report_path: PathBuf,
}

impl DashboardConfig {
    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.base_url.clone(),
            headers: self.headers.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            headers: BTreeMap::new(),
            timeout_secs: 10,
            report_path: PathBuf::from("/app/dashboard_test_results.json"),
        }
    }
}

/// Browser-driven dashboard suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Application base URL the browser navigates to
    pub base_url: String,

    /// WebDriver endpoint (chromedriver, selenium)
    pub webdriver_url: String,

    /// Chrome command-line arguments
    pub browser_args: Vec<String>,

    /// Implicit element wait, seconds
    pub implicit_wait_secs: u64,

    /// Pause after navigation before inspecting the page, milliseconds
    pub settle_ms: u64,

    /// Pause after a scripted click, milliseconds
    pub click_settle_ms: u64,

    pub report_path: PathBuf,
}

impl BrowserConfig {
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            browser_args: [
                "--headless",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--window-size=1920,1080",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            implicit_wait_secs: 10,
            settle_ms: 3000,
            click_settle_ms: 1000,
            report_path: PathBuf::from("/app/dashboard_test_results.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployed_targets() {
        let config = HarnessConfig::default();
        assert_eq!(
            config.api.base_url,
            "https://pdf-theme-impl.preview.emergentagent.com/api"
        );
        assert_eq!(config.api.http().timeout, Duration::from_secs(10));
        assert_eq!(
            config.api.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert!(config.dashboard.headers.is_empty());
        assert_eq!(config.browser.browser_args.len(), 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r#"
[api]
base_url = "http://127.0.0.1:9000/api"
timeout_secs = 2

[browser]
webdriver_url = "http://127.0.0.1:9515"
"#;
        let config: HarnessConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.api.timeout_secs, 2);
        assert_eq!(config.api.headers.len(), 2);
        assert_eq!(config.api.report_path, PathBuf::from("/app/api_test_results.json"));
        assert_eq!(config.browser.webdriver_url, "http://127.0.0.1:9515");
        assert_eq!(config.browser.settle_ms, 3000);
        assert_eq!(config.dashboard.base_url, "http://localhost:3001");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.browser.implicit_wait(), Duration::from_secs(10));
    }
}
