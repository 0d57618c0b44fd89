//! Per-run result log

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅",
            CheckStatus::Fail => "❌",
        }
    }
}

/// Outcome of one named check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }

    /// Console line for this result
    pub fn line(&self) -> String {
        format!("{} {}: {}", self.status.marker(), self.name, self.message)
    }
}

/// Ordered results and counters for a single run
#[derive(Debug, Default)]
pub struct RunLedger {
    results: Vec<CheckResult>,
    passed: usize,
    failed: usize,
}

impl RunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result and narrate it on stdout
    pub fn log(
        &mut self,
        name: impl Into<String>,
        success: bool,
        message: impl Into<String>,
        response: Option<Value>,
    ) -> &CheckResult {
        let status = if success {
            self.passed += 1;
            CheckStatus::Pass
        } else {
            self.failed += 1;
            CheckStatus::Fail
        };

        let result = CheckResult {
            name: name.into(),
            status,
            message: message.into(),
            timestamp: Local::now(),
            // Empty snapshots are dropped
            response: response.filter(|v| !is_empty_snapshot(v)),
        };
        println!("{}", result.line());

        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn into_results(self) -> Vec<CheckResult> {
        self.results
    }
}

fn is_empty_snapshot(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
