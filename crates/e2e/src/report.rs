//! Run summary and the persisted JSON report

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use crate::error::{HarnessError, HarnessResult};
use crate::ledger::{CheckResult, RunLedger};

const RULE_WIDTH: usize = 60;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    /// Percentage of passed checks, 0 when nothing ran
    pub success_rate: f64,
    pub timestamp: DateTime<Local>,
}

impl RunSummary {
    pub fn from_ledger(ledger: &RunLedger) -> Self {
        Self::from_counts(ledger.passed(), ledger.failed())
    }

    pub fn from_counts(passed: usize, failed: usize) -> Self {
        Self {
            passed,
            failed,
            success_rate: success_rate(passed, failed),
            timestamp: Local::now(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

pub fn success_rate(passed: usize, failed: usize) -> f64 {
    let total = passed + failed;
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

/// Summary plus every result, in execution order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub summary: RunSummary,
    pub tests: Vec<CheckResult>,
}

impl Report {
    pub fn from_ledger(ledger: RunLedger) -> Self {
        let summary = RunSummary::from_ledger(&ledger);
        Self {
            summary,
            tests: ledger.into_results(),
        }
    }

    /// Replace whatever is at `path` with this report
    pub fn write(&self, path: &Path) -> HarnessResult<()> {
        let json = serde_json::to_string_pretty(self)?;

        let io_err = |source| HarnessError::Report {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)?;

        info!("Results written to: {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Console summary block printed after the last check
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "📊 TEST SUMMARY");
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "✅ Passed: {}", self.summary.passed);
        let _ = writeln!(out, "❌ Failed: {}", self.summary.failed);
        let _ = writeln!(out, "📈 Success Rate: {:.1}%", self.summary.success_rate);

        if self.summary.failed > 0 {
            let _ = writeln!(out);
            let _ = writeln!(out, "🔍 FAILED TESTS:");
            for result in self.tests.iter().filter(|r| !r.passed()) {
                let _ = writeln!(out, "   • {}: {}", result.name, result.message);
            }
        }

        out
    }
}
