//! Dashboard checks in a real browser
//!
//! All checks share one WebDriver session. They run against whatever state the
//! previous check left the page in, so a stray click can affect later checks.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::check::{Check, Verdict};
use crate::config::BrowserConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::runner::{Harness, Session};
use crate::suites::dashboard::{DASHBOARD_PATH, LOADING_TEXT, NAV_ITEMS};

pub const SETUP_CHECK: &str = "Driver Setup";

const WELCOME_TEXT: &str = "WELCOME BACK";
const METRIC_LABELS: [&str; 4] = ["MATCH", "MARKET FIT", "INTERVIEWS", "MODULES"];
const STORAGE_KEYS: [&str; 3] = ["dashboardData", "userProfile", "learningPlan"];

/// One browser session plus the settings the checks need
pub struct BrowserSession {
    pub driver: WebDriver,
    pub config: BrowserConfig,
}

impl BrowserSession {
    /// Open a Chrome session through the configured WebDriver endpoint
    pub async fn start(config: BrowserConfig) -> HarnessResult<Self> {
        info!("Connecting to WebDriver at {}", config.webdriver_url);

        let driver = Self::connect(&config)
            .await
            .map_err(|e| HarnessError::Setup(format!("Failed to setup Chrome driver: {}", e)))?;

        Ok(Self { driver, config })
    }

    async fn connect(config: &BrowserConfig) -> WebDriverResult<WebDriver> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in &config.browser_args {
            caps.add_arg(arg)?;
        }

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;
        driver.set_implicit_wait_timeout(config.implicit_wait()).await?;
        Ok(driver)
    }

    pub fn dashboard_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), DASHBOARD_PATH)
    }

    async fn elements_with_text(&self, text: &str) -> HarnessResult<Vec<WebElement>> {
        let xpath = contains_text_xpath(&[text]);
        Ok(self.driver.find_all(By::XPath(xpath.as_str())).await?)
    }

    async fn elements_matching(&self, css: &str) -> HarnessResult<Vec<WebElement>> {
        Ok(self.driver.find_all(By::Css(css)).await?)
    }

    /// How many of `labels` appear somewhere in the page text
    async fn count_labels(&self, labels: &[&str]) -> HarnessResult<usize> {
        let mut found = 0;
        for label in labels {
            if !self.elements_with_text(label).await?.is_empty() {
                found += 1;
            }
        }
        Ok(found)
    }

    /// Click through JavaScript so overlays cannot intercept it
    async fn script_click(&self, element: &WebElement) -> HarnessResult<()> {
        self.driver
            .execute("arguments[0].click();", vec![element.to_json()?])
            .await?;
        sleep(self.config.click_settle()).await;
        Ok(())
    }

    async fn local_storage(&self, key: &str) -> HarnessResult<Value> {
        let script = format!("return localStorage.getItem({});", Value::from(key));
        let ret = self.driver.execute(script.as_str(), Vec::new()).await?;
        Ok(ret.json().clone())
    }
}

#[async_trait]
impl Session for BrowserSession {
    async fn close(self) -> HarnessResult<()> {
        debug!("Closing WebDriver session");
        self.driver.quit().await?;
        Ok(())
    }
}

/// XPath for any element whose own text contains one of `texts`
pub fn contains_text_xpath(texts: &[&str]) -> String {
    let conditions: Vec<String> = texts
        .iter()
        .map(|t| format!("contains(text(), {})", xpath_literal(t)))
        .collect();
    format!("//*[{}]", conditions.join(" or "))
}

fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Browser suite in its fixed run order
pub fn harness(config: &BrowserConfig) -> Harness<BrowserSession> {
    Harness::new(
        "HeadwayOS Dashboard Functionality Tests",
        format!("{}{}", config.base_url.trim_end_matches('/'), DASHBOARD_PATH),
        config.report_path.clone(),
    )
    .check(DashboardLoading)
    .check(MockDataIntegration)
    .check(MetricCardsDisplay)
    .check(InteractiveMetrics)
    .check(TaskManagement)
    .check(SidebarFunctionality)
    .check(RightSidebarToggle)
    .check(ThemeToggle)
    .check(ProgressTracking)
    .check(LocalStoragePersistence)
}

/// Open the dashboard; it must get past the loading placeholder
pub struct DashboardLoading;

#[async_trait]
impl Check<BrowserSession> for DashboardLoading {
    fn name(&self) -> &str {
        "Dashboard Loading"
    }

    fn error_prefix(&self) -> &str {
        "Error accessing dashboard"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        ctx.driver.goto(ctx.dashboard_url().as_str()).await?;
        sleep(ctx.config.settle()).await;

        if !ctx.elements_with_text(LOADING_TEXT).await?.is_empty() {
            return Ok(Verdict::fail(
                "Dashboard still shows loading screen - mock data not loading properly",
            ));
        }

        let welcome = contains_text_xpath(&[WELCOME_TEXT]);
        let found = ctx
            .driver
            .query(By::XPath(welcome.as_str()))
            .wait(Duration::from_secs(10), Duration::from_millis(500))
            .first()
            .await;

        match found {
            Ok(_) => Ok(Verdict::pass("Dashboard loaded successfully without loading screen")),
            Err(e) => {
                debug!("Welcome text not found: {}", e);
                Ok(Verdict::fail(
                    "Dashboard elements not found - page may not be loading correctly",
                ))
            }
        }
    }
}

pub struct MockDataIntegration;

#[async_trait]
impl Check<BrowserSession> for MockDataIntegration {
    fn name(&self) -> &str {
        "Mock Data Integration"
    }

    fn error_prefix(&self) -> &str {
        "Error checking mock data"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        if ctx.elements_with_text("Aarav").await?.is_empty() {
            return Ok(Verdict::fail("User name 'Aarav' not found in dashboard"));
        }

        let found = ctx.count_labels(&METRIC_LABELS).await?;
        let total = METRIC_LABELS.len();
        Ok(Verdict::threshold(
            found,
            3,
            format!("Mock data properly integrated - found {}/{} metric cards", found, total),
            format!("Insufficient metric cards found - only {}/{} visible", found, total),
        ))
    }
}

pub struct MetricCardsDisplay;

#[async_trait]
impl Check<BrowserSession> for MetricCardsDisplay {
    fn name(&self) -> &str {
        "Metric Cards Display"
    }

    fn error_prefix(&self) -> &str {
        "Error checking metric cards"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let found = ctx.elements_with_text("%").await?.len();
        Ok(Verdict::threshold(
            found,
            2,
            format!(
                "Metric cards displaying correctly with percentage values - found {} percentage indicators",
                found
            ),
            format!("Insufficient metric percentage displays found - only {}", found),
        ))
    }
}

/// Metric cards are clickable
pub struct InteractiveMetrics;

#[async_trait]
impl Check<BrowserSession> for InteractiveMetrics {
    fn name(&self) -> &str {
        "Interactive Metrics"
    }

    fn error_prefix(&self) -> &str {
        "Error testing interactive metrics"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let cards = ctx.elements_matching("[class*='cursor-pointer']").await?;
        let Some(first) = cards.first() else {
            return Ok(Verdict::fail("No clickable metric cards found"));
        };

        ctx.script_click(first).await?;
        Ok(Verdict::pass(format!(
            "Metric cards are clickable - found {} interactive elements",
            cards.len()
        )))
    }
}

pub struct TaskManagement;

#[async_trait]
impl Check<BrowserSession> for TaskManagement {
    fn name(&self) -> &str {
        "Task Management"
    }

    fn error_prefix(&self) -> &str {
        "Error checking task management"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let xpath = contains_text_xpath(&["Complete", "System design", "Database"]);
        let found = ctx.driver.find_all(By::XPath(xpath.as_str())).await?.len();
        Ok(Verdict::threshold(
            found,
            2,
            format!("Task management elements found - {} task-related elements visible", found),
            format!("Insufficient task elements found - only {}", found),
        ))
    }
}

pub struct SidebarFunctionality;

#[async_trait]
impl Check<BrowserSession> for SidebarFunctionality {
    fn name(&self) -> &str {
        "Sidebar Functionality"
    }

    fn error_prefix(&self) -> &str {
        "Error checking sidebar"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let found = ctx.count_labels(&NAV_ITEMS).await?;
        let total = NAV_ITEMS.len();
        Ok(Verdict::threshold(
            found,
            6,
            format!("Navigation sidebar working - found {}/{} navigation items", found, total),
            format!("Insufficient navigation items found - only {}/{}", found, total),
        ))
    }
}

/// The header's Insights button toggles the right sidebar
pub struct RightSidebarToggle;

#[async_trait]
impl Check<BrowserSession> for RightSidebarToggle {
    fn name(&self) -> &str {
        "Right Sidebar Toggle"
    }

    fn error_prefix(&self) -> &str {
        "Error testing sidebar toggle"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let buttons = ctx.elements_with_text("Insights").await?;
        let Some(button) = buttons.first() else {
            return Ok(Verdict::fail("Insights button not found for sidebar toggle"));
        };

        ctx.script_click(button).await?;
        Ok(Verdict::pass("Right sidebar toggle functionality available"))
    }
}

pub struct ThemeToggle;

#[async_trait]
impl Check<BrowserSession> for ThemeToggle {
    fn name(&self) -> &str {
        "Theme Toggle"
    }

    fn error_prefix(&self) -> &str {
        "Error checking theme toggle"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let themed = ctx.elements_matching("[class*='theme'], [class*='dark']").await?;
        let body = ctx.driver.find(By::Tag("body")).await?;
        let body_class = body.attr("class").await?.unwrap_or_default();

        if body_class.contains("dark") || !themed.is_empty() {
            Ok(Verdict::pass("Theme system is active - dark mode detected"))
        } else {
            Ok(Verdict::fail("Theme system not detected"))
        }
    }
}

pub struct ProgressTracking;

#[async_trait]
impl Check<BrowserSession> for ProgressTracking {
    fn name(&self) -> &str {
        "Progress Tracking"
    }

    fn error_prefix(&self) -> &str {
        "Error checking progress tracking"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let progress = ctx.elements_matching("[class*='progress'], [style*='width']").await?;
        let readiness = ctx.elements_with_text("Readiness").await?;

        if !progress.is_empty() || !readiness.is_empty() {
            Ok(Verdict::pass(format!(
                "Progress tracking elements found - {} progress indicators",
                progress.len()
            )))
        } else {
            Ok(Verdict::fail("No progress tracking elements found"))
        }
    }
}

/// Client-side state is persisted to localStorage
pub struct LocalStoragePersistence;

#[async_trait]
impl Check<BrowserSession> for LocalStoragePersistence {
    fn name(&self) -> &str {
        "LocalStorage Persistence"
    }

    fn error_prefix(&self) -> &str {
        "Error checking localStorage"
    }

    async fn run(&self, ctx: &mut BrowserSession) -> HarnessResult<Verdict> {
        let mut stored = 0;
        for key in STORAGE_KEYS {
            if is_stored(&ctx.local_storage(key).await?) {
                stored += 1;
            }
        }

        let total = STORAGE_KEYS.len();
        Ok(Verdict::threshold(
            stored,
            2,
            format!("Data persistence working - {}/{} data items stored in localStorage", stored, total),
            format!("Insufficient data persistence - only {}/{} items in localStorage", stored, total),
        ))
    }
}

fn is_stored(value: &Value) -> bool {
    matches!(value, Value::String(s) if !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains_text_xpath() {
        assert_eq!(
            contains_text_xpath(&["WELCOME BACK"]),
            "//*[contains(text(), 'WELCOME BACK')]"
        );
        assert_eq!(
            contains_text_xpath(&["Complete", "Database"]),
            "//*[contains(text(), 'Complete') or contains(text(), 'Database')]"
        );
    }

    #[test]
    fn test_xpath_literal_quoting() {
        assert_eq!(xpath_literal("User's"), "\"User's\"");
        assert_eq!(xpath_literal(r#"a'b"c"#), r#"concat('a', "'", 'b"c')"#);
    }

    #[test]
    fn test_is_stored() {
        assert!(is_stored(&json!("{\"tasks\":[]}")));
        assert!(!is_stored(&Value::Null));
        assert!(!is_stored(&json!("")));
    }

    #[test]
    fn test_run_order() {
        let harness = harness(&BrowserConfig::default());
        let names = harness.check_names();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "Dashboard Loading");
        assert_eq!(names[9], "LocalStorage Persistence");
    }
}
