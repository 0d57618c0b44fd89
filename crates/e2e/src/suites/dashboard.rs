//! Dashboard checks over plain HTTP
//!
//! Each check fetches the rendered page on its own and counts content markers.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::check::{Check, Verdict};
use crate::client::TargetClient;
use crate::config::DashboardConfig;
use crate::error::HarnessResult;
use crate::markers::{count_found, patterns, texts, Marker};
use crate::runner::Harness;

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Text shown while the client still waits for its data
pub const LOADING_TEXT: &str = "Loading your dashboard";

pub struct DashboardContext {
    pub client: TargetClient,
}

/// HTML suite in its fixed run order
pub fn harness(config: &DashboardConfig) -> HarnessResult<Harness<DashboardContext>> {
    let harness = Harness::new(
        "HeadwayOS Dashboard Functionality Tests",
        format!("{}{}", config.base_url.trim_end_matches('/'), DASHBOARD_PATH),
        config.report_path.clone(),
    )
    .check(PageMarkers {
        name: "Dashboard Accessibility",
        markers: texts(&["WELCOME BACK", "HeadwayOS", "Aarav", "MATCH", "MARKET FIT"]),
        required: 3,
        reject_loading: true,
        wording: Wording {
            pass: "Dashboard accessible and contains expected elements - found {found}/{total} key indicators",
            fail: "Dashboard missing key elements - only found {found}/{total} indicators",
            http: "Dashboard not accessible",
            error: "Error accessing dashboard",
        },
    })
    .check(PageMarkers {
        name: "Mock Data Integration",
        markers: texts(&[
            "Aarav",
            "Backend SWE",
            "San Francisco",
            "Complete API design patterns",
            "System design mock interview",
            "78%",
            "84%",
        ]),
        required: 4,
        reject_loading: false,
        wording: Wording {
            pass: "Mock data properly integrated - found {found}/{total} data elements",
            fail: "Insufficient mock data found - only {found}/{total} elements",
            http: "Cannot check mock data",
            error: "Error checking mock data",
        },
    })
    .check(PageMarkers {
        name: "Metric Cards Structure",
        markers: patterns(&[r"MATCH.*?%", r"MARKET FIT.*?%", r"INTERVIEWS.*?\d+", r"MODULES.*?\d+"])?,
        required: 3,
        reject_loading: false,
        wording: Wording {
            pass: "Metric cards properly structured - found {found}/{total} metric patterns",
            fail: "Insufficient metric card structure - only {found}/{total} patterns found",
            http: "Cannot check metric structure",
            error: "Error checking metric structure",
        },
    })
    .check(PageMarkers {
        name: "Interactive Elements",
        markers: texts(&["cursor-pointer", "onClick", "hover:", "transition", "button"]),
        required: 3,
        reject_loading: false,
        wording: Wording {
            pass: "Interactive elements present - found {found}/{total} interaction indicators",
            fail: "Limited interactive elements - only {found}/{total} indicators found",
            http: "Cannot check interactive elements",
            error: "Error checking interactive elements",
        },
    })
    .check(PageMarkers {
        name: "Task Management Structure",
        markers: texts(&[
            "Complete API design patterns",
            "System design mock interview",
            "Database optimization project",
            "Add Task",
            "Edit",
            "hours",
        ]),
        required: 4,
        reject_loading: false,
        wording: Wording {
            pass: "Task management elements present - found {found}/{total} task indicators",
            fail: "Limited task management elements - only {found}/{total} indicators found",
            http: "Cannot check task management",
            error: "Error checking task management",
        },
    })
    .check(PageMarkers {
        name: "Sidebar Navigation",
        markers: texts(&NAV_ITEMS),
        required: 6,
        reject_loading: false,
        wording: Wording {
            pass: "Navigation sidebar present - found {found}/{total} navigation items",
            fail: "Limited navigation items - only {found}/{total} items found",
            http: "Cannot check navigation",
            error: "Error checking navigation",
        },
    })
    .check(PageMarkers {
        name: "Theme System",
        markers: texts(&["class=\"dark\"", "bg-black", "text-white", "ThemeToggle", "theme-provider"]),
        required: 3,
        reject_loading: false,
        wording: Wording {
            pass: "Theme system implemented - found {found}/{total} theme indicators",
            fail: "Limited theme implementation - only {found}/{total} indicators found",
            http: "Cannot check theme system",
            error: "Error checking theme system",
        },
    })
    .check(PageMarkers {
        name: "Progress Indicators",
        markers: texts(&["Readiness", "Coverage", "Weekly Progress", "%", "progress", "CircularProgress"]),
        required: 4,
        reject_loading: false,
        wording: Wording {
            pass: "Progress tracking present - found {found}/{total} progress indicators",
            fail: "Limited progress tracking - only {found}/{total} indicators found",
            http: "Cannot check progress indicators",
            error: "Error checking progress indicators",
        },
    })
    .check(ApiBackendIntegration);

    Ok(harness)
}

/// Sidebar labels, shared with the browser suite
pub const NAV_ITEMS: [&str; 8] = [
    "Home", "Resume", "Roadmap", "Modules", "Jobs", "Calendar", "Insights", "Settings",
];

/// Message templates; `{found}` and `{total}` are substituted
pub struct Wording {
    pub pass: &'static str,
    pub fail: &'static str,
    /// Prefix for a non-200 page
    pub http: &'static str,
    /// Prefix for transport errors
    pub error: &'static str,
}

impl Wording {
    fn fill(template: &str, found: usize, total: usize) -> String {
        template
            .replace("{found}", &found.to_string())
            .replace("{total}", &total.to_string())
    }
}

/// Fetch the dashboard and require `required` of `markers`
pub struct PageMarkers {
    pub name: &'static str,
    pub markers: Vec<Marker>,
    pub required: usize,
    /// Fail outright while the loading placeholder is rendered
    pub reject_loading: bool,
    pub wording: Wording,
}

impl PageMarkers {
    /// Judge an already fetched page body
    pub fn evaluate(&self, html: &str) -> Verdict {
        if self.reject_loading && html.contains(LOADING_TEXT) {
            return Verdict::fail(
                "Dashboard still shows loading screen - mock data may not be loading properly",
            );
        }

        let found = count_found(&self.markers, html);
        let total = self.markers.len();
        Verdict::threshold(
            found,
            self.required,
            Wording::fill(self.wording.pass, found, total),
            Wording::fill(self.wording.fail, found, total),
        )
    }
}

#[async_trait]
impl Check<DashboardContext> for PageMarkers {
    fn name(&self) -> &str {
        self.name
    }

    fn error_prefix(&self) -> &str {
        self.wording.error
    }

    async fn run(&self, ctx: &mut DashboardContext) -> HarnessResult<Verdict> {
        let page = ctx.client.get(DASHBOARD_PATH).await?;
        if page.status != StatusCode::OK {
            return Ok(Verdict::fail(format!(
                "{} - HTTP {}",
                self.wording.http,
                page.status.as_u16()
            )));
        }
        Ok(self.evaluate(&page.body))
    }
}

/// The API the dashboard calls is reachable from the same origin
pub struct ApiBackendIntegration;

#[async_trait]
impl Check<DashboardContext> for ApiBackendIntegration {
    fn name(&self) -> &str {
        "API Backend Integration"
    }

    fn error_prefix(&self) -> &str {
        "Error accessing API"
    }

    async fn run(&self, ctx: &mut DashboardContext) -> HarnessResult<Verdict> {
        let response = ctx.client.get("/api/root").await?;
        if response.status != StatusCode::OK {
            return Ok(Verdict::fail(format!(
                "API not accessible - HTTP {}",
                response.status.as_u16()
            )));
        }

        let data = response.json()?;
        if data.get("message").and_then(|v| v.as_str()) == Some("Hello World") {
            Ok(Verdict::pass("Backend API accessible and responding correctly"))
        } else {
            Ok(Verdict::fail(format!("API responding but with unexpected data: {}", data)))
        }
    }
}
