//! Check catalogs, one per target surface

pub mod api;
pub mod browser;
pub mod dashboard;

pub use api::ApiContext;
pub use browser::BrowserSession;
pub use dashboard::DashboardContext;
