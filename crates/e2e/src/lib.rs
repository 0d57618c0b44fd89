//! HeadwayOS E2E Check Harness
//!
//! Black-box checks against a running HeadwayOS deployment:
//! - REST API contract checks over HTTP
//! - Dashboard rendering checks on the served HTML
//! - Dashboard behaviour checks in a real browser over WebDriver
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Check Harness (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Harness<C>                                                 │
//! │    ├── run(ctx) / run_in_session(setup) -> RunOutcome       │
//! │    ├── run_checks(ctx, &mut RunLedger)                      │
//! │    │     └── Check<C>::run(ctx) -> Verdict  (one per check) │
//! │    └── finish(ledger) -> summary + Report on disk           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Suites                                                     │
//! │    ├── api        ApiContext       (TargetClient)           │
//! │    ├── dashboard  DashboardContext (TargetClient, Marker)   │
//! │    └── browser    BrowserSession   (WebDriver)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod check;
pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod markers;
pub mod report;
pub mod runner;
pub mod suites;

pub use check::{Check, Verdict};
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use ledger::{CheckResult, CheckStatus, RunLedger};
pub use report::{Report, RunSummary};
pub use runner::{Harness, RunOutcome, Session};
