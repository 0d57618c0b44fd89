//! headway-e2e entry point
//!
//! Runs one check suite against the configured HeadwayOS deployment and exits
//! 0 when every check passed, 1 otherwise.

use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use headway_e2e::client::TargetClient;
use headway_e2e::config::{HarnessConfig, CONFIG_FILE};
use headway_e2e::suites::{api, browser, dashboard, ApiContext, BrowserSession, DashboardContext};
use headway_e2e::RunOutcome;

#[derive(Parser, Debug)]
#[command(name = "headway-e2e")]
#[command(about = "Black-box checks for the HeadwayOS API and dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    suite: Suite,
}

#[derive(Subcommand, Debug)]
enum Suite {
    /// REST API checks
    Api,
    /// Dashboard checks against the served HTML
    Dashboard,
    /// Dashboard checks in a headless browser over WebDriver
    Browser,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(cli.suite)) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(suite: Suite) -> anyhow::Result<RunOutcome> {
    let config = HarnessConfig::load(Path::new(CONFIG_FILE))?;

    let outcome = match suite {
        Suite::Api => {
            let mut ctx = ApiContext::new(TargetClient::new(&config.api.http())?);
            api::harness(&config.api).run(&mut ctx).await
        }
        Suite::Dashboard => {
            let mut ctx = DashboardContext {
                client: TargetClient::new(&config.dashboard.http())?,
            };
            dashboard::harness(&config.dashboard)?.run(&mut ctx).await
        }
        Suite::Browser => {
            browser::harness(&config.browser)
                .run_in_session(browser::SETUP_CHECK, BrowserSession::start(config.browser.clone()))
                .await
        }
    };

    Ok(outcome)
}
