//! Sequential check runner, summary and report

use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::check::Check;
use crate::error::{HarnessError, HarnessResult};
use crate::ledger::RunLedger;
use crate::report::{rule, Report};

// `run_in_session` closes the session by catching the unwind of a panicking check.
#[cfg(panic = "abort")]
compile_error!("headway-e2e must be built with panic = \"unwind\"");

/// A context holding an exclusive resource that must be released after the run
#[async_trait]
pub trait Session: Send {
    async fn close(self) -> HarnessResult<()>;
}

/// Result of a complete run
#[derive(Debug)]
pub struct RunOutcome {
    pub report: Report,
    pub report_path: PathBuf,
    /// Set when the report could not be persisted
    pub write_error: Option<HarnessError>,
}

impl RunOutcome {
    pub fn all_passed(&self) -> bool {
        self.report.summary.all_passed()
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Ordered catalog of checks sharing one context type
pub struct Harness<C: Send> {
    title: String,
    target: String,
    report_path: PathBuf,
    checks: Vec<Box<dyn Check<C>>>,
}

impl<C: Send> Harness<C> {
    pub fn new(title: impl Into<String>, target: impl Into<String>, report_path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            target: target.into(),
            report_path: report_path.into(),
            checks: Vec::new(),
        }
    }

    /// Append a check; execution follows insertion order
    pub fn check(mut self, check: impl Check<C> + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub fn print_banner(&self) {
        println!("🚀 Starting {}", self.title);
        println!("📍 Testing against: {}", self.target);
        println!("{}", rule());
    }

    /// Run every check once, in order, logging exactly one result each
    pub async fn run_checks(&self, ctx: &mut C, ledger: &mut RunLedger) {
        info!("Running {} check(s)...", self.checks.len());

        for check in &self.checks {
            let start = Instant::now();
            debug!("Running check: {}", check.name());

            match check.run(ctx).await {
                Ok(verdict) => {
                    ledger.log(check.name(), verdict.success, verdict.message, verdict.response);
                }
                Err(e) => {
                    warn!("{} errored: {}", check.name(), e);
                    ledger.log(
                        check.name(),
                        false,
                        format!("{}: {}", check.error_prefix(), e),
                        None,
                    );
                }
            }

            debug!("{} finished in {} ms", check.name(), start.elapsed().as_millis());
        }
    }

    /// Print the summary and persist the report
    pub fn finish(&self, ledger: RunLedger) -> RunOutcome {
        let report = Report::from_ledger(ledger);
        print!("{}", report.render_summary());

        let write_error = match report.write(&self.report_path) {
            Ok(()) => {
                println!();
                println!("📄 Detailed results saved to: {}", self.report_path.display());
                None
            }
            Err(e) => {
                error!("{}", e);
                eprintln!("❌ {}", e);
                Some(e)
            }
        };

        RunOutcome {
            report,
            report_path: self.report_path.clone(),
            write_error,
        }
    }

    /// Banner, all checks against `ctx`, summary and report
    pub async fn run(&self, ctx: &mut C) -> RunOutcome {
        self.print_banner();
        let mut ledger = RunLedger::new();
        self.run_checks(ctx, &mut ledger).await;
        self.finish(ledger)
    }
}

impl<S: Session> Harness<S> {
    /// Like [`Harness::run`], but the context comes from a one-time setup step.
    ///
    /// A failed setup is logged under `setup_name` and no checks run. Once the
    /// session exists it is closed on every path out, panics included.
    pub async fn run_in_session<F>(&self, setup_name: &str, setup: F) -> RunOutcome
    where
        F: Future<Output = HarnessResult<S>>,
    {
        self.print_banner();
        let mut ledger = RunLedger::new();

        match setup.await {
            Ok(mut session) => {
                let run = AssertUnwindSafe(self.run_checks(&mut session, &mut ledger))
                    .catch_unwind()
                    .await;

                if let Err(e) = session.close().await {
                    warn!("Failed to close session: {}", e);
                }
                if let Err(panic) = run {
                    std::panic::resume_unwind(panic);
                }
            }
            Err(e) => {
                error!("{} failed: {}", setup_name, e);
                ledger.log(setup_name, false, e.to_string(), None);
            }
        }

        self.finish(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Verdict;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        outcome: fn() -> HarnessResult<Verdict>,
    }

    #[async_trait]
    impl Check<Vec<&'static str>> for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self, ctx: &mut Vec<&'static str>) -> HarnessResult<Verdict> {
            ctx.push(self.name);
            (self.outcome)()
        }
    }

    fn harness(dir: &Path) -> Harness<Vec<&'static str>> {
        Harness::new("Unit Checks", "nowhere", dir.join("report.json"))
            .check(Fixed { name: "first", outcome: || Ok(Verdict::pass("fine")) })
            .check(Fixed {
                name: "second",
                outcome: || Err(HarnessError::Io(std::io::Error::other("boom"))),
            })
            .check(Fixed { name: "third", outcome: || Ok(Verdict::fail("nope")) })
    }

    #[tokio::test]
    async fn test_run_logs_one_result_per_check_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let harness = harness(dir.path());
        let mut order = Vec::new();

        let outcome = harness.run(&mut order).await;

        assert_eq!(order, ["first", "second", "third"]);
        assert_eq!(harness.check_names(), ["first", "second", "third"]);
        let tests = &outcome.report.tests;
        assert_eq!(tests.len(), 3);
        assert_eq!(tests[1].message, "Request failed: IO error: boom");
        assert_eq!(outcome.report.summary.passed, 1);
        assert_eq!(outcome.report.summary.failed, 2);
        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.write_error.is_none());
    }

    struct Tracked {
        closed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Session for Tracked {
        async fn close(self) -> HarnessResult<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Passes;

    #[async_trait]
    impl Check<Tracked> for Passes {
        fn name(&self) -> &str {
            "passes"
        }

        async fn run(&self, _ctx: &mut Tracked) -> HarnessResult<Verdict> {
            Ok(Verdict::pass("ok"))
        }
    }

    #[tokio::test]
    async fn test_session_closed_after_run() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let harness = Harness::new("Session", "nowhere", dir.path().join("r.json")).check(Passes);

        let session = Tracked { closed: closed.clone() };
        let outcome = harness.run_in_session("Setup", async { Ok(session) }).await;

        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(outcome.exit_code(), 0);
    }

    struct Panics;

    #[async_trait]
    impl Check<Tracked> for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        async fn run(&self, _ctx: &mut Tracked) -> HarnessResult<Verdict> {
            panic!("check bug");
        }
    }

    #[tokio::test]
    async fn test_session_closed_when_check_panics() {
        let dir = tempfile::tempdir().unwrap();
        let closed = Arc::new(AtomicBool::new(false));
        let harness = Harness::new("Session", "nowhere", dir.path().join("r.json"))
            .check(Passes)
            .check(Panics)
            .check(Passes);

        let session = Tracked { closed: closed.clone() };
        let run = AssertUnwindSafe(harness.run_in_session("Setup", async { Ok(session) }))
            .catch_unwind()
            .await;

        assert!(run.is_err(), "panic should propagate after cleanup");
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_setup_failure_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new("Session", "nowhere", dir.path().join("r.json"))
            .check(Passes)
            .check(Passes);

        let outcome = harness
            .run_in_session("Driver Setup", async {
                Err::<Tracked, _>(HarnessError::Setup("no browser".into()))
            })
            .await;

        let tests = &outcome.report.tests;
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name, "Driver Setup");
        assert_eq!(outcome.exit_code(), 1);
        assert!(Report::load(&dir.path().join("r.json")).is_ok());
    }
}
