//! Scenario runner: sequential execution against one shared browser session.
//!
//! One browser session is shared across the whole run, so scenarios execute
//! strictly in sequence and the runner resets the page before each one. A
//! failed check fails its scenario and the run moves on; the aggregate
//! report drives the process exit status.

use std::time::Instant;

use futures::future::BoxFuture;
use tracing::{error, info, warn};

use crate::config::SuiteConfig;
use crate::password_page::PasswordPage;
use crate::result::{ClaveError, ClaveResult};

/// Future returned by a scenario body
pub type ScenarioFuture<'a> = BoxFuture<'a, ClaveResult<()>>;

/// A scenario drives the page adapter and returns `Err` on its first failed
/// check
pub type Scenario = for<'a> fn(&'a mut PasswordPage) -> ScenarioFuture<'a>;

/// Outcome of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Whether every check passed
    pub passed: bool,
    /// Wall-clock duration
    pub duration_ms: u64,
    /// First failure, if any
    pub error: Option<String>,
}

/// Aggregate outcome of a run
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    /// Scenarios executed
    pub total: usize,
    /// Scenarios with every check passing
    pub passed: usize,
    /// Scenarios with a failed check or error
    pub failed: usize,
    /// Per-scenario outcomes in execution order
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    /// Whether the whole run passed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, result: ScenarioResult) {
        self.total += 1;
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Log every outcome plus the totals
    pub fn log_summary(&self) {
        for result in &self.results {
            if result.passed {
                info!(scenario = %result.name, duration_ms = result.duration_ms, "passed");
            } else {
                error!(
                    scenario = %result.name,
                    duration_ms = result.duration_ms,
                    error = result.error.as_deref().unwrap_or(""),
                    "failed"
                );
            }
        }
        info!(
            total = self.total,
            passed = self.passed,
            failed = self.failed,
            "suite finished"
        );
    }
}

/// Runs scenarios sequentially against one page adapter
#[derive(Debug)]
pub struct SuiteRunner {
    page: PasswordPage,
    config: SuiteConfig,
    report: SuiteReport,
}

impl SuiteRunner {
    /// Create a runner over an opened page adapter
    #[must_use]
    pub fn new(page: PasswordPage, config: SuiteConfig) -> Self {
        Self {
            page,
            config,
            report: SuiteReport::default(),
        }
    }

    /// Run one scenario: reset the page, execute, record the outcome.
    ///
    /// A failed reset counts as a scenario failure; the run continues with
    /// the next scenario either way.
    pub async fn run(&mut self, name: &str, scenario: Scenario) {
        info!(scenario = name, "running");
        let started = Instant::now();
        let outcome = match self.page.reset().await {
            Ok(()) => scenario(&mut self.page).await,
            Err(e) => Err(e),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                info!(scenario = name, duration_ms, "passed");
                self.report.record(ScenarioResult {
                    name: name.to_string(),
                    passed: true,
                    duration_ms,
                    error: None,
                });
            }
            Err(e) => {
                error!(scenario = name, duration_ms, error = %e, "failed");
                self.capture_failure(name).await;
                self.report.record(ScenarioResult {
                    name: name.to_string(),
                    passed: false,
                    duration_ms,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    async fn capture_failure(&self, name: &str) {
        if !self.config.take_screenshots {
            return;
        }
        match self.page.session().screenshot().await {
            Ok(bytes) if !bytes.is_empty() => {
                let file = self
                    .config
                    .screenshot_dir
                    .join(format!("{}.png", sanitize(name)));
                let written = std::fs::create_dir_all(&self.config.screenshot_dir)
                    .and_then(|()| std::fs::write(&file, &bytes));
                match written {
                    Ok(()) => info!(path = %file.display(), "failure screenshot saved"),
                    Err(e) => warn!(error = %e, "could not write failure screenshot"),
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "screenshot capture failed"),
        }
    }

    /// Finish the run and return the aggregate report
    #[must_use]
    pub fn finish(self) -> SuiteReport {
        self.report
    }
}

/// One logical check inside a scenario
///
/// # Errors
///
/// Returns [`ClaveError::Assertion`] when the condition is false
pub fn check(condition: bool, message: impl Into<String>) -> ClaveResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ClaveError::Assertion {
            message: message.into(),
        })
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod check_tests {
    use super::*;

    #[test]
    fn test_check_passes() {
        assert!(check(true, "never shown").is_ok());
    }

    #[test]
    fn test_check_fails_with_message() {
        let err = check(false, "length should be 20").unwrap_err();
        assert!(matches!(err, ClaveError::Assertion { .. }));
        assert!(err.to_string().contains("length should be 20"));
    }

    #[test]
    fn test_sanitize_replaces_separators() {
        assert_eq!(sanitize("copy button echoes"), "copy_button_echoes");
    }
}
