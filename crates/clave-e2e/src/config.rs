//! Suite configuration: target URL, wait tiers, password bounds, artifacts.

use std::path::PathBuf;
use std::time::Duration;

/// Target page exercised by the suite.
pub const DEFAULT_BASE_URL: &str = "https://www.security.org/password-generator/";

/// Shortest password length the generator allows.
pub const DEFAULT_MIN_PASSWORD_LENGTH: u32 = 6;

/// Longest password length the generator allows.
pub const DEFAULT_MAX_PASSWORD_LENGTH: u32 = 32;

/// Run-wide configuration for the scenario suite.
///
/// Wait tiers mirror the tiers the scenarios were written against: `short`
/// for cheap probes, `medium` as the default element-lookup budget, `long`
/// for slow first paints.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// URL of the page under test
    pub base_url: String,
    /// Wait budget for cheap probes
    pub short_wait: Duration,
    /// Default wait budget for element lookups
    pub medium_wait: Duration,
    /// Wait budget for slow first paints
    pub long_wait: Duration,
    /// Minimum length the generator clamps to
    pub min_password_length: u32,
    /// Maximum length the generator clamps to
    pub max_password_length: u32,
    /// Capture a screenshot when a scenario fails
    pub take_screenshots: bool,
    /// Directory receiving failure screenshots
    pub screenshot_dir: PathBuf,
    /// Log file path; `None` logs to stderr
    pub log_file: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            short_wait: Duration::from_secs(5),
            medium_wait: Duration::from_secs(10),
            long_wait: Duration::from_secs(15),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            max_password_length: DEFAULT_MAX_PASSWORD_LENGTH,
            take_screenshots: true,
            screenshot_dir: PathBuf::from("screenshots"),
            log_file: None,
        }
    }
}

impl SuiteConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page under test
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set all three wait tiers
    #[must_use]
    pub const fn with_wait_tiers(mut self, short: Duration, medium: Duration, long: Duration) -> Self {
        self.short_wait = short;
        self.medium_wait = medium;
        self.long_wait = long;
        self
    }

    /// Set the length bounds the generator advertises
    #[must_use]
    pub const fn with_length_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_password_length = min;
        self.max_password_length = max;
        self
    }

    /// Toggle failure screenshots and their output directory
    #[must_use]
    pub fn with_screenshots(mut self, enabled: bool, dir: impl Into<PathBuf>) -> Self {
        self.take_screenshots = enabled;
        self.screenshot_dir = dir.into();
        self
    }

    /// Write logs to a file instead of stderr
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Length the page is expected to generate for a requested length.
    ///
    /// Out-of-range requests clamp to the page's advertised bounds.
    #[must_use]
    pub fn expected_length(&self, requested: i64) -> u32 {
        let clamped = requested.clamp(
            i64::from(self.min_password_length),
            i64::from(self.max_password_length),
        );
        clamped as u32
    }
}
