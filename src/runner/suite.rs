//! Suite registration types
//!
//! The seams the external test-area modules plug into: an area receives the
//! shared [`Suite`] plus the arguments it cares about and registers its
//! scenarios; the harness never looks inside them.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::common::Result;
use crate::driver::ApplicationDriver;
use crate::launch::LaunchConfiguration;
use crate::resolve::{Quality, ResolvedTarget};

/// A single registered test scenario
#[async_trait]
pub trait ScenarioHook: Send + Sync {
    /// Full scenario title, also used to name failure screenshots
    fn title(&self) -> &str;

    /// Execute the scenario against the shared application handle
    async fn run(&self, app: &mut dyn ApplicationDriver) -> Result<()>;
}

/// A feature area contributing scenarios to the run
pub trait TestArea {
    fn name(&self) -> &'static str;

    /// Register this area's scenarios
    fn setup(&self, suite: &mut Suite, cx: &AreaContext);
}

/// Area-specific arguments handed to every `setup` call
#[derive(Debug, Clone)]
pub struct AreaContext {
    pub quality: Quality,
    pub web: bool,
    pub stable_build: Option<PathBuf>,
    pub browser: Option<String>,
    pub headless: bool,
    pub remote: bool,
}

impl AreaContext {
    pub fn new(config: &LaunchConfiguration) -> Self {
        Self {
            quality: config.quality,
            web: matches!(config.target, ResolvedTarget::Web { .. }),
            stable_build: config.stable_executable().map(PathBuf::from),
            browser: config.browser.clone(),
            headless: config.headless,
            remote: config.remote,
        }
    }
}

/// Ordered collection of scenarios for one run
#[derive(Default)]
pub struct Suite {
    scenarios: Vec<Box<dyn ScenarioHook>>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scenario: Box<dyn ScenarioHook>) {
        self.scenarios.push(scenario);
    }

    pub fn scenarios(&self) -> &[Box<dyn ScenarioHook>] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// A scenario that did not pass
#[derive(Debug)]
pub struct ScenarioFailure {
    pub title: String,
    pub message: String,
}

/// Outcome of one run
#[derive(Debug, Default)]
pub struct RunReport {
    pub passed: usize,
    pub failed: Vec<ScenarioFailure>,
    pub skipped: usize,
}

impl RunReport {
    /// Scenarios that actually executed
    pub fn total(&self) -> usize {
        self.passed + self.failed.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Screenshot file name for a failing scenario: the full title with every
/// non-alphanumeric character normalized to an underscore
pub fn screenshot_name(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screenshot_names_normalize_to_underscores() {
        assert_eq!(
            screenshot_name("explorer: opens a file (quick access)"),
            "explorer__opens_a_file__quick_access_"
        );
        assert_eq!(screenshot_name("plain"), "plain");
        assert_eq!(screenshot_name("data-migration"), "data_migration");
    }
}
