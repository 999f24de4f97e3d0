//! Run lifecycle execution

use colored::Colorize;

use std::path::Path;

use crate::common::{Error, Result};
use crate::driver::ApplicationDriver;
use crate::launch::LaunchConfiguration;
use crate::workspace;

use super::suite::{
    screenshot_name, AreaContext, RunReport, ScenarioFailure, Suite, TestArea,
};

/// Drives one run: register, launch once, execute, stop once, collect logs
pub struct Runner {
    config: LaunchConfiguration,
}

impl Runner {
    pub fn new(config: LaunchConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LaunchConfiguration {
        &self.config
    }

    /// Execute the full lifecycle against the given driver
    pub async fn run(
        &self,
        areas: &[Box<dyn TestArea>],
        driver: &mut dyn ApplicationDriver,
    ) -> Result<RunReport> {
        let mut suite = Suite::new();
        let cx = AreaContext::new(&self.config);
        for area in areas {
            tracing::debug!("registering test area '{}'", area.name());
            area.setup(&mut suite, &cx);
        }
        tracing::info!("{} scenario(s) registered", suite.len());

        // downstream collaborators read these from the environment
        self.config.publish_markers();

        println!(
            "{} {} ({})",
            "Launching".cyan().bold(),
            self.config.target.describe(),
            self.config.quality
        );
        driver.start(self.config.target.is_desktop()).await?;

        let mut report = RunReport::default();
        for scenario in suite.scenarios() {
            let title = scenario.title();
            if let Some(filter) = &self.config.filter {
                if !title.contains(filter.as_str()) {
                    report.skipped += 1;
                    continue;
                }
            }

            match scenario.run(driver).await {
                Ok(()) => {
                    println!("  {} {}", "✓".green(), title);
                    report.passed += 1;
                }
                Err(e) => {
                    println!("  {} {}: {}", "✗".red(), title, e);
                    self.capture_failure_screenshot(driver, title).await;
                    report.failed.push(ScenarioFailure {
                        title: title.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        driver.stop().await?;
        self.collect_logs()?;

        Ok(report)
    }

    /// Best-effort screenshot for a failing scenario
    async fn capture_failure_screenshot(&self, driver: &mut dyn ApplicationDriver, title: &str) {
        if self.config.paths.screenshots.is_none() {
            return;
        }
        let name = screenshot_name(title);
        match driver.capture_screenshot(&name).await {
            Ok(path) => tracing::info!("captured screenshot {}", path.display()),
            Err(e) => tracing::warn!("failed to capture a screenshot for '{title}': {e}"),
        }
    }

    /// Copy the application's log directory next to the requested log file
    fn collect_logs(&self) -> Result<()> {
        let Some(log_path) = &self.config.log_path else {
            return Ok(());
        };

        let source = self.config.paths.user_data.join("logs");
        if !source.is_dir() {
            return Ok(());
        }

        let dest = match log_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
        .join("logs");

        workspace::copy_dir_recursive(&source, &dest)
            .map_err(|e| Error::Cleanup(format!("failed to copy application logs: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::{assemble, LaunchConfiguration};
    use crate::options::RunOptions;
    use crate::resolve::{Quality, Resolution, ResolvedTarget, SourceMarkers};
    use crate::runner::ScenarioHook;
    use crate::workspace::WorkspacePaths;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct MockDriver {
        starts: usize,
        stops: usize,
        screenshots: Vec<String>,
    }

    impl MockDriver {
        fn new() -> Self {
            Self {
                starts: 0,
                stops: 0,
                screenshots: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl ApplicationDriver for MockDriver {
        async fn start(&mut self, _is_desktop: bool) -> Result<()> {
            self.starts += 1;
            Ok(())
        }

        async fn stop(&mut self) -> Result<()> {
            self.stops += 1;
            Ok(())
        }

        async fn is_running(&mut self) -> Result<bool> {
            Ok(self.starts > self.stops)
        }

        async fn capture_screenshot(&mut self, name: &str) -> Result<PathBuf> {
            self.screenshots.push(name.to_string());
            Ok(PathBuf::from(name))
        }
    }

    struct FixedScenario {
        title: &'static str,
        pass: bool,
        runs: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ScenarioHook for FixedScenario {
        fn title(&self) -> &str {
            self.title
        }

        async fn run(&self, _app: &mut dyn ApplicationDriver) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.pass {
                Ok(())
            } else {
                Err(Error::driver("element not found"))
            }
        }
    }

    struct FixedArea {
        runs: Arc<AtomicUsize>,
    }

    impl TestArea for FixedArea {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn setup(&self, suite: &mut Suite, _cx: &AreaContext) {
            suite.register(Box::new(FixedScenario {
                title: "fixed: passes",
                pass: true,
                runs: self.runs.clone(),
            }));
            suite.register(Box::new(FixedScenario {
                title: "fixed: fails (on purpose)",
                pass: false,
                runs: self.runs.clone(),
            }));
        }
    }

    fn config_with(
        screenshots: bool,
        filter: Option<&str>,
    ) -> (LaunchConfiguration, TempDir) {
        let dir = TempDir::new().unwrap();
        let shots = dir.path().join("shots");
        let paths = WorkspacePaths::stage(
            dir.path(),
            "vscode-smoketest-express",
            screenshots.then_some(shots.as_path()),
        )
        .unwrap();
        let opts = RunOptions {
            filter: filter.map(str::to_string),
            ..RunOptions::default()
        };
        let resolution = Resolution {
            target: ResolvedTarget::Desktop {
                executable: PathBuf::from("/opt/app/code-oss"),
                stable_executable: None,
            },
            quality: Quality::Stable,
            markers: SourceMarkers::none(),
        };
        (assemble(opts, resolution, paths), dir)
    }

    #[tokio::test]
    async fn the_application_starts_and_stops_exactly_once() {
        let (config, _dir) = config_with(true, None);
        let runner = Runner::new(config);
        let runs = Arc::new(AtomicUsize::new(0));
        let areas: Vec<Box<dyn TestArea>> = vec![Box::new(FixedArea { runs: runs.clone() })];
        let mut driver = MockDriver::new();

        let report = runner.run(&areas, &mut driver).await.unwrap();

        assert_eq!(driver.starts, 1);
        assert_eq!(driver.stops, 1);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.total(), 2);
        assert!(!report.all_passed());
    }

    #[tokio::test]
    async fn failures_capture_a_normalized_screenshot() {
        let (config, _dir) = config_with(true, None);
        let runner = Runner::new(config);
        let runs = Arc::new(AtomicUsize::new(0));
        let areas: Vec<Box<dyn TestArea>> = vec![Box::new(FixedArea { runs })];
        let mut driver = MockDriver::new();

        runner.run(&areas, &mut driver).await.unwrap();

        assert_eq!(driver.screenshots, vec!["fixed__fails__on_purpose_"]);
    }

    #[tokio::test]
    async fn without_a_screenshots_directory_nothing_is_captured() {
        let (config, _dir) = config_with(false, None);
        let runner = Runner::new(config);
        let runs = Arc::new(AtomicUsize::new(0));
        let areas: Vec<Box<dyn TestArea>> = vec![Box::new(FixedArea { runs })];
        let mut driver = MockDriver::new();

        runner.run(&areas, &mut driver).await.unwrap();

        assert!(driver.screenshots.is_empty());
    }

    #[tokio::test]
    async fn the_filter_skips_non_matching_scenarios() {
        let (config, _dir) = config_with(false, Some("passes"));
        let runner = Runner::new(config);
        let runs = Arc::new(AtomicUsize::new(0));
        let areas: Vec<Box<dyn TestArea>> = vec![Box::new(FixedArea { runs: runs.clone() })];
        let mut driver = MockDriver::new();

        let report = runner.run(&areas, &mut driver).await.unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(report.passed, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.all_passed());
    }

    #[tokio::test]
    async fn logs_are_copied_next_to_the_requested_log_file() {
        let dir = TempDir::new().unwrap();
        let paths = WorkspacePaths::stage(dir.path(), "vscode-smoketest-express", None).unwrap();

        // the application would have written these during the run
        let app_logs = paths.user_data.join("logs");
        std::fs::create_dir_all(&app_logs).unwrap();
        std::fs::write(app_logs.join("main.log"), b"log line").unwrap();

        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        let opts = RunOptions {
            log: Some(out.join("smoke.log")),
            ..RunOptions::default()
        };
        let resolution = Resolution {
            target: ResolvedTarget::Desktop {
                executable: PathBuf::from("/opt/app/code-oss"),
                stable_executable: None,
            },
            quality: Quality::Stable,
            markers: SourceMarkers::none(),
        };
        let runner = Runner::new(assemble(opts, resolution, paths));

        let areas: Vec<Box<dyn TestArea>> = Vec::new();
        let mut driver = MockDriver::new();
        runner.run(&areas, &mut driver).await.unwrap();

        assert_eq!(
            std::fs::read(out.join("logs").join("main.log")).unwrap(),
            b"log line"
        );
    }
}
