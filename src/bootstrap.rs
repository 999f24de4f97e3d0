//! Run bootstrap
//!
//! The once-per-process sequence: resolve the build under test, stage the
//! sandbox and fixture, assemble the launch configuration and hand the run
//! to the lifecycle. Configuration errors surface here, before anything is
//! registered.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;

use crate::areas;
use crate::common::config::{HarnessConfig, Product};
use crate::common::{Error, Result};
use crate::driver::ProcessDriver;
use crate::launch;
use crate::options::RunOptions;
use crate::resolve::{self, Platform};
use crate::runner::Runner;
use crate::workspace::fixture::{self, FixtureSource};
use crate::workspace::{Sandbox, WorkspacePaths};

/// Upper bound on the whole setup phase; past this the run counts as hung
const SETUP_TIMEOUT_SECS: u64 = 300;

/// Execute one smoke run from parsed options
pub async fn run(opts: RunOptions) -> Result<()> {
    let platform = Platform::current();
    let repo_root = resolve::find_repo_root();
    let harness = HarnessConfig::load(&repo_root)?;
    let product = Product::load(&repo_root)?;
    let remote_server = std::env::var_os(resolve::REMOTE_SERVER_ENV).map(PathBuf::from);

    let resolution = resolve::resolve(
        &opts,
        platform,
        &product,
        &repo_root,
        remote_server.as_deref(),
    )?;
    tracing::info!(
        "resolved {} at quality '{}'",
        resolution.target.describe(),
        resolution.quality
    );

    let mut sandbox = Sandbox::create()?;
    let paths = WorkspacePaths::stage(
        sandbox.root(),
        harness.fixture.workspace_name(),
        opts.screenshots.as_deref(),
    )?;
    tracing::info!("staged sandbox at {}", sandbox.root().display());

    // web runs work against the served workspace and skip the fixture
    if !opts.web {
        let source = FixtureSource::from_option(opts.test_repo.as_deref());
        tokio::time::timeout(
            Duration::from_secs(SETUP_TIMEOUT_SECS),
            fixture::stage(&paths.workspace, &source, &harness.fixture),
        )
        .await
        .map_err(|_| Error::SetupTimeout(SETUP_TIMEOUT_SECS))??;
    }

    let config = launch::assemble(opts, resolution, paths);
    let mut driver = ProcessDriver::from_config(&config)?;
    let runner = Runner::new(config);
    let areas = areas::builtin();

    let outcome = runner.run(&areas, &mut driver).await;
    sandbox.release();
    let report = outcome?;

    if report.all_passed() {
        println!(
            "\n{} {} scenario(s) passed{}",
            "✓".green().bold(),
            report.passed,
            if report.skipped > 0 {
                format!(", {} skipped", report.skipped)
            } else {
                String::new()
            }
        );
        Ok(())
    } else {
        println!(
            "\n{} {} of {} scenario(s) failed",
            "✗".red().bold(),
            report.failed.len(),
            report.total()
        );
        for failure in &report.failed {
            println!("  {} {}: {}", "✗".red(), failure.title, failure.message);
        }
        Err(Error::ScenariosFailed {
            failed: report.failed.len(),
            total: report.total(),
        })
    }
}
