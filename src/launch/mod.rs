//! Launch configuration assembly
//!
//! Merges the parsed options, the resolution outcome and the staged
//! workspace paths into the single immutable configuration handed to the
//! application driver and the run lifecycle.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::options::RunOptions;
use crate::resolve::{Quality, Resolution, ResolvedTarget, SourceMarkers};
use crate::resolve::{CLI_MARKER_ENV, DEV_MARKER_ENV};
use crate::workspace::WorkspacePaths;

/// Log verbosity requested from the application under test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLogLevel {
    Info,
    /// Most detailed level; forced whenever a log file is requested
    Trace,
}

impl fmt::Display for AppLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppLogLevel::Info => write!(f, "info"),
            AppLogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Final merged configuration for one run; read-only once assembled
#[derive(Debug)]
pub struct LaunchConfiguration {
    pub quality: Quality,
    pub target: ResolvedTarget,
    pub paths: WorkspacePaths,
    pub markers: SourceMarkers,
    pub wait_time: Duration,
    pub app_log_level: AppLogLevel,
    pub log_path: Option<PathBuf>,
    pub browser: Option<String>,
    pub filter: Option<String>,
    pub verbose: bool,
    pub remote: bool,
    pub headless: bool,
    pub ci: bool,
}

/// Merge all resolved state into one configuration
pub fn assemble(
    opts: RunOptions,
    resolution: Resolution,
    paths: WorkspacePaths,
) -> LaunchConfiguration {
    let app_log_level = if opts.log.is_some() {
        AppLogLevel::Trace
    } else {
        AppLogLevel::Info
    };

    LaunchConfiguration {
        quality: resolution.quality,
        target: resolution.target,
        paths,
        markers: resolution.markers,
        wait_time: Duration::from_secs(opts.wait_time_seconds),
        app_log_level,
        log_path: opts.log,
        browser: opts.browser,
        filter: opts.filter,
        verbose: opts.verbose,
        remote: opts.remote,
        headless: opts.headless,
        ci: opts.ci,
    }
}

impl LaunchConfiguration {
    /// Export the source markers to the environment for downstream
    /// collaborators; called once, right before the driver starts
    pub fn publish_markers(&self) {
        if self.markers.from_source {
            std::env::set_var(DEV_MARKER_ENV, "1");
        }
        if self.markers.cli_launched {
            std::env::set_var(CLI_MARKER_ENV, "1");
        }
    }

    /// Stable-build executable for comparison runs, when resolved
    pub fn stable_executable(&self) -> Option<&std::path::Path> {
        match &self.target {
            ResolvedTarget::Desktop {
                stable_executable, ..
            } => stable_executable.as_deref(),
            ResolvedTarget::Web { .. } => None,
        }
    }
}
