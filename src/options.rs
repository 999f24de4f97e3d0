//! CLI option parsing
//!
//! Parsing is permissive: flags the harness doesn't recognize are ignored so
//! that wrapper scripts can pass their own options through. Absent or
//! malformed values fall back to defaults here; whether a required path is
//! actually present is decided downstream by the resolver.

use clap::Parser;
use std::path::PathBuf;

/// Default number of seconds to wait on the application during setup
pub const DEFAULT_WAIT_TIME_SECS: u64 = 20;

#[derive(Parser, Debug)]
#[command(name = "smoke", about = "End-to-end smoke tests for the editor application")]
#[command(version, long_about = None, ignore_errors = true)]
struct Opts {
    /// Browser to run the web scenarios against
    #[arg(long)]
    browser: Option<String>,

    /// Root directory of the packaged build under test
    #[arg(long)]
    build: Option<PathBuf>,

    /// Root directory of a stable build, for migration comparison runs
    #[arg(long = "stable-build")]
    stable_build: Option<PathBuf>,

    /// Seconds to wait on the application during setup
    #[arg(long = "wait-time")]
    wait_time: Option<String>,

    /// Local path or URL of the fixture project repository
    #[arg(long = "test-repo")]
    test_repo: Option<String>,

    /// Directory to store failure screenshots in
    #[arg(long)]
    screenshots: Option<PathBuf>,

    /// Write a detailed log file at this path
    #[arg(long)]
    log: Option<PathBuf>,

    /// Only run scenarios whose title contains this substring
    #[arg(long)]
    filter: Option<String>,

    /// Log harness output to the console
    #[arg(long)]
    verbose: bool,

    /// Exercise the remote connection flow
    #[arg(long)]
    remote: bool,

    /// Test the web build instead of the desktop one
    #[arg(long)]
    web: bool,

    /// Run the browser without a visible window (web mode)
    #[arg(long)]
    headless: bool,

    /// Running on a continuous-integration agent
    #[arg(long)]
    ci: bool,
}

/// Parsed run options, immutable for the rest of the run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub browser: Option<String>,
    pub build: Option<PathBuf>,
    pub stable_build: Option<PathBuf>,
    pub wait_time_seconds: u64,
    pub test_repo: Option<String>,
    pub screenshots: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub filter: Option<String>,
    pub verbose: bool,
    pub remote: bool,
    pub web: bool,
    pub headless: bool,
    pub ci: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            browser: None,
            build: None,
            stable_build: None,
            wait_time_seconds: DEFAULT_WAIT_TIME_SECS,
            test_repo: None,
            screenshots: None,
            log: None,
            filter: None,
            verbose: false,
            remote: false,
            web: false,
            headless: false,
            ci: false,
        }
    }
}

impl RunOptions {
    /// Parse the process arguments
    pub fn from_args() -> Self {
        Opts::parse().into()
    }

    #[cfg(test)]
    fn try_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Opts::try_parse_from(args).map(Self::from)
    }
}

impl From<Opts> for RunOptions {
    fn from(opts: Opts) -> Self {
        let wait_time_seconds = opts
            .wait_time
            .as_deref()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_WAIT_TIME_SECS);

        Self {
            browser: opts.browser,
            build: opts.build,
            stable_build: opts.stable_build,
            wait_time_seconds,
            test_repo: opts.test_repo,
            screenshots: opts.screenshots,
            log: opts.log,
            filter: opts.filter,
            verbose: opts.verbose,
            remote: opts.remote,
            web: opts.web,
            headless: opts.headless,
            ci: opts.ci,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_time_parses_as_integer() {
        let opts = RunOptions::try_from_iter(["smoke", "--wait-time", "30"]).unwrap();
        assert_eq!(opts.wait_time_seconds, 30);
    }

    #[test]
    fn wait_time_falls_back_to_default() {
        let opts = RunOptions::try_from_iter(["smoke", "--wait-time", "abc"]).unwrap();
        assert_eq!(opts.wait_time_seconds, DEFAULT_WAIT_TIME_SECS);

        let opts = RunOptions::try_from_iter(["smoke"]).unwrap();
        assert_eq!(opts.wait_time_seconds, DEFAULT_WAIT_TIME_SECS);
    }

    #[test]
    fn boolean_flags_default_to_false() {
        let opts = RunOptions::try_from_iter(["smoke"]).unwrap();
        assert!(!opts.verbose);
        assert!(!opts.remote);
        assert!(!opts.web);
        assert!(!opts.headless);
        assert!(!opts.ci);
    }

    #[test]
    fn unrecognized_flags_are_ignored() {
        let opts =
            RunOptions::try_from_iter(["smoke", "--build", "/opt/build", "--frobnicate"]).unwrap();
        assert_eq!(opts.build.as_deref(), Some(std::path::Path::new("/opt/build")));
    }

    #[test]
    fn string_options_parse() {
        let opts = RunOptions::try_from_iter([
            "smoke",
            "--browser",
            "chromium",
            "--stable-build",
            "/opt/stable",
            "--test-repo",
            "/fixtures/express",
            "--screenshots",
            "./shots",
            "--log",
            "out/smoke.log",
            "--web",
            "--headless",
        ])
        .unwrap();

        assert_eq!(opts.browser.as_deref(), Some("chromium"));
        assert_eq!(
            opts.stable_build.as_deref(),
            Some(std::path::Path::new("/opt/stable"))
        );
        assert_eq!(opts.test_repo.as_deref(), Some("/fixtures/express"));
        assert!(opts.web);
        assert!(opts.headless);
    }
}
