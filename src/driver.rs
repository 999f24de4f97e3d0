//! Application driver seam
//!
//! The runner only ever talks to [`ApplicationDriver`]; richer automation
//! libraries implement the trait for real UI interaction. The crate ships a
//! process-backed default that spawns the resolved executable against the
//! staged workspace, enough to exercise the full lifecycle end to end.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command as TokioCommand};

use crate::common::{Error, Result};
use crate::launch::LaunchConfiguration;
use crate::resolve::ResolvedTarget;

/// How long the spawned process must stay alive before it counts as started
const STARTUP_GRACE: Duration = Duration::from_millis(1500);

/// Driver for the application under test
///
/// Started exactly once and stopped exactly once per run, regardless of how
/// many scenarios execute in between.
#[async_trait]
pub trait ApplicationDriver: Send {
    /// Launch the application
    async fn start(&mut self, is_desktop: bool) -> Result<()>;

    /// Stop the application; tolerates an application that already exited
    async fn stop(&mut self) -> Result<()>;

    /// Whether the application is still alive
    async fn is_running(&mut self) -> Result<bool>;

    /// Capture a screenshot under the given (already normalized) name,
    /// returning the path it was written to
    async fn capture_screenshot(&mut self, name: &str) -> Result<PathBuf>;
}

/// Process-backed default driver: spawn on start, kill on stop
pub struct ProcessDriver {
    executable: PathBuf,
    args: Vec<String>,
    wait_time: Duration,
    child: Option<Child>,
}

impl ProcessDriver {
    pub fn new(executable: PathBuf, args: Vec<String>, wait_time: Duration) -> Self {
        Self {
            executable,
            args,
            wait_time,
            child: None,
        }
    }

    /// Build a driver for the resolved target
    ///
    /// Web mode without a server path has no executable to spawn; running
    /// that flow needs an external automation driver instead.
    pub fn from_config(config: &LaunchConfiguration) -> Result<Self> {
        let (executable, args) = match &config.target {
            ResolvedTarget::Desktop { executable, .. } => {
                let mut args = vec![
                    format!("--user-data-dir={}", config.paths.user_data.display()),
                    format!("--extensions-dir={}", config.paths.extensions.display()),
                    format!("--log={}", config.app_log_level),
                ];
                args.push(config.paths.workspace.display().to_string());
                (executable.clone(), args)
            }
            ResolvedTarget::Web {
                server: Some(server),
            } => {
                let mut args = Vec::new();
                if config.headless {
                    args.push("--headless".to_string());
                }
                (server.clone(), args)
            }
            ResolvedTarget::Web { server: None } => {
                return Err(Error::Config(
                    "web mode without a server path requires an external driver; \
                     pass --build or set the remote server environment variable"
                        .to_string(),
                ));
            }
        };

        Ok(Self::new(executable, args, config.wait_time))
    }
}

#[async_trait]
impl ApplicationDriver for ProcessDriver {
    async fn start(&mut self, _is_desktop: bool) -> Result<()> {
        if self.child.is_some() {
            return Err(Error::driver("application already started"));
        }

        tracing::debug!("spawning {} {:?}", self.executable.display(), self.args);
        let mut child = TokioCommand::new(&self.executable)
            .args(&self.args)
            .spawn()
            .map_err(|e| {
                Error::driver(format!(
                    "failed to spawn '{}': {e}",
                    self.executable.display()
                ))
            })?;

        // the process must survive the startup grace window
        let deadline = tokio::time::Instant::now() + STARTUP_GRACE;
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| Error::driver(format!("failed to poll the application: {e}")))?
            {
                return Err(Error::driver(format!(
                    "application exited during startup with {status}"
                )));
            }
            if tokio::time::Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        self.child = Some(child);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if child
            .try_wait()
            .map_err(|e| Error::driver(format!("failed to poll the application: {e}")))?
            .is_some()
        {
            return Ok(());
        }

        child
            .start_kill()
            .map_err(|e| Error::driver(format!("failed to stop the application: {e}")))?;

        match tokio::time::timeout(self.wait_time, child.wait()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(Error::driver(format!(
                "failed to wait for the application to exit: {e}"
            ))),
            Err(_) => Err(Error::driver(format!(
                "application did not exit within {} seconds",
                self.wait_time.as_secs()
            ))),
        }
    }

    async fn is_running(&mut self) -> Result<bool> {
        match &mut self.child {
            Some(child) => {
                let exited = child
                    .try_wait()
                    .map_err(|e| Error::driver(format!("failed to poll the application: {e}")))?;
                Ok(exited.is_none())
            }
            None => Ok(false),
        }
    }

    async fn capture_screenshot(&mut self, _name: &str) -> Result<PathBuf> {
        Err(Error::driver(
            "screenshot capture is not supported by the process driver",
        ))
    }
}
