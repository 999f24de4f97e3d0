//! Fixture project population
//!
//! Materializes the fixture project into the workspace directory: either a
//! recursive copy of a local checkout, or a clone of the fixture repository
//! that is fetched, hard-reset and cleaned on re-runs so staging stays
//! idempotent. Afterwards the fixture's dependencies are installed with
//! output streamed to the console; a non-zero exit is fatal.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use colored::Colorize;
use tokio::process::Command as TokioCommand;

use crate::common::config::FixtureConfig;
use crate::common::{Error, Result};

const NO_ARGS: &[&OsStr] = &[];

/// Where the fixture project comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureSource {
    /// Copy an existing local checkout
    Local(PathBuf),
    /// Clone from this URL instead of the configured repository
    Remote(String),
    /// Clone from the configured repository
    Default,
}

impl FixtureSource {
    /// Classify the `--test-repo` value: URLs clone, everything else copies
    pub fn from_option(test_repo: Option<&str>) -> Self {
        match test_repo {
            None => FixtureSource::Default,
            Some(value)
                if value.starts_with("http://")
                    || value.starts_with("https://")
                    || value.starts_with("ssh://")
                    || value.starts_with("git@") =>
            {
                FixtureSource::Remote(value.to_string())
            }
            Some(value) => FixtureSource::Local(PathBuf::from(value)),
        }
    }
}

/// Populate the workspace directory and install fixture dependencies
pub async fn stage(
    workspace: &Path,
    source: &FixtureSource,
    config: &FixtureConfig,
) -> Result<()> {
    match source {
        FixtureSource::Local(path) => copy_local_fixture(path, workspace).await?,
        FixtureSource::Remote(url) => clone_or_refresh(url, workspace).await?,
        FixtureSource::Default => clone_or_refresh(&config.repository, workspace).await?,
    }

    install_dependencies(workspace, &config.install_command).await
}

/// Replace the workspace with a copy of a local fixture checkout
async fn copy_local_fixture(source: &Path, workspace: &Path) -> Result<()> {
    if workspace.exists() {
        std::fs::remove_dir_all(workspace)?;
    }

    println!(
        "{} {}",
        "Copying fixture project from".cyan(),
        source.display()
    );

    let status = if cfg!(windows) {
        TokioCommand::new("xcopy")
            .args(["/E", "/I", "/Q", "/Y"])
            .arg(source)
            .arg(workspace)
            .status()
            .await
    } else {
        TokioCommand::new("cp")
            .arg("-R")
            .arg(source)
            .arg(workspace)
            .status()
            .await
    };

    let status =
        status.map_err(|e| Error::fixture(format!("failed to run the copy command: {e}")))?;
    if !status.success() {
        return Err(Error::fixture(format!(
            "copying '{}' into the workspace failed with {status}",
            source.display()
        )));
    }
    Ok(())
}

/// Clone the fixture repository, or bring an existing clone back to a
/// pristine checkout of the fetched head
async fn clone_or_refresh(url: &str, workspace: &Path) -> Result<()> {
    let git = which::which("git").map_err(|_| Error::ToolNotFound {
        tool: "git".to_string(),
    })?;

    if !workspace.exists() {
        println!("{} {}", "Cloning fixture repository".cyan(), url);
        run_git(
            &git,
            None,
            "clone",
            &[OsStr::new(url), workspace.as_os_str()],
        )
        .await
    } else {
        println!("{}", "Refreshing fixture repository".cyan());
        run_git(&git, Some(workspace), "fetch", NO_ARGS).await?;
        run_git(
            &git,
            Some(workspace),
            "reset",
            &[OsStr::new("--hard"), OsStr::new("FETCH_HEAD")],
        )
        .await?;
        run_git(&git, Some(workspace), "clean", &[OsStr::new("-xdf")]).await
    }
}

async fn run_git<I, S>(git: &Path, cwd: Option<&Path>, verb: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = TokioCommand::new(git);
    command.arg(verb).args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let status = command
        .status()
        .await
        .map_err(|e| Error::fixture(format!("failed to run 'git {verb}': {e}")))?;
    if !status.success() {
        return Err(Error::fixture(format!("'git {verb}' exited with {status}")));
    }
    Ok(())
}

/// Install the fixture project's dependencies, streaming output to the console
async fn install_dependencies(workspace: &Path, install_command: &str) -> Result<()> {
    let mut parts = install_command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(Error::Config(
            "fixture install command is empty".to_string(),
        ));
    };
    let program = which::which(program).map_err(|_| Error::ToolNotFound {
        tool: program.to_string(),
    })?;

    println!(
        "{} {}",
        "Installing fixture dependencies:".cyan(),
        install_command
    );

    let status = TokioCommand::new(program)
        .args(parts)
        .current_dir(workspace)
        .status()
        .await
        .map_err(|e| Error::fixture(format!("failed to run '{install_command}': {e}")))?;
    if !status.success() {
        return Err(Error::fixture(format!(
            "'{install_command}' exited with {status}"
        )));
    }
    Ok(())
}
