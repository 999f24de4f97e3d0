//! Workspace staging
//!
//! Produces the isolated, disposable filesystem sandbox a run operates in:
//! a fresh temporary root holding the fixture workspace, the extensions
//! directory and the user-data directory, plus an optional screenshots
//! directory outside the sandbox.

pub mod fixture;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::common::Result;

/// Directory for extensions installed during the run
pub const EXTENSIONS_DIR: &str = "extensions-dir";

/// Directory the application uses for user data
pub const USER_DATA_DIR: &str = "d";

/// Scoped owner of the temporary directory tree
///
/// Releasing deletes the whole tree recursively. Release is idempotent and
/// never fails the run: a second call, or a tree someone else already
/// removed, is silently tolerated. Dropping an unreleased sandbox releases
/// it, so the tree goes away on every exit path.
pub struct Sandbox {
    dir: Option<TempDir>,
    root: PathBuf,
}

impl Sandbox {
    /// Allocate a fresh temporary directory for this run
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("smoketest-").tempdir()?;
        let root = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Delete the sandbox tree; safe to call more than once
    pub fn release(&mut self) {
        if let Some(dir) = self.dir.take() {
            let _ = dir.close();
        }
    }

    pub fn is_released(&self) -> bool {
        self.dir.is_none()
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        self.release();
    }
}

/// Filesystem locations scoped to one run
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    /// Sandbox root
    pub root: PathBuf,
    /// Workspace directory, named after the fixture project
    pub workspace: PathBuf,
    /// Extensions directory, created eagerly
    pub extensions: PathBuf,
    /// User-data directory, created lazily by the application
    pub user_data: PathBuf,
    /// Screenshots directory, absolute and created eagerly when requested
    pub screenshots: Option<PathBuf>,
}

impl WorkspacePaths {
    /// Derive the run's paths under the sandbox root and create the eager ones
    pub fn stage(root: &Path, workspace_name: &str, screenshots: Option<&Path>) -> Result<Self> {
        let workspace = root.join(workspace_name);
        let extensions = root.join(EXTENSIONS_DIR);
        fs::create_dir_all(&extensions)?;
        let user_data = root.join(USER_DATA_DIR);

        let screenshots = match screenshots {
            Some(path) => {
                let absolute = absolutize(path)?;
                fs::create_dir_all(&absolute)?;
                Some(absolute)
            }
            None => None,
        };

        Ok(Self {
            root: root.to_path_buf(),
            workspace,
            extensions,
            user_data,
            screenshots,
        })
    }
}

/// Resolve a possibly-relative path against the current directory
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Recursively copy a directory tree
pub fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
