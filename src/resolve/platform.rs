//! Platform strategy for executable-path resolution
//!
//! Each supported platform knows where the application executable lives
//! inside a packaged build root and inside a from-source checkout. Anything
//! else is an explicit `Unsupported` variant so resolution stays total.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::common::config::Product;
use crate::common::{Error, Result};

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Unsupported,
}

impl Platform {
    /// Get the current platform
    pub fn current() -> Self {
        #[cfg(target_os = "linux")]
        return Platform::Linux;

        #[cfg(target_os = "macos")]
        return Platform::MacOs;

        #[cfg(target_os = "windows")]
        return Platform::Windows;

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        return Platform::Unsupported;
    }

    /// Executable location inside a packaged build root
    pub fn build_executable(&self, root: &Path, product: &Product) -> Result<PathBuf> {
        match self {
            Platform::MacOs => Ok(root.join("Contents").join("MacOS").join("Electron")),
            Platform::Linux => Ok(root.join(&product.application_name)),
            Platform::Windows => Ok(root.join(format!("{}.exe", product.name_short))),
            Platform::Unsupported => Err(Error::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            )),
        }
    }

    /// Executable location for a from-source development build
    pub fn dev_executable(&self, repo_root: &Path, product: &Product) -> Result<PathBuf> {
        let build_dir = repo_root.join(".build").join("electron");
        match self {
            Platform::MacOs => Ok(build_dir
                .join(format!("{}.app", product.name_long))
                .join("Contents")
                .join("MacOS")
                .join("Electron")),
            Platform::Linux => Ok(build_dir.join(&product.application_name)),
            Platform::Windows => Ok(build_dir.join(format!("{}.exe", product.name_short))),
            Platform::Unsupported => Err(Error::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            )),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Unsupported => write!(f, "unsupported"),
        }
    }
}
