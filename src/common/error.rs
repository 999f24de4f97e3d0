//! Error types for the smoke harness
//!
//! Configuration errors are fatal and reported before any test registration;
//! everything else surfaces through the runner.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the smoke harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("can't find the application executable at '{}'. Pass --build pointing at a build root, or build the application from source first", .0.display())]
    MissingExecutable(PathBuf),

    #[error("can't find the web server at '{}'", .0.display())]
    MissingServer(PathBuf),

    #[error("unsupported platform '{0}': smoke tests run on macOS, Linux and Windows only")]
    UnsupportedPlatform(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("required tool '{tool}' not found on PATH")]
    ToolNotFound { tool: String },

    // === Fixture Errors ===
    #[error("fixture repository error: {0}")]
    Fixture(String),

    #[error("setup did not complete within {0} seconds")]
    SetupTimeout(u64),

    // === Driver Errors ===
    #[error("application driver error: {0}")]
    Driver(String),

    // === Run Errors ===
    #[error("{failed} of {total} scenario(s) failed")]
    ScenariosFailed { failed: usize, total: usize },

    // === Cleanup Errors ===
    #[error("cleanup error: {0}")]
    Cleanup(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a driver error from anything displayable
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Create a fixture error from anything displayable
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture(message.into())
    }
}
