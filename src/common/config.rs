//! Harness and product configuration
//!
//! Two optional files feed the run: `smoke.toml` next to the repository root
//! configures the fixture repository and install command, and `product.json`
//! carries the product metadata used to locate executables inside build
//! roots. Both fall back to defaults when absent.

use serde::Deserialize;
use std::path::Path;

use super::{Error, Result};

/// Harness configuration loaded from `smoke.toml`
#[derive(Debug, Deserialize, Default)]
pub struct HarnessConfig {
    /// Fixture repository settings
    #[serde(default)]
    pub fixture: FixtureConfig,
}

/// Fixture repository settings
#[derive(Debug, Deserialize, Clone)]
pub struct FixtureConfig {
    /// URL of the fixture project repository
    #[serde(default = "default_fixture_repository")]
    pub repository: String,

    /// Command used to install the fixture project's dependencies
    #[serde(default = "default_install_command")]
    pub install_command: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            repository: default_fixture_repository(),
            install_command: default_install_command(),
        }
    }
}

fn default_fixture_repository() -> String {
    "https://github.com/microsoft/vscode-smoketest-express".to_string()
}

fn default_install_command() -> String {
    "npm install".to_string()
}

impl FixtureConfig {
    /// Name of the workspace directory inside the sandbox, derived from the
    /// last path segment of the repository URL
    pub fn workspace_name(&self) -> &str {
        self.repository
            .trim_end_matches('/')
            .trim_end_matches(".git")
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("workspace")
    }
}

impl HarnessConfig {
    /// Load configuration from `smoke.toml` under the given root
    ///
    /// Returns default configuration if the file doesn't exist
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("smoke.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

/// Product metadata describing the application under test
///
/// Mirrors the `product.json` the application ships with; only the fields
/// the resolver needs are kept.
#[derive(Debug, Deserialize, Clone)]
pub struct Product {
    /// Short product name, used for the Windows executable
    #[serde(default = "default_name_short", rename = "nameShort")]
    pub name_short: String,

    /// Long product name, used for the macOS application bundle
    #[serde(default = "default_name_long", rename = "nameLong")]
    pub name_long: String,

    /// Lowercase binary name, used on Linux
    #[serde(default = "default_application_name", rename = "applicationName")]
    pub application_name: String,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            name_short: default_name_short(),
            name_long: default_name_long(),
            application_name: default_application_name(),
        }
    }
}

fn default_name_short() -> String {
    "Code - OSS".to_string()
}

fn default_name_long() -> String {
    "Code - OSS".to_string()
}

fn default_application_name() -> String {
    "code-oss".to_string()
}

impl Product {
    /// Load product metadata from `product.json` under the repository root
    ///
    /// Returns defaults if the file doesn't exist
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join("product.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}
