//! Target resolution
//!
//! Decides which build of the application a run exercises and classifies it
//! into a release channel. Desktop and web resolution are mutually
//! exclusive, selected by the `--web` flag. Resolution is a pure function of
//! its inputs; the source markers it computes are only published to the
//! environment later, at the driver boundary.

mod platform;
mod quality;

pub use platform::Platform;
pub use quality::{classify_desktop, classify_web, Quality};

use std::path::{Path, PathBuf};

use crate::common::config::Product;
use crate::common::{Error, Result};
use crate::options::RunOptions;

/// Environment variable carrying the web server path when no build is given
pub const REMOTE_SERVER_ENV: &str = "VSCODE_REMOTE_SERVER_PATH";

/// Marker telling downstream collaborators the application runs from source
pub const DEV_MARKER_ENV: &str = "VSCODE_DEV";

/// Marker telling downstream collaborators the application was CLI-launched
pub const CLI_MARKER_ENV: &str = "VSCODE_CLI";

/// Source-mode signals threaded through the configuration instead of being
/// written to the process environment during resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceMarkers {
    pub from_source: bool,
    pub cli_launched: bool,
}

impl SourceMarkers {
    pub fn from_source() -> Self {
        Self {
            from_source: true,
            cli_launched: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// The build a run exercises
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    Desktop {
        executable: PathBuf,
        stable_executable: Option<PathBuf>,
    },
    Web {
        server: Option<PathBuf>,
    },
}

impl ResolvedTarget {
    pub fn is_desktop(&self) -> bool {
        matches!(self, ResolvedTarget::Desktop { .. })
    }

    /// Human-readable description for startup logging
    pub fn describe(&self) -> String {
        match self {
            ResolvedTarget::Desktop { executable, .. } => {
                format!("desktop build at {}", executable.display())
            }
            ResolvedTarget::Web { server: Some(path) } => {
                format!("web server at {}", path.display())
            }
            ResolvedTarget::Web { server: None } => "web build from sources".to_string(),
        }
    }
}

/// Outcome of target resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub target: ResolvedTarget,
    pub quality: Quality,
    pub markers: SourceMarkers,
}

/// Resolve the build under test
pub fn resolve(
    opts: &RunOptions,
    platform: Platform,
    product: &Product,
    repo_root: &Path,
    remote_server: Option<&Path>,
) -> Result<Resolution> {
    if opts.web {
        resolve_web(opts, remote_server)
    } else {
        resolve_desktop(opts, platform, product, repo_root)
    }
}

fn resolve_desktop(
    opts: &RunOptions,
    platform: Platform,
    product: &Product,
    repo_root: &Path,
) -> Result<Resolution> {
    if let Some(build_root) = &opts.build {
        let executable = platform.build_executable(build_root, product)?;
        if !executable.exists() {
            return Err(Error::MissingExecutable(executable));
        }

        let stable_executable = match &opts.stable_build {
            Some(stable_root) => {
                let stable = platform.build_executable(stable_root, product)?;
                if !stable.exists() {
                    return Err(Error::MissingExecutable(stable));
                }
                Some(stable)
            }
            None => None,
        };

        let quality = classify_desktop(false, &executable);
        Ok(Resolution {
            target: ResolvedTarget::Desktop {
                executable,
                stable_executable,
            },
            quality,
            markers: SourceMarkers::none(),
        })
    } else {
        let executable = platform.dev_executable(repo_root, product)?;
        if !executable.exists() {
            return Err(Error::MissingExecutable(executable));
        }

        let quality = classify_desktop(true, &executable);
        Ok(Resolution {
            target: ResolvedTarget::Desktop {
                executable,
                stable_executable: None,
            },
            quality,
            markers: SourceMarkers::from_source(),
        })
    }
}

fn resolve_web(opts: &RunOptions, remote_server: Option<&Path>) -> Result<Resolution> {
    let candidate = opts
        .build
        .clone()
        .or_else(|| remote_server.map(Path::to_path_buf));

    match candidate {
        Some(server) => {
            if !server.exists() {
                return Err(Error::MissingServer(server));
            }
            Ok(Resolution {
                target: ResolvedTarget::Web {
                    server: Some(server),
                },
                quality: classify_web(false),
                markers: SourceMarkers::none(),
            })
        }
        None => Ok(Resolution {
            target: ResolvedTarget::Web { server: None },
            quality: classify_web(true),
            markers: SourceMarkers::from_source(),
        }),
    }
}

/// Locate the repository root by walking up from the current directory
///
/// A directory containing `product.json` or `.git` counts as the root; the
/// current directory is the fallback.
pub fn find_repo_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut dir = cwd.clone();
    loop {
        if dir.join("product.json").exists() || dir.join(".git").exists() {
            return dir;
        }
        if !dir.pop() {
            return cwd;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn opts_with_build(build: &Path) -> RunOptions {
        RunOptions {
            build: Some(build.to_path_buf()),
            ..RunOptions::default()
        }
    }

    #[test]
    fn linux_build_root_with_insiders_marker_resolves_to_insiders() {
        let dir = tempdir().unwrap();
        let build_root = dir.path().join("app-insiders");
        touch(&build_root.join("code-oss"));

        let resolution = resolve(
            &opts_with_build(&build_root),
            Platform::Linux,
            &Product::default(),
            dir.path(),
            None,
        )
        .unwrap();

        assert_eq!(resolution.quality, Quality::Insiders);
        assert_eq!(resolution.markers, SourceMarkers::none());
        assert_eq!(
            resolution.target,
            ResolvedTarget::Desktop {
                executable: build_root.join("code-oss"),
                stable_executable: None,
            }
        );
    }

    #[test]
    fn plain_build_root_resolves_to_stable() {
        let dir = tempdir().unwrap();
        let build_root = dir.path().join("app");
        touch(&build_root.join("code-oss"));

        let resolution = resolve(
            &opts_with_build(&build_root),
            Platform::Linux,
            &Product::default(),
            dir.path(),
            None,
        )
        .unwrap();

        assert_eq!(resolution.quality, Quality::Stable);
    }

    #[test]
    fn missing_executable_fails_with_the_path_in_the_message() {
        let dir = tempdir().unwrap();
        let build_root = dir.path().join("app");
        std::fs::create_dir_all(&build_root).unwrap();

        let err = resolve(
            &opts_with_build(&build_root),
            Platform::Linux,
            &Product::default(),
            dir.path(),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, Error::MissingExecutable(_)));
        assert!(err.to_string().contains(&*build_root.to_string_lossy()));
    }

    #[test]
    fn missing_stable_build_fails_too() {
        let dir = tempdir().unwrap();
        let build_root = dir.path().join("app");
        touch(&build_root.join("code-oss"));
        let stable_root = dir.path().join("stable");
        std::fs::create_dir_all(&stable_root).unwrap();

        let opts = RunOptions {
            build: Some(build_root),
            stable_build: Some(stable_root.clone()),
            ..RunOptions::default()
        };
        let err = resolve(&opts, Platform::Linux, &Product::default(), dir.path(), None)
            .unwrap_err();

        assert!(err.to_string().contains(&*stable_root.to_string_lossy()));
    }

    #[test]
    fn no_build_falls_back_to_the_dev_executable_and_dev_quality() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join(".build/electron/code-oss"));

        let resolution = resolve(
            &RunOptions::default(),
            Platform::Linux,
            &Product::default(),
            dir.path(),
            None,
        )
        .unwrap();

        assert_eq!(resolution.quality, Quality::Dev);
        assert_eq!(resolution.markers, SourceMarkers::from_source());
        assert!(resolution.target.is_desktop());
    }

    #[test]
    fn unsupported_platform_is_fatal() {
        let dir = tempdir().unwrap();
        let err = resolve(
            &RunOptions::default(),
            Platform::Unsupported,
            &Product::default(),
            dir.path(),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnsupportedPlatform(_)));
    }

    #[test]
    fn web_with_existing_server_classifies_as_insiders() {
        let dir = tempdir().unwrap();
        let server = dir.path().join("server");
        touch(&server);

        let opts = RunOptions {
            web: true,
            build: Some(server.clone()),
            ..RunOptions::default()
        };
        let resolution = resolve(&opts, Platform::Linux, &Product::default(), dir.path(), None)
            .unwrap();

        assert_eq!(resolution.quality, Quality::Insiders);
        assert_eq!(
            resolution.target,
            ResolvedTarget::Web {
                server: Some(server)
            }
        );
    }

    #[test]
    fn web_falls_back_to_the_remote_server_environment() {
        let dir = tempdir().unwrap();
        let server = dir.path().join("served");
        touch(&server);

        let opts = RunOptions {
            web: true,
            ..RunOptions::default()
        };
        let resolution = resolve(
            &opts,
            Platform::Linux,
            &Product::default(),
            dir.path(),
            Some(&server),
        )
        .unwrap();

        assert_eq!(
            resolution.target,
            ResolvedTarget::Web {
                server: Some(server)
            }
        );
    }

    #[test]
    fn web_with_missing_server_fails_with_the_path_in_the_message() {
        let dir = tempdir().unwrap();
        let server = dir.path().join("missing-server");

        let opts = RunOptions {
            web: true,
            build: Some(server.clone()),
            ..RunOptions::default()
        };
        let err = resolve(&opts, Platform::Linux, &Product::default(), dir.path(), None)
            .unwrap_err();

        assert!(matches!(err, Error::MissingServer(_)));
        assert!(err.to_string().contains(&*server.to_string_lossy()));
    }

    #[test]
    fn web_without_any_server_runs_from_source() {
        let dir = tempdir().unwrap();
        let opts = RunOptions {
            web: true,
            ..RunOptions::default()
        };
        let resolution = resolve(&opts, Platform::Linux, &Product::default(), dir.path(), None)
            .unwrap();

        assert_eq!(resolution.quality, Quality::Dev);
        assert_eq!(resolution.markers, SourceMarkers::from_source());
        assert_eq!(resolution.target, ResolvedTarget::Web { server: None });
    }
}
