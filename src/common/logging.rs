//! Logging and tracing configuration
//!
//! Composes the run's log sinks: a console layer when `--verbose` is given,
//! and a non-blocking file layer when `--log` is given. The file sink always
//! captures at full detail, matching the application-side verbosity bump.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::{Error, Result};

/// Keeps the non-blocking file writer alive for the duration of the run
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize tracing with the sinks the run options ask for
///
/// Log levels are controlled by the `RUST_LOG` environment variable; the
/// console defaults to DEBUG under `--verbose`.
pub fn init(verbose: bool, log_path: Option<&Path>) -> Result<LogGuard> {
    let console_layer = if verbose {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("smoke=debug,info"));
        Some(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_filter(filter),
        )
    } else {
        None
    };

    let (file_layer, file_guard) = match log_path {
        Some(path) => {
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(directory)?;
            let file_name = path
                .file_name()
                .ok_or_else(|| Error::Config(format!("invalid log path '{}'", path.display())))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(LevelFilter::TRACE);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(LogGuard { _file: file_guard })
}
