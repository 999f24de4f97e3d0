//! Smoke-test entry point
//!
//! Parses the run options, wires up the requested log sinks and hands the
//! run to the bootstrapper. Any fatal configuration error terminates the
//! process with exit code 1.

use smoke::common::logging;
use smoke::options::RunOptions;

#[tokio::main]
async fn main() {
    let opts = RunOptions::from_args();

    let _log_guard = match logging::init(opts.verbose, opts.log.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = smoke::bootstrap::run(opts).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
