//! Test-run lifecycle
//!
//! Test areas register their scenarios against a shared suite; the runner
//! then launches the application once, executes every scenario sequentially,
//! captures a screenshot for each failure, stops the application once and
//! collects logs out of the sandbox.

mod lifecycle;
mod suite;

pub use lifecycle::Runner;
pub use suite::*;
