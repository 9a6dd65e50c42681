//! Site build lifecycle.
//!
//! `Idle -> Building -> Succeeded | Failed`; a terminal state may start
//! again. Starting while `Building` is rejected and leaves the running build
//! alone. A build whose caller goes away before it settles ends `Failed`.

mod orchestrator;
mod types;


pub use orchestrator::BuildOrchestrator;
pub use types::{BuildError, BuildJob, PendingBuild, ABANDONED_ERROR, DEFAULT_BUILD_PROMPT};
