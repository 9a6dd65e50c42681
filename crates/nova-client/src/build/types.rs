use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use nova_common::{new_correlation_id, BuildState, EventBus, WidgetEvent};
use serde::Serialize;
use tracing::warn;

/// Sent when the caller starts a build with an empty prompt.
pub const DEFAULT_BUILD_PROMPT: &str = "Build me a site";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("build already in progress")]
    AlreadyInProgress,
}

/// Snapshot of the current (or last) build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildJob {
    pub state: BuildState,
    /// Set only in `Succeeded`.
    pub preview_url: Option<String>,
    /// Why the last build failed, when known.
    pub error: Option<String>,
    /// Prompt actually sent, after the empty-prompt fallback.
    pub prompt: Option<String>,
}

/// Failure recorded when a pending build is dropped before it settles.
pub const ABANDONED_ERROR: &str = "build abandoned";

/// A build that has entered `Building` and still has to be sent.
///
/// Only [`BuildOrchestrator::begin`](super::BuildOrchestrator::begin) hands
/// these out, and while one is alive no other build can begin. Dropping it
/// before it settles (never run, or a `run`/`start` future cancelled
/// mid-flight) moves the job to `Failed` so the next start is accepted.
#[must_use = "dropping a pending build without running it fails the build"]
pub struct PendingBuild {
    prompt: String,
    request_id: String,
    job: Arc<Mutex<BuildJob>>,
    events: Option<Arc<EventBus>>,
    settled: bool,
}

impl PendingBuild {
    pub(super) fn new(
        prompt: String,
        job: Arc<Mutex<BuildJob>>,
        events: Option<Arc<EventBus>>,
    ) -> Self {
        Self {
            prompt,
            request_id: new_correlation_id(),
            job,
            events,
            settled: false,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Apply the terminal outcome, publish it and return the snapshot.
    pub(super) fn settle(mut self, outcome: impl FnOnce(&mut BuildJob)) -> BuildJob {
        let snapshot = {
            let mut job = lock_job(&self.job);
            outcome(&mut job);
            job.clone()
        };
        self.settled = true;
        publish_job(self.events.as_deref(), &snapshot);
        snapshot
    }
}

impl fmt::Debug for PendingBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingBuild")
            .field("prompt", &self.prompt)
            .field("request_id", &self.request_id)
            .finish_non_exhaustive()
    }
}

impl Drop for PendingBuild {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let snapshot = {
            let mut job = lock_job(&self.job);
            if job.state != BuildState::Building {
                return;
            }
            job.state = BuildState::Failed;
            job.preview_url = None;
            job.error = Some(ABANDONED_ERROR.to_string());
            job.clone()
        };
        warn!(request_id = %self.request_id, "build abandoned before it settled");
        publish_job(self.events.as_deref(), &snapshot);
    }
}

pub(super) fn lock_job(job: &Mutex<BuildJob>) -> MutexGuard<'_, BuildJob> {
    job.lock().unwrap_or_else(|e| e.into_inner())
}

pub(super) fn publish_job(events: Option<&EventBus>, job: &BuildJob) {
    if let Some(events) = events {
        events.publish(WidgetEvent::BuildStateChanged {
            state: job.state,
            preview_url: job.preview_url.clone(),
        });
    }
}
