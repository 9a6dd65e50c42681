//! BuildOrchestrator: owns the single build job and its state machine.

use std::sync::{Arc, Mutex};

use nova_common::{BuildState, EventBus};
use tracing::{debug, info, warn};

use crate::session::Session;
use crate::{BuildRequest, TransportClient};

use super::types::{
    lock_job, publish_job, BuildError, BuildJob, PendingBuild, DEFAULT_BUILD_PROMPT,
};

pub struct BuildOrchestrator {
    transport: Arc<dyn TransportClient>,
    /// Read only, for log correlation.
    session: Arc<Session>,
    /// Shared with the live `PendingBuild`, which fails the job if dropped.
    job: Arc<Mutex<BuildJob>>,
    default_prompt: String,
    events: Option<Arc<EventBus>>,
}

impl BuildOrchestrator {
    pub fn new(transport: Arc<dyn TransportClient>, session: Arc<Session>) -> Self {
        Self {
            transport,
            session,
            job: Arc::new(Mutex::new(BuildJob::default())),
            default_prompt: DEFAULT_BUILD_PROMPT.to_string(),
            events: None,
        }
    }

    /// Prompt used in place of an empty one. A blank value is ignored.
    pub fn with_default_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        if !prompt.trim().is_empty() {
            self.default_prompt = prompt;
        }
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Start a build and wait for its outcome.
    ///
    /// Transport failures do not surface here; they end in
    /// `BuildState::Failed`. The only error is starting while a build is
    /// already running.
    pub async fn start(&self, prompt: &str) -> Result<BuildJob, BuildError> {
        let pending = self.begin(prompt)?;
        Ok(self.run(pending).await)
    }

    /// Synchronous half of `start`: guard, enter `Building`, clear the
    /// previous preview.
    pub fn begin(&self, prompt: &str) -> Result<PendingBuild, BuildError> {
        let prompt = if prompt.trim().is_empty() {
            self.default_prompt.clone()
        } else {
            prompt.to_string()
        };

        let snapshot = {
            let mut job = self.lock_job();
            if job.state == BuildState::Building {
                warn!("build rejected: another build is in progress");
                return Err(BuildError::AlreadyInProgress);
            }
            *job = BuildJob {
                state: BuildState::Building,
                preview_url: None,
                error: None,
                prompt: Some(prompt.clone()),
            };
            job.clone()
        };

        let pending = PendingBuild::new(prompt, self.job.clone(), self.events.clone());
        info!(
            request_id = pending.request_id(),
            session_id = ?self.session.current().map(|id| id.into_string()),
            "build started"
        );
        self.publish(&snapshot);
        Ok(pending)
    }

    /// Network half of `start`: send the build and record the terminal state.
    ///
    /// Cancelling this future before the transport settles drops `pending`,
    /// which records the build as abandoned.
    pub async fn run(&self, pending: PendingBuild) -> BuildJob {
        let request = BuildRequest {
            prompt: pending.prompt().to_string(),
            request_id: pending.request_id().to_string(),
        };
        debug!(request_id = pending.request_id(), "dispatching build");
        let result = self.transport.build(&request).await;

        let request_id = request.request_id;
        pending.settle(|job| match result {
            Ok(response) if response.success => {
                job.state = BuildState::Succeeded;
                job.preview_url = response.preview;
                job.error = None;
                info!(%request_id, preview = ?job.preview_url, "build succeeded");
            }
            Ok(response) => {
                job.state = BuildState::Failed;
                job.preview_url = None;
                job.error = Some(
                    response
                        .error
                        .unwrap_or_else(|| "build reported failure".to_string()),
                );
                warn!(%request_id, error = ?job.error, "build failed");
            }
            Err(e) => {
                job.state = BuildState::Failed;
                job.preview_url = None;
                job.error = Some(e.to_string());
                warn!(%request_id, "build request failed: {e}");
            }
        })
    }

    pub fn job(&self) -> BuildJob {
        self.lock_job().clone()
    }

    pub fn state(&self) -> BuildState {
        self.lock_job().state
    }

    pub fn preview_url(&self) -> Option<String> {
        self.lock_job().preview_url.clone()
    }

    pub fn is_building(&self) -> bool {
        self.state() == BuildState::Building
    }

    fn publish(&self, job: &BuildJob) {
        publish_job(self.events.as_deref(), job);
    }

    fn lock_job(&self) -> std::sync::MutexGuard<'_, BuildJob> {
        lock_job(&self.job)
    }
}
