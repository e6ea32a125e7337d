//! Task lifecycle state machine.
//!
//! `idle → uploading → polling → ready | failed | timed_out`, with
//! cancellation from any state by dropping the handle. Status checks are
//! strictly sequential: the next check is only scheduled after the previous
//! one resolves.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use vidgist_models::{Task, TaskStatus};

use crate::bus::{GenerationOp, InvalidationBus, QueryKey};
use crate::error::PollerError;

/// Lifecycle state observable through the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Nothing submitted yet
    Idle,
    /// Upload in flight
    Uploading,
    /// Task created, watching its status
    Polling,
    /// Task reached `ready`; dependents were invalidated exactly once
    Ready,
    /// Upload failed or task reached `failed`
    Failed,
    /// Attempt budget exhausted without a terminal status
    TimedOut,
}

impl PollerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollerState::Idle => "idle",
            PollerState::Uploading => "uploading",
            PollerState::Polling => "polling",
            PollerState::Ready => "ready",
            PollerState::Failed => "failed",
            PollerState::TimedOut => "timed_out",
        }
    }

    /// Check if the lifecycle has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollerState::Ready | PollerState::Failed | PollerState::TimedOut
        )
    }
}

impl std::fmt::Display for PollerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Polling configuration.
///
/// The interval is fixed rather than backing off: indexing latency dwarfs
/// the cost of one request every few seconds at single-user volume. The
/// attempt budget keeps a task that never settles from being polled forever.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between consecutive status checks
    pub interval: Duration,
    /// Maximum number of checks before giving up
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120, // ~10 minutes at the default interval
        }
    }
}

/// Handle to a spawned lifecycle.
///
/// Dropping the handle cancels the lifecycle, including any pending
/// scheduled check; no timer outlives its owner.
pub struct LifecycleHandle {
    state: watch::Receiver<PollerState>,
    join: JoinHandle<()>,
}

impl LifecycleHandle {
    /// Current state.
    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    /// A watcher for state transitions.
    pub fn watch(&self) -> watch::Receiver<PollerState> {
        self.state.clone()
    }

    /// Cancel the lifecycle without waiting for it.
    pub fn cancel(&self) {
        self.join.abort();
    }

    /// Wait for the lifecycle to reach a terminal state.
    pub async fn wait(mut self) -> PollerState {
        loop {
            let current = *self.state.borrow_and_update();
            if current.is_terminal() {
                return current;
            }
            if self.state.changed().await.is_err() {
                return *self.state.borrow();
            }
        }
    }
}

impl Drop for LifecycleHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

/// Spawns and owns one upload-and-poll lifecycle.
pub struct TaskLifecycle;

impl TaskLifecycle {
    /// Start a lifecycle: run `upload` to create the task, then poll via
    /// `fetch` until a terminal state. On `ready`, the dependent query keys
    /// for the index and the produced video are invalidated exactly once.
    pub fn spawn<U, F, Fut>(
        index_id: impl Into<String>,
        upload: U,
        fetch: F,
        bus: Arc<InvalidationBus>,
        config: PollerConfig,
    ) -> LifecycleHandle
    where
        U: Future<Output = Result<Task, PollerError>> + Send + 'static,
        F: FnMut(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Task, PollerError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(PollerState::Idle);
        let index_id = index_id.into();
        let join = tokio::spawn(run_lifecycle(index_id, upload, fetch, bus, config, tx));

        LifecycleHandle { state: rx, join }
    }
}

async fn run_lifecycle<U, F, Fut>(
    index_id: String,
    upload: U,
    fetch: F,
    bus: Arc<InvalidationBus>,
    config: PollerConfig,
    state: watch::Sender<PollerState>,
) where
    U: Future<Output = Result<Task, PollerError>>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Task, PollerError>>,
{
    let _ = state.send(PollerState::Uploading);

    let task = match upload.await {
        Ok(task) => task,
        Err(e) => {
            warn!("Upload failed: {}", e);
            let _ = state.send(PollerState::Failed);
            return;
        }
    };
    info!(task_id = %task.id, status = %task.status, "Indexing task created");

    let (outcome, last) = poll_until_terminal(task, fetch, &config, &state).await;

    // The ready transition is the single point allowed to invalidate
    // dependent queries, and it fires exactly once.
    if outcome == PollerState::Ready {
        invalidate_dependents(&bus, &index_id, last.video_id.as_deref()).await;
    }

    let _ = state.send(outcome);
}

/// Poll a task until it settles or the attempt budget runs out. Publishes
/// the `Polling` transition; the caller publishes the terminal one.
async fn poll_until_terminal<F, Fut>(
    task: Task,
    mut fetch: F,
    config: &PollerConfig,
    state: &watch::Sender<PollerState>,
) -> (PollerState, Task)
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Task, PollerError>>,
{
    let task_id = task.id.clone();
    let mut current = task;

    // The upload response already carries a status; it may be terminal.
    match current.status {
        TaskStatus::Ready => return (PollerState::Ready, current),
        TaskStatus::Failed => return (PollerState::Failed, current),
        _ => {}
    }

    let _ = state.send(PollerState::Polling);

    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.interval).await;

        match fetch(task_id.clone()).await {
            Ok(task) => {
                current = task;
                match current.status {
                    TaskStatus::Ready => {
                        info!(task_id = %task_id, attempt, "Task ready");
                        return (PollerState::Ready, current);
                    }
                    TaskStatus::Failed => {
                        warn!(task_id = %task_id, attempt, "Task failed");
                        return (PollerState::Failed, current);
                    }
                    _ => {}
                }
            }
            // Transient check failures spend an attempt but do not abort:
            // the task may still settle on the next check.
            Err(e) => warn!(task_id = %task_id, attempt, "Status check failed: {}", e),
        }
    }

    warn!(
        task_id = %task_id,
        attempts = config.max_attempts,
        "Gave up waiting for task to settle"
    );
    (PollerState::TimedOut, current)
}

async fn invalidate_dependents(bus: &InvalidationBus, index_id: &str, video_id: Option<&str>) {
    bus.invalidate(&QueryKey::Videos {
        index_id: index_id.to_string(),
    })
    .await;

    let Some(video_id) = video_id else { return };

    bus.invalidate(&QueryKey::Video {
        index_id: index_id.to_string(),
        video_id: video_id.to_string(),
    })
    .await;
    for op in [
        GenerationOp::Summarize,
        GenerationOp::Gist,
        GenerationOp::Generate,
    ] {
        bus.invalidate(&QueryKey::Generation {
            video_id: video_id.to_string(),
            op,
        })
        .await;
    }
}
