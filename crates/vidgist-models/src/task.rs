//! Indexing task types.
//!
//! A task tracks one asynchronous upstream indexing job. It is created when
//! a video upload is submitted and only ever mutated by upstream state
//! transitions observed through polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indexing task status.
///
/// The upstream service uses a wider vocabulary while a task is in flight
/// (validating, queued, indexing, ...); every non-terminal word folds into
/// `Processing` so callers only have to reason about four states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task accepted, not yet picked up upstream
    #[default]
    Pending,
    /// Indexing finished, video is queryable
    Ready,
    /// Indexing failed, the task will never become ready
    Failed,
    /// Task is being indexed (catch-all for in-flight upstream states)
    #[serde(other)]
    Processing,
}

impl TaskStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Ready => "ready",
            TaskStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Ready | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One upstream indexing task.
///
/// Unknown upstream fields are kept in `extra` so a task fetched through the
/// gateway loses nothing in transit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Opaque upstream identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Current status
    pub status: TaskStatus,
    /// Video produced by this task, present once indexing has started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// When the task was created upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the task was last updated upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Any upstream fields this crate does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
