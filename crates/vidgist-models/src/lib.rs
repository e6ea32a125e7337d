//! Shared data models for the Vidgist backend.
//!
//! This crate provides Serde-serializable types for:
//! - Indexing tasks and their status vocabulary
//! - Upstream video metadata
//! - Generation artifact kinds and selections

pub mod artifact;
pub mod task;
pub mod video;

// Re-export common types
pub use artifact::{ArtifactKind, ArtifactSelection, GenerationRequest, SelectionError};
pub use task::{Task, TaskStatus};
pub use video::{Video, VideoHls, VideoMetadata};
