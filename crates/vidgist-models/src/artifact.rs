//! Generation artifact kinds and selections.
//!
//! The upstream service exposes two generation endpoints: `/summarize` for
//! structured artifacts (summary, chapters, highlights) and `/gist` for
//! short-form ones (title, topic, hashtag). Callers pick a subset of kinds;
//! an empty selection is a named validation error, rejected before any HTTP
//! request is issued.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A requestable generation artifact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Topic,
    Title,
    Hashtag,
    Summary,
    Chapter,
    Highlight,
}

impl ArtifactKind {
    /// All requestable kinds.
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::Topic,
        ArtifactKind::Title,
        ArtifactKind::Hashtag,
        ArtifactKind::Summary,
        ArtifactKind::Chapter,
        ArtifactKind::Highlight,
    ];

    /// Get string representation of the kind (upstream wire vocabulary).
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Topic => "topic",
            ArtifactKind::Title => "title",
            ArtifactKind::Hashtag => "hashtag",
            ArtifactKind::Summary => "summary",
            ArtifactKind::Chapter => "chapter",
            ArtifactKind::Highlight => "highlight",
        }
    }

    /// Whether this kind is served by the `/gist` endpoint
    /// (the rest go through `/summarize`).
    pub fn is_gist(&self) -> bool {
        matches!(
            self,
            ArtifactKind::Topic | ArtifactKind::Title | ArtifactKind::Hashtag
        )
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Selection validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No artifact kind selected")]
    Empty,
}

/// A validated-on-demand set of artifact kinds to request for one video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactSelection {
    kinds: BTreeSet<ArtifactKind>,
}

impl ArtifactSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection containing every kind.
    pub fn all() -> Self {
        ArtifactKind::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, kind: ArtifactKind) {
        self.kinds.insert(kind);
    }

    pub fn remove(&mut self, kind: ArtifactKind) {
        self.kinds.remove(&kind);
    }

    pub fn contains(&self, kind: ArtifactKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Reject an empty selection before anything is submitted.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.kinds.is_empty() {
            return Err(SelectionError::Empty);
        }
        Ok(())
    }

    /// Kinds served by `/gist`, in stable order.
    pub fn gist_kinds(&self) -> Vec<ArtifactKind> {
        self.kinds.iter().copied().filter(|k| k.is_gist()).collect()
    }

    /// Kinds served by `/summarize`, in stable order.
    pub fn summarize_kinds(&self) -> Vec<ArtifactKind> {
        self.kinds.iter().copied().filter(|k| !k.is_gist()).collect()
    }
}

impl FromIterator<ArtifactKind> for ArtifactSelection {
    fn from_iter<I: IntoIterator<Item = ArtifactKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// An ephemeral generation request: lives only for the duration of one
/// fan-out of fetches, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Target video
    pub video_id: String,
    /// Kinds to request
    pub selection: ArtifactSelection,
    /// Optional open-ended prompt (drives the `/generate` endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl GenerationRequest {
    pub fn new(video_id: impl Into<String>, selection: ArtifactSelection) -> Self {
        Self {
            video_id: video_id.into(),
            selection,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Validate before submission. A request is submittable when it names at
    /// least one artifact kind or carries a non-empty prompt.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.prompt.as_deref().is_some_and(|p| !p.trim().is_empty()) {
            return Ok(());
        }
        self.selection.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_is_an_error() {
        let selection = ArtifactSelection::new();
        assert_eq!(selection.validate(), Err(SelectionError::Empty));
    }

    #[test]
    fn test_selection_partition() {
        let selection = ArtifactSelection::all();
        assert_eq!(
            selection.gist_kinds(),
            vec![ArtifactKind::Topic, ArtifactKind::Title, ArtifactKind::Hashtag]
        );
        assert_eq!(
            selection.summarize_kinds(),
            vec![
                ArtifactKind::Summary,
                ArtifactKind::Chapter,
                ArtifactKind::Highlight
            ]
        );
    }

    #[test]
    fn test_prompt_makes_empty_selection_valid() {
        let request =
            GenerationRequest::new("v1", ArtifactSelection::new()).with_prompt("What happened?");
        assert!(request.validate().is_ok());

        let blank = GenerationRequest::new("v1", ArtifactSelection::new()).with_prompt("   ");
        assert_eq!(blank.validate(), Err(SelectionError::Empty));
    }

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(
            serde_json::to_string(&ArtifactKind::Highlight).unwrap(),
            "\"highlight\""
        );
    }
}
