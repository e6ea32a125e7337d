//! Upstream video types.
//!
//! A `Video` is a read-only reference to an asset the upstream service has
//! indexed; this system never owns or mutates one.

use serde::{Deserialize, Serialize};

/// Video metadata as reported by the upstream index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Title, usually the uploaded filename (often percent-encoded)
    #[serde(default)]
    pub video_title: String,
    /// Duration in seconds
    #[serde(default)]
    pub duration: f64,
    /// Original filename, when the upstream reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// HLS playback info for an indexed video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoHls {
    /// Playable stream URL
    pub video_url: String,
}

/// One indexed video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Opaque upstream identifier
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub metadata: VideoMetadata,
    /// Absent until the upstream has finished transcoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hls: Option<VideoHls>,
    /// Any upstream fields this crate does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Video {
    /// Human-readable title: percent-decoded, with parenthesized suffixes
    /// (resolution tags and the like) stripped.
    pub fn display_title(&self) -> String {
        clean_title(&self.metadata.video_title)
    }
}

fn clean_title(raw: &str) -> String {
    let decoded = urlencoding::decode(raw)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    let mut out = String::with_capacity(decoded.len());
    let mut depth = 0usize;
    for ch in decoded.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_decodes_and_strips() {
        let video: Video = serde_json::from_str(
            r#"{"_id": "v1", "metadata": {"video_title": "my%20talk%20(1080p).mp4", "duration": 12.5}}"#,
        )
        .unwrap();
        assert_eq!(video.display_title(), "my talk .mp4");
    }

    #[test]
    fn test_video_without_hls() {
        let video: Video = serde_json::from_str(r#"{"_id": "v1"}"#).unwrap();
        assert!(video.hls.is_none());
        assert_eq!(video.metadata.duration, 0.0);
    }
}
