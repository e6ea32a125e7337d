//! Upstream request types.

/// A video file to submit for indexing.
///
/// The upstream expects the file under the `video_file` multipart field,
/// with the original filename and declared content type preserved.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename as chosen by the uploader
    pub filename: String,
    /// Declared MIME type, e.g. `video/mp4`
    pub content_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}
