//! TwelveLabs HTTP client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{TlError, TlResult};
use crate::types::UploadFile;

/// Header carrying the static API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Sampling temperature for open-ended generation. Kept low so repeated
/// requests for the same video stay close to deterministic.
const GENERATE_TEMPERATURE: f64 = 0.3;

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct TlClientConfig {
    /// Static API key sent with every request
    pub api_key: String,
    /// Base URL of the upstream API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl TlClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.twelvelabs.io/v1.2".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::new(std::env::var("TWELVE_LABS_API_KEY").unwrap_or_default());
        if let Ok(url) = std::env::var("TWELVE_LABS_API_URL") {
            config.base_url = url;
        }
        if let Some(secs) = std::env::var("TWELVE_LABS_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}

/// Client for the TwelveLabs API.
///
/// Holds no state beyond the connection pool; cheap to clone.
#[derive(Debug, Clone)]
pub struct TlClient {
    http: Client,
    config: TlClientConfig,
}

impl TlClient {
    /// Create a new upstream client.
    pub fn new(config: TlClientConfig) -> TlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> TlResult<Self> {
        Self::new(TlClientConfig::from_env())
    }

    /// List videos in an index.
    pub async fn list_videos(&self, index_id: &str, page_limit: Option<u32>) -> TlResult<Value> {
        let url = format!("{}/indexes/{}/videos", self.config.base_url, index_id);

        let mut request = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key);
        if let Some(limit) = page_limit {
            request = request.query(&[("page_limit", limit)]);
        }

        Self::expect_json(request.send().await?).await
    }

    /// Fetch one video's metadata.
    pub async fn get_video(&self, index_id: &str, video_id: &str) -> TlResult<Value> {
        let url = format!(
            "{}/indexes/{}/videos/{}",
            self.config.base_url, index_id, video_id
        );

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Fetch current task status.
    pub async fn get_task(&self, task_id: &str) -> TlResult<Value> {
        let url = format!("{}/tasks/{}", self.config.base_url, task_id);

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Submit a video for indexing. Every caller-supplied field is forwarded
    /// verbatim; the file goes under the `video_file` part with its original
    /// filename and content type.
    pub async fn create_task(
        &self,
        fields: Vec<(String, String)>,
        file: UploadFile,
    ) -> TlResult<Value> {
        let url = format!("{}/tasks", self.config.base_url);
        debug!(filename = %file.filename, "Submitting indexing task to {}", url);

        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.content_type)?;
        form = form.part("video_file", part);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Open-ended text generation. The caller's prompt fields are merged
    /// with the video id and a fixed low sampling temperature.
    pub async fn generate(&self, video_id: &str, data: Map<String, Value>) -> TlResult<Value> {
        let mut body = data;
        body.insert("video_id".into(), json!(video_id));
        body.insert("temperature".into(), json!(GENERATE_TEMPERATURE));

        self.post_json("generate", &Value::Object(body)).await
    }

    /// Request a summary/chapter/highlight artifact. The caller supplies the
    /// `type` field; it is merged with the video id.
    pub async fn summarize(&self, video_id: &str, data: Map<String, Value>) -> TlResult<Value> {
        let mut body = data;
        body.insert("video_id".into(), json!(video_id));

        self.post_json("summarize", &Value::Object(body)).await
    }

    /// Request title/topic/hashtag artifacts. The caller supplies the
    /// `types` field; it is merged with the video id.
    pub async fn gist(&self, video_id: &str, data: Map<String, Value>) -> TlResult<Value> {
        let mut body = data;
        body.insert("video_id".into(), json!(video_id));

        self.post_json("gist", &Value::Object(body)).await
    }

    async fn post_json(&self, endpoint: &str, body: &Value) -> TlResult<Value> {
        let url = format!("{}/{}", self.config.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Decode a success body, or map a non-2xx response to an upstream
    /// error carrying whatever status and `message` the upstream provided.
    async fn expect_json(response: reqwest::Response) -> TlResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from));
            return Err(TlError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
