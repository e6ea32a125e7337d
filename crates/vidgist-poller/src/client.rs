//! Gateway HTTP client.
//!
//! Talks to the vidgist gateway (not the upstream API directly): typed task
//! and video reads, the multipart upload, and the generation fan-out that
//! turns one artifact selection into the minimal set of gateway calls.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use vidgist_models::{ArtifactKind, GenerationRequest, Task, Video};

use crate::bus::InvalidationBus;
use crate::error::{PollerError, PollerResult};
use crate::poller::{LifecycleHandle, PollerConfig, TaskLifecycle};

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct GatewayClientConfig {
    /// Base URL of the gateway
    pub base_url: String,
    /// Index uploads land in
    pub index_id: String,
    /// Page size for video listings
    pub page_limit: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GatewayClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            index_id: String::new(),
            page_limit: 1,
            timeout: Duration::from_secs(120),
        }
    }
}

impl GatewayClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("API_GATEWAY_URL").unwrap_or(defaults.base_url),
            index_id: std::env::var("INDEX_ID").unwrap_or(defaults.index_id),
            page_limit: std::env::var("PAGE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.page_limit),
            timeout: defaults.timeout,
        }
    }
}

/// A video file to upload through the gateway.
#[derive(Debug, Clone)]
pub struct UploadSource {
    /// Original filename
    pub filename: String,
    /// Declared MIME type
    pub content_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl UploadSource {
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

/// Results of one generation fan-out.
#[derive(Debug, Default)]
pub struct GeneratedArtifacts {
    /// One entry per requested summarize kind, in selection order
    pub summaries: Vec<(ArtifactKind, Value)>,
    /// Combined gist result, when any gist kind was requested
    pub gist: Option<Value>,
    /// Open-ended generation result, when a prompt was given
    pub open_ended: Option<Value>,
}

/// Client for the vidgist gateway. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    config: GatewayClientConfig,
}

impl GatewayClient {
    /// Create a new gateway client.
    pub fn new(config: GatewayClientConfig) -> PollerResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PollerError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PollerResult<Self> {
        Self::new(GatewayClientConfig::from_env())
    }

    /// The index this client uploads into.
    pub fn index_id(&self) -> &str {
        &self.config.index_id
    }

    /// List videos in the configured index.
    pub async fn list_videos(&self) -> PollerResult<Value> {
        let url = format!(
            "{}/indexes/{}/videos",
            self.config.base_url, self.config.index_id
        );
        let response = self
            .http
            .get(&url)
            .query(&[("page_limit", self.config.page_limit)])
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Fetch one video's metadata, typed.
    pub async fn get_video(&self, video_id: &str) -> PollerResult<Video> {
        let url = format!(
            "{}/indexes/{}/videos/{}",
            self.config.base_url, self.config.index_id, video_id
        );
        let body = Self::expect_json(self.http.get(&url).send().await?).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fetch one task's status, typed.
    pub async fn get_task(&self, task_id: &str) -> PollerResult<Task> {
        let url = format!("{}/tasks/{}", self.config.base_url, task_id);
        let body = Self::expect_json(self.http.get(&url).send().await?).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Upload a video for indexing into the configured index.
    pub async fn upload_video(
        &self,
        extra_fields: Vec<(String, String)>,
        file: UploadSource,
    ) -> PollerResult<Task> {
        let url = format!("{}/index", self.config.base_url);
        debug!(filename = %file.filename, "Uploading video to {}", url);

        let mut form = Form::new().text("index_id", self.config.index_id.clone());
        for (name, value) in extra_fields {
            form = form.text(name, value);
        }
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.content_type)?;
        form = form.part("video_file", part);

        let response = self.http.post(&url).multipart(form).send().await?;
        let body = Self::expect_json(response).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Upload a video and watch the resulting task until it settles.
    /// Dependent queries are invalidated through `bus` when it goes ready.
    pub fn upload_and_watch(
        &self,
        extra_fields: Vec<(String, String)>,
        file: UploadSource,
        bus: Arc<InvalidationBus>,
        config: PollerConfig,
    ) -> LifecycleHandle {
        let uploader = self.clone();
        let fetcher = self.clone();

        let upload = async move { uploader.upload_video(extra_fields, file).await };
        let fetch = move |task_id: String| {
            let client = fetcher.clone();
            async move { client.get_task(&task_id).await }
        };

        TaskLifecycle::spawn(self.config.index_id.clone(), upload, fetch, bus, config)
    }

    /// Fan a validated artifact selection out into gateway calls: one
    /// `/summarize` call per structured kind, one `/gist` call covering the
    /// short-form kinds, and one `/generate` call when a prompt was given.
    /// An empty request is rejected before any HTTP traffic.
    pub async fn request_artifacts(
        &self,
        request: &GenerationRequest,
    ) -> PollerResult<GeneratedArtifacts> {
        request.validate()?;

        let mut artifacts = GeneratedArtifacts::default();

        for kind in request.selection.summarize_kinds() {
            let body = self
                .post_data(
                    &format!("/videos/{}/summarize", request.video_id),
                    json!({"type": kind.as_str()}),
                )
                .await?;
            artifacts.summaries.push((kind, body));
        }

        let gist_kinds = request.selection.gist_kinds();
        if !gist_kinds.is_empty() {
            let types: Vec<&str> = gist_kinds.iter().map(|k| k.as_str()).collect();
            let body = self
                .post_data(
                    &format!("/videos/{}/gist", request.video_id),
                    json!({"types": types}),
                )
                .await?;
            artifacts.gist = Some(body);
        }

        if let Some(prompt) = request.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            let body = self
                .post_data(
                    &format!("/videos/{}/generate", request.video_id),
                    json!({"prompt": prompt}),
                )
                .await?;
            artifacts.open_ended = Some(body);
        }

        Ok(artifacts)
    }

    async fn post_data(&self, route: &str, data: Value) -> PollerResult<Value> {
        let url = format!("{}{}", self.config.base_url, route);
        let response = self
            .http
            .post(&url)
            .json(&json!({"data": data}))
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Decode a success body, or map the gateway's `{status, message}` error
    /// shape into a typed failure.
    async fn expect_json(response: reqwest::Response) -> PollerResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "Gateway request failed".to_string());
            return Err(PollerError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
