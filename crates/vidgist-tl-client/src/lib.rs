//! Client for the TwelveLabs video-intelligence API.
//!
//! This crate provides an authenticated HTTP client for the upstream
//! endpoints the gateway proxies: indexes, videos, tasks, generate,
//! summarize and gist. Responses are passed through as raw JSON so the
//! gateway never reshapes what the upstream returns.

pub mod client;
pub mod error;
pub mod types;

pub use client::{TlClient, TlClientConfig};
pub use error::{TlError, TlResult};
pub use types::UploadFile;
