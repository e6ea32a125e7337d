//! Axum HTTP proxy gateway.
//!
//! This crate provides:
//! - The seven browser-facing routes proxied to the TwelveLabs API
//! - API-key attachment and payload reshaping (including multipart upload)
//! - Uniform upstream error mapping with route-specific fallbacks

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use routes::create_router;
pub use state::AppState;
