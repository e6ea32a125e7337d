//! Application state.

use std::sync::Arc;

use vidgist_tl_client::{TlClient, TlClientConfig, TlError};

use crate::config::GatewayConfig;

/// Shared application state.
///
/// The gateway is stateless: nothing here is mutated between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub upstream: Arc<TlClient>,
}

impl AppState {
    /// Create new application state, building the upstream client from
    /// environment variables.
    pub fn new(config: GatewayConfig) -> Result<Self, TlError> {
        let upstream = TlClient::new(TlClientConfig::from_env())?;
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create state around an existing upstream client (used by tests).
    pub fn with_upstream(config: GatewayConfig, upstream: TlClient) -> Self {
        Self {
            config,
            upstream: Arc::new(upstream),
        }
    }
}
