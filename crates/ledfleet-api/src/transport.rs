// Shared transport configuration for building the reqwest::Client.
//
// One client is shared by every device in the fleet; per-request
// timeouts are supplied by the caller, so the client itself only
// carries a connect timeout.

use std::time::Duration;

use crate::error::ApiFailure;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("ledfleet/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, ApiFailure> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| ApiFailure::Refused {
                reason: format!("failed to build HTTP client: {e}"),
            })
    }
}
