// Device configuration endpoints
//
// `GET /api/config` returns the device's settings together with the list
// of scripts stored on it. `POST /api/config` replaces the settings.

use serde_json::Value;
use tracing::debug;

use crate::device::client::DeviceApi;
use crate::error::ApiFailure;
use crate::models::DeviceConfig;

impl DeviceApi {
    /// Fetch the configuration document.
    ///
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<DeviceConfig, ApiFailure> {
        let url = self.endpoint_url(&["api", "config"]);
        let data = self.get(url).await?;
        serde_json::from_value(data).map_err(|e| ApiFailure::MalformedResponse {
            message: format!("invalid config document: {e}"),
        })
    }

    /// Replace the configuration document.
    ///
    /// `POST /api/config`
    pub async fn save_config(&self, config: &Value) -> Result<Value, ApiFailure> {
        let url = self.endpoint_url(&["api", "config"]);
        debug!("saving config");
        self.post(url, config.clone()).await
    }
}
