// Device command surface
//
// Every call goes through `settle`, which turns an `ApiFailure` into a
// `CoreError` and applies its connectivity consequence. The config
// cache is a single slot: reads hold its lock across the fetch, and
// mutating script and config calls clear it before and after the call.

use std::sync::Arc;

use ledfleet_api::{ApiFailure, DeviceConfig, Hsl, Script, ScriptBody};
use serde_json::Value;
use tracing::{debug, warn};

use crate::device::DeviceHandle;
use crate::error::CoreError;

impl DeviceHandle {
    fn settle<T>(&self, operation: &'static str, result: Result<T, ApiFailure>) -> Result<T, CoreError> {
        match result {
            Ok(value) => {
                self.touch();
                Ok(value)
            }
            Err(ApiFailure::Application { message }) => {
                warn!(device = %self.name(), operation, %message, "device rejected request");
                Err(CoreError::Rejected {
                    device: self.name().to_owned(),
                    message,
                })
            }
            Err(failure) => {
                debug!(device = %self.name(), operation, error = %failure, "device call failed");
                self.mark_offline(&failure);
                Err(CoreError::DeviceOffline {
                    device: self.name().to_owned(),
                    reason: failure,
                })
            }
        }
    }

    async fn invalidate_config(&self) {
        *self.config.lock().await = None;
    }

    // ── Config ───────────────────────────────────────────────────────

    /// The device configuration, from cache unless `refresh` is set or
    /// nothing is cached yet.
    ///
    /// Concurrent callers share one fetch; a failed fetch leaves the
    /// cache empty.
    pub async fn get_config(&self, refresh: bool) -> Result<Arc<DeviceConfig>, CoreError> {
        let mut cache = self.config.lock().await;
        if refresh {
            *cache = None;
        }
        if let Some(ref config) = *cache {
            return Ok(Arc::clone(config));
        }

        let config = Arc::new(self.settle("get_config", self.api.get_config().await)?);
        *cache = Some(Arc::clone(&config));
        Ok(config)
    }

    /// The cached configuration, without touching the network.
    pub async fn cached_config(&self) -> Option<Arc<DeviceConfig>> {
        self.config.lock().await.clone()
    }

    /// Scripts stored on the device, normalized.
    pub async fn scripts(&self, refresh: bool) -> Result<Vec<Script>, CoreError> {
        Ok(self.get_config(refresh).await?.scripts.clone())
    }

    pub async fn save_config(&self, config: &Value) -> Result<Value, CoreError> {
        self.invalidate_config().await;
        let result = self.api.save_config(config).await;
        self.invalidate_config().await;
        self.settle("save_config", result)
    }

    // ── Scripts ──────────────────────────────────────────────────────

    pub async fn get_script(&self, name: &str) -> Result<ScriptBody, CoreError> {
        self.settle("get_script", self.api.get_script(name).await)
    }

    pub async fn save_script(&self, name: &str, body: &ScriptBody) -> Result<ScriptBody, CoreError> {
        self.invalidate_config().await;
        let result = self.api.save_script(name, body).await;
        self.invalidate_config().await;
        self.settle("save_script", result)
    }

    pub async fn delete_script(&self, name: &str) -> Result<(), CoreError> {
        self.invalidate_config().await;
        let result = self.api.delete_script(name).await;
        self.invalidate_config().await;
        self.settle("delete_script", result).map(|_| ())
    }

    pub async fn run_script(&self, name: &str) -> Result<(), CoreError> {
        self.settle("run_script", self.api.run_script(name).await)
    }

    // ── Lighting ─────────────────────────────────────────────────────

    pub async fn set_color(&self, color: Hsl) -> Result<(), CoreError> {
        self.settle("set_color", self.api.set_color(color).await)
    }

    pub async fn set_white(&self, level: u8) -> Result<(), CoreError> {
        self.settle("set_white", self.api.set_white(level).await)
    }

    pub async fn set_off(&self) -> Result<(), CoreError> {
        self.settle("set_off", self.api.set_off().await)
    }
}
