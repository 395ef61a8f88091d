// ── Core error types ──
//
// What a caller of the fleet layer sees when an operation did not
// happen. Unreachable-class API failures have already flipped the device
// offline by the time `DeviceOffline` is returned; `Rejected` never
// touches connectivity state.

use ledfleet_api::ApiFailure;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Device errors ────────────────────────────────────────────────
    #[error("{device} is unreachable: {reason}")]
    DeviceOffline { device: String, reason: ApiFailure },

    #[error("{device} rejected the request: {message}")]
    Rejected { device: String, message: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid address '{host}' for device {device}: {reason}")]
    InvalidAddress {
        device: String,
        host: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the failure left the device marked offline.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::DeviceOffline { .. })
    }
}
