use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Why a single device call did not produce a result.
///
/// Every outcome of a gateway call is represented here; nothing panics
/// or escapes as a transport error. `ledfleet-core` decides what a
/// failure means for the device's connectivity state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    // ── Network ─────────────────────────────────────────────────────
    /// No response within the caller-supplied timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection refused, DNS failure, reset, or any other transport error.
    #[error("connection failed: {reason}")]
    Refused { reason: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// The device answered with a non-success HTTP status.
    #[error("device returned HTTP {status}")]
    HttpError { status: u16 },

    /// The body could not be decoded as the expected document.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    // ── Application ─────────────────────────────────────────────────
    /// The device understood the request but the envelope reports failure
    /// (or carries no success indicator at all).
    #[error("device rejected request: {message}")]
    Application { message: String },
}

/// Wire-level classification of an [`ApiFailure`], used in logs and
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FailureKind {
    Timeout,
    Refused,
    HttpError,
    MalformedResponse,
    ApplicationError,
}

impl ApiFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Refused { .. } => FailureKind::Refused,
            Self::HttpError { .. } => FailureKind::HttpError,
            Self::MalformedResponse { .. } => FailureKind::MalformedResponse,
            Self::Application { .. } => FailureKind::ApplicationError,
        }
    }

    /// Returns `true` if the failure means the device should be treated as
    /// unreachable. Application-level rejections do not.
    pub fn is_unreachable(&self) -> bool {
        !matches!(self, Self::Application { .. })
    }

    /// Classify a `reqwest` error.
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_ms }
        } else if let Some(status) = err.status() {
            Self::HttpError {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                message: err.to_string(),
            }
        } else {
            Self::Refused {
                reason: err.to_string(),
            }
        }
    }
}
