//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ledfleet_config::ConfigError;
use ledfleet_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const UNREACHABLE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid configuration")]
    #[diagnostic(
        code(ledfleet::config),
        help(
            "Config file: {path}\n\
             Devices are listed as [[devices]] entries with a name and host."
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Devices ──────────────────────────────────────────────────────

    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(ledfleet::not_found),
        help("Run: ledfleet devices to see configured devices")
    )]
    NotFound { identifier: String },

    #[error("{device} is unreachable: {reason}")]
    #[diagnostic(
        code(ledfleet::unreachable),
        help("Check that the strip is powered and on the network.")
    )]
    DeviceOffline { device: String, reason: String },

    #[error("{device} rejected the request: {message}")]
    #[diagnostic(code(ledfleet::rejected))]
    Rejected { device: String, message: String },

    #[error("No online devices to target")]
    #[diagnostic(
        code(ledfleet::no_targets),
        help("Run: ledfleet devices to check connectivity, or name devices with --device")
    )]
    NoTargets,

    #[error("{operation} failed on all {attempted} target(s)")]
    #[diagnostic(code(ledfleet::all_failed))]
    AllFailed { operation: String, attempted: usize },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ledfleet::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(ledfleet::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Runtime ──────────────────────────────────────────────────────

    #[error("Failed to start: {message}")]
    #[diagnostic(code(ledfleet::startup))]
    Startup { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(ledfleet::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => exit_code::CONFIG,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::DeviceOffline { .. } | Self::NoTargets => exit_code::UNREACHABLE,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn config(path: &std::path::Path, source: ConfigError) -> Self {
        Self::Config {
            path: path.display().to_string(),
            source,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceOffline { device, reason } => Self::DeviceOffline {
                device,
                reason: reason.to_string(),
            },
            CoreError::Rejected { device, message } => Self::Rejected { device, message },
            CoreError::DeviceNotFound { identifier } => Self::NotFound { identifier },
            CoreError::InvalidAddress {
                device,
                host,
                reason,
            } => Self::Validation {
                field: format!("host of {device}"),
                reason: format!("'{host}': {reason}"),
            },
            CoreError::Config { message } => Self::Startup { message },
        }
    }
}
