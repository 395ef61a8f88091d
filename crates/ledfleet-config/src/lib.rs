//! Configuration for the LED fleet console.
//!
//! TOML file + environment, layered with figment, validated, and
//! translated to `ledfleet_core::FleetConfig`. Core never reads files;
//! it receives the pre-built `FleetConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ledfleet_core::{DeviceDefinition, FleetConfig, MonitorTiming, Timeouts};

/// Environment variable prefix; nested keys are split on `__`.
pub const ENV_PREFIX: &str = "LEDFLEET_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub timing: Timing,

    /// Devices, in display order.
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format: "table" or "json".
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}

/// Timeouts and probe intervals, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Timing {
    pub command_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub online_interval_ms: u64,
    pub offline_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            command_timeout_ms: 3_000,
            probe_timeout_ms: 5_000,
            online_interval_ms: 60_000,
            offline_interval_ms: 5_000,
        }
    }
}

/// One `[[devices]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceEntry {
    pub name: String,
    /// `name[:port]` or a full base URL.
    pub host: String,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "ledfleet", "ledfleet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ledfleet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, a TOML file, and the environment.
///
/// An explicit `path` must exist; the default path may be absent.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

impl Config {
    /// Check the invariants core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices.is_empty() {
            return Err(validation("devices", "at least one device must be configured"));
        }
        for (i, device) in self.devices.iter().enumerate() {
            if device.name.trim().is_empty() {
                return Err(validation(
                    &format!("devices[{i}].name"),
                    "must not be empty",
                ));
            }
            if device.host.trim().is_empty() {
                return Err(validation(
                    &format!("devices[{i}].host"),
                    "must not be empty",
                ));
            }
        }

        let t = &self.timing;
        for (field, value) in [
            ("timing.command_timeout_ms", t.command_timeout_ms),
            ("timing.probe_timeout_ms", t.probe_timeout_ms),
            ("timing.online_interval_ms", t.online_interval_ms),
            ("timing.offline_interval_ms", t.offline_interval_ms),
        ] {
            if value == 0 {
                return Err(validation(field, "must be greater than zero"));
            }
        }

        if !matches!(self.defaults.output.as_str(), "table" | "json") {
            return Err(validation(
                "defaults.output",
                &format!("expected 'table' or 'json', got '{}'", self.defaults.output),
            ));
        }
        Ok(())
    }

    /// Validate and build the runtime `FleetConfig`.
    pub fn to_fleet_config(&self) -> Result<FleetConfig, ConfigError> {
        self.validate()?;

        let t = &self.timing;
        Ok(FleetConfig {
            devices: self
                .devices
                .iter()
                .map(|d| DeviceDefinition::new(d.name.trim(), d.host.trim()))
                .collect(),
            timeouts: Timeouts {
                command: Duration::from_millis(t.command_timeout_ms),
                probe: Duration::from_millis(t.probe_timeout_ms),
            },
            monitor: MonitorTiming {
                online_interval: Duration::from_millis(t.online_interval_ms),
                offline_interval: Duration::from_millis(t.offline_interval_ms),
            },
            ..FleetConfig::default()
        })
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn validation(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}
