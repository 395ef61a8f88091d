// ── Runtime fleet configuration ──
//
// Describes which devices exist and how to talk to them. Core never
// reads files: `ledfleet-config` (or a test) builds a `FleetConfig`
// and hands it in.

use std::time::Duration;

use ledfleet_api::{Timeouts, TransportConfig};
use serde::{Deserialize, Serialize};

/// One device entry as supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDefinition {
    pub name: String,
    pub host: String,
}

impl DeviceDefinition {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
        }
    }
}

/// Probe scheduling for the connectivity monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorTiming {
    /// Delay before the next probe while the device is online.
    pub online_interval: Duration,
    /// Delay before the next probe while the device is offline.
    pub offline_interval: Duration,
}

impl MonitorTiming {
    pub fn interval_for(&self, online: bool) -> Duration {
        if online {
            self.online_interval
        } else {
            self.offline_interval
        }
    }
}

impl Default for MonitorTiming {
    fn default() -> Self {
        Self {
            online_interval: Duration::from_millis(60_000),
            offline_interval: Duration::from_millis(5_000),
        }
    }
}

/// Everything needed to build a [`Fleet`](crate::Fleet).
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Devices in display order.
    pub devices: Vec<DeviceDefinition>,
    pub timeouts: Timeouts,
    pub monitor: MonitorTiming,
    pub transport: TransportConfig,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            timeouts: Timeouts::default(),
            monitor: MonitorTiming::default(),
            transport: TransportConfig::default(),
            event_capacity: 256,
        }
    }
}

impl FleetConfig {
    pub fn with_devices(devices: Vec<DeviceDefinition>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }
}
