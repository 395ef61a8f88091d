// ── Core identity and state types ──

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static NEXT_DEVICE_ID: AtomicU64 = AtomicU64::new(1);

// ── DeviceId ────────────────────────────────────────────────────────

/// Process-unique device identifier.
///
/// Assigned at registration and never reused within a process, so it is
/// the only safe lookup key: names and hosts may collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u64);

impl DeviceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DEVICE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

// ── DeviceState ─────────────────────────────────────────────────────

/// Mutable connectivity and selection state of one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    pub online: bool,
    pub selected: bool,
    /// True until the first probe completes.
    pub first_check: bool,
    /// Last successful probe or call.
    pub last_seen: Option<DateTime<Utc>>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            online: false,
            selected: false,
            first_check: true,
            last_seen: None,
        }
    }
}

// ── DeviceSnapshot ──────────────────────────────────────────────────

/// Point-in-time view of a device, carried by events and listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub id: DeviceId,
    pub name: String,
    pub host: String,
    pub online: bool,
    pub selected: bool,
    pub last_seen: Option<DateTime<Utc>>,
}
