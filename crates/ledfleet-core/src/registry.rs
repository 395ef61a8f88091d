// ── Fleet registry ──
//
// The fixed, ordered set of devices built once from configuration.
// Registry order is configuration order and is what listings show.

use std::sync::Arc;

use futures_util::future::join_all;
use indexmap::IndexMap;
use ledfleet_api::{Gateway, Timeouts};
use tracing::debug;

use crate::config::DeviceDefinition;
use crate::device::DeviceHandle;
use crate::error::CoreError;
use crate::event::EventBus;
use crate::model::{DeviceId, DeviceSnapshot};

/// Owns every [`DeviceHandle`] for the lifetime of the fleet.
#[derive(Debug, Default)]
pub struct FleetRegistry {
    devices: IndexMap<DeviceId, Arc<DeviceHandle>>,
}

impl FleetRegistry {
    /// Build handles for `definitions`, in order, sharing one gateway.
    pub fn new(
        definitions: &[DeviceDefinition],
        gateway: &Arc<dyn Gateway>,
        timeouts: Timeouts,
        bus: &EventBus,
    ) -> Result<Self, CoreError> {
        let handles = definitions
            .iter()
            .map(|def| {
                DeviceHandle::new(def, Arc::clone(gateway), timeouts, bus.clone()).map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = handles.len(), "fleet registry built");
        Ok(Self::from_handles(handles))
    }

    pub fn from_handles(handles: impl IntoIterator<Item = Arc<DeviceHandle>>) -> Self {
        Self {
            devices: handles.into_iter().map(|h| (h.id(), h)).collect(),
        }
    }

    pub fn get(&self, id: DeviceId) -> Option<&Arc<DeviceHandle>> {
        self.devices.get(&id)
    }

    /// Look a device up by id (`3` or `#3`), name, or host.
    ///
    /// Names are matched case-insensitively; on a collision the first
    /// device in registry order wins.
    pub fn find(&self, identifier: &str) -> Result<&Arc<DeviceHandle>, CoreError> {
        let by_id = identifier
            .parse::<DeviceId>()
            .ok()
            .and_then(|id| self.devices.get(&id));

        by_id
            .or_else(|| {
                self.devices
                    .values()
                    .find(|d| d.name().eq_ignore_ascii_case(identifier.trim()))
            })
            .or_else(|| self.devices.values().find(|d| d.host() == identifier.trim()))
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: identifier.to_owned(),
            })
    }

    pub fn devices(&self) -> impl Iterator<Item = &Arc<DeviceHandle>> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Selected devices, in registry order.
    pub fn selected(&self) -> Vec<Arc<DeviceHandle>> {
        self.filtered(|d| d.is_selected())
    }

    /// Online devices, in registry order.
    pub fn online(&self) -> Vec<Arc<DeviceHandle>> {
        self.filtered(|d| d.is_online())
    }

    pub fn snapshots(&self) -> Vec<DeviceSnapshot> {
        self.devices.values().map(|d| d.snapshot()).collect()
    }

    /// Probe every device once, concurrently. Returns how many are online.
    ///
    /// Used by one-shot consumers that do not run the background monitor.
    pub async fn probe_all(&self) -> usize {
        let results = join_all(self.devices.values().map(|d| d.probe())).await;
        results.into_iter().filter(|online| *online).count()
    }

    fn filtered(&self, keep: impl Fn(&DeviceHandle) -> bool) -> Vec<Arc<DeviceHandle>> {
        self.devices
            .values()
            .filter(|d| keep(d))
            .cloned()
            .collect()
    }
}
