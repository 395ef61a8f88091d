// ── Fleet event channel ──
//
// Connectivity and selection changes are published here. Core never
// knows who listens; a UI (or the CLI `watch` command) subscribes.

use std::sync::Arc;

use strum::IntoStaticStr;
use tokio::sync::broadcast;
use tracing::trace;

use crate::model::DeviceSnapshot;

/// Something the console should react to.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum FleetEvent {
    /// Device became reachable (or was reachable on its first probe).
    DeviceOnline(DeviceSnapshot),
    /// Device became unreachable (or was unreachable on its first probe).
    DeviceOffline(DeviceSnapshot),
    /// Fired alongside every online/offline event.
    DeviceStatusChanged(DeviceSnapshot),
    /// Single-select mode: the new selection, or `None` when cleared.
    SingleSelectionChanged(Option<DeviceSnapshot>),
    /// Multi-select mode: the toggled device, or `None` after a bulk change.
    SelectionChanged(Option<DeviceSnapshot>),
}

impl FleetEvent {
    /// Event name as used by UI listeners (`deviceOnline`, ...).
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// The device this event concerns, if any.
    pub fn device(&self) -> Option<&DeviceSnapshot> {
        match self {
            Self::DeviceOnline(d) | Self::DeviceOffline(d) | Self::DeviceStatusChanged(d) => {
                Some(d)
            }
            Self::SingleSelectionChanged(d) | Self::SelectionChanged(d) => d.as_ref(),
        }
    }
}

/// Publish/subscribe channel for [`FleetEvent`]s.
///
/// Cheaply cloneable; every clone publishes into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Arc<FleetEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: FleetEvent) {
        trace!(event = event.name(), "publishing fleet event");
        let _ = self.tx.send(Arc::new(event));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<FleetEvent>> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
