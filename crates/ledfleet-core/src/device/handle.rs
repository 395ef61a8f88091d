use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use ledfleet_api::{ApiFailure, DeviceApi, DeviceConfig, Gateway, Timeouts};
use tokio::sync::{Mutex, Notify, watch};
use tracing::{debug, info, warn};

use crate::config::DeviceDefinition;
use crate::error::CoreError;
use crate::event::{EventBus, FleetEvent};
use crate::model::{DeviceId, DeviceSnapshot, DeviceState};

/// Result of asking a device to change its `selected` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectOutcome {
    Changed,
    Unchanged,
    /// Selecting an offline device is refused.
    Rejected,
}

/// What a probe or failed command did to connectivity.
enum Transition {
    Online,
    Offline { was_selected: bool },
}

/// One remote device.
///
/// Owned by the [`FleetRegistry`](crate::FleetRegistry) and shared as
/// `Arc<DeviceHandle>`. All state lives behind a `watch` channel so
/// flag changes are atomic and observable; only the connectivity
/// monitor, the command surface, and the selection coordinator write it.
pub struct DeviceHandle {
    id: DeviceId,
    name: String,
    host: String,
    pub(super) api: DeviceApi,
    bus: EventBus,
    state: watch::Sender<DeviceState>,
    pub(super) config: Mutex<Option<Arc<DeviceConfig>>>,
    reschedule: Notify,
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl DeviceHandle {
    /// Register a device, assigning it a fresh [`DeviceId`].
    ///
    /// The device starts offline with its first check pending.
    pub fn new(
        definition: &DeviceDefinition,
        gateway: Arc<dyn Gateway>,
        timeouts: Timeouts,
        bus: EventBus,
    ) -> Result<Self, CoreError> {
        let api = DeviceApi::new(gateway, &definition.host, timeouts).map_err(|e| {
            CoreError::InvalidAddress {
                device: definition.name.clone(),
                host: definition.host.clone(),
                reason: e.to_string(),
            }
        })?;
        let (state, _) = watch::channel(DeviceState::default());

        Ok(Self {
            id: DeviceId::next(),
            name: definition.name.clone(),
            host: definition.host.clone(),
            api,
            bus,
            state,
            config: Mutex::new(None),
            reschedule: Notify::new(),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn state(&self) -> DeviceState {
        self.state.borrow().clone()
    }

    pub fn is_online(&self) -> bool {
        self.state.borrow().online
    }

    pub fn is_selected(&self) -> bool {
        self.state.borrow().selected
    }

    /// Watch this device's state.
    pub fn subscribe(&self) -> watch::Receiver<DeviceState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        let state = self.state.borrow();
        DeviceSnapshot {
            id: self.id,
            name: self.name.clone(),
            host: self.host.clone(),
            online: state.online,
            selected: state.selected,
            last_seen: state.last_seen,
        }
    }

    // ── Connectivity ─────────────────────────────────────────────────

    /// Probe reachability once and apply the result.
    ///
    /// Returns whether the device is online afterwards.
    pub async fn probe(&self) -> bool {
        let result = self.api.ping().await;
        if let Err(ref failure) = result {
            debug!(device = %self.name, kind = %failure.kind(), "probe failed");
        }
        self.record_probe(result.is_ok());
        self.is_online()
    }

    fn record_probe(&self, reachable: bool) {
        let mut transition = None;
        self.state.send_if_modified(|state| {
            let first = std::mem::replace(&mut state.first_check, false);
            if reachable {
                state.last_seen = Some(Utc::now());
                if !state.online || first {
                    state.online = true;
                    transition = Some(Transition::Online);
                }
                true
            } else if state.online || first {
                transition = Some(Transition::Offline {
                    was_selected: state.selected,
                });
                state.online = false;
                state.selected = false;
                true
            } else {
                false
            }
        });

        if let Some(transition) = transition {
            self.announce(transition);
        }
    }

    /// Flip the device offline after an unreachable-class command failure.
    ///
    /// Emits only on an actual online to offline transition and wakes the
    /// monitor so the next probe runs on the offline interval.
    pub(crate) fn mark_offline(&self, failure: &ApiFailure) {
        let mut was_selected = None;
        self.state.send_if_modified(|state| {
            if !state.online {
                return false;
            }
            was_selected = Some(state.selected);
            state.online = false;
            state.selected = false;
            true
        });

        if let Some(was_selected) = was_selected {
            warn!(device = %self.name, kind = %failure.kind(), "device marked offline after failed call");
            self.announce(Transition::Offline { was_selected });
            self.reschedule.notify_one();
        }
    }

    pub(crate) fn touch(&self) {
        self.state.send_modify(|state| state.last_seen = Some(Utc::now()));
    }

    /// Resolves when a command failure asks the monitor to re-probe soon.
    pub(crate) async fn rescheduled(&self) {
        self.reschedule.notified().await;
    }

    fn announce(&self, transition: Transition) {
        let snapshot = self.snapshot();
        match transition {
            Transition::Online => {
                info!(device = %self.name, host = %self.host, "device online");
                self.bus.publish(FleetEvent::DeviceOnline(snapshot.clone()));
                self.bus.publish(FleetEvent::DeviceStatusChanged(snapshot));
            }
            Transition::Offline { was_selected } => {
                info!(device = %self.name, host = %self.host, "device offline");
                self.bus.publish(FleetEvent::DeviceOffline(snapshot.clone()));
                self.bus
                    .publish(FleetEvent::DeviceStatusChanged(snapshot.clone()));
                if was_selected {
                    self.bus.publish(FleetEvent::SelectionChanged(Some(snapshot)));
                }
            }
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Set the `selected` flag; only the selection coordinator calls this.
    ///
    /// The online check and the write happen under the same lock, so an
    /// offline device can never end up selected.
    pub(crate) fn set_selected(&self, selected: bool) -> SelectOutcome {
        let mut outcome = SelectOutcome::Unchanged;
        self.state.send_if_modified(|state| {
            if state.selected == selected {
                return false;
            }
            if selected && !state.online {
                outcome = SelectOutcome::Rejected;
                return false;
            }
            state.selected = selected;
            outcome = SelectOutcome::Changed;
            true
        });
        outcome
    }
}
