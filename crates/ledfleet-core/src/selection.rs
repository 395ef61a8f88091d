// ── Selection coordinator ──
//
// Tracks which devices commands target. Selection order is kept here;
// the per-device `selected` flag lives on the handle so that a device
// going offline can clear it without involving the coordinator.

use std::future::Future;
use std::sync::Arc;

use ledfleet_api::{Hsl, Script};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::watch;
use tracing::debug;

use crate::device::{DeviceHandle, SelectOutcome};
use crate::error::CoreError;
use crate::event::{EventBus, FleetEvent};
use crate::fanout::{self, BatchOutcome};
use crate::intersection;
use crate::model::DeviceId;
use crate::registry::FleetRegistry;

/// How many devices may be selected at once.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one device.
    #[default]
    Single,
    /// Any number of devices.
    Multiple,
}

#[derive(Debug, Clone, Default)]
struct SelectionState {
    mode: SelectionMode,
    /// Selection order; may hold ids whose device has since gone offline.
    order: Vec<DeviceId>,
}

/// Select/deselect over a [`FleetRegistry`], with fan-out to the selection.
///
/// Every operation runs under one lock, so a single-select swap is one
/// logical step and emits one event.
#[derive(Debug)]
pub struct SelectionCoordinator {
    registry: Arc<FleetRegistry>,
    bus: EventBus,
    state: watch::Sender<SelectionState>,
}

impl SelectionCoordinator {
    pub fn new(registry: Arc<FleetRegistry>, bus: EventBus, mode: SelectionMode) -> Self {
        let (state, _) = watch::channel(SelectionState {
            mode,
            order: Vec::new(),
        });
        Self {
            registry,
            bus,
            state,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.state.borrow().mode
    }

    /// Switch modes.
    ///
    /// Entering single mode keeps only the earliest selected device and
    /// announces it (or `None`). Entering multiple mode keeps the
    /// selection and announces a bulk change.
    pub fn set_mode(&self, mode: SelectionMode) {
        let mut event = None;
        self.state.send_if_modified(|state| {
            if state.mode == mode {
                return false;
            }
            state.mode = mode;
            prune(&self.registry, &mut state.order);
            match mode {
                SelectionMode::Single => {
                    let kept = state.order.first().copied();
                    for device in self.registry.devices() {
                        if Some(device.id()) != kept {
                            device.set_selected(false);
                        }
                    }
                    state.order.truncate(1);
                    let snapshot = kept
                        .and_then(|id| self.registry.get(id))
                        .map(|d| d.snapshot());
                    event = Some(FleetEvent::SingleSelectionChanged(snapshot));
                }
                SelectionMode::Multiple => {
                    event = Some(FleetEvent::SelectionChanged(None));
                }
            }
            true
        });

        if let Some(event) = event {
            debug!(%mode, "selection mode changed");
            self.bus.publish(event);
        }
    }

    /// Select a device. Returns whether anything changed.
    ///
    /// Selecting an offline device is a no-op. In single mode every other
    /// device is deselected in the same step.
    pub fn select(&self, device: &DeviceHandle) -> bool {
        let mut event = None;
        self.state.send_if_modified(|state| {
            event = match state.mode {
                SelectionMode::Single => self.select_single(state, device),
                SelectionMode::Multiple => select_multiple(state, device),
            };
            event.is_some()
        });
        self.publish(event)
    }

    pub fn deselect(&self, device: &DeviceHandle) -> bool {
        let mut event = None;
        self.state.send_if_modified(|state| {
            if device.set_selected(false) != SelectOutcome::Changed {
                return false;
            }
            state.order.retain(|id| *id != device.id());
            event = Some(match state.mode {
                SelectionMode::Single => FleetEvent::SingleSelectionChanged(None),
                SelectionMode::Multiple => FleetEvent::SelectionChanged(Some(device.snapshot())),
            });
            true
        });
        self.publish(event)
    }

    /// Flip a device's selection.
    pub fn toggle(&self, device: &DeviceHandle) -> bool {
        if device.is_selected() {
            self.deselect(device)
        } else {
            self.select(device)
        }
    }

    /// Select every device matching `predicate`, skipping offline ones.
    ///
    /// In single mode only the first match is selected. Emits one bulk
    /// event if anything changed.
    pub fn select_all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&DeviceHandle) -> bool,
    {
        let mut event = None;
        self.state.send_if_modified(|state| {
            event = match state.mode {
                SelectionMode::Single => self
                    .registry
                    .devices()
                    .find(|d| d.is_online() && predicate(d))
                    .and_then(|d| self.select_single(state, d)),
                SelectionMode::Multiple => {
                    // Ids of devices that went offline are still queued.
                    prune(&self.registry, &mut state.order);
                    let mut changed = false;
                    for device in self.registry.devices().filter(|d| predicate(d)) {
                        if device.set_selected(true) == SelectOutcome::Changed {
                            state.order.push(device.id());
                            changed = true;
                        }
                    }
                    changed.then_some(FleetEvent::SelectionChanged(None))
                }
            };
            event.is_some()
        });
        self.publish(event)
    }

    pub fn select_none(&self) -> bool {
        let mut event = None;
        self.state.send_if_modified(|state| {
            let mut changed = false;
            for device in self.registry.devices() {
                changed |= device.set_selected(false) == SelectOutcome::Changed;
            }
            state.order.clear();
            if changed {
                event = Some(match state.mode {
                    SelectionMode::Single => FleetEvent::SingleSelectionChanged(None),
                    SelectionMode::Multiple => FleetEvent::SelectionChanged(None),
                });
            }
            changed
        });
        self.publish(event)
    }

    /// Currently selected devices, in the order they were selected.
    pub fn get_selected(&self) -> Vec<Arc<DeviceHandle>> {
        let state = self.state.borrow();
        state
            .order
            .iter()
            .filter_map(|id| self.registry.get(*id))
            .filter(|d| d.is_selected())
            .cloned()
            .collect()
    }

    // ── Fan-out to the selection ─────────────────────────────────────

    pub async fn broadcast<F, Fut, T>(&self, command: F) -> BatchOutcome<T>
    where
        F: Fn(Arc<DeviceHandle>) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        fanout::broadcast(self.get_selected(), command).await
    }

    pub async fn set_color(&self, color: Hsl) -> BatchOutcome<()> {
        self.broadcast(|d| async move { d.set_color(color).await })
            .await
    }

    pub async fn set_white(&self, level: u8) -> BatchOutcome<()> {
        self.broadcast(|d| async move { d.set_white(level).await })
            .await
    }

    pub async fn set_off(&self) -> BatchOutcome<()> {
        self.broadcast(|d| async move { d.set_off().await }).await
    }

    pub async fn run_script(&self, name: &str) -> BatchOutcome<()> {
        self.broadcast(|d| {
            let name = name.to_owned();
            async move { d.run_script(&name).await }
        })
        .await
    }

    /// Scripts valid on every selected device.
    pub async fn shared_scripts(&self) -> Vec<Script> {
        intersection::shared_scripts(&self.get_selected()).await
    }

    // ── Internals ────────────────────────────────────────────────────

    fn select_single(&self, state: &mut SelectionState, device: &DeviceHandle) -> Option<FleetEvent> {
        let mut changed = match device.set_selected(true) {
            SelectOutcome::Rejected => return None,
            outcome => outcome == SelectOutcome::Changed,
        };
        for other in self.registry.devices().filter(|d| d.id() != device.id()) {
            changed |= other.set_selected(false) == SelectOutcome::Changed;
        }
        state.order.clear();
        state.order.push(device.id());
        changed.then(|| FleetEvent::SingleSelectionChanged(Some(device.snapshot())))
    }

    fn publish(&self, event: Option<FleetEvent>) -> bool {
        match event {
            Some(event) => {
                self.bus.publish(event);
                true
            }
            None => false,
        }
    }
}

fn select_multiple(state: &mut SelectionState, device: &DeviceHandle) -> Option<FleetEvent> {
    if device.set_selected(true) != SelectOutcome::Changed {
        return None;
    }
    state.order.retain(|id| *id != device.id());
    state.order.push(device.id());
    Some(FleetEvent::SelectionChanged(Some(device.snapshot())))
}

/// Drop ids whose device is no longer selected.
fn prune(registry: &FleetRegistry, order: &mut Vec<DeviceId>) {
    order.retain(|id| registry.get(*id).is_some_and(|d| d.is_selected()));
}
