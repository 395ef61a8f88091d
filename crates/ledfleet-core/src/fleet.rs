// ── Fleet facade ──
//
// Wires the registry, selection coordinator, and event bus together and
// owns the lifecycle of the per-device connectivity monitors.

use std::sync::Arc;

use ledfleet_api::{Gateway, HttpGateway};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::FleetConfig;
use crate::device::{DeviceHandle, monitor};
use crate::error::CoreError;
use crate::event::{EventBus, FleetEvent};
use crate::fanout::{self, CopyOutcome, DeleteOutcome};
use crate::model::DeviceSnapshot;
use crate::registry::FleetRegistry;
use crate::selection::{SelectionCoordinator, SelectionMode};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<FleetInner>`. Building a fleet does not
/// touch the network; call [`start()`](Self::start) to begin probing.
#[derive(Clone)]
pub struct Fleet {
    inner: Arc<FleetInner>,
}

struct FleetInner {
    config: FleetConfig,
    bus: EventBus,
    registry: Arc<FleetRegistry>,
    selection: Arc<SelectionCoordinator>,
    cancel: CancellationToken,
    monitors: Mutex<Vec<JoinHandle<()>>>,
}

impl Fleet {
    /// Build a fleet talking HTTP to the configured devices.
    pub fn new(config: FleetConfig) -> Result<Self, CoreError> {
        let gateway = HttpGateway::new(&config.transport).map_err(|e| CoreError::Config {
            message: e.to_string(),
        })?;
        Self::with_gateway(config, Arc::new(gateway))
    }

    /// Build a fleet over any [`Gateway`].
    pub fn with_gateway(config: FleetConfig, gateway: Arc<dyn Gateway>) -> Result<Self, CoreError> {
        let bus = EventBus::new(config.event_capacity);
        let registry = Arc::new(FleetRegistry::new(
            &config.devices,
            &gateway,
            config.timeouts,
            &bus,
        )?);
        let selection = Arc::new(SelectionCoordinator::new(
            Arc::clone(&registry),
            bus.clone(),
            SelectionMode::default(),
        ));

        Ok(Self {
            inner: Arc::new(FleetInner {
                config,
                bus,
                registry,
                selection,
                cancel: CancellationToken::new(),
                monitors: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &FleetConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<FleetRegistry> {
        &self.inner.registry
    }

    pub fn selection(&self) -> &Arc<SelectionCoordinator> {
        &self.inner.selection
    }

    /// Subscribe to connectivity and selection events.
    pub fn events(&self) -> broadcast::Receiver<Arc<FleetEvent>> {
        self.inner.bus.subscribe()
    }

    pub fn snapshots(&self) -> Vec<DeviceSnapshot> {
        self.inner.registry.snapshots()
    }

    pub fn find(&self, identifier: &str) -> Result<&Arc<DeviceHandle>, CoreError> {
        self.inner.registry.find(identifier)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn one connectivity monitor per device. Idempotent.
    ///
    /// After [`shutdown()`](Self::shutdown) a fleet cannot be restarted.
    pub async fn start(&self) {
        let mut monitors = self.inner.monitors.lock().await;
        if self.inner.cancel.is_cancelled() {
            warn!("fleet already shut down; not starting monitors");
            return;
        }
        if !monitors.is_empty() {
            return;
        }

        for device in self.inner.registry.devices() {
            monitors.push(tokio::spawn(monitor::run(
                Arc::clone(device),
                self.inner.config.monitor,
                self.inner.cancel.child_token(),
            )));
        }
        info!(devices = monitors.len(), "connectivity monitors started");
    }

    /// Stop every monitor and wait for them to exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut monitors = self.inner.monitors.lock().await;
        for handle in monitors.drain(..) {
            let _ = handle.await;
        }
        debug!("fleet shut down");
    }

    /// Probe every device once without starting the monitors.
    pub async fn probe_all(&self) -> usize {
        self.inner.registry.probe_all().await
    }

    // ── Script management ────────────────────────────────────────────

    pub async fn copy_scripts(
        &self,
        source: &DeviceHandle,
        scripts: &[String],
        targets: &[Arc<DeviceHandle>],
    ) -> CopyOutcome {
        fanout::copy_scripts(source, scripts, targets).await
    }

    pub async fn delete_scripts(&self, device: &DeviceHandle, scripts: &[String]) -> DeleteOutcome {
        fanout::delete_scripts(device, scripts).await
    }
}
