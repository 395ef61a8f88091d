// ── Multi-device operations ──
//
// Best-effort fan-out: every device's outcome is independent and is
// reported back, never raised for the batch as a whole.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use ledfleet_api::DeviceConfig;
use tracing::{debug, info, warn};

use crate::device::DeviceHandle;
use crate::error::CoreError;
use crate::model::DeviceId;

// ── Broadcast ───────────────────────────────────────────────────────

/// Outcome of one command on one device.
#[derive(Debug, Clone)]
pub struct DeviceResult<T> {
    pub device: DeviceId,
    pub name: String,
    pub result: Result<T, CoreError>,
}

/// Per-device outcomes of a broadcast, in dispatch order.
#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    pub results: Vec<DeviceResult<T>>,
}

impl<T> BatchOutcome<T> {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &DeviceResult<T>> {
        self.results.iter().filter(|r| r.result.is_err())
    }

    /// True when at least one device was targeted and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.attempted() > 0 && self.succeeded() == 0
    }
}

/// Run `command` on every device at once and collect each outcome.
///
/// All calls are started before any is awaited, so a slow device never
/// delays dispatch to the others.
pub async fn broadcast<F, Fut, T>(devices: Vec<Arc<DeviceHandle>>, command: F) -> BatchOutcome<T>
where
    F: Fn(Arc<DeviceHandle>) -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let calls = devices.into_iter().map(|device| {
        let id = device.id();
        let name = device.name().to_owned();
        let call = command(device);
        async move {
            DeviceResult {
                device: id,
                name,
                result: call.await,
            }
        }
    });

    let results = join_all(calls).await;
    let outcome = BatchOutcome { results };
    debug!(
        attempted = outcome.attempted(),
        succeeded = outcome.succeeded(),
        "broadcast complete"
    );
    outcome
}

// ── Copy ────────────────────────────────────────────────────────────

/// One (script, target) pair that did not land.
#[derive(Debug, Clone)]
pub struct CopyFailure {
    pub script: String,
    pub target: DeviceId,
    pub target_name: String,
    pub error: CoreError,
}

/// Aggregate result of [`copy_scripts`].
#[derive(Debug, Clone, Default)]
pub struct CopyOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<CopyFailure>,
}

/// Copy each named script from `source` to every target.
///
/// Each body is fetched from the source once, then pushed to the targets
/// one after another. Every (script, target) pair is attempted exactly
/// once; if the source fetch fails, that script's pairs count as
/// attempted and failed.
pub async fn copy_scripts(
    source: &DeviceHandle,
    scripts: &[String],
    targets: &[Arc<DeviceHandle>],
) -> CopyOutcome {
    let mut outcome = CopyOutcome::default();

    for script in scripts {
        let body = source.get_script(script).await;

        for target in targets {
            outcome.attempted += 1;
            let result = match body {
                Ok(ref body) => target.save_script(script, body).await.map(|_| ()),
                Err(ref e) => Err(e.clone()),
            };
            match result {
                Ok(()) => {
                    outcome.succeeded += 1;
                    debug!(%script, target = %target.name(), "script copied");
                }
                Err(error) => {
                    warn!(%script, target = %target.name(), %error, "script copy failed");
                    outcome.failures.push(CopyFailure {
                        script: script.clone(),
                        target: target.id(),
                        target_name: target.name().to_owned(),
                        error,
                    });
                }
            }
        }
    }

    info!(
        source = %source.name(),
        attempted = outcome.attempted,
        succeeded = outcome.succeeded,
        "script copy finished"
    );
    outcome
}

// ── Delete ──────────────────────────────────────────────────────────

/// Aggregate result of [`delete_scripts`].
#[derive(Debug, Clone, Default)]
pub struct DeleteOutcome {
    pub deleted: Vec<String>,
    pub failures: Vec<(String, CoreError)>,
    /// Configuration refreshed after every delete resolved, if the
    /// refresh itself succeeded.
    pub config: Option<Arc<DeviceConfig>>,
}

/// Delete the named scripts from one device, then refresh its config.
///
/// The deletes run concurrently; the refresh happens strictly after all
/// of them have resolved, whatever their outcome.
pub async fn delete_scripts(device: &DeviceHandle, scripts: &[String]) -> DeleteOutcome {
    let results = join_all(scripts.iter().map(|script| async move {
        (script.clone(), device.delete_script(script).await)
    }))
    .await;

    let mut outcome = DeleteOutcome::default();
    for (script, result) in results {
        match result {
            Ok(()) => outcome.deleted.push(script),
            Err(error) => {
                warn!(%script, device = %device.name(), %error, "script delete failed");
                outcome.failures.push((script, error));
            }
        }
    }

    outcome.config = match device.get_config(true).await {
        Ok(config) => Some(config),
        Err(error) => {
            warn!(device = %device.name(), %error, "config refresh after delete failed");
            None
        }
    };
    outcome
}
