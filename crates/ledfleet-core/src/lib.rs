//! Device connectivity and fleet command layer for networked LED strips.
//!
//! This crate sits between `ledfleet-api` and whatever console drives the
//! fleet (the `ledfleet` CLI today):
//!
//! - **[`DeviceHandle`]**: One remote strip: identity, online/selected
//!   state, a cached configuration document, and the full command surface.
//!   Any unreachable-class failure flips the device offline immediately.
//!
//! - **Connectivity monitor**: One background task per device probing
//!   `/ping` on an adaptive interval (slow while online, fast while
//!   offline), emitting exactly one event per state transition.
//!
//! - **[`FleetRegistry`]**: The fixed, ordered set of devices built from
//!   configuration, keyed by stable [`DeviceId`].
//!
//! - **[`SelectionCoordinator`]**: Single- or multi-select over the
//!   registry, with best-effort fan-out of commands to the selection.
//!
//! - **[`intersect_scripts`] / [`shared_scripts`]**: Scripts present on
//!   every device in a selection.
//!
//! - **[`Fleet`]**: Facade that wires the above together with an
//!   [`EventBus`] and owns monitor lifecycle (`start` / `shutdown`).

pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod fanout;
pub mod fleet;
pub mod intersection;
pub mod model;
pub mod registry;
pub mod selection;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceDefinition, FleetConfig, MonitorTiming};
pub use device::DeviceHandle;
pub use error::CoreError;
pub use event::{EventBus, FleetEvent};
pub use fanout::{BatchOutcome, CopyFailure, CopyOutcome, DeleteOutcome, DeviceResult};
pub use fleet::Fleet;
pub use intersection::{intersect_scripts, shared_scripts};
pub use model::{DeviceId, DeviceSnapshot, DeviceState};
pub use registry::FleetRegistry;
pub use selection::{SelectionCoordinator, SelectionMode};

// Wire types consumers need without depending on the api crate directly.
pub use ledfleet_api::{ApiFailure, DeviceConfig, FailureKind, Hsl, Script, ScriptBody, Timeouts};
