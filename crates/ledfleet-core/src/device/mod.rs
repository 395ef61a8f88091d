// ── One remote strip controller ──
//
// `handle` owns identity and the online/selected state machine,
// `commands` is the API surface with failure classification and the
// config cache, and `monitor` is the background probe loop.

mod commands;
mod handle;
pub(crate) mod monitor;

pub use handle::DeviceHandle;
pub(crate) use handle::SelectOutcome;
