// ledfleet-api: Async client for the HTTP API exposed by each LED strip controller.

pub mod device;
pub mod error;
pub mod gateway;
pub mod models;
pub mod transport;

pub use device::{DeviceApi, Timeouts};
pub use error::{ApiFailure, FailureKind};
pub use gateway::{ApiRequest, Gateway, HttpGateway, Method, ResponseShape};
pub use models::{DeviceConfig, Hsl, LedPin, Script, ScriptBody};
pub use transport::TransportConfig;
