// Per-device endpoint client
//
// `DeviceApi` binds a shared gateway to one device address. Endpoint
// methods are split by concern across the sibling files, the same way
// for every device operation: build URL, issue the call, decode.

pub mod client;
pub mod config;
pub mod lighting;
pub mod scripts;

pub use client::{DeviceApi, Timeouts};
