#![allow(clippy::unwrap_used, dead_code)]
// Scriptable in-memory gateway shared by the integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ledfleet_api::{ApiFailure, ApiRequest, Gateway, Method};
use ledfleet_core::{DeviceDefinition, Fleet, FleetConfig, FleetEvent};
use serde_json::{Value, json};
use tokio::sync::broadcast;

#[derive(Clone)]
pub enum Reply {
    Respond(Result<Value, ApiFailure>),
    Hang,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub host: String,
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

type RouteKey = (String, String, String);

/// Routes are keyed by (host, method, path). Unrouted calls are refused.
#[derive(Default)]
pub struct FakeGateway {
    routes: Mutex<HashMap<RouteKey, Reply>>,
    calls: Mutex<Vec<Call>>,
}

fn key(host: &str, method: Method, path: &str) -> RouteKey {
    (host.to_owned(), method.to_string(), path.to_owned())
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, host: &str, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .insert(key(host, method, path), reply);
    }

    pub fn ok(&self, host: &str, method: Method, path: &str, data: Value) {
        self.on(host, method, path, Reply::Respond(Ok(data)));
    }

    pub fn fail(&self, host: &str, method: Method, path: &str, failure: ApiFailure) {
        self.on(host, method, path, Reply::Respond(Err(failure)));
    }

    pub fn hang(&self, host: &str, method: Method, path: &str) {
        self.on(host, method, path, Reply::Hang);
    }

    /// Make `/ping` succeed for `host`.
    pub fn up(&self, host: &str) {
        self.ok(host, Method::Get, "/ping", Value::Null);
    }

    /// Serve a config document listing `scripts` for `host`.
    pub fn config_with_scripts(&self, host: &str, scripts: &[&str]) {
        self.ok(
            host,
            Method::Get,
            "/api/config",
            json!({ "hostname": host, "scripts": scripts }),
        );
    }

    pub fn calls(&self, host: &str, method: Method, path: &str) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.host == host && c.method == method && c.path == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, host: &str, method: Method, path: &str) -> usize {
        self.calls(host, method, path).len()
    }

    pub fn log(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiFailure> {
        let host = request.url.host_str().unwrap_or_default().to_owned();
        let path = request.url.path().to_owned();
        self.calls.lock().unwrap().push(Call {
            host: host.clone(),
            method: request.method,
            path: path.clone(),
            body: request.body.clone(),
        });

        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(&key(&host, request.method, &path))
            .cloned();
        match reply {
            Some(Reply::Respond(result)) => result,
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(ApiFailure::Refused {
                reason: "connection refused".into(),
            }),
        }
    }
}

/// Build a fleet of `(name, host)` devices over `gateway`.
pub fn fleet(gateway: &Arc<FakeGateway>, devices: &[(&str, &str)]) -> Fleet {
    let config = FleetConfig::with_devices(
        devices
            .iter()
            .map(|(name, host)| DeviceDefinition::new(*name, *host))
            .collect(),
    );
    Fleet::with_gateway(config, Arc::clone(gateway) as Arc<dyn Gateway>).unwrap()
}

/// Every event currently queued, by name.
pub fn drain(rx: &mut broadcast::Receiver<Arc<FleetEvent>>) -> Vec<&'static str> {
    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        names.push(event.name());
    }
    names
}
