// Device API client
//
// Wraps a `Gateway` with device-scoped URL construction and a hard
// timeout bound. Endpoint methods live in sibling files as inherent
// impls to keep this module focused on request mechanics.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ApiFailure;
use crate::gateway::{ApiRequest, Gateway, Method, ResponseShape};

/// Timeouts applied to device calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Functional API calls (config, scripts, lighting commands).
    pub command: Duration,
    /// Reachability probe (`/ping`).
    pub probe: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            command: Duration::from_millis(3000),
            probe: Duration::from_millis(5000),
        }
    }
}

/// HTTP client for a single strip controller.
///
/// Cheap to clone: the gateway is shared across the whole fleet.
#[derive(Clone)]
pub struct DeviceApi {
    gateway: Arc<dyn Gateway>,
    base_url: Url,
    timeouts: Timeouts,
}

impl fmt::Debug for DeviceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceApi")
            .field("base_url", &self.base_url.as_str())
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl DeviceApi {
    /// Create a client for the device at `host`.
    ///
    /// `host` is either a bare `name[:port]` (HTTP is assumed) or a full
    /// base URL such as `http://10.0.0.7:8080`.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        host: &str,
        timeouts: Timeouts,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            gateway,
            base_url: base_url_for_host(host)?,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{segments...}` with each segment percent-encoded.
    pub(crate) fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue one call, bounded by `timeout` regardless of gateway behavior.
    pub(crate) async fn call(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        timeout: Duration,
        shape: ResponseShape,
    ) -> Result<Value, ApiFailure> {
        debug!(%method, %url, "calling device");

        let request = ApiRequest {
            method,
            url,
            body,
            timeout,
            shape,
        };
        let timeout_ms = request.timeout_ms();

        match tokio::time::timeout(timeout, self.gateway.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(ApiFailure::Timeout { timeout_ms }),
        }
    }

    /// `GET` an enveloped endpoint with the command timeout.
    pub(crate) async fn get(&self, url: Url) -> Result<Value, ApiFailure> {
        self.call(
            Method::Get,
            url,
            None,
            self.timeouts.command,
            ResponseShape::Envelope,
        )
        .await
    }

    /// `POST` a JSON body to an enveloped endpoint with the command timeout.
    pub(crate) async fn post(&self, url: Url, body: Value) -> Result<Value, ApiFailure> {
        self.call(
            Method::Post,
            url,
            Some(body),
            self.timeouts.command,
            ResponseShape::Envelope,
        )
        .await
    }

    /// `DELETE` an enveloped endpoint with the command timeout.
    pub(crate) async fn delete(&self, url: Url) -> Result<Value, ApiFailure> {
        self.call(
            Method::Delete,
            url,
            None,
            self.timeouts.command,
            ResponseShape::Envelope,
        )
        .await
    }

    /// Reachability probe: `GET /ping`, any 2xx within the probe timeout.
    pub async fn ping(&self) -> Result<(), ApiFailure> {
        let url = self.endpoint_url(&["ping"]);
        self.call(
            Method::Get,
            url,
            None,
            self.timeouts.probe,
            ResponseShape::StatusOnly,
        )
        .await
        .map(|_| ())
    }
}

fn base_url_for_host(host: &str) -> Result<Url, url::ParseError> {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        Url::parse(&format!("{host}/"))
    } else {
        Url::parse(&format!("http://{host}/"))
    }
}
