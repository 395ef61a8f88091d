// Single-call HTTP gateway
//
// A `Gateway` performs exactly one request against one device and folds
// every outcome into `Result<Value, ApiFailure>`. The reqwest-backed
// implementation lives here; `ledfleet-core` only sees the trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use strum::Display;
use tracing::debug;
use url::Url;

use crate::error::ApiFailure;
use crate::transport::TransportConfig;

/// HTTP verbs used by the device API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// How the response body should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{code, success, message, data}` envelope; `data` is returned.
    Envelope,
    /// Any 2xx status is success; the body is ignored.
    StatusOnly,
}

/// A fully-resolved request against one device.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    pub timeout: Duration,
    pub shape: ResponseShape,
}

impl ApiRequest {
    pub(crate) fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Performs a single device call.
///
/// Implementations must never panic and must report every failure mode
/// through [`ApiFailure`].
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiFailure>;
}

// ── reqwest implementation ───────────────────────────────────────────

/// [`Gateway`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(transport: &TransportConfig) -> Result<Self, ApiFailure> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Wrap a pre-built client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiFailure> {
        let timeout_ms = request.timeout_ms();
        debug!(method = %request.method, url = %request.url, "device request");

        let builder = match request.method {
            Method::Get => self.http.get(request.url),
            Method::Post => self.http.post(request.url),
            Method::Delete => self.http.delete(request.url),
        };
        let builder = match request.body {
            Some(ref body) => builder.json(body),
            None => builder,
        };

        let resp = builder
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| ApiFailure::from_transport(&e, timeout_ms))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiFailure::HttpError {
                status: status.as_u16(),
            });
        }

        match request.shape {
            ResponseShape::StatusOnly => Ok(Value::Null),
            ResponseShape::Envelope => {
                let body = resp
                    .text()
                    .await
                    .map_err(|e| ApiFailure::from_transport(&e, timeout_ms))?;
                parse_envelope(&body)
            }
        }
    }
}

// ── Envelope ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    success: Option<bool>,
    message: Option<String>,
    code: Option<i64>,
    data: Option<Value>,
}

/// Parse the `{code, success, message, data}` envelope, returning `data`
/// on success (an empty object when absent).
pub fn parse_envelope(body: &str) -> Result<Value, ApiFailure> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| ApiFailure::MalformedResponse {
            message: e.to_string(),
        })?;

    match envelope.success {
        Some(true) => Ok(match envelope.data {
            Some(Value::Null) | None => Value::Object(serde_json::Map::new()),
            Some(data) => data,
        }),
        Some(false) => Err(ApiFailure::Application {
            message: envelope.message.unwrap_or_else(|| match envelope.code {
                Some(code) => format!("code={code}"),
                None => "request failed".into(),
            }),
        }),
        None => Err(ApiFailure::Application {
            message: "response envelope has no success indicator".into(),
        }),
    }
}
