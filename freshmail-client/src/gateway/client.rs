//! FreshMail REST API gateway.
//!
//! Builds authenticated requests, sends them through a [`Transport`] and
//! triages the outcome into a decoded JSON value or a [`FreshMailError`].

use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::catalog::ErrorCatalog;
use super::error::{FreshMailError, Result};
use super::transport::{
    HttpMethod, ReqwestTransport, Transport, TransportFailure, TransportRequest,
    TransportResponse,
};
use super::vendor;

/// Default base URL for the FreshMail REST API.
const DEFAULT_BASE_URL: &str = "https://api.freshmail.com/rest";

/// API version reported in the User-Agent.
pub const API_VERSION: &str = "v2";

/// Product identifier reported in the User-Agent.
const PRODUCT: &str = "freshmail/rust-api-v2-client";

/// Request parameters. Empty means GET, anything else is POSTed as JSON.
pub type Params = Map<String, Value>;

/// Configuration for the FreshMail client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer token sent with every request
    pub bearer_token: String,
    /// Base URL for the API (defaults to production FreshMail)
    pub base_url: String,
    /// Request timeout in seconds; `None` keeps the transport default
    pub timeout_secs: Option<u64>,
    /// Localized messages for known error codes
    pub catalog: ErrorCatalog,
}

impl ClientConfig {
    /// Create a new config with the given bearer token.
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            catalog: ErrorCatalog::default(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Use a different error message catalog.
    pub fn with_catalog(mut self, catalog: ErrorCatalog) -> Self {
        self.catalog = catalog;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("bearer_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("catalog", &self.catalog)
            .finish()
    }
}

/// Build the User-Agent string.
///
/// Format: `<product>:<api-version>;<client-lib>:<lib-version>;<runtime>:<runtime-version>;interface:<runtime-interface>`.
pub fn user_agent() -> String {
    format!(
        "{PRODUCT}:{API_VERSION};{}:{};rust:{};interface:{}-{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_RUST_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}

/// FreshMail REST API client.
///
/// Generic over the [`Transport`] so tests can substitute a double; the
/// default is [`ReqwestTransport`].
#[derive(Clone)]
pub struct FreshMailClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    authorization: String,
    user_agent: String,
    catalog: ErrorCatalog,
}

impl<T: fmt::Debug> fmt::Debug for FreshMailClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreshMailClient")
            .field("transport", &self.transport)
            .field("base_url", &self.base_url)
            .field("authorization", &"Bearer <redacted>")
            .field("user_agent", &self.user_agent)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl FreshMailClient<ReqwestTransport> {
    /// Create a client that talks HTTP through reqwest.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout_secs.map(Duration::from_secs))?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> FreshMailClient<T> {
    /// Create a client that sends through the given transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {}", config.bearer_token),
            user_agent: user_agent(),
            catalog: config.catalog,
        }
    }

    /// Replace the transport; later requests use the new one.
    pub fn set_transport(&mut self, transport: T) {
        self.transport = transport;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for `endpoint` without sending it.
    pub fn prepare(&self, endpoint: &str, params: &Params) -> TransportRequest {
        let (method, body) = if params.is_empty() {
            (HttpMethod::Get, None)
        } else {
            (HttpMethod::Post, Some(Value::Object(params.clone()).to_string()))
        };

        TransportRequest {
            method,
            url: format!("{}/{}", self.base_url, endpoint.trim_start_matches('/')),
            headers: vec![
                ("Accept", "application/json".to_string()),
                ("Content-Type", "application/json".to_string()),
                ("Authorization", self.authorization.clone()),
                ("User-Agent", self.user_agent.clone()),
            ],
            body,
        }
    }

    /// GET an endpoint.
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.do_request(endpoint, &Params::new()).await
    }

    /// Send one request and return the decoded JSON response.
    ///
    /// Empty `params` issue a GET, otherwise the params are POSTed as a JSON
    /// object. The decoded value is returned as-is.
    pub async fn do_request(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let request = self.prepare(endpoint, params);
        let method = request.method;
        let url = request.url.clone();

        debug!(%method, %url, "sending FreshMail request");

        let response = match self.transport.send(request).await {
            Ok(response) if !response.is_error() => response,
            Ok(TransportResponse { status, body }) => {
                return Err(self.reject(TransportFailure::Status {
                    status,
                    message: body,
                }));
            }
            Err(failure) => return Err(self.reject(failure)),
        };

        debug!(%method, %url, status = response.status, "FreshMail request answered");

        decode(response.body)
    }

    /// Translate a transport failure into a typed error.
    fn reject(&self, failure: TransportFailure) -> FreshMailError {
        let err = match failure {
            TransportFailure::Status { status: 401, .. } => FreshMailError::Unauthorized,
            TransportFailure::Status { status, message } => {
                let (code, message) = vendor::resolve(&message, &self.catalog);
                FreshMailError::Client {
                    status,
                    code,
                    message,
                }
            }
            TransportFailure::Connect { message } => {
                let (code, message) = vendor::resolve(&message, &self.catalog);
                FreshMailError::Connection { code, message }
            }
        };

        warn!(code = ?err.code(), error = %err, "FreshMail request failed");
        err
    }
}

/// Decode a success body, rejecting invalid and falsy JSON.
fn decode(body: String) -> Result<Value> {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) if !is_falsy(&value) => Ok(value),
        Ok(_) => Err(FreshMailError::ServerResponse { raw: body }),
        Err(e) => {
            debug!(error = %e, "FreshMail response is not JSON");
            Err(FreshMailError::ServerResponse { raw: body })
        }
    }
}

/// `null`, `false`, zero, `""`, `"0"` and empty containers carry no payload.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
