//! HTTP transport abstraction and the default reqwest implementation.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// HTTP method used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Header name/value pairs, in the order they are sent.
    pub headers: Vec<(&'static str, String)>,
    /// JSON body; `None` for GET requests.
    pub body: Option<String>,
}

impl TransportRequest {
    /// Value of the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body of a response that reached the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 4xx or 5xx.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Raw failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    /// The request never reached the server (DNS, refused, timeout).
    #[error("{message}")]
    Connect { message: String },

    /// The server answered with a 4xx/5xx status.
    ///
    /// `message` is free text that embeds the response body.
    #[error("{message}")]
    Status { status: u16, message: String },
}

impl TransportFailure {
    pub fn message(&self) -> &str {
        match self {
            TransportFailure::Connect { message } | TransportFailure::Status { message, .. } => {
                message
            }
        }
    }
}

/// Capability to perform one HTTP round trip.
///
/// Implementations return the response when the server answered with a
/// non-error status (1xx/2xx/3xx) and a [`TransportFailure`] otherwise.
/// Returning a 4xx/5xx [`TransportResponse`] is also accepted; the gateway
/// triages it like a `Status` failure. Non-error responses always go through
/// JSON decoding, whatever their status.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportFailure>> + Send;
}

/// Transport backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport; `timeout` of `None` keeps reqwest's default.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| TransportFailure::Connect {
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string());

        into_outcome(request.method, &request.url, status, body)
    }
}

/// Classify an answered request once its body has been read.
///
/// The server was reached, so a body that could not be read is never a
/// `Connect` failure: error statuses keep their status, and other statuses
/// yield an empty body that the gateway rejects as unparseable.
fn into_outcome(
    method: HttpMethod,
    url: &str,
    status: reqwest::StatusCode,
    body: Result<String, String>,
) -> Result<TransportResponse, TransportFailure> {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(%method, %url, status = status.as_u16(), error = %e, "failed to read response body");
            if status.is_client_error() || status.is_server_error() {
                format!("<unreadable body: {e}>")
            } else {
                String::new()
            }
        }
    };

    if status.is_client_error() || status.is_server_error() {
        let kind = if status.is_client_error() {
            "Client"
        } else {
            "Server"
        };
        return Err(TransportFailure::Status {
            status: status.as_u16(),
            message: format!(
                "{kind} error: `{method} {url}` resulted in a `{status}` response:\n{body}"
            ),
        });
    }

    Ok(TransportResponse {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(method: HttpMethod, url: String, body: Option<&str>) -> TransportRequest {
        TransportRequest {
            method,
            url,
            headers: vec![
                ("Accept", "application/json".to_string()),
                ("Authorization", "Bearer secret".to_string()),
            ],
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = request(HttpMethod::Get, "http://localhost/ping".into(), None);

        assert_eq!(request.header("authorization"), Some("Bearer secret"));
        assert_eq!(request.header("User-Agent"), None);
    }

    #[test]
    fn success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
        assert!(!TransportResponse::new(401, "").is_success());
        assert!(!TransportResponse::new(302, "").is_error());
        assert!(TransportResponse::new(401, "").is_error());
        assert!(TransportResponse::new(503, "").is_error());
    }

    #[test]
    fn unreadable_body_keeps_error_status() {
        let failure = into_outcome(
            HttpMethod::Post,
            "https://api.freshmail.com/rest/subscriber/add",
            reqwest::StatusCode::BAD_REQUEST,
            Err("connection reset".to_string()),
        )
        .unwrap_err();

        match failure {
            TransportFailure::Status { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("400 Bad Request"));
                assert!(message.ends_with("<unreadable body: connection reset>"));
            }
            other => panic!("expected status failure, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_success_body_is_empty() {
        let response = into_outcome(
            HttpMethod::Get,
            "https://api.freshmail.com/rest/ping",
            reqwest::StatusCode::OK,
            Err("connection reset".to_string()),
        )
        .unwrap();

        assert_eq!(response, TransportResponse::new(200, ""));
    }

    #[test]
    fn redirect_status_is_not_a_failure() {
        let response = into_outcome(
            HttpMethod::Get,
            "https://api.freshmail.com/rest/ping",
            reqwest::StatusCode::NOT_MODIFIED,
            Ok(String::new()),
        )
        .unwrap();

        assert!(!response.is_success());
        assert!(!response.is_error());
    }

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/subscriber/add"))
            .and(header("Authorization", "Bearer secret"))
            .and(body_string(r#"{"email":"a@b.pl"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"OK"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(None).unwrap();
        let response = transport
            .send(request(
                HttpMethod::Post,
                format!("{}/rest/subscriber/add", server.uri()),
                Some(r#"{"email":"a@b.pl"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response, TransportResponse::new(200, r#"{"status":"OK"}"#));
    }

    #[tokio::test]
    async fn error_status_embeds_body_after_preamble() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/ping"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"errors":[{"code":1301,"message":"bad email"}]}"#),
            )
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();
        let err = transport
            .send(request(
                HttpMethod::Get,
                format!("{}/rest/ping", server.uri()),
                None,
            ))
            .await
            .unwrap_err();

        match err {
            TransportFailure::Status { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with("Client error: `GET "));
                assert!(message.contains("400 Bad Request"));
                assert!(message.ends_with(r#"{"errors":[{"code":1301,"message":"bad email"}]}"#));
            }
            other => panic!("expected status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_labelled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::default();
        let err = transport
            .send(request(HttpMethod::Get, format!("{}/rest/ping", server.uri()), None))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportFailure::Status { status: 503, .. }));
        assert!(err.message().starts_with("Server error:"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_connect_failure() {
        // Port 1 (tcpmux) is not served on test machines.
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();
        let err = transport
            .send(request(
                HttpMethod::Get,
                "http://127.0.0.1:1/rest/ping".to_string(),
                None,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportFailure::Connect { .. }));
    }
}
