//! Mock transport for testing without API access.
//!
//! Records every request it is given and answers each one with the same
//! scripted reply.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::transport::{Transport, TransportFailure, TransportRequest, TransportResponse};

/// Transport that serves a fixed reply.
#[derive(Debug, Clone)]
pub struct MockTransport {
    reply: Result<TransportResponse, TransportFailure>,
    /// Requests seen so far, shared between clones.
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl MockTransport {
    /// Answer every request with `status` and `body`.
    pub fn responding(status: u16, body: impl Into<String>) -> Self {
        Self::with_reply(Ok(TransportResponse::new(status, body)))
    }

    /// Fail every request with `failure`.
    pub fn failing(failure: TransportFailure) -> Self {
        Self::with_reply(Err(failure))
    }

    fn with_reply(reply: Result<TransportResponse, TransportFailure>) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.recorded().clone()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.recorded().last().cloned()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<TransportRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        self.recorded().push(request);
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::transport::HttpMethod;

    fn ping() -> TransportRequest {
        TransportRequest {
            method: HttpMethod::Get,
            url: "https://api.freshmail.com/rest/ping".into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn records_requests_across_clones() {
        let mock = MockTransport::responding(200, "{}");
        let clone = mock.clone();

        clone.send(ping()).await.unwrap();
        mock.send(ping()).await.unwrap();

        assert_eq!(mock.requests().len(), 2);
        assert_eq!(mock.last_request(), Some(ping()));
    }

    #[tokio::test]
    async fn failing_mock_returns_failure() {
        let failure = TransportFailure::Connect {
            message: "refused".into(),
        };
        let mock = MockTransport::failing(failure.clone());

        assert_eq!(mock.send(ping()).await.unwrap_err(), failure);
        assert_eq!(mock.requests().len(), 1);
    }
}
