//! FreshMail REST API v2 gateway.
//!
//! This module provides an HTTP client for the FreshMail REST API. Every
//! call is one authenticated round trip:
//! - empty params are sent as `GET`, anything else as a `POST` with a JSON body
//! - a 2xx response is decoded to a [`serde_json::Value`] and returned as-is
//! - failures become a [`FreshMailError`], with known vendor error codes
//!   mapped to localized messages through the [`ErrorCatalog`]

mod catalog;
mod client;
mod error;
mod mock;
mod transport;
mod vendor;

pub use catalog::ErrorCatalog;
pub use client::{API_VERSION, ClientConfig, FreshMailClient, Params, user_agent};
pub use error::{FreshMailError, Result};
pub use mock::MockTransport;
pub use transport::{
    HttpMethod, ReqwestTransport, Transport, TransportFailure, TransportRequest,
    TransportResponse,
};
pub use vendor::VendorError;
