//! FreshMail REST API v2 client.
//!
//! A thin client that sends authenticated JSON requests to FreshMail and
//! turns transport and HTTP failures into typed errors.

pub mod gateway;

pub use gateway::{ClientConfig, FreshMailClient, FreshMailError, Params};
