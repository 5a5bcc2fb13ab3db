//! Pet-store scenario suite
//!
//! Generates one fixture user, then drives an ordered sequence of HTTP
//! requests against the pet-store user API and checks status codes,
//! latency, body contents and JSON schema conformance for each step.

pub mod cli;
pub mod client;
pub mod commands;
pub mod common;
pub mod fixture;
pub mod schema;
pub mod testing;

// Re-export commonly used types for tests
pub use client::{ApiClient, ApiRequest, ApiResponse, RequestBody};
pub use common::{Error, Result};
pub use fixture::Fixture;
pub use schema::SchemaStore;
