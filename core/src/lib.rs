//! HTTP interaction and response-validation harness for API test suites.
//!
//! # Overview
//! A service sends a request through `RequestExecutor`, which lazily opens
//! and reuses one connection context per instance and returns the captured
//! status and JSON body as an `HttpResponse`. The service picks a `Schema`
//! for that response (often by status code, via `StatusSchemas`), turns the
//! body into a typed model with `deserialize_validated`, and checks the
//! result with the functions in `assertions`, which log every verdict.
//!
//! # Design
//! - Captures are returned by value; executors keep no response state.
//! - Schemas are explicit parameters, never fields set before a call.
//! - A schema mismatch is one `ApiError::Validation`; `assertions::assert_valid`
//!   is where it becomes a logged test failure.
//! - Nothing retries. Only closing a connection swallows failures.

pub mod assertions;
pub mod config;
pub mod connection;
pub mod deserialize;
pub mod error;
pub mod executor;
pub mod http;
pub mod logging;
pub mod schema;
pub mod services;
pub mod template;
pub mod types;

pub use config::{ClientConfig, CloseMode};
pub use connection::ConnectionManager;
pub use deserialize::{deserialize_unchecked, deserialize_validated, StatusSchemas};
pub use error::{ApiError, AssertionFailure, ValidationError};
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use schema::{Issue, Schema};
pub use services::{PlaceLookup, PlacesApi, ProductsApi, Services};
