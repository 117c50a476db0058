//! Generic JSON REST client.
//!
//! [`RestClient`] issues GET, POST and DELETE requests against a fixed base
//! address and converts between wire JSON and typed values. `get`, `post` and
//! `delete` follow a soft-fail policy and report swallowed failures through a
//! [`FailureReporter`]; the `try_*` variants return every failure as a
//! [`RestError`]. [`RestApi`] is the object-safe interface over the same
//! operations for callers that want to substitute the client.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod report;

pub use api::RestApi;
pub use config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
pub use error::{ErrorKind, RestError, Result};
pub use http::{JsonCodec, RestClient};
pub use report::{FailureReporter, LogReporter, Operation};
