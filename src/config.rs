//! Client settings and base-address validation.

use std::time::Duration;

use url::Url;

use crate::error::{RestError, Result};

/// Timeout applied when the caller has not opted in to a custom one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings a [`RestClient`](crate::RestClient) is constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `scheme://host:port`, optionally with a path prefix.
    pub base_address: String,
    /// Timeout in seconds, at least 1. Only used when `can_set_timeout` is true.
    pub timeout_secs: u64,
    /// True when `timeout_secs` should replace the default timeout.
    pub can_set_timeout: bool,
    /// Streamed JSON (de)serialization when true, buffered strings otherwise.
    pub use_streams: bool,
}

impl ClientConfig {
    pub fn new(base_address: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            can_set_timeout: false,
            use_streams: true,
        }
    }

    /// Opts in to a custom timeout. A value of 0 is rejected when the client is built.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self.can_set_timeout = true;
        self
    }

    pub fn with_use_streams(mut self, use_streams: bool) -> Self {
        self.use_streams = use_streams;
        self
    }

    pub fn effective_timeout(&self) -> Duration {
        effective_timeout(self.can_set_timeout, self.timeout_secs)
    }

    /// Parses and validates the base address.
    pub fn parse_base_address(&self) -> Result<Url> {
        parse_base_address(&self.base_address)
    }
}

pub(crate) fn effective_timeout(can_set_timeout: bool, timeout_secs: u64) -> Duration {
    if can_set_timeout {
        Duration::from_secs(timeout_secs)
    } else {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    }
}

pub(crate) fn check_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(RestError::InvalidTimeout { secs });
    }
    Ok(())
}

fn parse_base_address(address: &str) -> Result<Url> {
    let invalid = |reason: String| RestError::Configuration {
        address: address.to_string(),
        reason,
    };

    let url = Url::parse(address.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("address has no host".to_string()));
    }

    Ok(url)
}
