//! Observability channel for failures the soft-fail operations swallow.

use std::fmt;

use log::{info, warn};

use crate::error::{ErrorKind, RestError};

/// The request operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Get => "GET",
            Operation::Post => "POST",
            Operation::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Receives every failure that is converted into an empty or silent result.
#[cfg_attr(test, mockall::automock)]
pub trait FailureReporter: Send + Sync {
    fn report(&self, operation: Operation, path: &str, error: &RestError);
}

/// Default reporter: one log line per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FailureReporter for LogReporter {
    fn report(&self, operation: Operation, path: &str, error: &RestError) {
        if error.kind() == ErrorKind::Cancellation {
            info!("{} {} was cancelled: {}", operation, path, error);
        } else {
            warn!("{} {} failed: {}", operation, path, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Get.to_string(), "GET");
        assert_eq!(Operation::Post.to_string(), "POST");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
    }

    #[test_log::test]
    fn test_log_reporter_does_not_panic() {
        let url = Url::parse("http://localhost/items").unwrap();
        LogReporter.report(Operation::Get, "items", &RestError::Cancelled { url: url.clone() });
        LogReporter.report(
            Operation::Delete,
            "items/1",
            &RestError::HttpStatus {
                url,
                status: reqwest::StatusCode::NOT_FOUND,
            },
        );
    }
}
