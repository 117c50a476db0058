//! Client-wide cancellation controller.

use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Holds the token every request on a client observes.
///
/// Cancelling affects all in-flight requests and every request issued after
/// it, until [`CancelScope::renew`] installs a fresh token. A request keeps
/// the token it started with, so renewing never revives an aborted call.
#[derive(Debug, Default)]
pub struct CancelScope {
    token: Mutex<CancellationToken>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a request that is about to start.
    pub fn current(&self) -> CancellationToken {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn cancel(&self) {
        self.current().cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.current().is_cancelled()
    }

    /// Starts a new scope. The previous token stays cancelled if it was.
    pub fn renew(&self) {
        let mut token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *token = CancellationToken::new();
    }
}
