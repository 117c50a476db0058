//! HTTP request dispatch with JSON bodies and client-wide cancellation.

mod cancel;
mod client;
mod codec;

pub use cancel::CancelScope;
pub use client::RestClient;
pub use codec::{DecodeError, JsonCodec, STREAM_BUFFER_SIZE};
