//! JSON encode/decode strategies for request and response bodies.

use std::io::{BufReader, Cursor};

use futures_util::{StreamExt, TryStreamExt};
use reqwest::{Body, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::io::{ReaderStream, StreamReader, SyncIoBridge};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{BoxError, RestError};

/// Chunk size for streamed bodies.
pub const STREAM_BUFFER_SIZE: usize = 1024;

/// How JSON travels between the wire and typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonCodec {
    /// Request bodies go out as a chunked stream; responses are parsed
    /// incrementally while the body is still arriving.
    Streamed,
    /// Bodies are materialized as strings before (de)serialization.
    Buffered,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read response body: {0}")]
    Body(#[source] BoxError),
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("cancelled while reading response body")]
    Cancelled,
}

impl DecodeError {
    pub fn into_rest_error(self, url: &Url) -> RestError {
        match self {
            DecodeError::Body(source) => RestError::Transport {
                url: url.clone(),
                source,
            },
            DecodeError::Json(source) => RestError::Serialization {
                url: url.clone(),
                source,
            },
            DecodeError::Cancelled => RestError::Cancelled { url: url.clone() },
        }
    }
}

impl JsonCodec {
    pub fn from_use_streams(use_streams: bool) -> Self {
        if use_streams {
            JsonCodec::Streamed
        } else {
            JsonCodec::Buffered
        }
    }

    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Body, serde_json::Error> {
        match self {
            JsonCodec::Streamed => {
                let mut buf = Vec::with_capacity(STREAM_BUFFER_SIZE);
                serde_json::to_writer(&mut buf, value)?;
                let chunks = ReaderStream::with_capacity(Cursor::new(buf), STREAM_BUFFER_SIZE);
                Ok(Body::wrap_stream(chunks))
            }
            JsonCodec::Buffered => Ok(Body::from(serde_json::to_string(value)?)),
        }
    }

    /// Reads the response body into `T`, giving up as soon as `cancel` fires.
    pub async fn decode<T>(
        &self,
        response: Response,
        cancel: &CancellationToken,
    ) -> Result<T, DecodeError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self {
            JsonCodec::Streamed => decode_streamed(response, cancel).await,
            JsonCodec::Buffered => decode_buffered(response, cancel).await,
        }
    }
}

async fn decode_buffered<T: DeserializeOwned>(
    response: Response,
    cancel: &CancellationToken,
) -> Result<T, DecodeError> {
    let text = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DecodeError::Cancelled),
        text = response.text() => text.map_err(|e| DecodeError::Body(Box::new(e)))?,
    };

    serde_json::from_str(&text).map_err(DecodeError::Json)
}

async fn decode_streamed<T>(response: Response, cancel: &CancellationToken) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Send + 'static,
{
    if cancel.is_cancelled() {
        return Err(DecodeError::Cancelled);
    }

    // The stream ends early on cancellation; the parser then sees a truncated document.
    let body = response
        .bytes_stream()
        .take_until(cancel.clone().cancelled_owned())
        .map_err(std::io::Error::other);
    let reader = SyncIoBridge::new(StreamReader::new(Box::pin(body)));
    let reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, reader);

    let parsed = tokio::task::spawn_blocking(move || serde_json::from_reader::<_, T>(reader))
        .await
        .map_err(|e| DecodeError::Body(Box::new(e)))?;

    if cancel.is_cancelled() {
        return Err(DecodeError::Cancelled);
    }

    parsed.map_err(|e| {
        if e.is_io() {
            DecodeError::Body(unwrap_io(std::io::Error::from(e)))
        } else {
            DecodeError::Json(e)
        }
    })
}

/// Recovers the transport error the body stream was wrapped in.
fn unwrap_io(error: std::io::Error) -> BoxError {
    let kind = error.kind();
    match error.into_inner() {
        Some(inner) => inner,
        None => Box::new(std::io::Error::from(kind)),
    }
}
