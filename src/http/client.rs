//! REST client over a shared reqwest transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::cancel::CancelScope;
use super::codec::JsonCodec;
use crate::config::{self, ClientConfig};
use crate::error::{ErrorKind, RestError, Result};
use crate::report::{FailureReporter, LogReporter, Operation};

const APPLICATION_JSON: &str = "application/json";

const USER_AGENT: &str = concat!("restclient/", env!("RESTCLIENT_VERSION"));

/// JSON REST client bound to one base address.
///
/// Every call resolves its resource path against the base address and shares
/// one transport handle, so a single client (usually behind an [`Arc`]) can
/// serve any number of concurrent requests. Settings are read at call time
/// and may be changed while requests are outstanding.
pub struct RestClient {
    client: Client,
    base: Url,
    timeout_secs: AtomicU64,
    can_set_timeout: AtomicBool,
    use_streams: AtomicBool,
    cancel: CancelScope,
    reporter: Arc<dyn FailureReporter>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base", &self.base.as_str())
            .field("timeout", &self.effective_timeout())
            .field("use_streams", &self.use_streams())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl RestClient {
    /// Creates a client with the default 30 second timeout and streamed JSON.
    pub fn new(base_address: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_address))
    }

    #[tracing::instrument(skip(config), fields(base = %config.base_address))]
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base = config.parse_base_address()?;
        config::check_timeout(config.timeout_secs)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RestError::Configuration {
                address: config.base_address.clone(),
                reason: e.to_string(),
            })?;

        debug!("Created REST client for {}", base);

        Ok(Self {
            client,
            base,
            timeout_secs: AtomicU64::new(config.timeout_secs),
            can_set_timeout: AtomicBool::new(config.can_set_timeout),
            use_streams: AtomicBool::new(config.use_streams),
            cancel: CancelScope::new(),
            reporter: Arc::new(LogReporter),
        })
    }

    /// Replaces the channel soft-failed errors are reported to.
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn base_address(&self) -> &Url {
        &self.base
    }

    /// Custom timeout in seconds; only applied when [`Self::can_set_timeout`] is true.
    pub fn timeout(&self) -> u64 {
        self.timeout_secs.load(Ordering::Relaxed)
    }

    /// Rejects 0, which would make every request time out on the spot.
    pub fn set_timeout(&self, secs: u64) -> Result<()> {
        config::check_timeout(secs)?;
        self.timeout_secs.store(secs, Ordering::Relaxed);
        Ok(())
    }

    pub fn can_set_timeout(&self) -> bool {
        self.can_set_timeout.load(Ordering::Relaxed)
    }

    pub fn set_can_set_timeout(&self, enabled: bool) {
        self.can_set_timeout.store(enabled, Ordering::Relaxed);
    }

    pub fn use_streams(&self) -> bool {
        self.use_streams.load(Ordering::Relaxed)
    }

    pub fn set_use_streams(&self, enabled: bool) {
        self.use_streams.store(enabled, Ordering::Relaxed);
    }

    /// Timeout the next request will be sent with.
    pub fn effective_timeout(&self) -> Duration {
        config::effective_timeout(self.can_set_timeout(), self.timeout())
    }

    /// Resolves a resource path against the base address.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|source| RestError::InvalidPath {
            path: path.to_string(),
            source,
        })
    }

    /// Aborts every in-flight request and every later one, until
    /// [`Self::renew_cancellation`] is called.
    pub fn cancel_request(&self) {
        debug!("Cancelling all requests to {}", self.base);
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Starts a fresh cancel scope so new requests can run after a cancel.
    pub fn renew_cancellation(&self) {
        self.cancel.renew();
    }

    /// GETs a JSON array. Every failure is reported and yields an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn get<T>(&self, path: &str) -> Vec<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self.try_get(path).await {
            Ok(items) => items,
            Err(e) => {
                self.reporter.report(Operation::Get, path, &e);
                Vec::new()
            }
        }
    }

    /// POSTs `payload` and returns the created resource, if the server sent one.
    ///
    /// Cancellation and timeouts are reported and yield an empty list; connect
    /// failures, non-2xx statuses and JSON errors are returned to the caller.
    #[tracing::instrument(skip(self, payload))]
    pub async fn post<T, P>(&self, path: &str, payload: &P) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
        P: Serialize + ?Sized,
    {
        match self.try_post(path, payload).await {
            Ok(created) => Ok(created.into_iter().collect()),
            Err(e) if e.kind() == ErrorKind::Cancellation || e.is_timeout() => {
                self.reporter.report(Operation::Post, path, &e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// DELETEs a resource. Failures are reported, never returned.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) {
        if let Err(e) = self.try_delete(path).await {
            self.reporter.report(Operation::Delete, path, &e);
        }
    }

    /// GETs a JSON array, returning every failure. A `null` body is an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn try_get<T>(&self, path: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.resolve(path)?;
        let codec = self.codec();
        let token = self.cancel.current();

        debug!("GET {} ({:?})", url, codec);

        let request = self.request(Method::GET, &url).header(ACCEPT, APPLICATION_JSON);
        let response = self.send(request, &url, &token).await?;

        let items: Option<Vec<T>> = codec
            .decode(response, &token)
            .await
            .map_err(|e| e.into_rest_error(&url))?;

        Ok(items.unwrap_or_default())
    }

    /// POSTs `payload` as JSON, returning the created resource or `None` for a `null` body.
    #[tracing::instrument(skip(self, payload))]
    pub async fn try_post<T, P>(&self, path: &str, payload: &P) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
        P: Serialize + ?Sized,
    {
        let url = self.resolve(path)?;
        let codec = self.codec();
        let token = self.cancel.current();

        debug!("POST {} ({:?})", url, codec);

        let body = codec
            .encode(payload)
            .map_err(|source| RestError::Serialization {
                url: url.clone(),
                source,
            })?;

        let request = self
            .request(Method::POST, &url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(body);
        let response = self.send(request, &url, &token).await?;

        codec
            .decode(response, &token)
            .await
            .map_err(|e| e.into_rest_error(&url))
    }

    /// DELETEs a resource, returning every failure.
    #[tracing::instrument(skip(self))]
    pub async fn try_delete(&self, path: &str) -> Result<()> {
        let url = self.resolve(path)?;
        let token = self.cancel.current();

        debug!("DELETE {}", url);

        let request = self
            .request(Method::DELETE, &url)
            .header(ACCEPT, APPLICATION_JSON);
        self.send(request, &url, &token).await?;

        Ok(())
    }

    fn codec(&self) -> JsonCodec {
        JsonCodec::from_use_streams(self.use_streams())
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.client
            .request(method, url.clone())
            .timeout(self.effective_timeout())
    }

    /// Sends the request and checks the status, bailing out when `token` fires.
    async fn send(
        &self,
        request: RequestBuilder,
        url: &Url,
        token: &CancellationToken,
    ) -> Result<Response> {
        let response = cancellable(token, url, request.send())
            .await?
            .map_err(|e| RestError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestError::HttpStatus {
                url: url.clone(),
                status,
            });
        }
        Ok(response)
    }
}

async fn cancellable<F: Future>(token: &CancellationToken, url: &Url, future: F) -> Result<F::Output> {
    if token.is_cancelled() {
        return Err(RestError::Cancelled { url: url.clone() });
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(RestError::Cancelled { url: url.clone() }),
        output = future => Ok(output),
    }
}
