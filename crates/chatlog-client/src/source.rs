//! JSON sources and the fetch-with-fallback boundary.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::FetchError;

/// Anything that can answer a GET for a URL with a JSON document.
pub trait JsonSource {
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// Fetch `url` and decode it as `T`.
///
/// Transport failures, non-success statuses and parse failures all
/// collapse to `None`. The cause is logged, never returned.
pub async fn fetch_json<T: DeserializeOwned>(source: &impl JsonSource, url: &str) -> Option<T> {
    let result = source
        .get_json(url)
        .await
        .and_then(|body| serde_json::from_value(body).map_err(FetchError::from));

    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(url, error = %e, "Source unavailable");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// [`JsonSource`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
}

impl HttpSource {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl JsonSource for HttpSource {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Canned {
    Body(Value),
    Status(u16),
}

/// [`JsonSource`] that serves canned documents keyed by exact URL.
///
/// Unknown URLs answer 404. Every request is recorded so callers can
/// check which endpoints were hit.
#[derive(Debug, Default)]
pub struct StaticSource {
    responses: HashMap<String, Canned>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), Canned::Body(body));
        self
    }

    /// Answer `url` with a bare status code.
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Status(status));
        self
    }

    /// Hold the answer for `url` back by `delay`.
    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl JsonSource for StaticSource {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Memoized
// ---------------------------------------------------------------------------

/// Wraps a source for the duration of one load so each URL is requested
/// at most once.
///
/// Concurrent requests for the same URL wait on the first one. A failed
/// request stays failed for the lifetime of the wrapper.
pub struct MemoSource<'a, S> {
    inner: &'a S,
    responses: Mutex<HashMap<String, Arc<OnceCell<Option<Value>>>>>,
}

impl<'a, S: JsonSource + Sync> MemoSource<'a, S> {
    pub fn new(inner: &'a S) -> Self {
        Self {
            inner,
            responses: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, url: &str) -> Arc<OnceCell<Option<Value>>> {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(responses.entry(url.to_string()).or_default())
    }
}

impl<S: JsonSource + Sync> JsonSource for MemoSource<'_, S> {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let cell = self.cell(url);
        let inner = self.inner;

        let mut first_error = None;
        let slot = &mut first_error;
        let response = cell
            .get_or_init(move || async move {
                match inner.get_json(url).await {
                    Ok(body) => Some(body),
                    Err(e) => {
                        *slot = Some(e);
                        None
                    }
                }
            })
            .await;

        match (response, first_error) {
            (_, Some(e)) => Err(e),
            (Some(body), None) => Ok(body.clone()),
            (None, None) => Err(FetchError::EarlierFailure {
                url: url.to_string(),
            }),
        }
    }
}
