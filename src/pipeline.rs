//! Outbound HTTP request pipeline.
//!
//! Composable layers applied around the transport call, outer to inner:
//! cache → logging → retry → transport. A cache hit short-circuits the inner
//! layers entirely, so it never produces a request log entry and never
//! triggers a retry.

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache_validator::ValidatedCacheEntry;
use crate::config::Config;
use crate::errors::AppError;
use crate::request_trace::current_trace_id;

/// Header carrying the correlation id on outbound calls.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";

/// An outbound HTTP request, independent of the transport in use.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// An outbound HTTP response: status, headers and body bytes.
///
/// Non-success statuses are values, not errors; only network-level failures
/// surface as `AppError::Transport`.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// The single "send" capability every pipeline layer wraps.
#[async_trait]
pub trait HttpSend: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<OutboundResponse, AppError>;
}

#[async_trait]
impl<S: HttpSend + ?Sized> HttpSend for Arc<S> {
    async fn send(&self, request: &OutboundRequest) -> Result<OutboundResponse, AppError> {
        (**self).send(request).await
    }
}

pub type SharedHttpSend = Arc<dyn HttpSend>;

/// Whether a response status is worth retrying: 5xx plus the
/// request-timeout and rate-limit codes.
pub fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}

/// Innermost layer: issues the request over a pooled `reqwest` client.
///
/// The pool idle timeout bounds how long a connection is reused, allowing
/// DNS and connection refresh without restarting the process.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, pool_idle_timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(pool_idle_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP transport: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<OutboundResponse, AppError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            AppError::Transport(format!("{} {} failed: {}", request.method, request.url, e))
        })?;

        let status = response.status();
        let mut headers = Vec::new();
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                headers.push((name.to_string(), text.to_string()));
            }
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                AppError::Transport(format!(
                    "Failed to read response body from {}: {}",
                    request.url, e
                ))
            })?
            .to_vec();

        Ok(OutboundResponse {
            status,
            headers,
            body,
        })
    }
}

/// Retries transient failures with exponential backoff.
///
/// Transient means a transport error or a 5xx/408/429 status. Delay before
/// retry *n* is `backoff_base * 2^n`, so with the default 1s base the waits
/// are 2s, 4s and 8s. Anything else passes through on the first attempt.
pub struct RetryHandler<S> {
    inner: S,
    max_retries: u32,
    backoff_base: Duration,
}

impl<S> RetryHandler<S> {
    pub fn new(inner: S, max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            inner,
            max_retries,
            backoff_base,
        }
    }
}

#[async_trait]
impl<S: HttpSend> HttpSend for RetryHandler<S> {
    async fn send(&self, request: &OutboundRequest) -> Result<OutboundResponse, AppError> {
        let mut attempt = 0u32;
        loop {
            let outcome = self.inner.send(request).await;

            let transient = match &outcome {
                Ok(response) => is_transient_status(response.status),
                Err(AppError::Transport(_)) => true,
                Err(_) => false,
            };

            if !transient || attempt >= self.max_retries {
                return outcome;
            }

            attempt += 1;
            let delay = self.backoff_base * 2u32.saturating_pow(attempt);
            tracing::warn!(
                "Transient failure on {} {} (attempt {}/{}), retrying in {:?}",
                request.method,
                request.url,
                attempt,
                self.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Logs every outbound call with its correlation id and elapsed time.
///
/// The correlation id is the inbound request's trace id when inside a request
/// scope, and is attached to the outbound request as a header. Any inner
/// failure is re-raised as a generic integration error carrying the
/// correlation id; the original cause is logged, not forwarded.
pub struct LoggingHandler<S> {
    inner: S,
    service_name: String,
}

impl<S> LoggingHandler<S> {
    pub fn new(inner: S, service_name: impl Into<String>) -> Self {
        Self {
            inner,
            service_name: service_name.into(),
        }
    }
}

#[async_trait]
impl<S: HttpSend> HttpSend for LoggingHandler<S> {
    async fn send(&self, request: &OutboundRequest) -> Result<OutboundResponse, AppError> {
        let correlation_id = current_trace_id();
        let outbound = request
            .clone()
            .with_header(CORRELATION_ID_HEADER, correlation_id.clone());

        tracing::info!(
            "HTTP {} {} started. CorrelationId: {}",
            outbound.method,
            outbound.url,
            correlation_id
        );
        let started = Instant::now();

        match self.inner.send(&outbound).await {
            Ok(response) => {
                tracing::info!(
                    "HTTP {} {} finished in {}ms with status code {}. CorrelationId: {}",
                    outbound.method,
                    outbound.url,
                    started.elapsed().as_millis(),
                    response.status,
                    correlation_id
                );
                Ok(response)
            }
            Err(error) => {
                tracing::error!(
                    "HTTP {} {} failed. CorrelationId: {}. Cause: {}",
                    outbound.method,
                    outbound.url,
                    correlation_id,
                    error
                );
                Err(AppError::Integration {
                    service: self.service_name.clone(),
                    message: format!(
                        "Error handling {} - {} - CorrelationId: {}",
                        outbound.method, outbound.url, correlation_id
                    ),
                    status: None,
                })
            }
        }
    }
}

/// Deep copy of a success response, stored under the request URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CachedResponse {
    fn capture(response: &OutboundResponse) -> Self {
        Self {
            status: response.status.as_u16(),
            headers: response.headers.clone(),
            body: response.body.clone(),
        }
    }

    fn restore(self) -> Option<OutboundResponse> {
        StatusCode::from_u16(self.status)
            .ok()
            .map(|status| OutboundResponse {
                status,
                headers: self.headers,
                body: self.body,
            })
    }
}

/// GET-only response cache keyed by the exact request URL.
///
/// A hit returns the stored copy without invoking the inner layers. Only
/// success responses are stored. There is no explicit invalidation path;
/// staleness is bounded solely by the cache TTL. Entries carry an integrity
/// checksum and a failed check is treated as a miss.
pub struct CachingHandler<S> {
    inner: S,
    cache: Cache<String, ValidatedCacheEntry>,
}

impl<S> CachingHandler<S> {
    pub fn new(inner: S, cache: Cache<String, ValidatedCacheEntry>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<S: HttpSend> HttpSend for CachingHandler<S> {
    async fn send(&self, request: &OutboundRequest) -> Result<OutboundResponse, AppError> {
        if request.method != Method::GET {
            return self.inner.send(request).await;
        }

        let cache_key = request.url.clone();

        if let Some(entry) = self.cache.get(&cache_key).await {
            if entry.is_valid() {
                if let Some(response) = serde_json::from_str::<CachedResponse>(&entry.data)
                    .ok()
                    .and_then(CachedResponse::restore)
                {
                    tracing::debug!("Cache hit for {}", cache_key);
                    return Ok(response);
                }
            }
            tracing::warn!(
                "Cache entry for {} failed integrity check, discarding",
                cache_key
            );
            self.cache.invalidate(&cache_key).await;
        }

        let response = self.inner.send(request).await?;

        if response.status.is_success() {
            let copy = CachedResponse::capture(&response);
            if let Ok(json) = serde_json::to_string(&copy) {
                self.cache
                    .insert(cache_key, ValidatedCacheEntry::new(json))
                    .await;
            }
        }

        Ok(response)
    }
}

/// Assembles the full outbound pipeline for the ViaCEP integration.
pub fn build_pipeline(
    config: &Config,
    cache: Cache<String, ValidatedCacheEntry>,
) -> Result<SharedHttpSend, AppError> {
    let transport = ReqwestTransport::new(
        Duration::from_secs(config.request_timeout_secs),
        Duration::from_secs(config.pool_idle_timeout_secs),
    )?;
    let retry = RetryHandler::new(
        transport,
        config.retry_max_attempts,
        Duration::from_millis(config.retry_backoff_base_ms),
    );
    let logging = LoggingHandler::new(retry, "ViaCEP");
    let caching = CachingHandler::new(logging, cache);
    Ok(Arc::new(caching))
}
