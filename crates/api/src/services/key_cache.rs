//! Verification key fetching and caching.
//!
//! The identity server publishes the shared secret its tokens are signed with
//! at `{base_url}/api/public-key/`. The key is cached for a fixed TTL and
//! refreshed lazily on the first request after it expires. A key inside its
//! TTL is served even when the identity server is unreachable; a key past its
//! TTL is never served.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use metrics::counter;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Signing secret and algorithm used to verify business tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub secret: String,
    pub algorithm: Algorithm,
}

impl KeyMaterial {
    /// The identity server signs with a shared HMAC secret.
    pub fn hs256(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
        }
    }
}

/// Error type for key fetch operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KeyFetchError {
    #[error("Key request failed: {0}")]
    Network(String),

    #[error("Key request timed out")]
    Timeout,

    #[error("Identity server returned HTTP {0}")]
    Status(u16),

    #[error("Malformed key response: {0}")]
    Malformed(String),
}

/// Remote authority the key is fetched from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch_key(&self) -> Result<KeyMaterial, KeyFetchError>;
}

#[derive(Debug, Deserialize)]
struct PublicKeyResponse {
    secret_key: Option<String>,
}

/// Fetches the key over HTTP with a per-request timeout and bounded retries.
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
    retries: u32,
    backoff: Duration,
}

impl HttpKeySource {
    /// Base delay before the first retry; doubled for each further retry.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

    pub fn new(base_url: &str, timeout: Duration, retries: u32) -> Result<Self, KeyFetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KeyFetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: Self::key_url(base_url),
            retries,
            backoff: Self::DEFAULT_BACKOFF,
        })
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn key_url(base_url: &str) -> String {
        format!("{}/api/public-key/", base_url.trim_end_matches('/'))
    }

    async fn fetch_once(&self) -> Result<KeyMaterial, KeyFetchError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                KeyFetchError::Timeout
            } else {
                KeyFetchError::Network(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(KeyFetchError::Status(response.status().as_u16()));
        }

        let body: PublicKeyResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                KeyFetchError::Timeout
            } else {
                KeyFetchError::Malformed(e.to_string())
            }
        })?;

        match body.secret_key {
            Some(secret) if !secret.is_empty() => Ok(KeyMaterial::hs256(secret)),
            _ => Err(KeyFetchError::Malformed("missing secret_key".to_string())),
        }
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch_key(&self) -> Result<KeyMaterial, KeyFetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Ok(key) => return Ok(key),
                Err(e) if attempt < self.retries => {
                    let delay = self.backoff * 2u32.saturating_pow(attempt);
                    warn!(error = %e, attempt, ?delay, "Key fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

struct CachedKey {
    material: Arc<KeyMaterial>,
    fetched_at: Instant,
}

/// Process-wide cache of the verification key.
///
/// Refreshes are single flight: callers that find the key expired queue on
/// `refresh` and re-check before fetching, so one expiry causes one fetch.
pub struct KeyCache {
    source: Arc<dyn KeySource>,
    ttl: Duration,
    cached: RwLock<Option<CachedKey>>,
    refresh: Mutex<()>,
}

impl KeyCache {
    pub fn new(source: Arc<dyn KeySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Returns the cached key, fetching a new one if absent or expired.
    pub async fn get_key(&self) -> Result<Arc<KeyMaterial>, KeyFetchError> {
        if let Some(key) = self.fresh().await {
            return Ok(key);
        }

        let _refresh = self.refresh.lock().await;
        if let Some(key) = self.fresh().await {
            return Ok(key);
        }

        let material = match self.source.fetch_key().await {
            Ok(material) => Arc::new(material),
            Err(e) => {
                counter!("key_cache_refresh_total", "outcome" => "error").increment(1);
                warn!(error = %e, "Failed to refresh verification key");
                return Err(e);
            }
        };

        *self.cached.write().await = Some(CachedKey {
            material: material.clone(),
            fetched_at: Instant::now(),
        });
        counter!("key_cache_refresh_total", "outcome" => "ok").increment(1);
        debug!("Verification key refreshed");

        Ok(material)
    }

    async fn fresh(&self) -> Option<Arc<KeyMaterial>> {
        let cached = self.cached.read().await;
        cached
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.material.clone())
    }
}
