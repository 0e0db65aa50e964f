//! Caching of parsed rate series keyed by request fingerprint.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::{DateRange, Indicator, RateSeries};
use crate::{CacheError, RateError};

/// Defines how a single lookup interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present;
    /// otherwise, fetch from the network and write the result to the cache. (Default)
    #[default]
    Use,
    /// Always fetch from the network, bypassing any cached entry,
    /// and write the new result to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

/// Request fingerprint: one entry per date window and indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub range: DateRange,
    pub indicator: Indicator,
}

impl CacheKey {
    pub const fn new(range: DateRange, indicator: Indicator) -> Self {
        Self { range, indicator }
    }

    /// String id used by earlier deployments, e.g. `05/01/2024, 15/01/2024::317`.
    pub fn legacy_id(&self) -> String {
        format!("{}::{}", self.range, self.indicator.code())
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.legacy_id())
    }
}

/// Storage capability owned by the host application.
pub trait CacheBackend: Send + Sync {
    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> Pin<Box<dyn Future<Output = Result<Option<RateSeries>, CacheError>> + Send + 'a>>;

    fn set<'a>(
        &'a self,
        key: CacheKey,
        value: RateSeries,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    series: RateSeries,
    /// `None` when the TTL is too large to represent, i.e. never expires.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(series: RateSeries, ttl: Duration, now: Instant) -> Self {
        Self {
            series,
            expires_at: now.checked_add(ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now <= expires_at)
    }
}

/// Thread-safe in-memory cache backend with per-entry expiry.
///
/// Expired entries are swept on every write, so keys for windows that are
/// no longer requested do not accumulate.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    inner: Arc<tokio::sync::RwLock<HashMap<CacheKey, CacheEntry>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove expired entries from the cache.
    pub async fn clear_expired(&self) {
        let now = Instant::now();
        let mut map = self.inner.write().await;
        map.retain(|_, entry| entry.is_live(now));
    }

    /// Clear all entries from the cache.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// Number of entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl CacheBackend for InMemoryCache {
    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> Pin<Box<dyn Future<Output = Result<Option<RateSeries>, CacheError>> + Send + 'a>> {
        Box::pin(async move {
            let now = Instant::now();
            let map = self.inner.read().await;
            Ok(map
                .get(key)
                .filter(|entry| entry.is_live(now))
                .map(|entry| entry.series.clone()))
        })
    }

    fn set<'a>(
        &'a self,
        key: CacheKey,
        value: RateSeries,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async move {
            let now = Instant::now();
            let mut map = self.inner.write().await;
            map.retain(|_, entry| entry.is_live(now));
            map.insert(key, CacheEntry::new(value, ttl, now));
            Ok(())
        })
    }
}

/// Memoizes computed rate series in a [`CacheBackend`].
///
/// Only successful, non-empty results are stored. Backend failures are logged
/// and treated as a miss so lookups fall through to the compute step.
#[derive(Clone)]
pub struct RateCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl RateCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// In-memory cache with a one hour TTL.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCache::new()), Duration::from_secs(3_600))
    }

    /// A zero TTL disables writes entirely.
    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_or_compute<F, Fut>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<RateSeries, RateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RateSeries, RateError>>,
    {
        self.get_or_compute_with_mode(key, CacheMode::Use, compute)
            .await
    }

    pub async fn get_or_compute_with_mode<F, Fut>(
        &self,
        key: CacheKey,
        mode: CacheMode,
        compute: F,
    ) -> Result<RateSeries, RateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RateSeries, RateError>>,
    {
        if mode == CacheMode::Use {
            match self.backend.get(&key).await {
                Ok(Some(series)) => {
                    debug!(key = %key, points = series.len(), "rate cache hit");
                    return Ok(series);
                }
                Ok(None) => debug!(key = %key, "rate cache miss"),
                Err(error) => warn!(key = %key, %error, "rate cache read failed, computing"),
            }
        }

        let series = compute().await?;

        if mode != CacheMode::Bypass && !self.is_disabled() && !series.is_empty() {
            if let Err(error) = self.backend.set(key, series.clone(), self.ttl).await {
                warn!(key = %key, %error, "rate cache write failed");
            }
        }

        Ok(series)
    }
}
