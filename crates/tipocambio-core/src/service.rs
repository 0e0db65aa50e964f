//! Entry point composing client, parser and cache.
//!
//! ```text
//! get_rates(range, indicator)
//!        │
//!        ▼
//! ┌──────────────┐  hit   ┌──────────────┐
//! │  RateCache   │───────▶│  RateSeries  │
//! └──────┬───────┘        └──────────────┘
//!        │ miss                  ▲
//!        ▼                       │ store if non-empty
//! ┌──────────────┐  bytes ┌──────────────┐
//! │  RateClient  │───────▶│  RateParser  │
//! └──────────────┘        └──────────────┘
//! ```

use std::sync::Arc;

use tracing::error;

use crate::cache::{CacheKey, CacheMode, InMemoryCache, RateCache};
use crate::client::{AuthenticatedRateClient, PublicRateClient, RateClient};
use crate::config::{ClientVariant, FailurePolicy, RateConfig};
use crate::domain::{DateRange, Indicator, RateSeries};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::parser::RateParser;
use crate::{RateError, RateErrorKind, ValidationError};

/// Builds the client variant selected by `config`.
pub fn build_client(
    config: &RateConfig,
    http_client: Arc<dyn HttpClient>,
) -> Result<Arc<dyn RateClient>, ValidationError> {
    config.validate()?;
    let client: Arc<dyn RateClient> = match config.variant {
        ClientVariant::Public => Arc::new(
            PublicRateClient::new(http_client)
                .with_endpoint(config.endpoint())
                .with_timeout_ms(config.timeout_ms),
        ),
        ClientVariant::Authenticated => Arc::new(
            AuthenticatedRateClient::new(http_client, config.endpoint(), config.credentials()?)
                .with_timeout_ms(config.timeout_ms),
        ),
    };
    Ok(client)
}

/// Cached access to exchange rate series.
#[derive(Clone)]
pub struct RateService {
    client: Arc<dyn RateClient>,
    parser: RateParser,
    cache: RateCache,
    failure_policy: FailurePolicy,
}

impl RateService {
    pub fn new(client: Arc<dyn RateClient>, parser: RateParser, cache: RateCache) -> Self {
        Self {
            client,
            parser,
            cache,
            failure_policy: FailurePolicy::Propagate,
        }
    }

    /// Wires the reqwest transport, the configured client variant and an
    /// in-memory cache using the configured TTL.
    pub fn from_config(config: &RateConfig) -> Result<Self, ValidationError> {
        Self::from_config_with_http(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn from_config_with_http(
        config: &RateConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, ValidationError> {
        let client = build_client(config, http_client)?;
        let parser = RateParser::new(config.currency_symbol.as_str());
        let cache = RateCache::new(Arc::new(InMemoryCache::new()), config.cache_ttl());
        let service = Self::new(client, parser, cache);
        Ok(service.with_failure_policy(config.failure_policy))
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub const fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    pub async fn get_rates(
        &self,
        range: DateRange,
        indicator: Indicator,
    ) -> Result<RateSeries, RateError> {
        self.get_rates_with_mode(range, indicator, CacheMode::Use)
            .await
    }

    pub async fn get_rates_with_mode(
        &self,
        range: DateRange,
        indicator: Indicator,
        mode: CacheMode,
    ) -> Result<RateSeries, RateError> {
        let key = CacheKey::new(range, indicator);
        let result = self
            .cache
            .get_or_compute_with_mode(key, mode, move || async move {
                let body = self.client.fetch(range, indicator).await?;
                Ok::<_, RateError>(self.parser.parse(&body)?)
            })
            .await;

        match result {
            Err(error) if self.degrades(&error) => {
                error!(
                    key = %key,
                    code = error.code(),
                    timed_out = error.is_timeout(),
                    %error,
                    "exchange rate lookup failed, returning empty series"
                );
                Ok(RateSeries::empty(self.parser.symbol()))
            }
            other => other,
        }
    }

    /// Whether `error` is swallowed under the configured failure policy.
    fn degrades(&self, error: &RateError) -> bool {
        match error.kind() {
            RateErrorKind::Transport | RateErrorKind::Parse => {
                self.failure_policy == FailurePolicy::LogAndEmpty
            }
            RateErrorKind::Cache | RateErrorKind::Validation => false,
        }
    }
}
