//! Runtime configuration for the rate service.
//!
//! Values come from a JSON file ([`RateConfig::load`]) or from `TIPOCAMBIO_*`
//! environment variables ([`RateConfig::from_env`]). The core never reads
//! configuration storage on its own; the host hands a `RateConfig` over.

use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::client::{Credentials, PUBLIC_ENDPOINT};
use crate::domain::COLON_SYMBOL;
use crate::{CoreError, ValidationError};

/// Which shape of the indicators service to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientVariant {
    #[default]
    Public,
    Authenticated,
}

impl FromStr for ClientVariant {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "authenticated" => Ok(Self::Authenticated),
            other => Err(ValidationError::InvalidVariant {
                value: other.to_owned(),
            }),
        }
    }
}

/// What [`crate::RateService`] does with transport and parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Log the error and return an empty series.
    LogAndEmpty,
}

impl FromStr for FailurePolicy {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "log_and_empty" => Ok(Self::LogAndEmpty),
            other => Err(ValidationError::InvalidFailurePolicy {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub variant: ClientVariant,
    pub endpoint: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
    pub site_name: String,
    pub timeout_ms: u64,
    pub cache_ttl_secs: u64,
    pub failure_policy: FailurePolicy,
    pub currency_symbol: String,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            variant: ClientVariant::Public,
            endpoint: None,
            email: None,
            token: None,
            site_name: String::from("tipocambio"),
            timeout_ms: 15_000,
            cache_ttl_secs: 3_600,
            failure_policy: FailurePolicy::Propagate,
            currency_symbol: String::from(COLON_SYMBOL),
        }
    }
}

impl Debug for RateConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateConfig")
            .field("variant", &self.variant)
            .field("endpoint", &self.endpoint)
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("site_name", &self.site_name)
            .field("timeout_ms", &self.timeout_ms)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("failure_policy", &self.failure_policy)
            .field("currency_symbol", &self.currency_symbol)
            .finish()
    }
}

impl RateConfig {
    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from `TIPOCAMBIO_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`RateConfig::from_env`] with an injectable variable lookup.
    ///
    /// Without an explicit `TIPOCAMBIO_VARIANT`, the authenticated variant is
    /// chosen when both email and token are present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self {
            endpoint: read("TIPOCAMBIO_ENDPOINT"),
            email: read("TIPOCAMBIO_EMAIL"),
            token: read("TIPOCAMBIO_TOKEN"),
            ..Self::default()
        };

        config.variant = match read("TIPOCAMBIO_VARIANT") {
            Some(value) => value.parse()?,
            None if config.email.is_some() && config.token.is_some() => {
                ClientVariant::Authenticated
            }
            None => ClientVariant::Public,
        };
        if let Some(site_name) = read("TIPOCAMBIO_SITE_NAME") {
            config.site_name = site_name;
        }
        if let Some(value) = read("TIPOCAMBIO_TIMEOUT_MS") {
            config.timeout_ms = parse_number("timeout_ms", &value)?;
        }
        if let Some(value) = read("TIPOCAMBIO_CACHE_TTL_SECS") {
            config.cache_ttl_secs = parse_number("cache_ttl_secs", &value)?;
        }
        if let Some(value) = read("TIPOCAMBIO_FAILURE_POLICY") {
            config.failure_policy = value.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 {
            return Err(ValidationError::InvalidConfigValue {
                field: "timeout_ms",
                value: String::from("0"),
            });
        }
        if self.variant == ClientVariant::Authenticated {
            self.credentials()?;
            required("endpoint", self.endpoint.as_deref())?;
        }
        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(PUBLIC_ENDPOINT)
    }

    pub fn credentials(&self) -> Result<Credentials, ValidationError> {
        let email = required("email", self.email.as_deref())?;
        let token = required("token", self.token.as_deref())?;
        Ok(Credentials::new(self.site_name.as_str(), email, token))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(ValidationError::MissingCredential { field })
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidConfigValue {
            field,
            value: value.to_owned(),
        })
}
