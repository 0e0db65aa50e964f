use thiserror::Error;

use crate::http_client::HttpError;

/// Validation and contract errors exposed by `tipocambio-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be formatted dd/mm/yyyy: '{value}'")]
    InvalidDate { value: String },
    #[error("date range start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },
    #[error("rate must be non-negative: '{value}'")]
    NegativeRate { value: String },

    #[error("invalid indicator '{value}', expected buying, selling or a numeric code")]
    InvalidIndicator { value: String },

    #[error("invalid client variant '{value}', expected public or authenticated")]
    InvalidVariant { value: String },
    #[error("invalid failure policy '{value}', expected propagate or log_and_empty")]
    InvalidFailurePolicy { value: String },
    #[error("field '{field}' is required for the authenticated variant")]
    MissingCredential { field: &'static str },
    #[error("field '{field}' has invalid value '{value}'")]
    InvalidConfigValue { field: &'static str, value: String },
}

/// Failure to obtain a response body from the indicator service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("indicator service returned status {status}")]
    Status { status: u16 },
    #[error("indicator service unreachable: {0}")]
    Network(#[from] HttpError),
}

impl TransportError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Network(_) => None,
        }
    }

    /// True when the request was abandoned after the configured timeout.
    pub const fn is_timeout(&self) -> bool {
        match self {
            Self::Network(error) => error.timed_out(),
            Self::Status { .. } => false,
        }
    }
}

/// Failure to turn a response body into a rate series.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("response body is not valid UTF-8")]
    Encoding,
    #[error("malformed response envelope: {0}")]
    OuterXml(String),
    #[error("malformed indicator document: {0}")]
    InnerXml(String),
    #[error("record {index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("record {index} has invalid date '{value}'")]
    InvalidDate { index: usize, value: String },
    #[error("record {index} has invalid value '{value}'")]
    InvalidNumber { index: usize, value: String },
    #[error("record {index} has negative value '{value}'")]
    NegativeValue { index: usize, value: String },
}

/// Cache backend failure. Callers treat it as a miss.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Error classification surfaced by [`crate::RateService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateErrorKind {
    Transport,
    Parse,
    Cache,
    Validation,
}

/// Single discriminated error returned by the rate service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Never produced by [`crate::RateCache`] itself, which degrades backend
    /// failures to a miss. Compute steps supplied by host code may return it
    /// through `?` when they consult a [`crate::CacheBackend`] directly.
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RateError {
    pub const fn kind(&self) -> RateErrorKind {
        match self {
            Self::Transport(_) => RateErrorKind::Transport,
            Self::Parse(_) => RateErrorKind::Parse,
            Self::Cache(_) => RateErrorKind::Cache,
            Self::Validation(_) => RateErrorKind::Validation,
        }
    }

    pub const fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(error) => error.is_timeout(),
            _ => false,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            RateErrorKind::Transport => "rate.transport",
            RateErrorKind::Parse => "rate.parse",
            RateErrorKind::Cache => "rate.cache",
            RateErrorKind::Validation => "rate.validation",
        }
    }
}

/// Top-level error type for loading configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_error_codes_follow_kind() {
        let transport = RateError::from(TransportError::Status { status: 500 });
        assert_eq!(transport.kind(), RateErrorKind::Transport);
        assert_eq!(transport.code(), "rate.transport");

        let parse = RateError::from(ParseError::Encoding);
        assert_eq!(parse.code(), "rate.parse");
    }

    #[test]
    fn transport_status_is_exposed() {
        assert_eq!(TransportError::Status { status: 503 }.status(), Some(503));
        assert_eq!(
            TransportError::Network(HttpError::new("refused")).status(),
            None
        );
    }

    #[test]
    fn timeout_flag_survives_classification() {
        let timed_out = RateError::from(TransportError::from(HttpError::timeout("30s elapsed")));
        let refused = RateError::from(TransportError::from(HttpError::new("refused")));

        assert!(timed_out.is_timeout());
        assert_eq!(timed_out.kind(), RateErrorKind::Transport);
        assert!(!refused.is_timeout());

        let gateway = RateError::from(TransportError::Status { status: 504 });
        let cache = RateError::from(CacheError::Unavailable(String::from("down")));
        assert!(!gateway.is_timeout());
        assert!(!cache.is_timeout());
    }
}
