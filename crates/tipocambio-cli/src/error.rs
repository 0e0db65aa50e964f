use thiserror::Error;
use tipocambio_core::{CoreError, RateError, RateErrorKind, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("{indicator}: {source}")]
    Rate {
        indicator: String,
        #[source]
        source: RateError,
    },

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn rate(indicator: impl Into<String>, source: RateError) -> Self {
        Self::Rate {
            indicator: indicator.into(),
            source,
        }
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Config(_) => 2,
            Self::Rate { source, .. } => match source.kind() {
                RateErrorKind::Transport | RateErrorKind::Cache => 3,
                RateErrorKind::Parse => 4,
                RateErrorKind::Validation => 2,
            },
            Self::Logging(_) => 10,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use tipocambio_core::{ParseError, TransportError};

    use super::*;

    #[test]
    fn rate_errors_map_to_distinct_exit_codes() {
        let transport = CliError::rate("buying", TransportError::Status { status: 500 }.into());
        let parse = CliError::rate("buying", ParseError::Encoding.into());

        assert_eq!(transport.exit_code(), 3);
        assert_eq!(parse.exit_code(), 4);
        assert_eq!(
            CliError::from(ValidationError::InvalidIndicator {
                value: String::from("x")
            })
            .exit_code(),
            2
        );
    }
}
