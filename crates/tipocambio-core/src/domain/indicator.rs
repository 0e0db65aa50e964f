use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::ValidationError;

/// Economic series published by the indicators service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    /// Reference buying rate, code 317.
    Buying,
    /// Reference selling rate, code 318.
    Selling,
    /// Any other series addressed by its raw code.
    Other(u32),
}

impl Indicator {
    pub const BUYING_CODE: u32 = 317;
    pub const SELLING_CODE: u32 = 318;

    pub const fn from_code(code: u32) -> Self {
        match code {
            Self::BUYING_CODE => Self::Buying,
            Self::SELLING_CODE => Self::Selling,
            other => Self::Other(other),
        }
    }

    pub const fn code(self) -> u32 {
        match self {
            Self::Buying => Self::BUYING_CODE,
            Self::Selling => Self::SELLING_CODE,
            Self::Other(code) => code,
        }
    }

    pub fn caption(self) -> String {
        match self {
            Self::Buying => String::from("Buying rate"),
            Self::Selling => String::from("Selling rate"),
            Self::Other(code) => format!("Indicator {code}"),
        }
    }
}

impl Display for Indicator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buying => f.write_str("buying"),
            Self::Selling => f.write_str("selling"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for Indicator {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "buying" | "compra" => Ok(Self::Buying),
            "selling" | "venta" => Ok(Self::Selling),
            other => match other.parse::<u32>() {
                Ok(code) => Ok(Self::from_code(code)),
                Err(_) => Err(ValidationError::InvalidIndicator {
                    value: value.to_owned(),
                }),
            },
        }
    }
}
