use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use time::Date;

use super::date_range::format_wire_date;
use crate::ValidationError;

/// Currency symbol of the Costa Rican colón.
pub const COLON_SYMBOL: &str = "₡";

/// Formats `amount` as `<symbol><grouped integer>.<two decimals>`.
///
/// Rounds half away from zero and groups the integer part by thousands with
/// commas, so `1234.5` becomes `₡1,234.50`.
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{rounded:.2}");
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{symbol}{grouped}.{fraction}")
}

/// One observation of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RatePoint {
    date: Date,
    rate: Decimal,
}

impl RatePoint {
    pub fn new(date: Date, rate: Decimal) -> Result<Self, ValidationError> {
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(ValidationError::NegativeRate {
                value: rate.to_string(),
            });
        }
        Ok(Self { date, rate })
    }

    pub const fn date(&self) -> Date {
        self.date
    }

    pub const fn rate(&self) -> Decimal {
        self.rate
    }
}

/// Display form of a [`RatePoint`] handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRow {
    pub date: String,
    pub rate: String,
}

/// Observations in the order the upstream service returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSeries {
    symbol: String,
    points: Vec<RatePoint>,
}

impl RateSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<RatePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn rows(&self) -> Vec<RateRow> {
        self.points
            .iter()
            .map(|point| RateRow {
                date: format_wire_date(point.date),
                rate: format_amount(point.rate, &self.symbol),
            })
            .collect()
    }
}
