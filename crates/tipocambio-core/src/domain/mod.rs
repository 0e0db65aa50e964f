//! # Domain Models
//!
//! Value types flowing through the rate service.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Indicator`] | Economic series code (317 buying, 318 selling) |
//! | [`DateRange`] | Inclusive `dd/mm/yyyy` window, `start <= end` |
//! | [`RatePoint`] | One dated, non-negative observation |
//! | [`RateSeries`] | Observations in upstream order |
//! | [`RateRow`] | Formatted `{date, rate}` pair for display |
//!
//! All types are immutable once built; constructors validate their invariants.

mod date_range;
mod indicator;
mod rate;

pub use date_range::{format_wire_date, parse_wire_date, DateRange};
pub use indicator::Indicator;
pub use rate::{format_amount, RatePoint, RateRow, RateSeries, COLON_SYMBOL};
