//! # Tipocambio Core
//!
//! Exchange rate fetching and caching for the Central Bank of Costa Rica
//! economic indicators web service.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Cache capability, in-memory backend and get-or-compute |
//! | [`client`] | Public (GET) and authenticated (POST) rate clients |
//! | [`config`] | Runtime configuration from JSON or environment |
//! | [`domain`] | Indicator, date range and rate series types |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`parser`] | Double-encoded XML reply decoding |
//! | [`service`] | Cached rate lookups |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tipocambio_core::{DateRange, Indicator, RateConfig, RateService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RateConfig::from_env()?;
//!     let service = RateService::from_config(&config)?;
//!
//!     let range = DateRange::parse("05/01/2024", "15/01/2024")?;
//!     let series = service.get_rates(range, Indicator::Selling).await?;
//!
//!     for row in series.rows() {
//!         println!("{}  {}", row.date, row.rate);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use tipocambio_core::{RateError, RateErrorKind};
//!
//! fn describe(error: &RateError) -> &'static str {
//!     match error.kind() {
//!         RateErrorKind::Transport => "indicator service unavailable",
//!         RateErrorKind::Parse => "unexpected reply from indicator service",
//!         RateErrorKind::Cache => "cache unavailable",
//!         RateErrorKind::Validation => "invalid request",
//!     }
//! }
//! ```
//!
//! Tokens are never logged and are redacted from `Debug` output.

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod parser;
pub mod service;

pub use cache::{CacheBackend, CacheKey, CacheMode, InMemoryCache, RateCache};
pub use client::{
    AuthenticatedRateClient, Credentials, PublicRateClient, RateClient, NO_SUB_LEVELS,
    PUBLIC_ENDPOINT,
};
pub use config::{ClientVariant, FailurePolicy, RateConfig};
pub use domain::{
    format_amount, format_wire_date, parse_wire_date, DateRange, Indicator, RatePoint, RateRow,
    RateSeries, COLON_SYMBOL,
};
pub use error::{
    CacheError, CoreError, ParseError, RateError, RateErrorKind, TransportError, ValidationError,
};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use parser::RateParser;
pub use service::{build_client, RateService};
