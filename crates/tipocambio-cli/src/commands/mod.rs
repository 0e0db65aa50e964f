mod rates;
mod summary;

use serde::Serialize;
use time::macros::offset;
use time::{Date, OffsetDateTime, UtcOffset};
use tipocambio_core::{DateRange, Indicator, RateConfig, RateRow, RateService};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Costa Rica observes no daylight saving time.
const COSTA_RICA_OFFSET: UtcOffset = offset!(-6);

/// One fetched series, as printed by every output format.
#[derive(Debug, Serialize)]
pub struct SeriesReport {
    pub indicator: u32,
    pub caption: String,
    pub start: String,
    pub end: String,
    pub rows: Vec<RateRow>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub series: Vec<SeriesReport>,
}

pub async fn run(cli: &Cli) -> Result<Report, CliError> {
    let config = load_config(cli)?;
    let service = RateService::from_config(&config)?;

    match &cli.command {
        Command::Rates(args) => rates::run(args, &service).await,
        Command::Summary(args) => summary::run(args, &service).await,
    }
}

fn load_config(cli: &Cli) -> Result<RateConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => RateConfig::load(path)?,
        None => RateConfig::from_env()?,
    };
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
        config.validate()?;
    }
    debug!(?config, "loaded configuration");
    Ok(config)
}

fn today() -> Date {
    OffsetDateTime::now_utc()
        .to_offset(COSTA_RICA_OFFSET)
        .date()
}

async fn fetch_series(
    service: &RateService,
    range: DateRange,
    indicator: Indicator,
) -> Result<SeriesReport, CliError> {
    let series = service
        .get_rates(range, indicator)
        .await
        .map_err(|error| CliError::rate(indicator.to_string(), error))?;

    Ok(SeriesReport {
        indicator: indicator.code(),
        caption: indicator.caption(),
        start: range.start_wire(),
        end: range.end_wire(),
        rows: series.rows(),
    })
}
