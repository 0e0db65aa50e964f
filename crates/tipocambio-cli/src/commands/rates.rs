use tipocambio_core::{DateRange, Indicator, RateService};

use crate::cli::RatesArgs;
use crate::error::CliError;

use super::{fetch_series, today, Report};

pub async fn run(args: &RatesArgs, service: &RateService) -> Result<Report, CliError> {
    let indicator: Indicator = args.indicator.parse()?;
    let range = match (&args.start, &args.end) {
        (Some(start), Some(end)) => DateRange::parse(start, end)?,
        _ => DateRange::trailing_days(args.days, today())?,
    };

    let report = fetch_series(service, range, indicator).await?;
    Ok(Report {
        series: vec![report],
    })
}
