use tipocambio_core::{DateRange, Indicator, RateService};

use crate::cli::SummaryArgs;
use crate::error::CliError;

use super::{fetch_series, today, Report};

/// Buying and selling series over the same trailing window.
pub async fn run(args: &SummaryArgs, service: &RateService) -> Result<Report, CliError> {
    let range = DateRange::trailing_days(args.days, today())?;

    let mut series = Vec::with_capacity(2);
    for indicator in [Indicator::Buying, Indicator::Selling] {
        series.push(fetch_series(service, range, indicator).await?);
    }

    Ok(Report { series })
}
