//! CLI argument definitions for tipocambio.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rates` | Fetch one indicator series for a date window |
//! | `summary` | Fetch buying and selling series for the trailing window |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--config` | env | JSON configuration file |
//! | `--timeout-ms` | config | Request timeout override |
//! | `--log-level` | `warn` | Default tracing filter when `RUST_LOG` is unset |
//!
//! # Examples
//!
//! ```bash
//! tipocambio rates --indicator selling --start 05/01/2024 --end 15/01/2024
//! tipocambio summary --days 10 --format table
//! TIPOCAMBIO_EMAIL=ops@example.test TIPOCAMBIO_TOKEN=... tipocambio summary
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Colón exchange rates from the BCCR economic indicators service.
#[derive(Debug, Parser)]
#[command(name = "tipocambio", author, version, about)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// JSON configuration file. Falls back to TIPOCAMBIO_* environment variables.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout override in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Default log filter when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain two-column listing per series.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one indicator series.
    ///
    /// # Examples
    ///
    ///   tipocambio rates --indicator buying --days 30
    ///   tipocambio rates --indicator 318 --start 01/01/2024 --end 31/01/2024
    Rates(RatesArgs),

    /// Fetch buying and selling rates for the trailing window.
    Summary(SummaryArgs),
}

/// Arguments for the `rates` command.
#[derive(Debug, Args)]
pub struct RatesArgs {
    /// Indicator name (buying, selling) or numeric code.
    #[arg(long, default_value = "selling")]
    pub indicator: String,

    /// First day of the window, dd/mm/yyyy.
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Last day of the window, dd/mm/yyyy.
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Trailing window length when no explicit dates are given.
    #[arg(long, default_value_t = 10, conflicts_with_all = ["start", "end"])]
    pub days: u16,
}

/// Arguments for the `summary` command.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Trailing window length in days.
    #[arg(long, default_value_t = 10)]
    pub days: u16,
}
