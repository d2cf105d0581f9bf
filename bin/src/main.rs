//! cadiz CLI binary.
//!
//! Ranks equities on factor metric tables and builds long-only portfolios
//! from CSV inputs.

mod cmd;
mod data;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use cadiz::{FactorFamily, Objective};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadiz")]
#[command(about = "Multi-factor equity ranking and portfolio optimization", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List factor families and their metrics
    Factors {
        /// Only show one family
        #[arg(short, long)]
        family: Option<FactorFamily>,
    },

    /// Rank one metric table
    Rank {
        /// Factor family whose metric specs to use
        #[arg(short, long)]
        family: FactorFamily,

        /// CSV file with one row per asset and one column per metric
        #[arg(short, long)]
        input: PathBuf,

        /// Column holding the asset identifiers
        #[arg(long, default_value = "symbol")]
        symbol_column: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Optimize an allocation over a price table
    Optimize {
        /// CSV file with a date column and one price column per asset
        #[arg(short, long)]
        prices: PathBuf,

        /// Assets to include (defaults to every price column)
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Objective (sharpe, min_volatility, max_return)
        #[arg(short, long, default_value = "sharpe")]
        objective: Objective,

        /// Return periods per year
        #[arg(long, default_value = "252")]
        periods_per_year: usize,

        /// Column holding the dates
        #[arg(long, default_value = "date")]
        date_column: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rank, combine, select and optimize in one run
    Portfolio(cmd::portfolio::PortfolioArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Factors { family } => cmd::factors::list_factors(family)?,
        Commands::Rank { family, input, symbol_column, format } => {
            cmd::rank::rank_table(family, &input, &symbol_column, format)?;
        }
        Commands::Optimize { prices, symbols, objective, periods_per_year, date_column, format } => {
            cmd::optimize::optimize_prices(&prices, &symbols, objective, periods_per_year, &date_column, format)?;
        }
        Commands::Portfolio(args) => cmd::portfolio::build_portfolio(&args)?,
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
