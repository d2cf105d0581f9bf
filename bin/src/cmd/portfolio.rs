//! Portfolio command implementation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use cadiz::{FactorFamily, FactorWeights, FamilyTables, Objective, Pipeline, PipelineConfig, PipelineOutput};
use clap::Args;

use super::{print_header, print_json, print_portfolio};
use crate::{OutputFormat, data};

#[derive(Debug, Args)]
pub(crate) struct PortfolioArgs {
    /// JSON configuration file (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metric table for a family, as FAMILY=PATH (repeatable)
    #[arg(short, long = "table", value_name = "FAMILY=PATH", required = true)]
    tables: Vec<String>,

    /// CSV file with a date column and one price column per asset
    #[arg(short, long)]
    prices: PathBuf,

    /// Value family weight
    #[arg(long)]
    value: Option<f64>,

    /// Momentum family weight
    #[arg(long)]
    momentum: Option<f64>,

    /// Quality family weight
    #[arg(long)]
    quality: Option<f64>,

    /// Growth family weight
    #[arg(long)]
    growth: Option<f64>,

    /// Weight every supplied family equally
    #[arg(long, conflicts_with_all = ["value", "momentum", "quality", "growth"])]
    equal_weights: bool,

    /// Number of top-ranked assets to optimize over
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Objective (sharpe, min_volatility, max_return)
    #[arg(short, long)]
    objective: Option<Objective>,

    /// Return periods per year
    #[arg(long)]
    periods_per_year: Option<usize>,

    /// Column holding the asset identifiers in metric tables
    #[arg(long, default_value = "symbol")]
    symbol_column: String,

    /// Column holding the dates in the price file
    #[arg(long, default_value = "date")]
    date_column: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl PortfolioArgs {
    fn weight_flags(&self) -> FactorWeights {
        [
            (FactorFamily::Value, self.value),
            (FactorFamily::Momentum, self.momentum),
            (FactorFamily::Quality, self.quality),
            (FactorFamily::Growth, self.growth),
        ]
        .into_iter()
        .filter_map(|(family, weight)| weight.map(|w| (family, w)))
        .collect()
    }

    /// Configuration file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_path(path)?,
            None => PipelineConfig::default(),
        };

        let weights = self.weight_flags();
        if self.equal_weights {
            config.factor_weights = None;
        } else if !weights.is_empty() {
            config.factor_weights = Some(weights);
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(objective) = self.objective {
            config.objective = objective;
        }
        if let Some(periods) = self.periods_per_year {
            config.periods_per_year = periods;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the full pipeline from CSV inputs.
pub(crate) fn build_portfolio(args: &PortfolioArgs) -> Result<()> {
    let config = args.resolve_config()?;

    let mut tables = FamilyTables::new();
    for arg in &args.tables {
        let (family, path) = data::parse_family_path(arg)?;
        let table = data::load_metric_table(Path::new(&path), &args.symbol_column)?;
        if tables.insert(family, table).is_some() {
            anyhow::bail!("metric table for {family} given more than once");
        }
    }
    let prices = data::load_prices(&args.prices, &args.date_column)?;

    let output = Pipeline::new(config).run(&tables, &prices)?;

    if args.format == OutputFormat::Json {
        return print_json(&output);
    }

    print_header("Factor Portfolio");
    print_rankings(&output);
    print_portfolio(&output.portfolio);
    Ok(())
}

fn print_rankings(output: &PipelineOutput) {
    for (family, ranking) in &output.rankings {
        print!("{family:<10} ranked {:>4}", ranking.composite.len());
        if !ranking.dropped.is_empty() {
            print!(", dropped {}", ranking.dropped.len());
        }
        if !ranking.skipped_metrics.is_empty() {
            print!(", skipped metrics: {}", ranking.skipped_metrics.join(", "));
        }
        println!();
    }
    println!();

    println!("{:<6} {:<10} {:>10}", "Pos", "Asset", "Combined");
    println!("{}", "-".repeat(28));
    for (i, (symbol, score)) in output.combined.head(output.candidates.len()).iter().enumerate() {
        println!("{:<6} {symbol:<10} {score:>10.2}", i + 1);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: PortfolioArgs,
    }

    fn parse(argv: &[&str]) -> PortfolioArgs {
        let mut full = vec!["cadiz", "--table", "value=v.csv", "--prices", "p.csv"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = parse(&[]).resolve_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_weight_flags_replace_config_weights() {
        let config = parse(&["--value", "1", "--growth", "3"]).resolve_config().unwrap();
        let weights = config.factor_weights.unwrap();
        assert_eq!(weights.get(FactorFamily::Value), Some(1.0));
        assert_eq!(weights.get(FactorFamily::Growth), Some(3.0));
        assert_eq!(weights.get(FactorFamily::Momentum), None);
    }

    #[test]
    fn test_scalar_overrides() {
        let config = parse(&["--equal-weights", "-n", "4", "--objective", "max_return"]).resolve_config().unwrap();
        assert!(config.factor_weights.is_none());
        assert_eq!(config.top_n, 4);
        assert_eq!(config.objective, Objective::MaximizeReturn);
    }

    #[test]
    fn test_invalid_override_rejected() {
        assert!(parse(&["-n", "0"]).resolve_config().is_err());
        assert!(parse(&["--value", "0", "--quality", "0"]).resolve_config().is_err());
    }
}
