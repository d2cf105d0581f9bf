//! Factors command implementation.

use anyhow::Result;
use cadiz::factors::{FactorInfo, available_factors, factors_by_family};
use cadiz::{Direction, FactorFamily};

use super::print_header;

/// List factor families and their default metric specs.
pub(crate) fn list_factors(family: Option<FactorFamily>) -> Result<()> {
    print_header("Available Factors");

    let infos = match family {
        Some(family) => factors_by_family(family),
        None => available_factors(),
    };

    for info in &infos {
        print_factor(info);
    }

    println!("Override metric specs per family with \"metric_overrides\" in a config file.\n");
    Ok(())
}

fn print_factor(info: &FactorInfo) {
    println!("{} - {}", info.name, info.description);
    println!("{}", "-".repeat(60));
    for spec in &info.metrics {
        let direction = match spec.direction {
            Direction::Ascending => "lower is better",
            Direction::Descending => "higher is better",
        };
        println!("  {:20} {:18} filter: {:?}", spec.name, direction, spec.filter);
    }
    if info.typical_lookback > 0 {
        println!("  (needs {} periods of price history)", info.typical_lookback);
    }
    println!();
}
