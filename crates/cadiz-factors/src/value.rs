//! Value factor: valuation multiples and yield.
//!
//! Cheap assets rank best: low P/E, low P/B, low EV/EBITDA and a high
//! dividend yield. Only strictly positive multiples are comparable, so a
//! negative P/E (loss-making company) never ranks as "cheap".

use cadiz_traits::{Factor, FactorFamily, MetricSpec, MetricTable, Result, Symbol};
use serde::{Deserialize, Serialize};

/// Raw valuation data for one asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueObservation {
    /// Asset identifier.
    pub symbol: Symbol,
    /// Trailing price / earnings.
    pub trailing_pe: Option<f64>,
    /// Price / book value.
    pub price_to_book: Option<f64>,
    /// Annual dividend / price.
    pub dividend_yield: Option<f64>,
    /// Enterprise value / EBITDA.
    pub enterprise_to_ebitda: Option<f64>,
}

/// Configuration for the value factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueConfig {
    /// Metric specs, in ranking order.
    pub metrics: Vec<MetricSpec>,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            metrics: vec![
                MetricSpec::ascending("pe_ratio"),
                MetricSpec::ascending("pb_ratio"),
                MetricSpec::descending("dividend_yield"),
                MetricSpec::ascending("ev_to_ebitda"),
            ],
        }
    }
}

/// Value factor family.
#[derive(Debug, Clone, Default)]
pub struct ValueFactor {
    config: ValueConfig,
}

impl ValueFactor {
    /// Create a value factor with the given configuration.
    #[must_use]
    pub const fn new(config: ValueConfig) -> Self {
        Self { config }
    }

    /// Build the metric table from raw observations.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol appears twice.
    pub fn build_table(&self, observations: &[ValueObservation]) -> Result<MetricTable> {
        let mut builder = MetricTable::builder();
        for spec in &self.config.metrics {
            builder.metric(&spec.name);
        }
        for obs in observations {
            builder.record_row(
                &obs.symbol,
                [
                    ("pe_ratio", obs.trailing_pe),
                    ("pb_ratio", obs.price_to_book),
                    ("dividend_yield", obs.dividend_yield),
                    ("ev_to_ebitda", obs.enterprise_to_ebitda),
                ],
            )?;
        }
        Ok(builder.build())
    }
}

impl Factor for ValueFactor {
    fn name(&self) -> &str {
        "value"
    }

    fn family(&self) -> FactorFamily {
        FactorFamily::Value
    }

    fn metrics(&self) -> &[MetricSpec] {
        &self.config.metrics
    }
}
