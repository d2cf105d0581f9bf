//! Growth factor: period-over-period revenue and earnings growth.
//!
//! Growth is measured over a window of two periods (latest vs previous), so a
//! single unusual period moves the metric a lot.

use cadiz_traits::{Factor, FactorFamily, MetricSpec, MetricTable, Result, Symbol};
use serde::{Deserialize, Serialize};

/// Revenue and earnings history of one asset, most recent period first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthHistory {
    /// Asset identifier.
    pub symbol: Symbol,
    /// Annual revenue, most recent first.
    pub annual_revenue: Vec<f64>,
    /// Annual net income, most recent first.
    pub annual_earnings: Vec<f64>,
    /// Quarterly revenue, most recent first.
    pub quarterly_revenue: Vec<f64>,
    /// Quarterly net income, most recent first.
    pub quarterly_earnings: Vec<f64>,
}

/// Growth of the latest period over the previous: `x[0] / x[1] - 1`.
///
/// `None` with fewer than two periods or a zero previous value.
#[must_use]
pub fn period_growth(values: &[f64]) -> Option<f64> {
    match values {
        [latest, previous, ..] if *previous != 0.0 => Some(latest / previous - 1.0),
        _ => None,
    }
}

/// Configuration for the growth factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Metric specs, in ranking order.
    pub metrics: Vec<MetricSpec>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            metrics: vec![
                MetricSpec::descending("revenue_growth_1y"),
                MetricSpec::descending("earnings_growth_1y"),
                MetricSpec::descending("revenue_growth_1q"),
                MetricSpec::descending("earnings_growth_1q"),
            ],
        }
    }
}

/// Growth factor family.
#[derive(Debug, Clone, Default)]
pub struct GrowthFactor {
    config: GrowthConfig,
}

impl GrowthFactor {
    /// Create a growth factor with the given configuration.
    #[must_use]
    pub const fn new(config: GrowthConfig) -> Self {
        Self { config }
    }

    /// Build the metric table from revenue and earnings histories.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol appears twice.
    pub fn build_table(&self, histories: &[GrowthHistory]) -> Result<MetricTable> {
        let mut builder = MetricTable::builder();
        for spec in &self.config.metrics {
            builder.metric(&spec.name);
        }
        for h in histories {
            builder.record_row(
                &h.symbol,
                [
                    ("revenue_growth_1y", period_growth(&h.annual_revenue)),
                    ("earnings_growth_1y", period_growth(&h.annual_earnings)),
                    ("revenue_growth_1q", period_growth(&h.quarterly_revenue)),
                    ("earnings_growth_1q", period_growth(&h.quarterly_earnings)),
                ],
            )?;
        }
        Ok(builder.build())
    }
}

impl Factor for GrowthFactor {
    fn name(&self) -> &str {
        "growth"
    }

    fn family(&self) -> FactorFamily {
        FactorFamily::Growth
    }

    fn metrics(&self) -> &[MetricSpec] {
        &self.config.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cadiz_traits::MetricValue;

    #[test]
    fn test_period_growth() {
        assert_relative_eq!(period_growth(&[120.0, 100.0, 80.0]).unwrap(), 0.2, epsilon = 1e-12);
        assert!(period_growth(&[120.0]).is_none());
        assert!(period_growth(&[120.0, 0.0]).is_none());
        assert!(period_growth(&[]).is_none());
    }

    #[test]
    fn test_build_and_rank() {
        let factor = GrowthFactor::default();
        let fast = GrowthHistory {
            symbol: "FAST".into(),
            annual_revenue: vec![150.0, 100.0],
            annual_earnings: vec![30.0, 20.0],
            ..Default::default()
        };
        let slow = GrowthHistory {
            symbol: "SLOW".into(),
            annual_revenue: vec![105.0, 100.0],
            annual_earnings: vec![18.0, 20.0],
            ..Default::default()
        };
        let table = factor.build_table(&[fast, slow]).unwrap();
        assert_eq!(table.get("FAST", "revenue_growth_1q"), Some(MetricValue::Missing));

        let ranking = crate::rank_factor(&table, factor.metrics()).unwrap();
        // SLOW's shrinking earnings fail the positive filter
        assert!(!ranking.metric("earnings_growth_1y").unwrap().contains("SLOW"));
        assert_eq!(ranking.composite.get("FAST"), Some(1.0));
        assert_eq!(ranking.composite.get("SLOW"), Some(2.0));
    }
}
