//! Momentum factor: trailing returns and moving-average trend ratios.
//!
//! Momentum metrics can legitimately be negative, so every default spec uses
//! [`MetricFilter::Any`]; larger is always better.

use cadiz_traits::{Factor, FactorFamily, MetricFilter, MetricSpec, MetricTable, Result, Symbol};
use serde::{Deserialize, Serialize};

/// Closing price history of one asset, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Asset identifier.
    pub symbol: Symbol,
    /// Closing prices, oldest first.
    pub closes: Vec<f64>,
}

/// A trailing-return metric and its lookback in periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLookback {
    /// Metric column name.
    pub metric: String,
    /// Lookback in trading periods.
    pub periods: usize,
}

impl ReturnLookback {
    fn new(metric: &str, periods: usize) -> Self {
        Self { metric: metric.to_string(), periods }
    }
}

/// Configuration for the momentum factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Metric specs, in ranking order.
    pub metrics: Vec<MetricSpec>,

    /// Trailing-return metrics (default: 21, 63, 126 and 252 periods).
    pub lookbacks: Vec<ReturnLookback>,

    /// Short moving-average window (default: 50).
    pub short_ma_window: usize,

    /// Long moving-average window (default: 200). Trend ratios are only
    /// derived for histories longer than this.
    pub long_ma_window: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        let metrics = [
            "return_1m",
            "return_3m",
            "return_6m",
            "return_12m",
            "price_to_ma50",
            "price_to_ma200",
            "ma50_to_ma200",
        ]
        .into_iter()
        .map(|name| MetricSpec::descending(name).with_filter(MetricFilter::Any))
        .collect();

        Self {
            metrics,
            lookbacks: vec![
                ReturnLookback::new("return_1m", 21),
                ReturnLookback::new("return_3m", 63),
                ReturnLookback::new("return_6m", 126),
                ReturnLookback::new("return_12m", 252),
            ],
            short_ma_window: 50,
            long_ma_window: 200,
        }
    }
}

/// Momentum factor family.
#[derive(Debug, Clone, Default)]
pub struct MomentumFactor {
    config: MomentumConfig,
}

impl MomentumFactor {
    /// Create a momentum factor with the given configuration.
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Build the metric table from price histories.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol appears twice.
    pub fn build_table(&self, histories: &[PriceHistory]) -> Result<MetricTable> {
        let mut builder = MetricTable::builder();
        for spec in &self.config.metrics {
            builder.metric(&spec.name);
        }

        for history in histories {
            builder.asset(&history.symbol);
            let closes = &history.closes;

            for lookback in &self.config.lookbacks {
                builder.record(
                    &history.symbol,
                    &lookback.metric,
                    trailing_return(closes, lookback.periods),
                )?;
            }

            if closes.len() > self.config.long_ma_window {
                let last = closes.last().copied();
                let short_ma = moving_average(closes, self.config.short_ma_window);
                let long_ma = moving_average(closes, self.config.long_ma_window);
                builder.record_row(
                    &history.symbol,
                    [
                        ("price_to_ma50", ratio(last, short_ma)),
                        ("price_to_ma200", ratio(last, long_ma)),
                        ("ma50_to_ma200", ratio(short_ma, long_ma)),
                    ],
                )?;
            }
        }

        Ok(builder.build())
    }
}

impl Factor for MomentumFactor {
    fn name(&self) -> &str {
        "momentum"
    }

    fn family(&self) -> FactorFamily {
        FactorFamily::Momentum
    }

    fn metrics(&self) -> &[MetricSpec] {
        &self.config.metrics
    }
}

/// Simple return over the last `periods` steps: `p_last / p_{last-periods} - 1`.
///
/// `None` when the history is not longer than `periods`.
#[must_use]
pub fn trailing_return(closes: &[f64], periods: usize) -> Option<f64> {
    if periods == 0 || closes.len() <= periods {
        return None;
    }
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - 1 - periods];
    Some(last / base - 1.0)
}

/// Mean of the last `window` closes, or `None` if the history is shorter.
#[must_use]
pub fn moving_average(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let tail = &closes[closes.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}
