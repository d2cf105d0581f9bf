//! Quality factor: profitability, leverage and cash generation.

use cadiz_traits::{Factor, FactorFamily, MetricSpec, MetricTable, Result, Symbol};
use serde::{Deserialize, Serialize};

/// Latest financial statement figures for one asset.
///
/// The `reported_*` fields carry ratios published by a data provider. They
/// stand in for a ratio whose statement inputs are missing; free cash flow
/// yield has no reported counterpart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// Asset identifier.
    pub symbol: Symbol,
    /// Net income.
    pub net_income: Option<f64>,
    /// Total shareholder equity.
    pub total_equity: Option<f64>,
    /// Total assets.
    pub total_assets: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Total revenue.
    pub total_revenue: Option<f64>,
    /// Free cash flow.
    pub free_cash_flow: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Reported return on equity, as a fraction.
    pub reported_roe: Option<f64>,
    /// Reported return on assets, as a fraction.
    pub reported_roa: Option<f64>,
    /// Reported debt to equity, in percent (150.0 means 1.5x).
    pub reported_debt_to_equity: Option<f64>,
    /// Reported operating margin, as a fraction.
    pub reported_operating_margin: Option<f64>,
}

impl FinancialSnapshot {
    /// Net income / equity, else the reported ROE.
    #[must_use]
    pub fn roe(&self) -> Option<f64> {
        ratio(self.net_income, self.total_equity).or(self.reported_roe)
    }

    /// Net income / total assets, else the reported ROA.
    #[must_use]
    pub fn roa(&self) -> Option<f64> {
        ratio(self.net_income, self.total_assets).or(self.reported_roa)
    }

    /// Total debt / equity, else the reported percentage scaled to a ratio.
    #[must_use]
    pub fn debt_to_equity(&self) -> Option<f64> {
        ratio(self.total_debt, self.total_equity)
            .or_else(|| self.reported_debt_to_equity.map(|pct| pct / 100.0))
    }

    /// Operating income / revenue, else the reported operating margin.
    #[must_use]
    pub fn operating_margin(&self) -> Option<f64> {
        ratio(self.operating_income, self.total_revenue).or(self.reported_operating_margin)
    }

    /// Free cash flow / market cap.
    #[must_use]
    pub fn fcf_yield(&self) -> Option<f64> {
        ratio(self.free_cash_flow, self.market_cap)
    }
}

fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Configuration for the quality factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Metric specs, in ranking order.
    pub metrics: Vec<MetricSpec>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            metrics: vec![
                MetricSpec::descending("roe"),
                MetricSpec::descending("roa"),
                MetricSpec::ascending("debt_to_equity"),
                MetricSpec::descending("operating_margin"),
                MetricSpec::descending("fcf_yield"),
            ],
        }
    }
}

/// Quality factor family.
#[derive(Debug, Clone, Default)]
pub struct QualityFactor {
    config: QualityConfig,
}

impl QualityFactor {
    /// Create a quality factor with the given configuration.
    #[must_use]
    pub const fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Build the metric table from financial snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol appears twice.
    pub fn build_table(&self, snapshots: &[FinancialSnapshot]) -> Result<MetricTable> {
        let mut builder = MetricTable::builder();
        for spec in &self.config.metrics {
            builder.metric(&spec.name);
        }
        for snap in snapshots {
            builder.record_row(
                &snap.symbol,
                [
                    ("roe", snap.roe()),
                    ("roa", snap.roa()),
                    ("debt_to_equity", snap.debt_to_equity()),
                    ("operating_margin", snap.operating_margin()),
                    ("fcf_yield", snap.fcf_yield()),
                ],
            )?;
        }
        Ok(builder.build())
    }
}

impl Factor for QualityFactor {
    fn name(&self) -> &str {
        "quality"
    }

    fn family(&self) -> FactorFamily {
        FactorFamily::Quality
    }

    fn metrics(&self) -> &[MetricSpec] {
        &self.config.metrics
    }
}
