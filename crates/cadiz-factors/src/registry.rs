//! Factor registry for discovering the available factor families.

use cadiz_traits::{Factor, FactorFamily, MetricSpec};
use serde::Serialize;

use crate::{GrowthFactor, MomentumFactor, QualityFactor, ValueFactor};

/// Metadata about a factor.
#[derive(Debug, Clone, Serialize)]
pub struct FactorInfo {
    /// Unique identifier for the factor.
    pub name: String,

    /// Family the factor ranks.
    pub family: FactorFamily,

    /// Human-readable description.
    pub description: String,

    /// Default metric specs.
    pub metrics: Vec<MetricSpec>,

    /// Longest price history the factor reads, in periods (0 for
    /// fundamentals-only factors).
    pub typical_lookback: usize,
}

impl FactorInfo {
    fn from_factor(factor: &dyn Factor, typical_lookback: usize) -> Self {
        Self {
            name: factor.name().to_string(),
            family: factor.family(),
            description: factor.description().to_string(),
            metrics: factor.metrics().to_vec(),
            typical_lookback,
        }
    }
}

/// Create the default factor for a family.
#[must_use]
pub fn create_factor(family: FactorFamily) -> Box<dyn Factor> {
    match family {
        FactorFamily::Value => Box::new(ValueFactor::default()),
        FactorFamily::Momentum => Box::new(MomentumFactor::default()),
        FactorFamily::Quality => Box::new(QualityFactor::default()),
        FactorFamily::Growth => Box::new(GrowthFactor::default()),
    }
}

/// Get information about all available factors.
#[must_use]
pub fn available_factors() -> Vec<FactorInfo> {
    FactorFamily::ALL
        .into_iter()
        .map(|family| {
            let lookback = if family == FactorFamily::Momentum { 252 } else { 0 };
            FactorInfo::from_factor(create_factor(family).as_ref(), lookback)
        })
        .collect()
}

/// Get all factors of a family.
#[must_use]
pub fn factors_by_family(family: FactorFamily) -> Vec<FactorInfo> {
    available_factors().into_iter().filter(|info| info.family == family).collect()
}

/// Get information about a specific factor by name.
#[must_use]
pub fn factor_info(name: &str) -> Option<FactorInfo> {
    available_factors().into_iter().find(|info| info.name == name)
}
