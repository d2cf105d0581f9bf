//! Pipeline configuration.
//!
//! Every field has a default, so a configuration file only needs the keys it
//! changes.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use cadiz_combine::FactorWeights;
use cadiz_portfolio::{DEFAULT_PERIODS_PER_YEAR, Objective, SolverConfig};
use cadiz_traits::{CadizError, FactorFamily, MetricSpec, Result};
use serde::{Deserialize, Serialize};

/// Number of candidates passed to the optimizer by default.
pub const DEFAULT_TOP_N: usize = 10;

/// Configuration for a [`Pipeline`](crate::Pipeline) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Family weights for the combined rank. `None` weights every supplied
    /// family equally.
    pub factor_weights: Option<FactorWeights>,

    /// How many of the best-ranked assets to optimize over.
    pub top_n: usize,

    /// Optimization objective.
    pub objective: Objective,

    /// Return periods per year, used to annualize.
    pub periods_per_year: usize,

    /// Metric specs replacing a family's defaults.
    pub metric_overrides: BTreeMap<FactorFamily, Vec<MetricSpec>>,

    /// Solver stopping rules.
    pub optimizer: SolverConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            factor_weights: Some(default_factor_weights()),
            top_n: DEFAULT_TOP_N,
            objective: Objective::default(),
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            metric_overrides: BTreeMap::new(),
            optimizer: SolverConfig::default(),
        }
    }
}

/// Value 0.4, momentum 0.3, quality 0.3.
#[must_use]
pub fn default_factor_weights() -> FactorWeights {
    FactorWeights::new()
        .with(FactorFamily::Value, 0.4)
        .with(FactorFamily::Momentum, 0.3)
        .with(FactorFamily::Quality, 0.3)
}

impl PipelineConfig {
    /// Parse a JSON configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::Configuration`] for malformed JSON, plus
    /// anything [`validate`](Self::validate) reports.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CadizError::configuration(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::Configuration`] if the file cannot be read, plus
    /// anything [`from_json_str`](Self::from_json_str) reports.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CadizError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Check the configuration before any data is touched.
    ///
    /// # Errors
    ///
    /// - [`CadizError::InvalidParameter`] for a zero `top_n`,
    ///   `periods_per_year` or `max_iterations`, or a negative or non-finite
    ///   tolerance
    /// - [`CadizError::Configuration`] for unusable factor weights, or a
    ///   metric override that is empty or repeats a metric
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(CadizError::invalid_parameter("top_n must be at least 1"));
        }
        if self.periods_per_year == 0 {
            return Err(CadizError::invalid_parameter("periods_per_year must be at least 1"));
        }
        if self.optimizer.max_iterations == 0 {
            return Err(CadizError::invalid_parameter("optimizer.max_iterations must be at least 1"));
        }
        for (name, value) in [("tolerance", self.optimizer.tolerance), ("ftol", self.optimizer.ftol)] {
            if !value.is_finite() || value < 0.0 {
                return Err(CadizError::invalid_parameter(format!(
                    "optimizer.{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if let Some(weights) = &self.factor_weights {
            weights.total()?;
        }

        for (family, specs) in &self.metric_overrides {
            if specs.is_empty() {
                return Err(CadizError::configuration(format!(
                    "metric override for {family} lists no metrics"
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = specs.iter().find(|spec| !seen.insert(spec.name.as_str())) {
                return Err(CadizError::configuration(format!(
                    "metric override for {family} repeats '{}'",
                    dup.name
                )));
            }
        }

        Ok(())
    }

    /// Metric specs for a family: the override if one is configured.
    #[must_use]
    pub fn metric_override(&self, family: FactorFamily) -> Option<&[MetricSpec]> {
        self.metric_overrides.get(&family).map(Vec::as_slice)
    }
}
