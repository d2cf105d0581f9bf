//! Relative importance of factor families.

use std::collections::BTreeMap;

use cadiz_traits::{CadizError, FactorFamily, Result};
use serde::{Deserialize, Serialize};

/// Non-negative weight per factor family.
///
/// Serialized as a plain map, e.g. `{"value": 0.4, "momentum": 0.3}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorWeights(BTreeMap<FactorFamily, f64>);

impl FactorWeights {
    /// Create an empty weight set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the weight of a family.
    #[must_use]
    pub fn with(mut self, family: FactorFamily, weight: f64) -> Self {
        self.0.insert(family, weight);
        self
    }

    /// Set the weight of a family in place.
    pub fn set(&mut self, family: FactorFamily, weight: f64) {
        self.0.insert(family, weight);
    }

    /// Weight of a family, if set.
    #[must_use]
    pub fn get(&self, family: FactorFamily) -> Option<f64> {
        self.0.get(&family).copied()
    }

    /// Iterate over `(family, weight)` in family order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorFamily, f64)> + '_ {
        self.0.iter().map(|(f, w)| (*f, *w))
    }

    /// Families with a weight.
    pub fn families(&self) -> impl Iterator<Item = FactorFamily> + '_ {
        self.0.keys().copied()
    }

    /// Number of weighted families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no family has a weight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of the weights after validation.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::Configuration`] if a weight is negative or
    /// non-finite, or if the weights sum to zero.
    pub fn total(&self) -> Result<f64> {
        for (family, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CadizError::configuration(format!(
                    "weight for {family} must be finite and non-negative, got {weight}"
                )));
            }
        }
        let total: f64 = self.0.values().sum();
        if total <= 0.0 {
            return Err(CadizError::configuration("factor weights sum to zero"));
        }
        Ok(total)
    }

    /// Weights divided by their sum, so they add up to 1.0.
    ///
    /// # Errors
    ///
    /// See [`FactorWeights::total`].
    pub fn normalized(&self) -> Result<Self> {
        let total = self.total()?;
        Ok(Self(self.0.iter().map(|(f, w)| (*f, w / total)).collect()))
    }
}

impl FromIterator<(FactorFamily, f64)> for FactorWeights {
    fn from_iter<I: IntoIterator<Item = (FactorFamily, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_equal() {
        let weights = FactorWeights::new()
            .with(FactorFamily::Value, 2.0)
            .with(FactorFamily::Momentum, 2.0);
        let norm = weights.normalized().unwrap();
        assert_relative_eq!(norm.get(FactorFamily::Value).unwrap(), 0.5);
        assert_relative_eq!(norm.get(FactorFamily::Momentum).unwrap(), 0.5);
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let weights: FactorWeights = [
            (FactorFamily::Value, 0.4),
            (FactorFamily::Momentum, 0.3),
            (FactorFamily::Quality, 0.3),
            (FactorFamily::Growth, 0.7),
        ]
        .into_iter()
        .collect();
        let sum: f64 = weights.normalized().unwrap().iter().map(|(_, w)| w).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_sum_rejected() {
        let weights = FactorWeights::new()
            .with(FactorFamily::Value, 0.0)
            .with(FactorFamily::Momentum, 0.0);
        assert!(matches!(weights.normalized(), Err(CadizError::Configuration(_))));
        assert!(FactorWeights::new().total().is_err());
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        let weights = FactorWeights::new().with(FactorFamily::Value, -0.1).with(FactorFamily::Quality, 1.0);
        assert!(weights.total().is_err());

        let weights = FactorWeights::new().with(FactorFamily::Value, f64::NAN);
        assert!(weights.total().is_err());
    }

    #[test]
    fn test_serde_map() {
        let weights: FactorWeights =
            serde_json::from_str(r#"{"value": 0.4, "momentum": 0.3, "quality": 0.3}"#).unwrap();
        assert_eq!(weights.len(), 3);
        assert_eq!(weights.get(FactorFamily::Momentum), Some(0.3));
        assert!(serde_json::from_str::<FactorWeights>(r#"{"size": 1.0}"#).is_err());
    }
}
