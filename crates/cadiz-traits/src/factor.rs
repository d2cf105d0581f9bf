//! The `Factor` trait: a named family of ranked metrics.

use crate::{FactorFamily, MetricSpec};

/// A factor family definition.
///
/// A factor does not compute anything itself; it declares which metrics make up
/// the family and how each one is ranked. Ranking is done by
/// `cadiz_factors::rank_factor`, which keeps every family on the same rules.
///
/// Implementations must be thread-safe so factors can be ranked in parallel.
///
/// # Example
///
/// ```
/// use cadiz_traits::{Factor, FactorFamily, MetricSpec};
///
/// struct CheapBooks {
///     metrics: Vec<MetricSpec>,
/// }
///
/// impl Factor for CheapBooks {
///     fn name(&self) -> &str {
///         "cheap_books"
///     }
///
///     fn family(&self) -> FactorFamily {
///         FactorFamily::Value
///     }
///
///     fn metrics(&self) -> &[MetricSpec] {
///         &self.metrics
///     }
/// }
///
/// let factor = CheapBooks { metrics: vec![MetricSpec::ascending("pb_ratio")] };
/// assert_eq!(factor.required_columns(), vec!["pb_ratio"]);
/// ```
pub trait Factor: Send + Sync {
    /// Unique name used in logs and output.
    fn name(&self) -> &str;

    /// Family this factor contributes to.
    fn family(&self) -> FactorFamily;

    /// Ordered metric specifications.
    fn metrics(&self) -> &[MetricSpec];

    /// Metric columns the factor reads.
    fn required_columns(&self) -> Vec<&str> {
        self.metrics().iter().map(|m| m.name.as_str()).collect()
    }

    /// Short description.
    fn description(&self) -> &str {
        self.family().description()
    }
}

impl<T: Factor + ?Sized> Factor for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn family(&self) -> FactorFamily {
        (**self).family()
    }

    fn metrics(&self) -> &[MetricSpec] {
        (**self).metrics()
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}
