//! Per-metric ranking configuration.
//!
//! A [`MetricSpec`] declares, for one metric column, which direction is
//! favorable and which values are economically comparable. Ranking code never
//! carries ad hoc conditionals on metric names; everything it needs to know
//! lives here.

use serde::{Deserialize, Serialize};

/// Which end of a metric is favorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smaller raw values rank better (rank 1 = smallest).
    Ascending,
    /// Larger raw values rank better (rank 1 = largest).
    Descending,
}

/// Predicate deciding whether a present metric value takes part in ranking.
///
/// Missing values never qualify, whatever the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFilter {
    /// Strictly positive values only.
    #[default]
    Positive,
    /// Zero or positive values.
    NonNegative,
    /// Every present value.
    Any,
}

impl MetricFilter {
    /// Whether `value` passes the filter.
    #[must_use]
    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Self::Positive => value > 0.0,
            Self::NonNegative => value >= 0.0,
            Self::Any => true,
        }
    }
}

/// Ranking configuration for a single metric column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Metric column name.
    pub name: String,

    /// Favorable direction.
    pub direction: Direction,

    /// Qualification filter (default: strictly positive).
    #[serde(default)]
    pub filter: MetricFilter,
}

impl MetricSpec {
    /// Create a spec with an explicit direction and filter.
    pub fn new(name: impl Into<String>, direction: Direction, filter: MetricFilter) -> Self {
        Self { name: name.into(), direction, filter }
    }

    /// Smaller is better, strictly positive values only.
    pub fn ascending(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Ascending, MetricFilter::Positive)
    }

    /// Larger is better, strictly positive values only.
    pub fn descending(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Descending, MetricFilter::Positive)
    }

    /// Replace the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: MetricFilter) -> Self {
        self.filter = filter;
        self
    }
}
