//! Annualized return moments and portfolio statistics.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Default number of return periods per year (trading days).
pub const DEFAULT_PERIODS_PER_YEAR: usize = 252;

/// Volatility below which a portfolio is treated as riskless.
pub const MIN_VOLATILITY: f64 = 1e-8;

/// Annualized mean returns and covariance of a set of assets.
#[derive(Debug, Clone, PartialEq)]
pub struct Moments {
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

impl Moments {
    /// Estimate from a return matrix (observations x assets).
    ///
    /// Means are scaled by `periods_per_year`; the covariance uses the N-1
    /// denominator and is scaled the same way. Callers guarantee at least two
    /// finite observations.
    #[must_use]
    pub fn estimate(returns: ArrayView2<'_, f64>, periods_per_year: usize) -> Self {
        let n_obs = returns.nrows();
        let scale = periods_per_year as f64;

        let mean = returns.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(returns.ncols()));
        let centered = &returns - &mean;
        let covariance = centered.t().dot(&centered) / (n_obs.saturating_sub(1).max(1)) as f64;

        Self { mean: mean * scale, covariance: covariance * scale }
    }

    /// Annualized mean return per asset.
    #[must_use]
    pub const fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Annualized covariance matrix.
    #[must_use]
    pub const fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Number of assets.
    #[must_use]
    pub fn n_assets(&self) -> usize {
        self.mean.len()
    }

    /// Annualized portfolio return `w'mu`.
    #[must_use]
    pub fn portfolio_return(&self, weights: ArrayView1<'_, f64>) -> f64 {
        weights.dot(&self.mean)
    }

    /// Annualized portfolio volatility `sqrt(w' Sigma w)`.
    #[must_use]
    pub fn portfolio_volatility(&self, weights: ArrayView1<'_, f64>) -> f64 {
        weights.dot(&self.covariance.dot(&weights)).max(0.0).sqrt()
    }

    /// Return, volatility and Sharpe ratio (risk-free rate 0) of `weights`.
    #[must_use]
    pub fn statistics(&self, weights: ArrayView1<'_, f64>) -> PortfolioStatistics {
        let expected_return = self.portfolio_return(weights);
        let volatility = self.portfolio_volatility(weights);
        let sharpe_ratio = if volatility > MIN_VOLATILITY { expected_return / volatility } else { 0.0 };
        PortfolioStatistics { expected_return, volatility, sharpe_ratio }
    }
}

/// Annualized statistics of a weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStatistics {
    /// Annualized expected return.
    #[serde(rename = "return")]
    pub expected_return: f64,
    /// Annualized volatility.
    pub volatility: f64,
    /// Return over volatility, 0.0 when volatility is zero.
    pub sharpe_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_estimate_sample_covariance() {
        let returns = array![[0.01, 0.02], [0.03, 0.00], [0.02, 0.01]];
        let m = Moments::estimate(returns.view(), 1);

        assert_relative_eq!(m.mean()[0], 0.02, epsilon = 1e-12);
        assert_relative_eq!(m.mean()[1], 0.01, epsilon = 1e-12);
        // Var(a) = (1e-4 + 1e-4 + 0) / 2
        assert_relative_eq!(m.covariance()[[0, 0]], 1e-4, epsilon = 1e-12);
        assert_relative_eq!(m.covariance()[[0, 1]], -1e-4, epsilon = 1e-12);
        assert_relative_eq!(m.covariance()[[0, 1]], m.covariance()[[1, 0]]);
    }

    #[test]
    fn test_annualization() {
        let returns = array![[0.01], [0.03]];
        let daily = Moments::estimate(returns.view(), 1);
        let annual = Moments::estimate(returns.view(), 252);
        assert_relative_eq!(annual.mean()[0], daily.mean()[0] * 252.0, epsilon = 1e-12);
        assert_relative_eq!(annual.covariance()[[0, 0]], daily.covariance()[[0, 0]] * 252.0, epsilon = 1e-12);
    }

    #[test]
    fn test_statistics() {
        let returns = array![[0.01, 0.02], [0.03, 0.00], [0.02, 0.01]];
        let m = Moments::estimate(returns.view(), 1);
        let w = array![0.5, 0.5];
        let stats = m.statistics(w.view());
        assert_relative_eq!(stats.expected_return, 0.015, epsilon = 1e-12);
        // Perfectly offsetting assets
        assert_relative_eq!(stats.volatility, 0.0, epsilon = 1e-9);
        assert_eq!(stats.sharpe_ratio, 0.0);

        let stats = m.statistics(array![1.0, 0.0].view());
        assert_relative_eq!(stats.volatility, 0.01, epsilon = 1e-12);
        assert_relative_eq!(stats.sharpe_ratio, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_statistics_serialize_return_key() {
        let stats = PortfolioStatistics { expected_return: 0.1, volatility: 0.2, sharpe_ratio: 0.5 };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["return"], 0.1);
        assert_eq!(json["sharpe_ratio"], 0.5);
    }
}
