//! Long-only, fully-invested mean-variance optimization.

use cadiz_traits::{CadizError, Result, ReturnTable, Symbol};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::moments::{DEFAULT_PERIODS_PER_YEAR, Moments, PortfolioStatistics};
use crate::objective::{MeanVarianceObjective, Objective};
use crate::solver::{ProjectedGradient, SimplexSolver, SolveStatus, SolverConfig};

/// An optimized allocation.
///
/// Weights are aligned with `assets`, non-negative and sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Asset identifiers, in weight order.
    pub assets: Vec<Symbol>,
    /// Allocation per asset.
    pub weights: Vec<f64>,
    /// Annualized statistics of the allocation.
    pub statistics: PortfolioStatistics,
    /// Objective the allocation was optimized for.
    pub objective: Objective,
    /// Solver iterations performed.
    pub iterations: usize,
    /// Whether the solver failed and the equal-weight allocation was returned.
    pub is_fallback: bool,
    /// Why the fallback was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl Portfolio {
    /// Weight of one asset.
    #[must_use]
    pub fn weight(&self, symbol: &str) -> Option<f64> {
        self.assets.iter().position(|s| s == symbol).map(|i| self.weights[i])
    }

    /// `(asset, weight)` pairs, largest weight first.
    #[must_use]
    pub fn holdings(&self) -> Vec<(&str, f64)> {
        let mut holdings: Vec<_> =
            self.assets.iter().map(String::as_str).zip(self.weights.iter().copied()).collect();
        holdings.sort_by(|a, b| b.1.total_cmp(&a.1));
        holdings
    }
}

/// Mean-variance optimizer over a [`SimplexSolver`].
///
/// # Examples
///
/// ```
/// use cadiz_portfolio::{Objective, PortfolioOptimizer};
/// use cadiz_traits::{Date, ReturnTable};
/// use ndarray::array;
///
/// let dates = (2..=5).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
/// let returns = ReturnTable::new(
///     dates,
///     vec!["A".into(), "B".into()],
///     array![[0.01, 0.02], [0.02, -0.01], [-0.01, 0.01], [0.00, 0.02]],
/// )
/// .unwrap();
///
/// let portfolio = PortfolioOptimizer::new(Objective::MinimizeVolatility, 252)
///     .optimize(&returns)
///     .unwrap();
/// assert!((portfolio.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct PortfolioOptimizer<S = ProjectedGradient> {
    objective: Objective,
    periods_per_year: usize,
    solver: S,
}

impl PortfolioOptimizer<ProjectedGradient> {
    /// Create an optimizer with the default projected-gradient solver.
    #[must_use]
    pub fn new(objective: Objective, periods_per_year: usize) -> Self {
        Self { objective, periods_per_year, solver: ProjectedGradient::default() }
    }

    /// Replace the default solver's stopping rules.
    #[must_use]
    pub const fn with_solver_config(self, config: SolverConfig) -> Self {
        Self { objective: self.objective, periods_per_year: self.periods_per_year, solver: ProjectedGradient::new(config) }
    }
}

impl Default for PortfolioOptimizer<ProjectedGradient> {
    fn default() -> Self {
        Self::new(Objective::default(), DEFAULT_PERIODS_PER_YEAR)
    }
}

impl<S: SimplexSolver> PortfolioOptimizer<S> {
    /// Use a different solver.
    pub fn with_solver<T: SimplexSolver>(self, solver: T) -> PortfolioOptimizer<T> {
        PortfolioOptimizer { objective: self.objective, periods_per_year: self.periods_per_year, solver }
    }

    /// The configured objective.
    pub const fn objective(&self) -> Objective {
        self.objective
    }

    /// Optimize over every asset of `returns`.
    ///
    /// Solver failure does not error: the equal-weight allocation is
    /// returned with `is_fallback = true`.
    ///
    /// # Errors
    ///
    /// Returns [`CadizError::InvalidParameter`] if `periods_per_year` is zero,
    /// and [`CadizError::DataQuality`] if there are no assets, fewer than two
    /// observations, or a non-finite return.
    pub fn optimize(&self, returns: &ReturnTable) -> Result<Portfolio> {
        self.validate(returns)?;

        let assets = returns.symbols().to_vec();
        let n = assets.len();
        let moments = Moments::estimate(returns.returns().view(), self.periods_per_year);

        if n == 1 {
            let weights = Array1::ones(1);
            let statistics = moments.statistics(weights.view());
            return Ok(self.portfolio(assets, weights, statistics, 0, None));
        }

        let initial = Array1::from_elem(n, 1.0 / n as f64);
        let f = MeanVarianceObjective::new(self.objective, &moments);
        let outcome = self.solver.solve(&f, initial.view());
        debug!(solver = self.solver.name(), iterations = outcome.iterations, status = ?outcome.status, "solver finished");

        let failure = match &outcome.status {
            SolveStatus::Converged if outcome.weights.iter().all(|w| w.is_finite()) => None,
            SolveStatus::Converged => Some("solver produced non-finite weights".to_string()),
            SolveStatus::MaxIterations => {
                Some(format!("solver did not converge within {} iterations", outcome.iterations))
            }
            SolveStatus::Undefined(reason) => Some(format!("{reason}: zero portfolio volatility")),
        };

        if let Some(reason) = failure {
            warn!(objective = %self.objective, %reason, "falling back to equal weights");
            let statistics = moments.statistics(initial.view());
            return Ok(self.portfolio(assets, initial, statistics, outcome.iterations, Some(reason)));
        }

        let weights = clean_weights(outcome.weights);
        let statistics = moments.statistics(weights.view());
        info!(
            objective = %self.objective,
            assets = n,
            expected_return = statistics.expected_return,
            volatility = statistics.volatility,
            sharpe = statistics.sharpe_ratio,
            "portfolio optimized"
        );
        Ok(self.portfolio(assets, weights, statistics, outcome.iterations, None))
    }

    /// Optimize over `assets` only, in the given order.
    ///
    /// # Errors
    ///
    /// As [`PortfolioOptimizer::optimize`], plus [`CadizError::DataQuality`]
    /// if an asset is absent from `returns`.
    pub fn optimize_assets(&self, returns: &ReturnTable, assets: &[Symbol]) -> Result<Portfolio> {
        if assets.is_empty() {
            return Err(CadizError::data_quality("no assets to optimize"));
        }
        self.optimize(&returns.select(assets)?)
    }

    fn validate(&self, returns: &ReturnTable) -> Result<()> {
        if self.periods_per_year == 0 {
            return Err(CadizError::invalid_parameter("periods_per_year must be positive"));
        }
        if returns.n_assets() == 0 {
            return Err(CadizError::data_quality("no assets to optimize"));
        }
        if returns.n_observations() < 2 {
            return Err(CadizError::data_quality(format!(
                "need at least 2 return observations, got {}",
                returns.n_observations()
            )));
        }
        if returns.returns().iter().any(|r| !r.is_finite()) {
            return Err(CadizError::data_quality("return table contains non-finite values"));
        }
        Ok(())
    }

    fn portfolio(
        &self,
        assets: Vec<Symbol>,
        weights: Array1<f64>,
        statistics: PortfolioStatistics,
        iterations: usize,
        fallback_reason: Option<String>,
    ) -> Portfolio {
        Portfolio {
            assets,
            weights: weights.to_vec(),
            statistics,
            objective: self.objective,
            iterations,
            is_fallback: fallback_reason.is_some(),
            fallback_reason,
        }
    }
}

/// Clip rounding noise below zero and renormalize to sum 1.
fn clean_weights(weights: Array1<f64>) -> Array1<f64> {
    let clipped = weights.mapv(|w| w.max(0.0));
    let total = clipped.sum();
    if total > 0.0 { clipped / total } else { clipped }
}

/// Optimize over every asset of `returns` with the default solver.
///
/// # Errors
///
/// See [`PortfolioOptimizer::optimize`].
pub fn optimize(returns: &ReturnTable, objective: Objective, periods_per_year: usize) -> Result<Portfolio> {
    PortfolioOptimizer::new(objective, periods_per_year).optimize(returns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cadiz_traits::Date;
    use ndarray::{Array2, array};

    fn table(symbols: &[&str], returns: Array2<f64>) -> ReturnTable {
        let dates = (0..returns.nrows())
            .map(|i| Date::from_num_days_from_ce_opt(738_000 + i as i32).unwrap())
            .collect();
        ReturnTable::new(dates, symbols.iter().map(|s| s.to_string()).collect(), returns).unwrap()
    }

    fn sample() -> ReturnTable {
        table(
            &["A", "B", "C"],
            array![
                [0.010, 0.004, -0.002],
                [-0.005, 0.006, 0.011],
                [0.020, -0.003, 0.004],
                [0.003, 0.002, -0.006],
                [-0.012, 0.005, 0.009],
                [0.015, 0.001, 0.002],
            ],
        )
    }

    fn assert_on_simplex(p: &Portfolio) {
        assert_relative_eq!(p.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(p.weights.iter().all(|w| (-1e-12..=1.0 + 1e-12).contains(w)));
    }

    #[test]
    fn test_all_objectives_on_simplex() {
        let returns = sample();
        for objective in [Objective::MaximizeSharpe, Objective::MinimizeVolatility, Objective::MaximizeReturn] {
            let p = optimize(&returns, objective, 252).unwrap();
            assert_on_simplex(&p);
            assert_eq!(p.assets, vec!["A", "B", "C"]);
            assert_eq!(p.objective, objective);
        }
    }

    #[test]
    fn test_max_return_picks_best_asset() {
        let p = optimize(&sample(), Objective::MaximizeReturn, 252).unwrap();
        // Mean daily returns: A 0.00517, B 0.0025, C 0.003
        assert!(!p.is_fallback);
        assert_relative_eq!(p.weight("A").unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_min_volatility_beats_equal_weight() {
        let returns = sample();
        let p = optimize(&returns, Objective::MinimizeVolatility, 252).unwrap();
        let moments = Moments::estimate(returns.returns().view(), 252);
        let equal = moments.statistics(array![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0].view());
        assert!(!p.is_fallback);
        assert!(p.statistics.volatility <= equal.volatility + 1e-12);
    }

    #[test]
    fn test_max_sharpe_beats_equal_weight() {
        let returns = sample();
        let p = optimize(&returns, Objective::MaximizeSharpe, 252).unwrap();
        let moments = Moments::estimate(returns.returns().view(), 252);
        let equal = moments.statistics(array![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0].view());
        assert!(!p.is_fallback);
        assert!(p.statistics.sharpe_ratio >= equal.sharpe_ratio - 1e-12);
    }

    #[test]
    fn test_single_asset_zero_variance() {
        let returns = table(&["ONLY"], array![[0.01], [0.01], [0.01]]);
        let p = optimize(&returns, Objective::MaximizeSharpe, 252).unwrap();
        assert_eq!(p.weights, vec![1.0]);
        assert!(!p.is_fallback);
        assert_eq!(p.statistics.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_zero_volatility_falls_back() {
        let returns = table(&["A", "B"], array![[0.01, 0.02], [0.01, 0.02], [0.01, 0.02]]);
        let p = optimize(&returns, Objective::MinimizeVolatility, 252).unwrap();
        assert!(p.is_fallback);
        assert!(p.fallback_reason.is_some());
        assert_eq!(p.weights, vec![0.5, 0.5]);
        assert_eq!(p.statistics.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_iteration_limit_falls_back() {
        let optimizer = PortfolioOptimizer::new(Objective::MaximizeSharpe, 252)
            .with_solver_config(SolverConfig { max_iterations: 1, tolerance: 0.0, ftol: 0.0 });
        let p = optimizer.optimize(&sample()).unwrap();
        assert!(p.is_fallback);
        assert_relative_eq!(p.weights[0], 1.0 / 3.0, epsilon = 1e-12);
        assert_on_simplex(&p);
    }

    #[test]
    fn test_validation_errors() {
        let returns = sample();
        assert!(matches!(optimize(&returns, Objective::MaximizeSharpe, 0), Err(CadizError::InvalidParameter(_))));

        let one_row = table(&["A", "B"], array![[0.01, 0.02]]);
        assert!(matches!(optimize(&one_row, Objective::MaximizeSharpe, 252), Err(CadizError::DataQuality(_))));

        let nan = table(&["A", "B"], array![[0.01, f64::NAN], [0.02, 0.01]]);
        assert!(matches!(optimize(&nan, Objective::MaximizeSharpe, 252), Err(CadizError::DataQuality(_))));

        let optimizer = PortfolioOptimizer::default();
        assert!(matches!(optimizer.optimize_assets(&returns, &[]), Err(CadizError::DataQuality(_))));
        assert!(matches!(
            optimizer.optimize_assets(&returns, &["A".to_string(), "Z".to_string()]),
            Err(CadizError::DataQuality(_))
        ));
    }

    #[test]
    fn test_optimize_assets_subset_order() {
        let p = PortfolioOptimizer::new(Objective::MaximizeReturn, 252)
            .optimize_assets(&sample(), &["C".to_string(), "B".to_string()])
            .unwrap();
        assert_eq!(p.assets, vec!["C", "B"]);
        assert_relative_eq!(p.weights[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_portfolio_json_fields() {
        let p = optimize(&sample(), Objective::MinimizeVolatility, 252).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json["statistics"]["return"].is_number());
        assert!(json["statistics"]["volatility"].is_number());
        assert_eq!(json["is_fallback"], false);
        assert_eq!(json["objective"], "minimize_volatility");
        assert_eq!(json["assets"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_holdings_sorted() {
        let p = optimize(&sample(), Objective::MinimizeVolatility, 252).unwrap();
        let holdings = p.holdings();
        assert!(holdings.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}
