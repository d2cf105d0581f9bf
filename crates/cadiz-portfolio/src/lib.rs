//! Portfolio construction for cadiz.
//!
//! This crate turns a price table into periodic returns and solves for a
//! long-only, fully-invested allocation under one of three mean-variance
//! objectives:
//! - [`Objective::MaximizeSharpe`]: annual return over annual volatility
//! - [`Objective::MinimizeVolatility`]: annual volatility
//! - [`Objective::MaximizeReturn`]: annual return
//!
//! Solver failures never surface as errors. The optimizer returns the
//! equal-weight portfolio and flags it with [`Portfolio::is_fallback`].
//!
//! # Example
//!
//! ```
//! use cadiz_portfolio::{Objective, optimize, to_returns};
//! use cadiz_traits::{Date, PriceTable};
//! use ndarray::array;
//!
//! let dates = (1..=4).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
//! let prices = PriceTable::new(
//!     dates,
//!     vec!["A".into(), "B".into()],
//!     array![[100.0, 50.0], [101.0, 50.5], [103.0, 50.2], [102.0, 51.0]],
//! )
//! .unwrap();
//!
//! let returns = to_returns(&prices).unwrap();
//! let portfolio = optimize(&returns, Objective::MaximizeReturn, 252).unwrap();
//! assert_eq!(portfolio.weights.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod moments;
pub mod objective;
pub mod optimizer;
pub mod returns;
pub mod solver;

pub use moments::{DEFAULT_PERIODS_PER_YEAR, Moments, PortfolioStatistics};
pub use objective::{MeanVarianceObjective, Objective};
pub use optimizer::{Portfolio, PortfolioOptimizer, optimize};
pub use returns::to_returns;
pub use solver::{
    ObjectiveFunction, ProjectedGradient, SimplexSolver, SolveStatus, SolverConfig, SolverOutcome,
};
