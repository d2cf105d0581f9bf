//! Optimization objectives.

use std::str::FromStr;

use cadiz_traits::CadizError;
use derive_more::Display;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::moments::{MIN_VOLATILITY, Moments};
use crate::solver::ObjectiveFunction;

/// What the optimizer maximizes or minimizes. Exactly one per call.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Objective {
    /// Maximize annual return over annual volatility (risk-free rate 0).
    #[default]
    #[display("maximize_sharpe")]
    #[serde(rename = "maximize_sharpe", alias = "sharpe", alias = "max_sharpe")]
    MaximizeSharpe,

    /// Minimize annual volatility.
    #[display("minimize_volatility")]
    #[serde(rename = "minimize_volatility", alias = "min_volatility", alias = "min_vol")]
    MinimizeVolatility,

    /// Maximize annual return.
    #[display("maximize_return")]
    #[serde(rename = "maximize_return", alias = "max_return")]
    MaximizeReturn,
}

impl FromStr for Objective {
    type Err = CadizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sharpe" | "maximize_sharpe" | "max_sharpe" => Ok(Self::MaximizeSharpe),
            "min_volatility" | "minimize_volatility" | "min_vol" => Ok(Self::MinimizeVolatility),
            "max_return" | "maximize_return" => Ok(Self::MaximizeReturn),
            other => Err(CadizError::configuration(format!(
                "unknown objective '{other}' (expected sharpe, min_volatility or max_return)"
            ))),
        }
    }
}

/// An [`Objective`] evaluated against estimated moments, in minimization
/// form.
#[derive(Debug, Clone, Copy)]
pub struct MeanVarianceObjective<'a> {
    objective: Objective,
    moments: &'a Moments,
}

impl<'a> MeanVarianceObjective<'a> {
    /// Bind an objective to a set of moments.
    #[must_use]
    pub const fn new(objective: Objective, moments: &'a Moments) -> Self {
        Self { objective, moments }
    }
}

impl ObjectiveFunction for MeanVarianceObjective<'_> {
    fn value(&self, weights: ArrayView1<'_, f64>) -> Option<f64> {
        let ret = self.moments.portfolio_return(weights);
        match self.objective {
            Objective::MaximizeReturn => Some(-ret),
            Objective::MinimizeVolatility => {
                let vol = self.moments.portfolio_volatility(weights);
                (vol > MIN_VOLATILITY).then_some(vol)
            }
            Objective::MaximizeSharpe => {
                let vol = self.moments.portfolio_volatility(weights);
                (vol > MIN_VOLATILITY).then(|| -ret / vol)
            }
        }
    }

    fn gradient(&self, weights: ArrayView1<'_, f64>) -> Option<Array1<f64>> {
        let mu = self.moments.mean();
        match self.objective {
            Objective::MaximizeReturn => Some(-mu),
            Objective::MinimizeVolatility => {
                let vol = self.moments.portfolio_volatility(weights);
                if vol <= MIN_VOLATILITY {
                    return None;
                }
                Some(self.moments.covariance().dot(&weights) / vol)
            }
            Objective::MaximizeSharpe => {
                let vol = self.moments.portfolio_volatility(weights);
                if vol <= MIN_VOLATILITY {
                    return None;
                }
                let ret = self.moments.portfolio_return(weights);
                // d(-ret/vol)/dw = -mu/vol + ret * Sigma w / vol^3
                let sigma_w = self.moments.covariance().dot(&weights);
                Some(sigma_w * (ret / vol.powi(3)) - mu / vol)
            }
        }
    }
}
