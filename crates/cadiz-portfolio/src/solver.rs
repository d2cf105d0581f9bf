//! Solvers for smooth objectives over the probability simplex
//! `{w : sum(w) = 1, 0 <= w_i <= 1}`.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A smooth function to minimize.
///
/// `None` means the function is undefined at that point (for example a ratio
/// with a zero denominator).
pub trait ObjectiveFunction {
    /// Function value.
    fn value(&self, weights: ArrayView1<'_, f64>) -> Option<f64>;

    /// Gradient with respect to the weights.
    fn gradient(&self, weights: ArrayView1<'_, f64>) -> Option<Array1<f64>>;
}

/// Stopping rules shared by simplex solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of iterations before giving up.
    pub max_iterations: usize,

    /// Converged when the norm of the projected gradient step falls below
    /// this value.
    pub tolerance: f64,

    /// Converged when the relative objective change falls below this value.
    pub ftol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_iterations: 1000, tolerance: 1e-9, ftol: 1e-12 }
    }
}

/// Why a solve stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// A stopping rule was met.
    Converged,
    /// The iteration limit was hit first.
    MaxIterations,
    /// The objective or its gradient was undefined at an iterate.
    Undefined(String),
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    /// Final iterate (on the simplex).
    pub weights: Array1<f64>,
    /// Objective value at `weights`, if defined.
    pub value: Option<f64>,
    /// Iterations performed.
    pub iterations: usize,
    /// Stopping reason.
    pub status: SolveStatus,
}

impl SolverOutcome {
    /// Whether the solve converged.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// Minimizes an [`ObjectiveFunction`] over the probability simplex.
pub trait SimplexSolver: Send + Sync {
    /// Minimize `f` starting from `initial`.
    fn solve(&self, f: &dyn ObjectiveFunction, initial: ArrayView1<'_, f64>) -> SolverOutcome;

    /// Solver name, for logging.
    fn name(&self) -> &str;
}

/// Euclidean projection onto the probability simplex (sort-based).
///
/// # Examples
///
/// ```
/// use cadiz_portfolio::solver::project_to_simplex;
/// use ndarray::array;
///
/// let w = project_to_simplex(array![0.8, 0.6, -0.2].view());
/// assert!((w.sum() - 1.0).abs() < 1e-12);
/// assert_eq!(w[2], 0.0);
/// ```
#[must_use]
pub fn project_to_simplex(v: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut sorted = v.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumsum = 0.0;
    let mut tau = 0.0;
    for (i, u) in sorted.iter().enumerate() {
        cumsum += u;
        let t = (cumsum - 1.0) / (i + 1) as f64;
        if u - t > 0.0 {
            tau = t;
        }
    }

    v.mapv(|x| (x - tau).max(0.0))
}

/// Spectral projected gradient with a backtracking (Armijo) line search.
///
/// Each step moves against the gradient and projects back onto the simplex.
/// The trial step length is the Barzilai-Borwein estimate `s's / s'y` from
/// the previous iterate and is halved while the sufficient-decrease
/// condition fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectedGradient {
    config: SolverConfig,
}

impl ProjectedGradient {
    const ARMIJO_C1: f64 = 1e-4;
    const MIN_STEP: f64 = 1e-16;
    const MAX_STEP: f64 = 1e10;

    /// Create a solver with the given stopping rules.
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The stopping rules.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn outcome(weights: Array1<f64>, value: f64, iterations: usize, status: SolveStatus) -> SolverOutcome {
        SolverOutcome { weights, value: Some(value), iterations, status }
    }
}

impl SimplexSolver for ProjectedGradient {
    fn solve(&self, f: &dyn ObjectiveFunction, initial: ArrayView1<'_, f64>) -> SolverOutcome {
        let mut w = project_to_simplex(initial);
        let Some(mut fw) = f.value(w.view()) else {
            return SolverOutcome {
                weights: w,
                value: None,
                iterations: 0,
                status: SolveStatus::Undefined("objective undefined at the initial point".into()),
            };
        };
        let Some(mut grad) = f.gradient(w.view()) else {
            return Self::outcome(w, fw, 0, SolveStatus::Undefined("gradient undefined at the initial point".into()));
        };

        let mut step = 1.0;
        for iteration in 1..=self.config.max_iterations {
            // Stationarity: the unit projected gradient step is (nearly) zero
            let pg = project_to_simplex((&w - &grad).view()) - &w;
            if pg.dot(&pg).sqrt() < self.config.tolerance {
                debug!(iteration, value = fw, "projected gradient below tolerance");
                return Self::outcome(w, fw, iteration - 1, SolveStatus::Converged);
            }

            let accepted = loop {
                let candidate = project_to_simplex((&w - &(&grad * step)).view());
                let decrease = grad.dot(&(&candidate - &w));
                match f.value(candidate.view()) {
                    Some(fc) if fc <= fw + Self::ARMIJO_C1 * decrease => break Some((candidate, fc)),
                    _ if step > Self::MIN_STEP => step *= 0.5,
                    _ => break None,
                }
            };

            let Some((candidate, fc)) = accepted else {
                // No descent left at machine precision
                debug!(iteration, value = fw, "line search exhausted");
                return Self::outcome(w, fw, iteration, SolveStatus::Converged);
            };

            let Some(next_grad) = f.gradient(candidate.view()) else {
                return Self::outcome(candidate, fc, iteration, SolveStatus::Undefined("gradient undefined at iterate".into()));
            };

            let s = &candidate - &w;
            let y = &next_grad - &grad;
            let sy = s.dot(&y);
            step = if sy > 0.0 { (s.dot(&s) / sy).clamp(Self::MIN_STEP, Self::MAX_STEP) } else { (step * 2.0).min(Self::MAX_STEP) };

            let change = (fw - fc).abs() / fw.abs().max(1.0);
            w = candidate;
            fw = fc;
            grad = next_grad;

            if change < self.config.ftol {
                debug!(iteration, value = fw, "objective change below ftol");
                return Self::outcome(w, fw, iteration, SolveStatus::Converged);
            }
        }

        Self::outcome(w, fw, self.config.max_iterations, SolveStatus::MaxIterations)
    }

    fn name(&self) -> &str {
        "projected_gradient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    /// `||w - target||^2` for a target on the simplex.
    struct Distance(Array1<f64>);

    impl ObjectiveFunction for Distance {
        fn value(&self, w: ArrayView1<'_, f64>) -> Option<f64> {
            let d = &w - &self.0;
            Some(d.dot(&d))
        }

        fn gradient(&self, w: ArrayView1<'_, f64>) -> Option<Array1<f64>> {
            Some((&w - &self.0) * 2.0)
        }
    }

    struct Linear(Array1<f64>);

    impl ObjectiveFunction for Linear {
        fn value(&self, w: ArrayView1<'_, f64>) -> Option<f64> {
            Some(w.dot(&self.0))
        }

        fn gradient(&self, _w: ArrayView1<'_, f64>) -> Option<Array1<f64>> {
            Some(self.0.clone())
        }
    }

    struct Nowhere;

    impl ObjectiveFunction for Nowhere {
        fn value(&self, _w: ArrayView1<'_, f64>) -> Option<f64> {
            None
        }

        fn gradient(&self, _w: ArrayView1<'_, f64>) -> Option<Array1<f64>> {
            None
        }
    }

    #[test]
    fn test_projection_properties() {
        for v in [array![0.2, 0.3, 0.5], array![3.0, -1.0, 0.5], array![-5.0, -5.0, -5.0], array![10.0, 0.0, 0.0]] {
            let w = project_to_simplex(v.view());
            assert_relative_eq!(w.sum(), 1.0, epsilon = 1e-12);
            assert!(w.iter().all(|x| (0.0..=1.0).contains(x)));
        }
        let w = project_to_simplex(array![0.2, 0.3, 0.5].view());
        assert_relative_eq!(w[1], 0.3, epsilon = 1e-12);
        let w = project_to_simplex(array![-5.0, -5.0, -5.0].view());
        assert_relative_eq!(w[0], 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interior_minimum() {
        let target = array![0.1, 0.6, 0.3];
        let outcome = ProjectedGradient::default().solve(&Distance(target.clone()), array![1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0].view());
        assert!(outcome.converged());
        for i in 0..3 {
            assert_relative_eq!(outcome.weights[i], target[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_linear_goes_to_vertex() {
        let outcome = ProjectedGradient::default().solve(&Linear(array![0.3, -0.2, 0.1]), array![0.25, 0.25, 0.5].view());
        assert!(outcome.converged());
        assert_relative_eq!(outcome.weights[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.weights.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_objective() {
        let outcome = ProjectedGradient::default().solve(&Nowhere, array![0.5, 0.5].view());
        assert!(matches!(outcome.status, SolveStatus::Undefined(_)));
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_iteration_limit() {
        let solver = ProjectedGradient::new(SolverConfig { max_iterations: 1, tolerance: 0.0, ftol: 0.0 });
        let outcome = solver.solve(&Distance(array![0.1, 0.6, 0.3]), array![0.9, 0.05, 0.05].view());
        assert_eq!(outcome.status, SolveStatus::MaxIterations);
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: SolverConfig = serde_json::from_str(r#"{"max_iterations": 50}"#).unwrap();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.tolerance, 1e-9);
    }
}
