//! Derivative-free minimisation under box constraints.
//!
//! [`BoundedSimplex`] is a Nelder–Mead simplex whose reflection steps are
//! capped by a trust-region radius `rho`. The radius shrinks from `rhobeg`
//! to `rhoend` as the simplex collapses, and every trial point is projected
//! back onto the box.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of simplex iterations.
    pub num_iterations: usize,
    /// Best objective value after each improvement.
    pub history: Vec<f64>,
    /// Whether the optimization converged before the iteration cap.
    pub converged: bool,
}

/// A minimiser over a box `bounds[i].0 ≤ xᵢ ≤ bounds[i].1`.
pub trait Optimizer {
    fn minimize<F>(
        &self,
        objective: F,
        initial: Vec<f64>,
        bounds: &[(f64, f64)],
    ) -> SimResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> SimResult<f64>;
}

/// Bounded simplex optimizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedSimplex {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Convergence tolerance on the spread of simplex values.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for BoundedSimplex {
    fn default() -> Self {
        Self {
            maxiter: 200,
            tol: 1e-6,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl BoundedSimplex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set trust region parameters.
    pub fn with_trust_region(mut self, rhobeg: f64, rhoend: f64) -> Self {
        self.rhobeg = rhobeg;
        self.rhoend = rhoend;
        self
    }

    fn validate(&self, dim: usize, bounds: &[(f64, f64)]) -> SimResult<()> {
        if bounds.len() != dim {
            return Err(SimError::DimensionMismatch {
                expected: dim,
                actual: bounds.len(),
            });
        }
        if let Some((lo, hi)) = bounds
            .iter()
            .find(|(lo, hi)| !lo.is_finite() || !hi.is_finite() || lo > hi)
        {
            return Err(SimError::InvalidArgument(format!(
                "invalid bound [{lo}, {hi}]"
            )));
        }
        if !(self.rhobeg > 0.0 && self.rhoend > 0.0 && self.rhoend <= self.rhobeg) {
            return Err(SimError::InvalidArgument(format!(
                "trust region must satisfy 0 < rhoend ≤ rhobeg, got {} and {}",
                self.rhoend, self.rhobeg
            )));
        }
        Ok(())
    }
}

fn project(x: &mut [f64], bounds: &[(f64, f64)]) {
    for (v, (lo, hi)) in x.iter_mut().zip(bounds) {
        *v = v.clamp(*lo, *hi);
    }
}

/// `base` moved by `rho` along axis `i`, stepping backwards at the upper bound.
fn axis_vertex(base: &[f64], i: usize, rho: f64, bounds: &[(f64, f64)]) -> Vec<f64> {
    let mut point = base.to_vec();
    let (lo, hi) = bounds[i];
    point[i] = if base[i] + rho <= hi {
        base[i] + rho
    } else {
        (base[i] - rho).max(lo)
    };
    point
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i)
}

impl Optimizer for BoundedSimplex {
    fn minimize<F>(
        &self,
        mut objective: F,
        initial: Vec<f64>,
        bounds: &[(f64, f64)],
    ) -> SimResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> SimResult<f64>,
    {
        let n = initial.len();
        self.validate(n, bounds)?;

        let mut num_evaluations = 0;
        let mut eval = |x: &[f64]| -> SimResult<f64> {
            num_evaluations += 1;
            let f = objective(x)?;
            if !f.is_finite() {
                return Err(SimError::NumericalFailure(format!(
                    "objective returned {f} at {x:?}"
                )));
            }
            Ok(f)
        };

        let mut x = initial;
        project(&mut x, bounds);
        let mut f_x = eval(&x)?;
        let mut history = vec![f_x];

        // Initialize simplex
        let mut simplex: Vec<Vec<f64>> = vec![x.clone()];
        let mut f_simplex: Vec<f64> = vec![f_x];
        for i in 0..n {
            let point = axis_vertex(&x, i, self.rhobeg, bounds);
            f_simplex.push(eval(&point)?);
            simplex.push(point);
        }

        let mut rho = self.rhobeg;
        let mut converged = n == 0;
        let mut num_iterations = 0;

        while !converged && num_iterations < self.maxiter {
            num_iterations += 1;

            let mut indices: Vec<usize> = (0..=n).collect();
            indices.sort_by(|&a, &b| f_simplex[a].total_cmp(&f_simplex[b]));
            let best_idx = indices[0];
            let worst_idx = indices[n];

            let spread = f_simplex[worst_idx] - f_simplex[best_idx];
            if spread < self.tol && rho <= self.rhoend {
                converged = true;
                break;
            }

            if spread < self.tol {
                rho = (rho * 0.5).max(self.rhoend);

                // Rebuild around the best point at the smaller radius
                let best = simplex[best_idx].clone();
                let f_best = f_simplex[best_idx];
                simplex = vec![best.clone()];
                f_simplex = vec![f_best];
                for i in 0..n {
                    let point = axis_vertex(&best, i, rho, bounds);
                    f_simplex.push(eval(&point)?);
                    simplex.push(point);
                }
                continue;
            }

            // Centroid of all points except the worst
            let mut centroid = vec![0.0; n];
            for &idx in &indices[..n] {
                for (c, v) in centroid.iter_mut().zip(&simplex[idx]) {
                    *c += v;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            // Reflection, capped at the trust radius
            let mut reflected: Vec<f64> = centroid
                .iter()
                .zip(&simplex[worst_idx])
                .map(|(c, w)| {
                    let diff = c - w;
                    c + diff.clamp(-rho, rho)
                })
                .collect();
            project(&mut reflected, bounds);
            let f_reflected = eval(&reflected)?;

            if f_reflected < f_simplex[best_idx] {
                let mut expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                project(&mut expanded, bounds);
                let f_expanded = eval(&expanded)?;

                if f_expanded < f_reflected {
                    simplex[worst_idx] = expanded;
                    f_simplex[worst_idx] = f_expanded;
                } else {
                    simplex[worst_idx] = reflected;
                    f_simplex[worst_idx] = f_reflected;
                }
            } else if f_reflected < f_simplex[indices[n - 1]] {
                simplex[worst_idx] = reflected;
                f_simplex[worst_idx] = f_reflected;
            } else {
                let contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&simplex[worst_idx])
                    .map(|(c, w)| 0.5 * (c + w))
                    .collect();
                let f_contracted = eval(&contracted)?;

                if f_contracted < f_simplex[worst_idx] {
                    simplex[worst_idx] = contracted;
                    f_simplex[worst_idx] = f_contracted;
                } else {
                    // Shrink toward the best vertex
                    let best = simplex[best_idx].clone();
                    for i in 0..=n {
                        if i != best_idx {
                            for (v, b) in simplex[i].iter_mut().zip(&best) {
                                *v = 0.5 * (b + *v);
                            }
                            f_simplex[i] = eval(&simplex[i])?;
                        }
                    }
                }
            }

            let min_idx = argmin(&f_simplex);
            if f_simplex[min_idx] < f_x {
                f_x = f_simplex[min_idx];
                history.push(f_x);
            }
        }

        let min_idx = argmin(&f_simplex);
        if f_simplex[min_idx] < f_x {
            history.push(f_simplex[min_idx]);
        }
        debug!(
            value = f_simplex[min_idx],
            evaluations = num_evaluations,
            iterations = num_iterations,
            converged,
            "bounded simplex finished"
        );
        Ok(OptimizationResult {
            optimal_params: simplex[min_idx].clone(),
            optimal_value: f_simplex[min_idx],
            num_evaluations,
            num_iterations,
            history,
            converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_box(n: usize) -> Vec<(f64, f64)> {
        vec![(-10.0, 10.0); n]
    }

    #[test]
    fn test_simplex_quadratic() {
        let result = BoundedSimplex::new()
            .minimize(
                |p| Ok((p[0] - 1.0).powi(2) + (p[1] - 2.0).powi(2)),
                vec![0.0, 0.0],
                &open_box(2),
            )
            .unwrap();

        assert!(result.optimal_value < 0.01);
        assert!((result.optimal_params[0] - 1.0).abs() < 0.1);
        assert!((result.optimal_params[1] - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_simplex_rosenbrock_improves() {
        let result = BoundedSimplex::new()
            .with_maxiter(500)
            .minimize(
                |p| Ok((1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0].powi(2)).powi(2)),
                vec![0.0, 0.0],
                &open_box(2),
            )
            .unwrap();
        assert!(result.optimal_value < 1.0);
    }

    #[test]
    fn test_minimum_outside_box_lands_on_boundary() {
        let result = BoundedSimplex::new()
            .minimize(|p| Ok((p[0] - 3.0).powi(2)), vec![0.5], &[(0.0, 1.0)])
            .unwrap();
        assert!(result.optimal_params[0] <= 1.0);
        assert!((result.optimal_params[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_history_is_non_increasing() {
        let result = BoundedSimplex::new()
            .minimize(|p| Ok(p[0].abs() + p[1].abs()), vec![3.0, -2.0], &open_box(2))
            .unwrap();
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*result.history.last().unwrap(), result.optimal_value);
    }

    #[test]
    fn test_bounds_length_mismatch() {
        let err = BoundedSimplex::new()
            .minimize(|_| Ok(0.0), vec![0.0, 0.0], &open_box(1))
            .unwrap_err();
        assert!(matches!(err, SimError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_non_finite_objective_is_error() {
        let err = BoundedSimplex::new()
            .minimize(|_| Ok(f64::NAN), vec![0.0], &open_box(1))
            .unwrap_err();
        assert!(matches!(err, SimError::NumericalFailure(_)));
    }
}
