//! Fixed-step ODE integrators for complex state vectors.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Advances `dψ/dt = f(t, ψ)` by one step.
pub trait Integrator {
    /// Nominal step size.
    fn step_size(&self) -> f64;

    /// Replace `psi` with its value at `t + dt`.
    fn step<F>(&self, field: &mut F, t: f64, dt: f64, psi: &mut [Complex64]) -> SimResult<()>
    where
        F: FnMut(f64, &[Complex64]) -> SimResult<Vec<Complex64>>;
}

/// Classical fourth-order Runge–Kutta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RungeKutta4 {
    dt: f64,
}

impl RungeKutta4 {
    /// Default step size.
    pub const DEFAULT_DT: f64 = 0.01;

    pub fn new(dt: f64) -> SimResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "step size must be positive and finite, got {dt}"
            )));
        }
        Ok(Self { dt })
    }
}

impl Default for RungeKutta4 {
    fn default() -> Self {
        Self {
            dt: Self::DEFAULT_DT,
        }
    }
}

fn axpy(y: &[Complex64], a: f64, x: &[Complex64]) -> Vec<Complex64> {
    y.iter().zip(x).map(|(y, x)| *y + a * *x).collect()
}

impl Integrator for RungeKutta4 {
    fn step_size(&self) -> f64 {
        self.dt
    }

    fn step<F>(&self, field: &mut F, t: f64, dt: f64, psi: &mut [Complex64]) -> SimResult<()>
    where
        F: FnMut(f64, &[Complex64]) -> SimResult<Vec<Complex64>>,
    {
        let half = 0.5 * dt;
        let k1 = field(t, psi)?;
        let k2 = field(t + half, &axpy(psi, half, &k1))?;
        let k3 = field(t + half, &axpy(psi, half, &k2))?;
        let k4 = field(t + dt, &axpy(psi, dt, &k3))?;

        let w = dt / 6.0;
        for (i, amp) in psi.iter_mut().enumerate() {
            *amp += w * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
            if !amp.re.is_finite() || !amp.im.is_finite() {
                return Err(SimError::NumericalFailure(format!(
                    "non-finite amplitude at t = {t:.4}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_phase_rotation() {
        // dψ/dt = −iψ has solution e^{−it}.
        let rk = RungeKutta4::new(0.01).unwrap();
        let mut psi = vec![Complex64::new(1.0, 0.0)];
        let mut field = |_t: f64, p: &[Complex64]| -> SimResult<Vec<Complex64>> {
            Ok(p.iter().map(|a| Complex64::new(0.0, -1.0) * *a).collect())
        };
        for i in 0..100 {
            rk.step(&mut field, i as f64 * 0.01, 0.01, &mut psi).unwrap();
        }
        let exact = Complex64::from_polar(1.0, -1.0);
        assert_abs_diff_eq!(psi[0].re, exact.re, epsilon = 1e-9);
        assert_abs_diff_eq!(psi[0].im, exact.im, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_is_numerical_failure() {
        let rk = RungeKutta4::default();
        let mut psi = vec![Complex64::new(1.0, 0.0)];
        let mut field = |_t: f64, p: &[Complex64]| -> SimResult<Vec<Complex64>> {
            Ok(vec![Complex64::new(f64::NAN, 0.0); p.len()])
        };
        let err = rk.step(&mut field, 0.0, 0.1, &mut psi).unwrap_err();
        assert!(matches!(err, SimError::NumericalFailure(_)));
    }

    #[test]
    fn test_rejects_zero_step() {
        assert!(RungeKutta4::new(0.0).is_err());
    }
}
