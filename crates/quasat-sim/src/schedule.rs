//! Interpolation schedules s: [0, T] → [0, 1] for adiabatic evolution.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A monotone schedule with s(0) = 0 and s(T) = 1.
pub trait Schedule {
    /// Total evolution time T.
    fn duration(&self) -> f64;

    /// Interpolation parameter at time `t`, clamped to [0, 1].
    fn s(&self, t: f64) -> f64;
}

impl<S: Schedule + ?Sized> Schedule for &S {
    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn s(&self, t: f64) -> f64 {
        (**self).s(t)
    }
}

fn check_positive(name: &str, value: f64) -> SimResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimError::InvalidArgument(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(())
}

/// s(t) = min(1, αt), T = 1/α.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRamp {
    rate: f64,
}

impl LinearRamp {
    pub fn new(rate: f64) -> SimResult<Self> {
        check_positive("ramp rate", rate)?;
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Schedule for LinearRamp {
    fn duration(&self) -> f64 {
        1.0 / self.rate
    }

    fn s(&self, t: f64) -> f64 {
        (self.rate * t).clamp(0.0, 1.0)
    }
}

/// Cubic smoothstep s = 3u² − 2u³ with u = t/T; ṡ vanishes at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothRamp {
    duration: f64,
}

impl SmoothRamp {
    pub fn new(duration: f64) -> SimResult<Self> {
        check_positive("ramp duration", duration)?;
        Ok(Self { duration })
    }
}

impl Schedule for SmoothRamp {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn s(&self, t: f64) -> f64 {
        let u = (t / self.duration).clamp(0.0, 1.0);
        u * u * (3.0 - 2.0 * u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        let r = LinearRamp::new(0.25).unwrap();
        assert_eq!(r.duration(), 4.0);
        assert_eq!(r.s(0.0), 0.0);
        assert_eq!(r.s(2.0), 0.5);
        assert_eq!(r.s(4.0), 1.0);
        assert_eq!(r.s(10.0), 1.0);
    }

    #[test]
    fn test_smooth_is_monotone() {
        let r = SmoothRamp::new(3.0).unwrap();
        assert_eq!(r.s(0.0), 0.0);
        assert_eq!(r.s(3.0), 1.0);
        let mut prev = 0.0;
        for i in 0..=30 {
            let s = r.s(i as f64 * 0.1);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LinearRamp::new(0.0).is_err());
        assert!(LinearRamp::new(f64::NAN).is_err());
        assert!(SmoothRamp::new(-1.0).is_err());
    }
}
