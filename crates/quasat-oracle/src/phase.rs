//! Empirical satisfiability phase transition.
//!
//! For each clause density d the sampler draws `samples` random k-SAT
//! instances with m = ⌊n·d⌋ clauses, asks an oracle about each, and records
//! the satisfiable fraction. Plotted against d this approximates the
//! satisfiability threshold curve, which for k = 3 drops steeply near
//! d ≈ 4.27.
//!
//! Unknown verdicts are tallied on their own and left out of the fraction's
//! denominator: `fraction = sat / (sat + unsat)`.

use quasat_cnf::generator::{DEFAULT_CLAUSE_WIDTH, MAX_CLAUSES, random_instance};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OracleError, OracleResult};
use crate::oracle::SatOracle;
use crate::verdict::SatVerdict;

/// Critical clause density of random 3-SAT.
pub const CRITICAL_DENSITY_3SAT: f64 = 4.27;

/// Most densities a single run may sweep.
pub const MAX_DENSITIES: usize = 10_000;

/// Parameters of a phase-transition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Variable count n.
    pub num_variables: usize,
    /// Instances drawn per density.
    pub samples: usize,
    /// Strictly ascending clause densities.
    pub densities: Vec<f64>,
    /// Literals per clause k.
    pub clause_width: usize,
    /// RNG seed.
    pub seed: u64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            num_variables: 20,
            samples: 100,
            densities: density_range(1.0, 8.0, 0.5),
            clause_width: DEFAULT_CLAUSE_WIDTH,
            seed: 42,
        }
    }
}

impl PhaseConfig {
    /// Check every parameter before any sampling happens.
    pub fn validate(&self) -> OracleResult<()> {
        if self.samples == 0 {
            return Err(invalid("sample count must be at least 1"));
        }
        if self.densities.is_empty() {
            return Err(invalid("at least one density is required"));
        }
        if self.densities.len() > MAX_DENSITIES {
            return Err(invalid(format!(
                "{} densities exceed the limit of {MAX_DENSITIES}",
                self.densities.len()
            )));
        }
        if let Some(d) = self.densities.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(invalid(format!("density {d} must be finite and non-negative")));
        }
        if self.densities.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("densities must be strictly ascending"));
        }
        if let Some(d) = self
            .densities
            .iter()
            .find(|d| self.num_variables as f64 * **d > MAX_CLAUSES as f64)
        {
            return Err(invalid(format!(
                "density {d} yields more than {MAX_CLAUSES} clauses for {} variables",
                self.num_variables
            )));
        }
        if let Some(d) = self.densities.iter().find(|d| self.num_clauses(**d) == 0) {
            return Err(invalid(format!(
                "density {d} yields zero clauses for {} variables",
                self.num_variables
            )));
        }
        if self.clause_width == 0 || self.clause_width > self.num_variables {
            return Err(invalid(format!(
                "clause width {} must lie in 1..={}",
                self.clause_width, self.num_variables
            )));
        }
        Ok(())
    }

    /// m = ⌊n·d⌋.
    pub fn num_clauses(&self, density: f64) -> usize {
        (self.num_variables as f64 * density).floor() as usize
    }
}

/// `start, start+step, …` up to and including `end` (within rounding).
///
/// At most `MAX_DENSITIES + 1` points are produced, so an oversized sweep
/// still fails [`PhaseConfig::validate`].
pub fn density_range(start: f64, end: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || end < start {
        return Vec::new();
    }
    let count = ((end - start) / step + 1e-9)
        .floor()
        .min(MAX_DENSITIES as f64) as usize
        + 1;
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Tallies at one density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePoint {
    /// Clause density d.
    pub density: f64,
    /// Clause count m = ⌊n·d⌋.
    pub num_clauses: usize,
    /// Instances judged satisfiable.
    pub satisfiable: usize,
    /// Instances judged unsatisfiable.
    pub unsatisfiable: usize,
    /// Instances the oracle could not decide.
    pub unknown: usize,
    /// sat / (sat + unsat), 0 when nothing was decided.
    pub satisfiable_fraction: f64,
}

impl PhasePoint {
    fn from_counts(
        density: f64,
        num_clauses: usize,
        sat: usize,
        unsat: usize,
        unknown: usize,
    ) -> Self {
        let decided = sat + unsat;
        let satisfiable_fraction = if decided == 0 {
            0.0
        } else {
            sat as f64 / decided as f64
        };
        Self {
            density,
            num_clauses,
            satisfiable: sat,
            unsatisfiable: unsat,
            unknown,
            satisfiable_fraction,
        }
    }

    /// Instances with a definite verdict.
    pub fn decided(&self) -> usize {
        self.satisfiable + self.unsatisfiable
    }
}

/// The sampled curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseCurve {
    /// Variable count n.
    pub num_variables: usize,
    /// Instances drawn per density.
    pub samples: usize,
    /// Literals per clause k.
    pub clause_width: usize,
    /// Name of the oracle that produced the verdicts.
    pub oracle: String,
    /// One point per density, ascending.
    pub points: Vec<PhasePoint>,
}

impl PhaseCurve {
    /// (density, satisfiable fraction) pairs for plotting.
    pub fn series(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.density, p.satisfiable_fraction))
            .collect()
    }

    /// Total unknown verdicts across all densities.
    pub fn total_unknown(&self) -> usize {
        self.points.iter().map(|p| p.unknown).sum()
    }

    /// Density where the fraction first crosses ½, linearly interpolated.
    pub fn crossover_density(&self) -> Option<f64> {
        self.points.windows(2).find_map(|w| {
            let (a, b) = (&w[0], &w[1]);
            let (fa, fb) = (a.satisfiable_fraction, b.satisfiable_fraction);
            if fa >= 0.5 && fb < 0.5 {
                let t = (fa - 0.5) / (fa - fb);
                Some(a.density + t * (b.density - a.density))
            } else {
                None
            }
        })
    }

    /// True if no fraction rises by more than `tolerance` over its predecessor.
    pub fn is_non_increasing(&self, tolerance: f64) -> bool {
        self.points
            .windows(2)
            .all(|w| w[1].satisfiable_fraction <= w[0].satisfiable_fraction + tolerance)
    }
}

/// Drives an oracle across a density sweep.
pub struct PhaseTransitionSampler<O> {
    oracle: O,
    config: PhaseConfig,
}

impl<O: SatOracle> PhaseTransitionSampler<O> {
    /// Create a sampler.
    pub fn new(oracle: O, config: PhaseConfig) -> Self {
        Self { oracle, config }
    }

    /// The run parameters.
    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    /// Total oracle queries a full run makes.
    pub fn total_samples(&self) -> usize {
        self.config.samples * self.config.densities.len()
    }

    /// Run the sweep.
    pub fn run(&self) -> OracleResult<PhaseCurve> {
        self.run_with_progress(|| {})
    }

    /// Run the sweep, calling `on_sample` after every oracle query.
    pub fn run_with_progress(&self, mut on_sample: impl FnMut()) -> OracleResult<PhaseCurve> {
        self.config.validate()?;
        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        info!(
            num_variables = cfg.num_variables,
            samples = cfg.samples,
            densities = cfg.densities.len(),
            oracle = self.oracle.name(),
            "sampling satisfiability phase transition"
        );

        let mut points = Vec::with_capacity(cfg.densities.len());
        for &density in &cfg.densities {
            let m = cfg.num_clauses(density);
            let (mut sat, mut unsat, mut unknown) = (0, 0, 0);
            for _ in 0..cfg.samples {
                let instance = random_instance(&mut rng, cfg.num_variables, m, cfg.clause_width)?;
                match self.oracle.solve(&instance)? {
                    SatVerdict::Satisfiable(_) => sat += 1,
                    SatVerdict::Unsatisfiable => unsat += 1,
                    SatVerdict::Unknown => unknown += 1,
                }
                on_sample();
            }
            let point = PhasePoint::from_counts(density, m, sat, unsat, unknown);
            debug!(
                density,
                num_clauses = m,
                sat,
                unsat,
                unknown,
                fraction = point.satisfiable_fraction,
                "density sampled"
            );
            points.push(point);
        }

        Ok(PhaseCurve {
            num_variables: cfg.num_variables,
            samples: cfg.samples,
            clause_width: cfg.clause_width,
            oracle: self.oracle.name().to_string(),
            points,
        })
    }
}

fn invalid(message: impl Into<String>) -> OracleError {
    OracleError::InvalidArgument(message.into())
}
