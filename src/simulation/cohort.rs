//! Cohort simulation: many independent patients under one therapy.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use tracing::{debug, info, warn};

use super::patient::{simulate_path, PatientOutcome, PatientTrajectory};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parameters::{ModelParameters, ParameterSource, ParameterTable};
use crate::statistics::{counter_rng_seed, mean, SummaryStat};
use crate::types::{Therapy, NUM_STATES};

/// Cooperative cancellation flag, checked between patients.
///
/// Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Patients already running finish normally.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcomes of every patient in one simulated cohort, ordered by patient id.
#[derive(Debug, Clone)]
pub struct CohortOutcome {
    cohort_id: u64,
    therapy: Therapy,
    horizon: usize,
    patients: Vec<PatientOutcome>,
    trajectories: Vec<PatientTrajectory>,
}

impl CohortOutcome {
    /// Cohort identifier used for seeding.
    pub fn cohort_id(&self) -> u64 {
        self.cohort_id
    }

    /// Therapy the cohort was simulated under.
    pub fn therapy(&self) -> Therapy {
        self.therapy
    }

    /// Number of patients.
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// True for an empty cohort.
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Per-patient outcomes.
    pub fn patients(&self) -> &[PatientOutcome] {
        &self.patients
    }

    /// Per-patient trajectories, aligned with [`CohortOutcome::patients`].
    pub fn trajectories(&self) -> &[PatientTrajectory] {
        &self.trajectories
    }

    fn collect(&self, f: impl Fn(&PatientOutcome) -> f64) -> Vec<f64> {
        self.patients.iter().map(f).collect()
    }

    /// Survival time of each patient.
    pub fn survival_times(&self) -> Vec<f64> {
        self.collect(|p| p.survival_time)
    }

    /// Cumulative stroke count of each patient.
    pub fn stroke_counts(&self) -> Vec<f64> {
        self.collect(|p| f64::from(p.stroke_count))
    }

    /// 1.0 for patients who had at least one stroke, else 0.0.
    pub fn if_developed_stroke(&self) -> Vec<f64> {
        self.collect(|p| if p.developed_stroke { 1.0 } else { 0.0 })
    }

    /// Discounted cost of each patient.
    pub fn costs(&self) -> Vec<f64> {
        self.collect(|p| p.discounted_cost)
    }

    /// Discounted utility of each patient.
    pub fn utilities(&self) -> Vec<f64> {
        self.collect(|p| p.discounted_utility)
    }

    /// Summary of survival times.
    pub fn sum_stat_survival_times(&self, alpha: f64) -> Result<SummaryStat> {
        SummaryStat::compute("Survival time", &self.survival_times(), alpha)
    }

    /// Summary of stroke counts.
    pub fn sum_stat_count_strokes(&self, alpha: f64) -> Result<SummaryStat> {
        SummaryStat::compute("Number of strokes", &self.stroke_counts(), alpha)
    }

    /// Summary of the ever-stroked indicator (stroke incidence).
    pub fn sum_stat_developed_stroke(&self, alpha: f64) -> Result<SummaryStat> {
        SummaryStat::compute("Developed stroke", &self.if_developed_stroke(), alpha)
    }

    /// Summary of discounted costs.
    pub fn sum_stat_discounted_cost(&self, alpha: f64) -> Result<SummaryStat> {
        SummaryStat::compute("Discounted cost", &self.costs(), alpha)
    }

    /// Summary of discounted utilities.
    pub fn sum_stat_discounted_utility(&self, alpha: f64) -> Result<SummaryStat> {
        SummaryStat::compute("Discounted utility", &self.utilities(), alpha)
    }

    /// Patients alive at the start of each cycle `0..=horizon`.
    pub fn survival_curve(&self) -> Vec<usize> {
        (0..=self.horizon)
            .map(|t| {
                self.trajectories
                    .iter()
                    .filter(|traj| matches!(traj.state_at(t), Some(s) if !s.is_terminal()))
                    .count()
            })
            .collect()
    }

    /// Head-count per health state at each cycle `0..=horizon`.
    ///
    /// Patients who died earlier are counted as `Dead` in later cycles.
    pub fn state_occupancy(&self) -> Vec<[usize; NUM_STATES]> {
        let mut occupancy = vec![[0usize; NUM_STATES]; self.horizon + 1];
        for traj in &self.trajectories {
            for (t, counts) in occupancy.iter_mut().enumerate() {
                let state = traj.state_at(t).unwrap_or_else(|| traj.final_state());
                counts[state.index()] += 1;
            }
        }
        occupancy
    }

    /// Fraction of the cohort alive at the horizon.
    pub fn fraction_alive_at_horizon(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let alive = self.patients.iter().filter(|p| !p.died).count();
        alive as f64 / self.len() as f64
    }
}

/// Runs cohorts from a parameter source.
///
/// ```ignore
/// use markov_cohort::{CohortSimulator, Therapy};
///
/// let sim = CohortSimulator::new().cohort_size(1_000).base_seed(7);
/// let none = sim.simulate(0, Therapy::None)?;
/// let anticoag = sim.simulate(1, Therapy::Anticoag)?;
/// ```
#[derive(Debug, Clone)]
pub struct CohortSimulator<S = ParameterTable> {
    source: S,
    config: Config,
    cancellation: Option<CancellationToken>,
}

impl Default for CohortSimulator<ParameterTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl CohortSimulator<ParameterTable> {
    /// Simulator over the built-in stroke model with default configuration.
    pub fn new() -> Self {
        Self::with_source(ParameterTable::stroke_model())
    }
}

impl<S: ParameterSource> CohortSimulator<S> {
    /// Simulator over a custom parameter source.
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            config: Config::default(),
            cancellation: None,
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the number of patients per cohort.
    pub fn cohort_size(mut self, n: usize) -> Self {
        self.config.cohort_size = n;
        self
    }

    /// Set the base seed mixed into every patient seed.
    pub fn base_seed(mut self, seed: u64) -> Self {
        self.config.base_seed = seed;
        self
    }

    /// Attach a cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parameter source in use.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Simulate `config.cohort_size` patients.
    pub fn simulate(&self, cohort_id: u64, therapy: Therapy) -> Result<CohortOutcome> {
        self.simulate_n(cohort_id, therapy, self.config.cohort_size)
    }

    /// Simulate `n_patients` independent patients under `therapy`.
    ///
    /// Patient `i` uses seed `counter_rng_seed(counter_rng_seed(base_seed,
    /// cohort_id), i)`, so the outcome depends only on the seed, the cohort
    /// id and the patient count; never on thread scheduling.
    pub fn simulate_n(&self, cohort_id: u64, therapy: Therapy, n_patients: usize) -> Result<CohortOutcome> {
        if n_patients == 0 {
            return Err(Error::config("cohort size must be positive"));
        }
        let params = self.source.parameters(therapy)?;
        let cohort_seed = counter_rng_seed(self.config.base_seed, cohort_id);

        debug!(
            cohort_id,
            therapy = %therapy,
            n_patients,
            cohort_seed,
            "simulating cohort"
        );

        let results = match run_patients(&params, cohort_seed, n_patients, self.cancellation.as_ref()) {
            Ok(results) => results,
            Err(err) => {
                warn!(cohort_id, therapy = %therapy, error = %err, "cohort simulation aborted");
                return Err(err);
            }
        };

        let (patients, trajectories): (Vec<_>, Vec<_>) = results.into_iter().unzip();
        let outcome = CohortOutcome {
            cohort_id,
            therapy,
            horizon: params.horizon(),
            patients,
            trajectories,
        };

        info!(
            cohort_id,
            therapy = %therapy,
            n_patients,
            mean_survival = mean(&outcome.survival_times()).unwrap_or(f64::NAN),
            "cohort simulated"
        );
        Ok(outcome)
    }
}

fn run_patient(params: &ModelParameters, cohort_seed: u64, patient_id: usize) -> (PatientOutcome, PatientTrajectory) {
    let seed = counter_rng_seed(cohort_seed, patient_id as u64);
    let trajectory = simulate_path(params, seed);
    let outcome = PatientOutcome::from_trajectory(patient_id, &trajectory, params);
    (outcome, trajectory)
}

fn run_patients(
    params: &ModelParameters,
    cohort_seed: u64,
    n_patients: usize,
    cancellation: Option<&CancellationToken>,
) -> Result<Vec<(PatientOutcome, PatientTrajectory)>> {
    let completed = AtomicUsize::new(0);
    let step = |i: usize| -> Result<(PatientOutcome, PatientTrajectory)> {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled {
                completed: completed.load(Ordering::Relaxed),
            });
        }
        let result = run_patient(params, cohort_seed, i);
        completed.fetch_add(1, Ordering::Relaxed);
        Ok(result)
    };

    #[cfg(feature = "parallel")]
    {
        crate::thread_pool::install(|| (0..n_patients).into_par_iter().map(step).collect())
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..n_patients).map(step).collect()
    }
}

/// Simulate a cohort under the built-in stroke model with the default seed.
pub fn simulate_cohort(cohort_id: u64, therapy: Therapy, n_patients: usize) -> Result<CohortOutcome> {
    CohortSimulator::new().simulate_n(cohort_id, therapy, n_patients)
}
