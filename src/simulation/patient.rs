//! Single-patient Markov path simulation.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::parameters::ModelParameters;
use crate::types::HealthState;

/// One patient's state sequence, starting at cycle 0.
///
/// The last entry is either `Dead` or sits at the horizon. Entries are
/// immutable once the simulation that produced them returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientTrajectory {
    states: Vec<(usize, HealthState)>,
}

impl PatientTrajectory {
    /// `(cycle, state)` pairs in cycle order.
    pub fn states(&self) -> &[(usize, HealthState)] {
        &self.states
    }

    /// State at the last recorded cycle.
    pub fn final_state(&self) -> HealthState {
        self.states.last().map(|&(_, s)| s).unwrap_or(HealthState::Dead)
    }

    /// Number of recorded cycles.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State occupied at `cycle`, if the trajectory reaches it.
    pub fn state_at(&self, cycle: usize) -> Option<HealthState> {
        self.states.get(cycle).map(|&(_, s)| s)
    }
}

/// Outcomes accrued along one patient's trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientOutcome {
    /// Position of the patient within its cohort.
    pub patient_id: usize,
    /// Years alive before death or the horizon.
    pub survival_time: f64,
    /// Whether the patient died before the horizon.
    pub died: bool,
    /// Cycles after the first spent in `Stroke`, each counted as a stroke event.
    pub stroke_count: u32,
    /// True if at least one stroke occurred.
    pub developed_stroke: bool,
    /// Present value of costs.
    pub discounted_cost: f64,
    /// Present value of utilities (QALYs).
    pub discounted_utility: f64,
}

impl PatientOutcome {
    /// Accrue outcomes along a finished trajectory.
    ///
    /// Each alive cycle `t` before the horizon contributes the occupied
    /// state's annual cost and utility, scaled by cycle length and
    /// discounted by `df(t)`. Every cycle after the first that lands in
    /// `Stroke` counts one stroke, so a patient starting in `Stroke` does not
    /// count it and a `Stroke` self-loop counts once per cycle.
    pub fn from_trajectory(
        patient_id: usize,
        trajectory: &PatientTrajectory,
        params: &ModelParameters,
    ) -> Self {
        let horizon = params.horizon();
        let cycle_length = params.cycle_length();

        let mut alive_cycles = 0usize;
        let mut stroke_count = 0u32;
        let mut discounted_cost = 0.0;
        let mut discounted_utility = 0.0;

        for &(cycle, state) in trajectory.states() {
            if cycle > 0 && state == HealthState::Stroke {
                stroke_count += 1;
            }
            if state.is_terminal() || cycle >= horizon {
                continue;
            }
            let df = params.discount_factor(cycle);
            discounted_cost += params.state_cost(state) * cycle_length * df;
            discounted_utility += params.state_utility(state) * cycle_length * df;
            alive_cycles += 1;
        }

        Self {
            patient_id,
            survival_time: alive_cycles as f64 * cycle_length,
            died: trajectory.final_state().is_terminal(),
            stroke_count,
            developed_stroke: stroke_count > 0,
            discounted_cost,
            discounted_utility,
        }
    }
}

/// Simulate one patient's state trajectory.
///
/// The patient owns a private `Xoshiro256PlusPlus` stream seeded from
/// `seed`, so the same seed always yields the same path. The initial state
/// is drawn from the initial distribution unless it is a point mass.
pub fn simulate_path(params: &ModelParameters, seed: u64) -> PatientTrajectory {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut state = match params.deterministic_initial_state() {
        Some(state) => state,
        None => draw_initial_state(params, &mut rng),
    };

    let horizon = params.horizon();
    let mut states = Vec::with_capacity(horizon.min(128) + 1);
    states.push((0, state));

    let mut cycle = 0;
    while !state.is_terminal() && cycle < horizon {
        state = params.transitions().sample_next(&mut rng, state);
        cycle += 1;
        states.push((cycle, state));
    }

    PatientTrajectory { states }
}

/// Simulate one patient and accrue its outcomes.
pub fn simulate_patient(params: &ModelParameters, seed: u64) -> PatientOutcome {
    let trajectory = simulate_path(params, seed);
    PatientOutcome::from_trajectory(0, &trajectory, params)
}

fn draw_initial_state(params: &ModelParameters, rng: &mut Xoshiro256PlusPlus) -> HealthState {
    use rand::Rng;

    let u: f64 = rng.random();
    let init = params.initial_distribution();
    let mut cumulative = 0.0;
    let mut last_positive = HealthState::Well;
    for state in HealthState::ALL {
        let p = init[state.index()];
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = state;
        if u < cumulative {
            return state;
        }
    }
    last_positive
}
