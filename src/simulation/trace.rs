//! Deterministic cohort trace: expected state occupancy per cycle.
//!
//! Propagates the state distribution `p_{t+1} = p_t P` with nalgebra and
//! accrues expected outcomes under the same conventions as the stochastic
//! simulator. Large simulated cohorts converge to these values.

use serde::{Deserialize, Serialize};

use crate::parameters::ModelParameters;
use crate::types::{HealthState, StateVector, NUM_STATES};

/// Expected per-patient outcomes from the Markov trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedTrace {
    /// State distribution at each cycle `0..=horizon`.
    pub occupancy: Vec<[f64; NUM_STATES]>,
    /// Expected survival time in years.
    pub survival_time: f64,
    /// Expected number of strokes.
    pub stroke_count: f64,
    /// Expected discounted cost.
    pub discounted_cost: f64,
    /// Expected discounted utility.
    pub discounted_utility: f64,
}

/// Compute the expected trace for one arm.
pub fn expected_trace(params: &ModelParameters) -> ExpectedTrace {
    let transpose = params.transitions().as_matrix().transpose();
    let stroke = HealthState::Stroke.index();
    let dead = HealthState::Dead.index();
    let cycle_length = params.cycle_length();

    // Dead contributes nothing, whatever its tabulated cost or utility.
    let mut alive_mask = StateVector::repeat(1.0);
    alive_mask[dead] = 0.0;
    let costs = params.state_costs().component_mul(&alive_mask);
    let utilities = params.state_utilities().component_mul(&alive_mask);
    let into_stroke = params.transitions().as_matrix().column(stroke).into_owned();

    let mut p: StateVector = *params.initial_distribution();
    let mut occupancy = Vec::with_capacity(params.horizon() + 1);
    let mut survival_time = 0.0;
    let mut stroke_count = 0.0;
    let mut discounted_cost = 0.0;
    let mut discounted_utility = 0.0;

    for cycle in 0..params.horizon() {
        occupancy.push(to_array(&p));
        let df = params.discount_factor(cycle);
        survival_time += p.dot(&alive_mask) * cycle_length;
        discounted_cost += p.dot(&costs) * cycle_length * df;
        discounted_utility += p.dot(&utilities) * cycle_length * df;
        stroke_count += p.dot(&into_stroke);
        p = transpose * p;
    }
    occupancy.push(to_array(&p));

    ExpectedTrace {
        occupancy,
        survival_time,
        stroke_count,
        discounted_cost,
        discounted_utility,
    }
}

fn to_array(v: &StateVector) -> [f64; NUM_STATES] {
    let mut out = [0.0; NUM_STATES];
    out.copy_from_slice(v.as_slice());
    out
}
