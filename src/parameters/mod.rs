//! Parameter provider for the stroke model.
//!
//! A [`ParameterSource`] turns a [`Therapy`] selector into an immutable,
//! validated [`ModelParameters`] bundle. [`ParameterTable`] is the standard
//! source: it deserialises from JSON and ships with a built-in stroke /
//! anticoagulation model ([`ParameterTable::stroke_model`]).

mod matrix;
mod table;

pub use matrix::{RawMatrix, TransitionMatrix, ROW_SUM_TOLERANCE};
pub use table::{ParameterTable, TherapyParameters, ANTICOAG_STROKE_RELATIVE_RISK};

use crate::error::{Error, Result};
use crate::types::{HealthState, StateVector, Therapy, NUM_STATES};

/// Anything that can supply validated parameters for a therapy.
pub trait ParameterSource {
    /// Parameters for one arm. Fails with `Error::Configuration` when the
    /// therapy is missing or its values are malformed.
    fn parameters(&self, therapy: Therapy) -> Result<ModelParameters>;
}

/// Validated, immutable inputs for simulating one therapy arm.
#[derive(Debug, Clone)]
pub struct ModelParameters {
    therapy: Therapy,
    transitions: TransitionMatrix,
    state_costs: StateVector,
    state_utilities: StateVector,
    discount_rate: f64,
    cycle_length: f64,
    horizon: usize,
    initial_distribution: StateVector,
}

/// Unvalidated inputs to [`ModelParameters::new`].
#[derive(Debug, Clone)]
pub struct ParameterInputs {
    /// Arm these parameters describe.
    pub therapy: Therapy,
    /// Per-cycle transition probabilities.
    pub transitions: TransitionMatrix,
    /// Annual cost of occupying each state, therapy cost included.
    pub state_costs: [f64; NUM_STATES],
    /// Annual utility of occupying each state.
    pub state_utilities: [f64; NUM_STATES],
    /// Annual discount rate.
    pub discount_rate: f64,
    /// Cycle length in years.
    pub cycle_length: f64,
    /// Maximum number of cycles simulated.
    pub horizon: usize,
    /// Probability of starting in each state.
    pub initial_distribution: [f64; NUM_STATES],
}

impl ModelParameters {
    /// Validate inputs into a parameter bundle.
    pub fn new(inputs: ParameterInputs) -> Result<Self> {
        if !inputs.discount_rate.is_finite() || inputs.discount_rate < 0.0 {
            return Err(Error::config(format!(
                "discount rate {} must be a non-negative number",
                inputs.discount_rate
            )));
        }
        if !inputs.cycle_length.is_finite() || inputs.cycle_length <= 0.0 {
            return Err(Error::config(format!(
                "cycle length {} must be positive",
                inputs.cycle_length
            )));
        }
        if inputs.horizon == 0 {
            return Err(Error::config("horizon must be at least one cycle"));
        }
        if inputs
            .state_costs
            .iter()
            .chain(inputs.state_utilities.iter())
            .any(|v| !v.is_finite())
        {
            return Err(Error::config("state costs and utilities must be finite"));
        }

        let init = &inputs.initial_distribution;
        let total: f64 = init.iter().sum();
        if init.iter().any(|&p| !p.is_finite() || p < 0.0) || (total - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(Error::config(format!(
                "initial distribution {:?} is not a probability vector",
                init
            )));
        }

        Ok(Self {
            therapy: inputs.therapy,
            transitions: inputs.transitions,
            state_costs: StateVector::from(inputs.state_costs),
            state_utilities: StateVector::from(inputs.state_utilities),
            discount_rate: inputs.discount_rate,
            cycle_length: inputs.cycle_length,
            horizon: inputs.horizon,
            initial_distribution: StateVector::from(inputs.initial_distribution),
        })
    }

    /// Arm these parameters belong to.
    pub fn therapy(&self) -> Therapy {
        self.therapy
    }

    /// Transition matrix for this arm.
    pub fn transitions(&self) -> &TransitionMatrix {
        &self.transitions
    }

    /// Annual cost of occupying `state`.
    pub fn state_cost(&self, state: HealthState) -> f64 {
        self.state_costs[state.index()]
    }

    /// Annual utility of occupying `state`.
    pub fn state_utility(&self, state: HealthState) -> f64 {
        self.state_utilities[state.index()]
    }

    /// Per-state annual costs as a vector.
    pub fn state_costs(&self) -> &StateVector {
        &self.state_costs
    }

    /// Per-state annual utilities as a vector.
    pub fn state_utilities(&self) -> &StateVector {
        &self.state_utilities
    }

    /// Annual discount rate.
    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    /// Cycle length in years.
    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Maximum number of cycles.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Starting-state probabilities.
    pub fn initial_distribution(&self) -> &StateVector {
        &self.initial_distribution
    }

    /// The starting state when the initial distribution is a point mass.
    pub fn deterministic_initial_state(&self) -> Option<HealthState> {
        HealthState::ALL
            .iter()
            .copied()
            .find(|s| (self.initial_distribution[s.index()] - 1.0).abs() <= ROW_SUM_TOLERANCE)
    }

    /// Present-value multiplier for cycle `t`: `1 / (1 + r)^(t * cycle_length)`.
    pub fn discount_factor(&self, cycle: usize) -> f64 {
        1.0 / (1.0 + self.discount_rate).powf(cycle as f64 * self.cycle_length)
    }
}
