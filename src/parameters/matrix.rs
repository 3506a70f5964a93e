//! Row-stochastic transition matrix over health states.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{HealthState, StateMatrix, NUM_STATES};

/// Tolerance for row sums and probability bounds.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Raw row-major matrix as it appears in a parameter table.
pub type RawMatrix = [[f64; NUM_STATES]; NUM_STATES];

/// Validated per-cycle transition probabilities.
///
/// Invariants: every entry lies in [0, 1], every row sums to 1 within
/// [`ROW_SUM_TOLERANCE`], and the `Dead` row is the identity row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix", into = "RawMatrix")]
pub struct TransitionMatrix {
    probs: StateMatrix,
}

impl TransitionMatrix {
    /// Validate and wrap a row-major probability table.
    pub fn new(rows: RawMatrix) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            let from = HealthState::ALL[i];
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() || p < -ROW_SUM_TOLERANCE || p > 1.0 + ROW_SUM_TOLERANCE {
                    return Err(Error::config(format!(
                        "transition {:?} -> {:?} has probability {} outside [0, 1]",
                        from,
                        HealthState::ALL[j],
                        p
                    )));
                }
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(Error::config(format!(
                    "row {:?} sums to {} instead of 1",
                    from, sum
                )));
            }
        }

        let dead = HealthState::Dead.index();
        if (rows[dead][dead] - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(Error::config("Dead must be absorbing"));
        }

        let probs = StateMatrix::from_fn(|i, j| rows[i][j].clamp(0.0, 1.0));
        Ok(Self { probs })
    }

    /// Probability of moving from `from` to `to` in one cycle.
    pub fn probability(&self, from: HealthState, to: HealthState) -> f64 {
        self.probs[(from.index(), to.index())]
    }

    /// Distribution over next states given the current state.
    pub fn row(&self, from: HealthState) -> [f64; NUM_STATES] {
        let mut out = [0.0; NUM_STATES];
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = self.probs[(from.index(), j)];
        }
        out
    }

    /// Sum of one row; 1 within tolerance by construction.
    pub fn row_sum(&self, from: HealthState) -> f64 {
        self.row(from).iter().sum()
    }

    /// Underlying nalgebra matrix.
    pub fn as_matrix(&self) -> &StateMatrix {
        &self.probs
    }

    /// Draw the next state by inverse-CDF sampling on the current row.
    pub fn sample_next<R: Rng + ?Sized>(&self, rng: &mut R, current: HealthState) -> HealthState {
        let row = self.row(current);
        let u: f64 = rng.random();
        let mut cumulative = 0.0;
        let mut last_positive = current;
        for (j, &p) in row.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            let state = HealthState::ALL[j];
            cumulative += p;
            last_positive = state;
            if u < cumulative {
                return state;
            }
        }
        // Rounding left a sliver above the cumulative sum.
        last_positive
    }

    /// Scale every transition into `target` by `relative_risk`, returning the
    /// removed mass to the diagonal.
    pub fn with_relative_risk(&self, target: HealthState, relative_risk: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&relative_risk) {
            return Err(Error::config(format!(
                "relative risk {} must lie in [0, 1]",
                relative_risk
            )));
        }
        Self::new(scale_transitions_into(
            &RawMatrix::from(self.clone()),
            target,
            relative_risk,
        ))
    }
}

/// Scale transitions into `target` from every live state other than
/// `target`, moving the removed mass onto the diagonal.
pub(crate) fn scale_transitions_into(rows: &RawMatrix, target: HealthState, relative_risk: f64) -> RawMatrix {
    let t = target.index();
    let mut rows = *rows;
    for (i, row) in rows.iter_mut().enumerate() {
        if i == t || HealthState::ALL[i].is_terminal() {
            continue;
        }
        let before = row[t];
        let after = before * relative_risk;
        row[t] = after;
        row[i] += before - after;
    }
    rows
}

impl TryFrom<RawMatrix> for TransitionMatrix {
    type Error = Error;

    fn try_from(rows: RawMatrix) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<TransitionMatrix> for RawMatrix {
    fn from(m: TransitionMatrix) -> Self {
        let mut rows = [[0.0; NUM_STATES]; NUM_STATES];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, p) in row.iter_mut().enumerate() {
                *p = m.probs[(i, j)];
            }
        }
        rows
    }
}
