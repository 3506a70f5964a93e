//! Model enums and matrix aliases.

use std::fmt;
use std::str::FromStr;

use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Number of health states in the stroke model.
pub const NUM_STATES: usize = 4;

/// 4x4 matrix over health states (row = from, column = to).
pub type StateMatrix = SMatrix<f64, NUM_STATES, NUM_STATES>;

/// Row vector of per-state quantities (occupancy, costs, utilities).
pub type StateVector = SVector<f64, NUM_STATES>;

/// Treatment arm selecting the transition matrix and cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Therapy {
    /// No treatment.
    None,
    /// Anticoagulation.
    Anticoag,
}

impl Therapy {
    /// Both arms, in reporting order.
    pub const ALL: [Therapy; 2] = [Therapy::None, Therapy::Anticoag];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Therapy::None => "none",
            Therapy::Anticoag => "anticoag",
        }
    }
}

impl fmt::Display for Therapy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Therapy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Therapy::None),
            "anticoag" | "anticoagulation" => Ok(Therapy::Anticoag),
            other => Err(Error::config(format!("unknown therapy '{other}'"))),
        }
    }
}

/// Discrete health states. `Dead` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Alive without stroke history.
    Well,
    /// Cycle in which a stroke occurs.
    Stroke,
    /// Alive after surviving a stroke.
    PostStroke,
    /// Dead (absorbing).
    Dead,
}

impl HealthState {
    /// All states in matrix index order.
    pub const ALL: [HealthState; NUM_STATES] = [
        HealthState::Well,
        HealthState::Stroke,
        HealthState::PostStroke,
        HealthState::Dead,
    ];

    /// Row/column index in a [`StateMatrix`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`HealthState::index`].
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// True for the absorbing state.
    pub fn is_terminal(self) -> bool {
        self == HealthState::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_therapy_parse() {
        assert_eq!("None".parse::<Therapy>().unwrap(), Therapy::None);
        assert_eq!(" anticoag ".parse::<Therapy>().unwrap(), Therapy::Anticoag);
        assert!(matches!(
            "aspirin".parse::<Therapy>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_state_index_roundtrip() {
        for state in HealthState::ALL {
            assert_eq!(HealthState::from_index(state.index()), Some(state));
        }
        assert_eq!(HealthState::from_index(NUM_STATES), None);
        assert!(HealthState::Dead.is_terminal());
        assert!(!HealthState::Stroke.is_terminal());
    }
}
