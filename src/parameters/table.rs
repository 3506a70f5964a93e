//! Serialisable parameter table and the built-in stroke model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::matrix::{scale_transitions_into, RawMatrix, TransitionMatrix};
use super::{ModelParameters, ParameterInputs, ParameterSource};
use crate::error::{Error, Result};
use crate::types::{HealthState, Therapy, NUM_STATES};

/// Relative risk of stroke under anticoagulation in the built-in model.
pub const ANTICOAG_STROKE_RELATIVE_RISK: f64 = 0.65;

/// Per-therapy entries of a [`ParameterTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapyParameters {
    /// Row-major per-cycle transition probabilities.
    pub transition_matrix: RawMatrix,
    /// Annual treatment cost charged in every alive cycle.
    #[serde(default)]
    pub annual_cost: f64,
}

/// Parameter table covering every therapy arm.
///
/// Therapies are keyed by name so that a table naming an unknown therapy is
/// rejected with a configuration error rather than silently ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    /// Annual discount rate applied to costs and utilities.
    pub discount_rate: f64,
    /// Cycle length in years.
    #[serde(default = "default_cycle_length")]
    pub cycle_length: f64,
    /// Maximum number of cycles per patient.
    pub horizon: usize,
    /// Probability of starting in each state.
    #[serde(default = "default_initial_distribution")]
    pub initial_distribution: [f64; NUM_STATES],
    /// Annual cost of occupying each state.
    pub state_costs: [f64; NUM_STATES],
    /// Annual utility of occupying each state.
    pub state_utilities: [f64; NUM_STATES],
    /// Arm-specific parameters keyed by therapy name.
    pub therapies: BTreeMap<String, TherapyParameters>,
}

fn default_cycle_length() -> f64 {
    1.0
}

fn default_initial_distribution() -> [f64; NUM_STATES] {
    let mut init = [0.0; NUM_STATES];
    init[HealthState::Well.index()] = 1.0;
    init
}

impl ParameterTable {
    /// Built-in stroke model with annual cycles over a 50-year horizon.
    ///
    /// Anticoagulation scales every transition into `Stroke` by
    /// [`ANTICOAG_STROKE_RELATIVE_RISK`] and costs $2,000 per alive year.
    pub fn stroke_model() -> Self {
        let none: RawMatrix = [
            // Well
            [0.92, 0.05, 0.00, 0.03],
            // Stroke
            [0.00, 0.00, 0.75, 0.25],
            // PostStroke
            [0.00, 0.10, 0.85, 0.05],
            // Dead
            [0.00, 0.00, 0.00, 1.00],
        ];
        let anticoag = scale_transitions_into(&none, HealthState::Stroke, ANTICOAG_STROKE_RELATIVE_RISK);

        let mut therapies = BTreeMap::new();
        therapies.insert(
            Therapy::None.as_str().to_string(),
            TherapyParameters {
                transition_matrix: none,
                annual_cost: 0.0,
            },
        );
        therapies.insert(
            Therapy::Anticoag.as_str().to_string(),
            TherapyParameters {
                transition_matrix: anticoag,
                annual_cost: 2_000.0,
            },
        );

        Self {
            discount_rate: 0.03,
            cycle_length: 1.0,
            horizon: 50,
            initial_distribution: default_initial_distribution(),
            state_costs: [0.0, 5_000.0, 200.0, 0.0],
            state_utilities: [1.0, 0.2, 0.75, 0.0],
            therapies,
        }
    }

    /// Parse a table from JSON and validate every therapy in it.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Serialise the table to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that each therapy key is known and unique, then validate its parameters.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeMap::new();
        for name in self.therapies.keys() {
            let therapy: Therapy = name.parse()?;
            if let Some(previous) = seen.insert(therapy.as_str(), name) {
                return Err(Error::config(format!(
                    "duplicate parameters for therapy '{}': '{}' and '{}'",
                    therapy, previous, name
                )));
            }
            self.parameters(therapy)?;
        }
        Ok(())
    }

    /// The single entry naming `therapy`; names match case-insensitively.
    fn entry(&self, therapy: Therapy) -> Result<&TherapyParameters> {
        let mut matches = self
            .therapies
            .iter()
            .filter(|(name, _)| name.parse::<Therapy>().ok() == Some(therapy));
        let (_, entry) = matches
            .next()
            .ok_or_else(|| Error::config(format!("no parameters for therapy '{}'", therapy)))?;
        if let Some((name, _)) = matches.next() {
            return Err(Error::config(format!(
                "duplicate parameters for therapy '{}' (also named '{}')",
                therapy, name
            )));
        }
        Ok(entry)
    }
}

impl ParameterSource for ParameterTable {
    fn parameters(&self, therapy: Therapy) -> Result<ModelParameters> {
        let entry = self.entry(therapy)?;
        if !entry.annual_cost.is_finite() || entry.annual_cost < 0.0 {
            return Err(Error::config(format!(
                "annual cost {} for '{}' must be non-negative",
                entry.annual_cost, therapy
            )));
        }
        let transitions = TransitionMatrix::new(entry.transition_matrix)?;

        let mut state_costs = self.state_costs;
        for state in HealthState::ALL {
            if !state.is_terminal() {
                state_costs[state.index()] += entry.annual_cost;
            }
        }

        ModelParameters::new(ParameterInputs {
            therapy,
            transitions,
            state_costs,
            state_utilities: self.state_utilities,
            discount_rate: self.discount_rate,
            cycle_length: self.cycle_length,
            horizon: self.horizon,
            initial_distribution: self.initial_distribution,
        })
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::stroke_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ROW_SUM_TOLERANCE;

    #[test]
    fn test_stroke_model_rows_sum_to_one() {
        let table = ParameterTable::stroke_model();
        for therapy in Therapy::ALL {
            let params = table.parameters(therapy).unwrap();
            for state in HealthState::ALL {
                let sum = params.transitions().row_sum(state);
                assert!((sum - 1.0).abs() < ROW_SUM_TOLERANCE, "{therapy} {state:?}: {sum}");
            }
        }
    }

    #[test]
    fn test_anticoag_lowers_stroke_risk() {
        let table = ParameterTable::stroke_model();
        let none = table.parameters(Therapy::None).unwrap();
        let anticoag = table.parameters(Therapy::Anticoag).unwrap();
        let p_none = none.transitions().probability(HealthState::Well, HealthState::Stroke);
        let p_anti = anticoag.transitions().probability(HealthState::Well, HealthState::Stroke);
        assert!((p_anti - p_none * ANTICOAG_STROKE_RELATIVE_RISK).abs() < 1e-12);

        // Removed stroke mass stays on the diagonal of every live row.
        let post = HealthState::PostStroke;
        let expected_post = 0.85 + 0.10 * (1.0 - ANTICOAG_STROKE_RELATIVE_RISK);
        assert!((anticoag.transitions().probability(post, post) - expected_post).abs() < 1e-12);
        assert!((anticoag.transitions().probability(HealthState::Well, HealthState::Well) - 0.9375).abs() < 1e-12);
        assert_eq!(anticoag.transitions().row(HealthState::Stroke), none.transitions().row(HealthState::Stroke));

        // Drug cost applies to alive states only.
        assert_eq!(anticoag.state_cost(HealthState::Well), 2_000.0);
        assert_eq!(anticoag.state_cost(HealthState::Dead), 0.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let table = ParameterTable::stroke_model();
        let json = table.to_json().unwrap();
        let back = ParameterTable::from_json(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_unknown_therapy_rejected() {
        let mut table = ParameterTable::stroke_model();
        let entry = table.therapies["none"].clone();
        table.therapies.insert("aspirin".to_string(), entry);
        assert!(matches!(table.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_duplicate_therapy_rejected() {
        let mut table = ParameterTable::stroke_model();
        let mut entry = table.therapies["none"].clone();
        entry.transition_matrix[0] = [0.97, 0.0, 0.0, 0.03];
        table.therapies.insert("NONE".to_string(), entry);

        assert!(matches!(table.validate(), Err(Error::Configuration(_))));
        assert!(matches!(
            table.parameters(Therapy::None),
            Err(Error::Configuration(_))
        ));
        // The other arm is still unambiguous.
        assert!(table.parameters(Therapy::Anticoag).is_ok());

        let json = serde_json::to_string(&table).unwrap();
        assert!(matches!(
            ParameterTable::from_json(&json),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_therapy_rejected() {
        let mut table = ParameterTable::stroke_model();
        table.therapies.remove("anticoag");
        assert!(matches!(
            table.parameters(Therapy::Anticoag),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_non_stochastic_table_rejected() {
        let json = r#"{
            "discount_rate": 0.03,
            "horizon": 10,
            "state_costs": [0, 100, 10, 0],
            "state_utilities": [1, 0.2, 0.7, 0],
            "therapies": {
                "none": {
                    "transition_matrix": [
                        [0.9, 0.2, 0.0, 0.0],
                        [0.0, 0.0, 0.8, 0.2],
                        [0.0, 0.1, 0.8, 0.1],
                        [0.0, 0.0, 0.0, 1.0]
                    ]
                }
            }
        }"#;
        assert!(matches!(
            ParameterTable::from_json(json),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "discount_rate": 0.0,
            "horizon": 5,
            "state_costs": [0, 0, 0, 0],
            "state_utilities": [1, 1, 1, 0],
            "therapies": {
                "NONE": {
                    "transition_matrix": [
                        [1.0, 0.0, 0.0, 0.0],
                        [0.0, 1.0, 0.0, 0.0],
                        [0.0, 0.0, 1.0, 0.0],
                        [0.0, 0.0, 0.0, 1.0]
                    ]
                }
            }
        }"#;
        let table = ParameterTable::from_json(json).unwrap();
        assert_eq!(table.cycle_length, 1.0);
        let params = table.parameters(Therapy::None).unwrap();
        assert_eq!(params.deterministic_initial_state(), Some(HealthState::Well));
    }
}
