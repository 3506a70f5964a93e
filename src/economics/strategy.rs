//! Strategies compared by the economic analyses.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::simulation::CohortOutcome;
use crate::statistics::{mean, t_confidence_interval, Interval};

/// Point estimate with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Sample mean.
    pub mean: f64,
    /// t-based confidence interval of the mean.
    pub interval: Interval,
}

impl Estimate {
    pub(crate) fn of(data: &[f64], alpha: f64) -> Result<Self> {
        Ok(Self {
            mean: mean(data)?,
            interval: t_confidence_interval(data, alpha)?,
        })
    }
}

/// A named strategy with per-patient cost and effect observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    name: String,
    cost_obs: Vec<f64>,
    effect_obs: Vec<f64>,
}

impl Strategy {
    /// Build a strategy. Both vectors need the same length, at least two.
    pub fn new(name: impl Into<String>, cost_obs: Vec<f64>, effect_obs: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if cost_obs.len() != effect_obs.len() {
            return Err(Error::config(format!(
                "strategy '{}' has {} cost but {} effect observations",
                name,
                cost_obs.len(),
                effect_obs.len()
            )));
        }
        if cost_obs.len() < 2 {
            return Err(Error::insufficient(2, cost_obs.len()));
        }
        if cost_obs.iter().chain(&effect_obs).any(|v| !v.is_finite()) {
            return Err(Error::Numeric(format!(
                "strategy '{}' has non-finite observations",
                name
            )));
        }
        Ok(Self {
            name,
            cost_obs,
            effect_obs,
        })
    }

    /// Discounted costs as cost and discounted utilities as effect.
    pub fn from_cohort(name: impl Into<String>, cohort: &CohortOutcome) -> Result<Self> {
        Self::new(name, cohort.costs(), cohort.utilities())
    }

    /// Strategy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cost observations.
    pub fn cost_obs(&self) -> &[f64] {
        &self.cost_obs
    }

    /// Effect observations.
    pub fn effect_obs(&self) -> &[f64] {
        &self.effect_obs
    }

    /// Mean cost.
    pub fn mean_cost(&self) -> f64 {
        mean(&self.cost_obs).unwrap_or(f64::NAN)
    }

    /// Mean effect.
    pub fn mean_effect(&self) -> f64 {
        mean(&self.effect_obs).unwrap_or(f64::NAN)
    }

    /// Mean cost with its t interval.
    pub fn cost_estimate(&self, alpha: f64) -> Result<Estimate> {
        Estimate::of(&self.cost_obs, alpha)
    }

    /// Mean effect with its t interval.
    pub fn effect_estimate(&self, alpha: f64) -> Result<Estimate> {
        Estimate::of(&self.effect_obs, alpha)
    }

    /// Per-observation net monetary benefit `wtp * effect - cost`.
    pub fn nmb_obs(&self, wtp: f64) -> Vec<f64> {
        self.cost_obs
            .iter()
            .zip(&self.effect_obs)
            .map(|(&c, &e)| wtp * e - c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_validation() {
        assert!(Strategy::new("a", vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(matches!(
            Strategy::new("a", vec![1.0], vec![1.0]),
            Err(Error::InsufficientData { .. })
        ));
        assert!(Strategy::new("a", vec![1.0, f64::NAN], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_means_and_nmb() {
        let s = Strategy::new("a", vec![100.0, 300.0], vec![1.0, 2.0]).unwrap();
        assert_eq!(s.mean_cost(), 200.0);
        assert_eq!(s.mean_effect(), 1.5);
        assert_eq!(s.nmb_obs(1_000.0), vec![900.0, 1_700.0]);
        let est = s.cost_estimate(0.05).unwrap();
        assert!(est.interval.contains(200.0));
    }
}
