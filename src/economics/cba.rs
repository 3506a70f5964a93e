//! Cost-benefit analysis via incremental net monetary benefit.

use serde::{Deserialize, Serialize};

use super::cea::EFFECT_EPSILON;
use super::strategy::Strategy;
use crate::error::{Error, Result};
use crate::statistics::{check_alpha, IndependentSamples, Interval};

/// Incremental NMB of the alternative over the base at one willingness-to-pay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NmbEstimate {
    /// Willingness-to-pay per unit of effect.
    pub wtp: f64,
    /// `wtp * delta_effect - delta_cost`.
    pub mean: f64,
    /// Welch t interval for the incremental NMB.
    pub interval: Interval,
}

/// Adoption advice for the alternative strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WtpRecommendation {
    /// Cheaper (or equal cost) and more effective: adopt at any willingness-to-pay.
    AdoptAtAnyWtp,
    /// More costly and more effective: adopt when willingness-to-pay exceeds `min_wtp`.
    AdoptAbove {
        /// Breakeven willingness-to-pay, a lower bound.
        min_wtp: f64,
    },
    /// Cheaper but less effective: adopt only when willingness-to-pay is below `max_wtp`.
    AdoptBelow {
        /// Breakeven willingness-to-pay, an upper bound.
        max_wtp: f64,
    },
    /// More costly (or equal cost) and less effective.
    NeverAdopt,
}

/// Cost-benefit comparison of an alternative against a base strategy,
/// treating their observations as independent samples.
#[derive(Debug, Clone)]
pub struct CostBenefitAnalysis {
    base: Strategy,
    alternative: Strategy,
}

impl CostBenefitAnalysis {
    /// Compare `alternative` against `base`.
    pub fn new(base: Strategy, alternative: Strategy) -> Self {
        Self { base, alternative }
    }

    /// Reference strategy.
    pub fn base(&self) -> &Strategy {
        &self.base
    }

    /// Strategy being evaluated.
    pub fn alternative(&self) -> &Strategy {
        &self.alternative
    }

    /// Mean cost of the alternative minus mean cost of the base.
    pub fn delta_cost(&self) -> f64 {
        self.alternative.mean_cost() - self.base.mean_cost()
    }

    /// Mean effect of the alternative minus mean effect of the base.
    pub fn delta_effect(&self) -> f64 {
        self.alternative.mean_effect() - self.base.mean_effect()
    }

    /// Incremental NMB `wtp * delta_effect - delta_cost` with its interval.
    ///
    /// The interval comes from per-patient NMB observations
    /// `wtp * effect - cost` of each strategy, compared as independent samples.
    pub fn incremental_nmb(&self, wtp: f64, alpha: f64) -> Result<NmbEstimate> {
        check_alpha(alpha)?;
        if !wtp.is_finite() {
            return Err(Error::config(format!("willingness-to-pay {} must be finite", wtp)));
        }
        let alt = self.alternative.nmb_obs(wtp);
        let base = self.base.nmb_obs(wtp);
        let samples = IndependentSamples::new(&alt, &base)?;
        Ok(NmbEstimate {
            wtp,
            mean: wtp * self.delta_effect() - self.delta_cost(),
            interval: samples.t_confidence_interval(alpha)?,
        })
    }

    /// Incremental NMB at `n_points` evenly spaced values in `[min_wtp, max_wtp]`.
    pub fn nmb_curve(&self, min_wtp: f64, max_wtp: f64, n_points: usize, alpha: f64) -> Result<Vec<NmbEstimate>> {
        if n_points < 2 {
            return Err(Error::config("NMB curve needs at least two points"));
        }
        if !(min_wtp <= max_wtp) {
            return Err(Error::config(format!(
                "invalid willingness-to-pay range [{}, {}]",
                min_wtp, max_wtp
            )));
        }
        let step = (max_wtp - min_wtp) / (n_points - 1) as f64;
        (0..n_points)
            .map(|i| {
                let wtp = if i == n_points - 1 { max_wtp } else { min_wtp + step * i as f64 };
                self.incremental_nmb(wtp, alpha)
            })
            .collect()
    }

    /// Willingness-to-pay at which the incremental NMB is zero: `delta_cost / delta_effect`.
    pub fn breakeven_wtp(&self) -> Result<f64> {
        let delta_effect = self.delta_effect();
        if delta_effect.abs() <= EFFECT_EPSILON {
            return Err(Error::Numeric(
                "breakeven willingness-to-pay undefined: strategies are equally effective".into(),
            ));
        }
        Ok(self.delta_cost() / delta_effect)
    }

    /// Adoption advice derived from the signs of the cost and effect differences.
    pub fn recommendation(&self) -> Result<WtpRecommendation> {
        let delta_cost = self.delta_cost();
        let delta_effect = self.delta_effect();
        let breakeven = self.breakeven_wtp()?;
        Ok(match (delta_effect > 0.0, delta_cost > 0.0) {
            (true, true) => WtpRecommendation::AdoptAbove { min_wtp: breakeven },
            (true, false) => WtpRecommendation::AdoptAtAnyWtp,
            (false, true) => WtpRecommendation::NeverAdopt,
            (false, false) if delta_cost == 0.0 => WtpRecommendation::NeverAdopt,
            (false, false) => WtpRecommendation::AdoptBelow { max_wtp: breakeven },
        })
    }
}
