//! Cost-effectiveness analysis: dominance, the efficient frontier and ICERs.
//!
//! Strategies are ordered by mean cost. A strategy is **dominated** when some
//! other strategy costs no more and is at least as effective (ties broken by
//! input order). Among the survivors, a strategy is **extendedly dominated**
//! when its ICER exceeds that of the next more costly strategy; these are
//! removed until ICERs increase along the frontier. Each frontier strategy is
//! then compared with the previous one.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::strategy::{Estimate, Strategy};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::statistics::{bootstrap_replicates, check_alpha, compute_quantiles, resample_mean, Interval};

/// Smallest effect difference treated as non-zero.
pub const EFFECT_EPSILON: f64 = 1e-12;

/// Incremental cost-effectiveness ratio `delta_cost / delta_effect`.
///
/// Fails with `Error::Numeric` when the effect difference is zero.
pub fn icer(delta_cost: f64, delta_effect: f64) -> Result<f64> {
    if !delta_effect.is_finite() || delta_effect.abs() <= EFFECT_EPSILON {
        return Err(Error::Numeric(format!(
            "ICER undefined for effect difference {}",
            delta_effect
        )));
    }
    Ok(delta_cost / delta_effect)
}

/// ICER entry of a strategy in the CE table.
///
/// Only frontier strategies carry a numeric ratio; callers must match on the
/// variant before treating an ICER as a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Icer {
    /// Least costly frontier strategy; the first comparator.
    Reference,
    /// Ratio versus the previous frontier strategy.
    Ratio {
        /// Point estimate from mean costs and effects.
        value: f64,
        /// Bootstrap percentile interval, if enough replicates were usable.
        interval: Option<Interval>,
    },
    /// Costs at least as much as another strategy for no more effect.
    Dominated,
    /// Excluded by a combination of neighbouring strategies.
    ExtendedlyDominated,
}

impl Icer {
    /// Numeric ratio, if this is a frontier comparison.
    pub fn value(&self) -> Option<f64> {
        match self {
            Icer::Ratio { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// True for either form of dominance.
    pub fn is_dominated(&self) -> bool {
        matches!(self, Icer::Dominated | Icer::ExtendedlyDominated)
    }
}

impl fmt::Display for Icer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Icer::Reference => f.write_str("-"),
            Icer::Ratio { value, .. } => write!(f, "{:.2}", value),
            Icer::Dominated => f.write_str("Dominated"),
            Icer::ExtendedlyDominated => f.write_str("Extendedly dominated"),
        }
    }
}

/// One row of the cost-effectiveness table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeaRow {
    /// Strategy name.
    pub name: String,
    /// Mean cost with confidence interval.
    pub cost: Estimate,
    /// Mean effect with confidence interval.
    pub effect: Estimate,
    /// ICER or dominance marker.
    pub icer: Icer,
}

/// Cost-effectiveness analysis over independent (unpaired) strategies.
#[derive(Debug, Clone)]
pub struct CostEffectivenessAnalysis {
    strategies: Vec<Strategy>,
    icers: Vec<Icer>,
    frontier: Vec<usize>,
    alpha: f64,
}

impl CostEffectivenessAnalysis {
    /// Classify strategies and compute ICERs along the frontier.
    pub fn new(strategies: Vec<Strategy>, config: &Config) -> Result<Self> {
        check_alpha(config.alpha)?;
        if strategies.is_empty() {
            return Err(Error::insufficient(1, 0));
        }

        let means: Vec<(f64, f64)> = strategies
            .iter()
            .map(|s| (s.mean_cost(), s.mean_effect()))
            .collect();

        let mut icers = vec![Icer::Dominated; strategies.len()];
        let mut candidates: Vec<usize> = (0..strategies.len())
            .filter(|&i| !is_strongly_dominated(i, &means))
            .collect();
        candidates.sort_by(|&a, &b| means[a].0.total_cmp(&means[b].0).then(a.cmp(&b)));

        let frontier = remove_extended_dominance(candidates.clone(), &means);
        for &i in &candidates {
            if !frontier.contains(&i) {
                icers[i] = Icer::ExtendedlyDominated;
            }
        }

        icers[frontier[0]] = Icer::Reference;
        for pair in frontier.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let delta_cost = means[curr].0 - means[prev].0;
            let delta_effect = means[curr].1 - means[prev].1;
            icers[curr] = match icer(delta_cost, delta_effect) {
                Ok(value) => Icer::Ratio {
                    value,
                    interval: bootstrap_icer_interval(
                        &strategies[curr],
                        &strategies[prev],
                        config,
                    ),
                },
                Err(err) => {
                    warn!(strategy = strategies[curr].name(), error = %err, "treating undefined ICER as dominated");
                    Icer::Dominated
                }
            };
        }

        Ok(Self {
            strategies,
            icers,
            frontier,
            alpha: config.alpha,
        })
    }

    /// Strategies in input order.
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// ICER entry of each strategy, in input order.
    pub fn icers(&self) -> &[Icer] {
        &self.icers
    }

    /// Indices of frontier strategies in increasing cost order.
    pub fn frontier(&self) -> &[usize] {
        &self.frontier
    }

    /// Frontier strategies in increasing cost order.
    pub fn frontier_strategies(&self) -> Vec<&Strategy> {
        self.frontier.iter().map(|&i| &self.strategies[i]).collect()
    }

    /// CE table rows in input order.
    pub fn table(&self) -> Result<Vec<CeaRow>> {
        self.strategies
            .iter()
            .zip(&self.icers)
            .map(|(s, &icer)| {
                Ok(CeaRow {
                    name: s.name().to_string(),
                    cost: s.cost_estimate(self.alpha)?,
                    effect: s.effect_estimate(self.alpha)?,
                    icer,
                })
            })
            .collect()
    }
}

fn is_strongly_dominated(i: usize, means: &[(f64, f64)]) -> bool {
    let (ci, ei) = means[i];
    means.iter().enumerate().any(|(j, &(cj, ej))| {
        if j == i || cj > ci || ej < ei {
            return false;
        }
        // Identical strategies: keep the first.
        cj < ci || ej > ei || j < i
    })
}

fn remove_extended_dominance(mut frontier: Vec<usize>, means: &[(f64, f64)]) -> Vec<usize> {
    loop {
        let ratios: Vec<f64> = frontier
            .windows(2)
            .map(|w| {
                let (a, b) = (means[w[0]], means[w[1]]);
                (b.0 - a.0) / (b.1 - a.1)
            })
            .collect();
        // ratios[k] is the ICER of frontier[k + 1]
        let Some(k) = ratios.windows(2).position(|r| r[0] > r[1]) else {
            return frontier;
        };
        frontier.remove(k + 1);
    }
}

fn bootstrap_icer_interval(strategy: &Strategy, comparator: &Strategy, config: &Config) -> Option<Interval> {
    if config.bootstrap_iterations < 2 {
        return None;
    }
    let replicates = bootstrap_replicates(config.bootstrap_iterations, config.bootstrap_seed, |rng| {
        let delta_cost = resample_mean(strategy.cost_obs(), rng) - resample_mean(comparator.cost_obs(), rng);
        let delta_effect =
            resample_mean(strategy.effect_obs(), rng) - resample_mean(comparator.effect_obs(), rng);
        icer(delta_cost, delta_effect).ok()
    });

    let ratios: Vec<f64> = replicates.into_iter().flatten().collect();
    let dropped = config.bootstrap_iterations - ratios.len();
    if dropped > 0 {
        warn!(strategy = strategy.name(), dropped, "bootstrap replicates with zero effect difference dropped");
    }
    if ratios.len() < 2 {
        return None;
    }
    let q = compute_quantiles(&ratios, &[config.alpha / 2.0, 1.0 - config.alpha / 2.0]);
    Some(Interval::new(q[0], q[1]))
}
