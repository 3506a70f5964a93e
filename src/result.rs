//! Result records for cohort runs and therapy comparisons.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::simulation::CohortOutcome;
use crate::statistics::{DifferenceStat, SummaryStat};
use crate::types::Therapy;

/// Summary statistics of one simulated cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    /// Therapy the cohort received.
    pub therapy: Therapy,

    /// Cohort identifier (seed root).
    pub cohort_id: u64,

    /// Number of patients.
    pub n_patients: usize,

    /// Survival time in years.
    pub survival_time: SummaryStat,

    /// Number of stroke events per patient.
    pub stroke_count: SummaryStat,

    /// Fraction of patients with at least one stroke.
    pub developed_stroke: SummaryStat,

    /// Discounted cost.
    pub discounted_cost: SummaryStat,

    /// Discounted utility (QALYs).
    pub discounted_utility: SummaryStat,

    /// Fraction of patients still alive at the horizon.
    pub fraction_alive_at_horizon: f64,
}

impl CohortSummary {
    /// Summarize a cohort at significance level `alpha`.
    pub fn compute(cohort: &CohortOutcome, alpha: f64) -> Result<Self> {
        Ok(Self {
            therapy: cohort.therapy(),
            cohort_id: cohort.cohort_id(),
            n_patients: cohort.len(),
            survival_time: cohort.sum_stat_survival_times(alpha)?,
            stroke_count: cohort.sum_stat_count_strokes(alpha)?,
            developed_stroke: cohort.sum_stat_developed_stroke(alpha)?,
            discounted_cost: cohort.sum_stat_discounted_cost(alpha)?,
            discounted_utility: cohort.sum_stat_discounted_utility(alpha)?,
            fraction_alive_at_horizon: cohort.fraction_alive_at_horizon(),
        })
    }
}

/// Anticoagulation versus no treatment, each outcome as an independent
/// two-sample difference (anticoag minus none).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeOutcomes {
    /// Increase in mean survival time.
    pub survival_time: DifferenceStat,

    /// Change in the fraction of patients who developed a stroke.
    pub stroke_incidence: DifferenceStat,

    /// Increase in mean discounted cost.
    pub discounted_cost: DifferenceStat,

    /// Increase in mean discounted utility.
    pub discounted_utility: DifferenceStat,
}

impl ComparativeOutcomes {
    /// Compare the two cohorts.
    ///
    /// Fails with `Error::Configuration` if the cohorts are labelled with the
    /// wrong therapies.
    pub fn compute(none: &CohortOutcome, anticoag: &CohortOutcome, alpha: f64) -> Result<Self> {
        if none.therapy() != Therapy::None || anticoag.therapy() != Therapy::Anticoag {
            return Err(Error::config(format!(
                "expected (none, anticoag) cohorts, got ({}, {})",
                none.therapy(),
                anticoag.therapy()
            )));
        }
        Ok(Self {
            survival_time: DifferenceStat::compute(
                "increase in survival time",
                &anticoag.survival_times(),
                &none.survival_times(),
                alpha,
            )?,
            stroke_incidence: DifferenceStat::compute(
                "change in stroke incidence",
                &anticoag.if_developed_stroke(),
                &none.if_developed_stroke(),
                alpha,
            )?,
            discounted_cost: DifferenceStat::compute(
                "increase in discounted cost",
                &anticoag.costs(),
                &none.costs(),
                alpha,
            )?,
            discounted_utility: DifferenceStat::compute(
                "increase in discounted utility",
                &anticoag.utilities(),
                &none.utilities(),
                alpha,
            )?,
        })
    }

    /// All four comparisons in a fixed order.
    pub fn all(&self) -> [&DifferenceStat; 4] {
        [
            &self.survival_time,
            &self.stroke_incidence,
            &self.discounted_cost,
            &self.discounted_utility,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterTable;
    use crate::simulation::{simulate_cohort, CohortSimulator};

    #[test]
    fn test_cohort_summary_matches_outcome() {
        let cohort = simulate_cohort(3, Therapy::None, 200).unwrap();
        let summary = CohortSummary::compute(&cohort, 0.05).unwrap();
        assert_eq!(summary.therapy, Therapy::None);
        assert_eq!(summary.cohort_id, 3);
        assert_eq!(summary.n_patients, 200);
        assert_eq!(summary.survival_time.n, 200);
        assert!(summary.developed_stroke.mean >= 0.0 && summary.developed_stroke.mean <= 1.0);
        assert!(summary.survival_time.max <= 50.0);
    }

    #[test]
    fn test_survival_reported_in_years() {
        let mut table = ParameterTable::stroke_model();
        table.cycle_length = 0.5;
        table.horizon = 10;
        let cohort = CohortSimulator::with_source(table)
            .simulate_n(0, Therapy::None, 300)
            .unwrap();
        let summary = CohortSummary::compute(&cohort, 0.05).unwrap();
        // Ten half-year cycles.
        assert!(summary.survival_time.max <= 5.0);
        assert!(summary.survival_time.min >= 0.5);
        for t in cohort.survival_times() {
            assert_eq!((t * 2.0).fract(), 0.0);
        }
    }

    #[test]
    fn test_comparative_outcomes_order_checked() {
        let none = simulate_cohort(1, Therapy::None, 100).unwrap();
        let anticoag = simulate_cohort(2, Therapy::Anticoag, 100).unwrap();
        assert!(ComparativeOutcomes::compute(&anticoag, &none, 0.05).is_err());

        let cmp = ComparativeOutcomes::compute(&none, &anticoag, 0.05).unwrap();
        assert_eq!(cmp.all().len(), 4);
        // Drug cost always makes the anticoag arm more expensive.
        assert!(cmp.discounted_cost.mean_difference > 0.0);
    }
}
