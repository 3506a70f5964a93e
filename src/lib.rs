//! # markov-cohort
//!
//! Markov-chain cohort simulation of stroke outcomes under two therapies,
//! no treatment and anticoagulation, with the statistics and economic
//! evaluation needed to compare them.
//!
//! Each patient follows an independent stochastic path through the states
//! `Well → Stroke → PostStroke → Dead`, accruing discounted costs and
//! utilities per cycle. Cohorts are summarized with Student-t confidence
//! intervals and compared with:
//! - Independent two-sample differences (Welch t, pooled t, bootstrap)
//! - Cost-effectiveness analysis (dominance, extended dominance, ICERs)
//! - Cost-benefit analysis (incremental net monetary benefit, breakeven WTP)
//!
//! ## Determinism
//!
//! Every patient draws from its own RNG stream derived from the cohort id and
//! the patient index, so the same cohort id and size always produce the same
//! outcome regardless of thread count.
//!
//! ## Quick Start
//!
//! ```no_run
//! use markov_cohort::{simulate_cohort, ComparativeOutcomes, Therapy};
//!
//! let none = simulate_cohort(1, Therapy::None, 2000)?;
//! let anticoag = simulate_cohort(2, Therapy::Anticoag, 2000)?;
//!
//! let cmp = ComparativeOutcomes::compute(&none, &anticoag, 0.05)?;
//! println!(
//!     "survival gain: {:.2} cycles {:?}",
//!     cmp.survival_time.mean_difference, cmp.survival_time.confidence_interval
//! );
//! # Ok::<(), markov_cohort::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod result;
mod thread_pool;
mod types;

// Functional modules
pub mod economics;
pub mod output;
pub mod parameters;
pub mod simulation;
pub mod statistics;

// Re-exports for public API
pub use config::Config;
pub use economics::{
    CeaRow, CostBenefitAnalysis, CostEffectivenessAnalysis, Icer, Strategy, WtpRecommendation,
};
pub use error::{Error, Result};
pub use parameters::{ModelParameters, ParameterSource, ParameterTable, TransitionMatrix};
pub use result::{CohortSummary, ComparativeOutcomes};
pub use simulation::{
    simulate_cohort, simulate_patient, CancellationToken, CohortOutcome, CohortSimulator,
    PatientOutcome, PatientTrajectory,
};
pub use statistics::{DifferenceStat, IndependentSamples, Interval, SummaryStat};
pub use types::{HealthState, StateMatrix, StateVector, Therapy, NUM_STATES};
