//! Markov path and cohort simulation.
//!
//! 1. **Patient** ([`patient`]): one stochastic trajectory and its accrued outcomes
//! 2. **Cohort** ([`cohort`]): many independently seeded patients, optionally in parallel
//! 3. **Trace** ([`trace`]): the deterministic expected-value counterpart

pub mod cohort;
pub mod patient;
pub mod trace;

pub use cohort::{simulate_cohort, CancellationToken, CohortOutcome, CohortSimulator};
pub use patient::{simulate_path, simulate_patient, PatientOutcome, PatientTrajectory};
pub use trace::{expected_trace, ExpectedTrace};
