//! Statistical methods for cohort outcomes.
//!
//! - Summary statistics with Student-t confidence intervals
//! - Independent two-sample differences (Welch, pooled, bootstrap)
//! - Quantiles using the R-7 definition
//! - Counter-seeded bootstrap replicates

mod bootstrap;
mod difference;
mod quantile;
mod summary;

pub use bootstrap::{bootstrap_replicates, counter_rng_seed, resample_mean};
pub use difference::{DifferenceStat, IndependentSamples};
pub use quantile::{compute_quantiles, quantile_sorted};
pub use summary::{
    mean, percentile_interval, std_dev, t_confidence_interval, t_critical, variance, Interval,
    SummaryStat,
};

pub(crate) use summary::check_alpha;
