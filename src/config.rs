//! Configuration for cohort simulation and analysis.

/// Configuration options shared by the simulator and the analyses.
///
/// Every statistic that depends on a significance level or a random stream
/// takes it from here; nothing is read from process-wide state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Significance level for confidence intervals (default: 0.05).
    pub alpha: f64,

    /// Patients per cohort (default: 2,000).
    pub cohort_size: usize,

    /// Base seed mixed with the cohort id and patient id (default: 0).
    pub base_seed: u64,

    /// Bootstrap replicates for ICER and difference intervals (default: 1,000).
    pub bootstrap_iterations: usize,

    /// Seed for bootstrap resampling (default: 1).
    pub bootstrap_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            cohort_size: 2_000,
            base_seed: 0,
            bootstrap_iterations: 1_000,
            bootstrap_seed: 1,
        }
    }
}

impl Config {
    /// Confidence level implied by `alpha`, e.g. 0.95.
    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cohort_size, 2_000);
        assert!((config.confidence_level() - 0.95).abs() < 1e-12);
    }
}
