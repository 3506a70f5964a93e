//! Two-sample difference statistics for independent (unpaired) samples.

use serde::{Deserialize, Serialize};

use super::bootstrap::{bootstrap_replicates, resample_mean};
use super::quantile::compute_quantiles;
use super::summary::{check_alpha, mean, t_critical, variance, Interval};
use crate::error::{Error, Result};

/// An immutable pair of independent samples, `x` compared against `y_ref`.
///
/// Every statistic is computed on demand; nothing is cached or mutated.
#[derive(Debug, Clone, Copy)]
pub struct IndependentSamples<'a> {
    x: &'a [f64],
    y_ref: &'a [f64],
}

impl<'a> IndependentSamples<'a> {
    /// Pair two samples. Each needs at least two observations.
    pub fn new(x: &'a [f64], y_ref: &'a [f64]) -> Result<Self> {
        for sample in [x, y_ref] {
            if sample.len() < 2 {
                return Err(Error::insufficient(2, sample.len()));
            }
        }
        Ok(Self { x, y_ref })
    }

    /// Observations of the compared sample.
    pub fn x(&self) -> &'a [f64] {
        self.x
    }

    /// Observations of the reference sample.
    pub fn y_ref(&self) -> &'a [f64] {
        self.y_ref
    }

    /// `mean(x) - mean(y_ref)`.
    pub fn mean_difference(&self) -> f64 {
        // Both means exist: lengths were checked in `new`.
        mean(self.x).unwrap_or(f64::NAN) - mean(self.y_ref).unwrap_or(f64::NAN)
    }

    fn scaled_variances(&self) -> (f64, f64) {
        let vx = variance(self.x).unwrap_or(f64::NAN);
        let vy = variance(self.y_ref).unwrap_or(f64::NAN);
        (vx / self.x.len() as f64, vy / self.y_ref.len() as f64)
    }

    /// Unpooled standard error `sqrt(s_x^2/n_x + s_y^2/n_y)`.
    pub fn standard_error(&self) -> f64 {
        let (a, b) = self.scaled_variances();
        (a + b).sqrt()
    }

    /// Welch-Satterthwaite degrees of freedom; `None` when both samples are constant.
    pub fn welch_df(&self) -> Option<f64> {
        let (a, b) = self.scaled_variances();
        let numerator = (a + b) * (a + b);
        let denominator = a * a / (self.x.len() - 1) as f64 + b * b / (self.y_ref.len() - 1) as f64;
        if denominator > 0.0 {
            Some(numerator / denominator)
        } else {
            None
        }
    }

    /// Welch (unequal variance) t interval for the mean difference.
    pub fn t_confidence_interval(&self, alpha: f64) -> Result<Interval> {
        check_alpha(alpha)?;
        let d = self.mean_difference();
        let Some(df) = self.welch_df() else {
            return Ok(Interval::point(d));
        };
        let half_width = t_critical(alpha, df)? * self.standard_error();
        Ok(Interval::new(d - half_width, d + half_width))
    }

    /// Pooled-variance t interval with `n_x + n_y - 2` degrees of freedom.
    pub fn pooled_t_confidence_interval(&self, alpha: f64) -> Result<Interval> {
        check_alpha(alpha)?;
        let (nx, ny) = (self.x.len() as f64, self.y_ref.len() as f64);
        let vx = variance(self.x)?;
        let vy = variance(self.y_ref)?;
        let pooled = ((nx - 1.0) * vx + (ny - 1.0) * vy) / (nx + ny - 2.0);
        let d = self.mean_difference();
        if pooled == 0.0 {
            return Ok(Interval::point(d));
        }
        let se = (pooled * (1.0 / nx + 1.0 / ny)).sqrt();
        let half_width = t_critical(alpha, nx + ny - 2.0)? * se;
        Ok(Interval::new(d - half_width, d + half_width))
    }

    /// Percentile bootstrap interval, resampling each sample independently.
    pub fn bootstrap_interval(&self, alpha: f64, iterations: usize, seed: u64) -> Result<Interval> {
        check_alpha(alpha)?;
        if iterations < 2 {
            return Err(Error::config("bootstrap needs at least two iterations"));
        }
        let (x, y) = (self.x, self.y_ref);
        let diffs = bootstrap_replicates(iterations, seed, |rng| {
            resample_mean(x, rng) - resample_mean(y, rng)
        });
        let q = compute_quantiles(&diffs, &[alpha / 2.0, 1.0 - alpha / 2.0]);
        Ok(Interval::new(q[0], q[1]))
    }
}

/// Named mean difference between two independent samples, with its interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceStat {
    /// Comparison label.
    pub name: String,
    /// Observations in the compared sample.
    pub n_x: usize,
    /// Observations in the reference sample.
    pub n_y: usize,
    /// `mean(x) - mean(y_ref)`.
    pub mean_difference: f64,
    /// Unpooled standard error.
    pub standard_error: f64,
    /// Significance level of the interval.
    pub alpha: f64,
    /// Welch t interval for the difference.
    pub confidence_interval: Interval,
}

impl DifferenceStat {
    /// Compare `x` against `y_ref` as independent samples.
    pub fn compute(name: impl Into<String>, x: &[f64], y_ref: &[f64], alpha: f64) -> Result<Self> {
        let samples = IndependentSamples::new(x, y_ref)?;
        Ok(Self {
            name: name.into(),
            n_x: x.len(),
            n_y: y_ref.len(),
            mean_difference: samples.mean_difference(),
            standard_error: samples.standard_error(),
            alpha,
            confidence_interval: samples.t_confidence_interval(alpha)?,
        })
    }

    /// Whether the interval excludes zero.
    pub fn is_significant(&self) -> bool {
        !self.confidence_interval.contains(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, offset: f64) -> Vec<f64> {
        (0..n).map(|i| offset + (i % 17) as f64 * 0.3).collect()
    }

    #[test]
    fn test_same_samples_zero_difference() {
        let x = ramp(200, 4.0);
        let samples = IndependentSamples::new(&x, &x).unwrap();
        assert!(samples.mean_difference().abs() < 1e-12);
        let ci = samples.t_confidence_interval(0.05).unwrap();
        assert!(ci.contains(0.0));
        assert!((ci.lower + ci.upper).abs() < 1e-9);
    }

    #[test]
    fn test_shifted_samples_detected() {
        let x = ramp(300, 6.0);
        let y = ramp(250, 4.0);
        let stat = DifferenceStat::compute("shift", &x, &y, 0.05).unwrap();
        assert!((stat.mean_difference - 2.0).abs() < 0.1);
        assert!(stat.is_significant());
    }

    #[test]
    fn test_constant_samples_point_interval() {
        let x = vec![3.0; 10];
        let y = vec![1.0; 12];
        let samples = IndependentSamples::new(&x, &y).unwrap();
        assert_eq!(samples.welch_df(), None);
        assert_eq!(samples.t_confidence_interval(0.05).unwrap(), Interval::point(2.0));
        assert_eq!(samples.pooled_t_confidence_interval(0.05).unwrap(), Interval::point(2.0));
    }

    #[test]
    fn test_welch_equals_pooled_for_balanced_equal_variance() {
        let x = ramp(100, 1.0);
        let y = ramp(100, 0.0);
        let samples = IndependentSamples::new(&x, &y).unwrap();
        let welch = samples.t_confidence_interval(0.05).unwrap();
        let pooled = samples.pooled_t_confidence_interval(0.05).unwrap();
        assert!((welch.width() - pooled.width()).abs() < 1e-6);
    }

    #[test]
    fn test_bootstrap_interval_brackets_difference() {
        let x = ramp(150, 2.0);
        let y = ramp(150, 1.0);
        let samples = IndependentSamples::new(&x, &y).unwrap();
        let boot = samples.bootstrap_interval(0.05, 500, 3).unwrap();
        assert!(boot.contains(samples.mean_difference()));
        assert_eq!(boot, samples.bootstrap_interval(0.05, 500, 3).unwrap());
    }

    #[test]
    fn test_requires_two_observations() {
        let x = vec![1.0];
        let y = vec![1.0, 2.0];
        assert!(matches!(
            IndependentSamples::new(&x, &y),
            Err(Error::InsufficientData { needed: 2, got: 1 })
        ));
        assert!(IndependentSamples::new(&y, &x).is_err());
    }
}
