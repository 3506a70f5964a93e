//! One-sample summary statistics and t-based confidence intervals.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::quantile::compute_quantiles;
use crate::error::{Error, Result};

/// Closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Interval {
    /// Build an interval, ordering the bounds.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    /// Interval of zero width at `x`.
    pub fn point(x: f64) -> Self {
        Self { lower: x, upper: x }
    }

    /// `upper - lower`.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `x` lies inside the closed interval.
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// Whether two intervals share at least one point.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(Error::config(format!("alpha {} must lie in (0, 1)", alpha)))
    }
}

/// Arithmetic mean (Welford update, exact for constant data).
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::insufficient(1, 0));
    }
    let mut m = 0.0;
    for (k, &x) in data.iter().enumerate() {
        m += (x - m) / (k + 1) as f64;
    }
    Ok(m)
}

/// Unbiased sample variance (n - 1 denominator).
pub fn variance(data: &[f64]) -> Result<f64> {
    if data.len() < 2 {
        return Err(Error::insufficient(2, data.len()));
    }
    let m = mean(data)?;
    let ss: f64 = data.iter().map(|&x| (x - m) * (x - m)).sum();
    Ok(ss / (data.len() - 1) as f64)
}

/// Sample standard deviation.
pub fn std_dev(data: &[f64]) -> Result<f64> {
    Ok(variance(data)?.sqrt())
}

/// Two-sided Student-t critical value `t_{1 - alpha/2, df}`.
pub fn t_critical(alpha: f64, df: f64) -> Result<f64> {
    check_alpha(alpha)?;
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| Error::Numeric(format!("t distribution with {} df: {}", df, e)))?;
    let t = dist.inverse_cdf(1.0 - alpha / 2.0);
    if t.is_finite() {
        Ok(t)
    } else {
        Err(Error::Numeric(format!("t quantile undefined for {} df", df)))
    }
}

/// Two-sided t confidence interval for the mean with n - 1 degrees of freedom.
pub fn t_confidence_interval(data: &[f64], alpha: f64) -> Result<Interval> {
    check_alpha(alpha)?;
    let n = data.len();
    let sd = std_dev(data)?;
    let m = mean(data)?;
    if sd == 0.0 {
        return Ok(Interval::point(m));
    }
    let half_width = t_critical(alpha, (n - 1) as f64)? * sd / (n as f64).sqrt();
    Ok(Interval::new(m - half_width, m + half_width))
}

/// Empirical `[alpha/2, 1 - alpha/2]` percentile interval of the observations.
pub fn percentile_interval(data: &[f64], alpha: f64) -> Result<Interval> {
    check_alpha(alpha)?;
    if data.len() < 2 {
        return Err(Error::insufficient(2, data.len()));
    }
    let q = compute_quantiles(data, &[alpha / 2.0, 1.0 - alpha / 2.0]);
    Ok(Interval::new(q[0], q[1]))
}

/// Summary of one outcome vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStat {
    /// Outcome label.
    pub name: String,
    /// Number of observations.
    pub n: usize,
    /// Sample mean.
    pub mean: f64,
    /// Sample variance.
    pub variance: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Significance level the intervals were computed at.
    pub alpha: f64,
    /// t-based confidence interval for the mean.
    pub confidence_interval: Interval,
    /// Empirical percentile interval of the observations.
    pub percentile_interval: Interval,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
}

impl SummaryStat {
    /// Summarise `data`. Needs at least two observations.
    pub fn compute(name: impl Into<String>, data: &[f64], alpha: f64) -> Result<Self> {
        let variance = variance(data)?;
        let (min, max) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        Ok(Self {
            name: name.into(),
            n: data.len(),
            mean: mean(data)?,
            variance,
            std_dev: variance.sqrt(),
            alpha,
            confidence_interval: t_confidence_interval(data, alpha)?,
            percentile_interval: percentile_interval(data, alpha)?,
            min,
            max,
        })
    }

    /// Half-width of the t confidence interval.
    pub fn margin_of_error(&self) -> f64 {
        self.confidence_interval.width() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data).unwrap() - 5.0).abs() < 1e-12);
        assert!((variance(&data).unwrap() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_vector_has_zero_width_ci() {
        let data = vec![0.1; 37];
        assert_eq!(mean(&data).unwrap(), 0.1);
        let ci = t_confidence_interval(&data, 0.05).unwrap();
        assert_eq!(ci.width(), 0.0);
        assert_eq!(ci.lower, 0.1);
    }

    #[test]
    fn test_t_ci_known_value() {
        // n = 5, mean 3, sd = sqrt(2.5); t_{0.975, 4} = 2.776445
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ci = t_confidence_interval(&data, 0.05).unwrap();
        let half = 2.776445105 * 2.5_f64.sqrt() / 5.0_f64.sqrt();
        assert!((ci.lower - (3.0 - half)).abs() < 1e-5);
        assert!((ci.upper - (3.0 + half)).abs() < 1e-5);
    }

    #[test]
    fn test_wider_interval_at_smaller_alpha() {
        let data: Vec<f64> = (0..50).map(|x| (x as f64).sin()).collect();
        let ci95 = t_confidence_interval(&data, 0.05).unwrap();
        let ci99 = t_confidence_interval(&data, 0.01).unwrap();
        assert!(ci99.width() > ci95.width());
        assert!(ci99.contains(mean(&data).unwrap()));
    }

    #[test]
    fn test_insufficient_data() {
        assert!(matches!(mean(&[]), Err(Error::InsufficientData { needed: 1, got: 0 })));
        assert!(matches!(
            t_confidence_interval(&[1.0], 0.05),
            Err(Error::InsufficientData { needed: 2, got: 1 })
        ));
        assert!(SummaryStat::compute("x", &[1.0], 0.05).is_err());
    }

    #[test]
    fn test_bad_alpha() {
        assert!(matches!(
            t_confidence_interval(&[1.0, 2.0], 1.5),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_summary_stat() {
        let data: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let stat = SummaryStat::compute("ages", &data, 0.05).unwrap();
        assert_eq!(stat.n, 100);
        assert_eq!(stat.min, 1.0);
        assert_eq!(stat.max, 100.0);
        assert!((stat.mean - 50.5).abs() < 1e-12);
        assert!(stat.confidence_interval.contains(50.5));
        assert!(stat.percentile_interval.lower < stat.confidence_interval.lower);
        assert!((stat.percentile_interval.lower - 3.475).abs() < 1e-9);
    }

    #[test]
    fn test_interval_helpers() {
        let a = Interval::new(3.0, 1.0);
        assert_eq!(a.lower, 1.0);
        assert!(a.overlaps(&Interval::new(2.5, 4.0)));
        assert!(!a.overlaps(&Interval::point(3.5)));
    }
}
