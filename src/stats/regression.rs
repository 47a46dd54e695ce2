//! Trend Regression Module
//! Ordinary least squares of yearly incident counts on year, with inference
//! via Student's t.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

/// Years at or past the cutoff are excluded from the fit.
pub const YEAR_CUTOFF: i32 = 2020;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("need at least 3 points for a trend fit, got {0}")]
    TooFewPoints(usize),
    #[error("all predictor values are identical")]
    ZeroVariance,
}

/// Fitted two-parameter OLS model with closed-form inference.
#[derive(Debug, Clone, Serialize)]
pub struct OlsFit {
    pub n: usize,
    pub intercept: f64,
    pub slope: f64,
    pub intercept_se: f64,
    pub slope_se: f64,
    pub intercept_p: f64,
    pub slope_p: f64,
    pub adj_r_squared: f64,
}

impl OlsFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fits the yearly trend model.
pub struct Regressor;

impl Regressor {
    /// Fit count-on-year OLS over the pre-cutoff portion of the yearly
    /// aggregate. Rows with `year >= YEAR_CUTOFF` never reach the fit.
    pub fn fit_yearly_trend(by_year: &[(i32, usize)]) -> Result<OlsFit, FitError> {
        let points: Vec<(f64, f64)> = by_year
            .iter()
            .filter(|&&(year, _)| year < YEAR_CUTOFF)
            .map(|&(year, count)| (f64::from(year), count as f64))
            .collect();
        Self::fit(&points)
    }

    /// Closed-form simple linear regression with intercept.
    ///
    /// Requires at least 3 points: with n <= 2 the residual degrees of
    /// freedom are 0 and the standard errors are undefined.
    pub fn fit(points: &[(f64, f64)]) -> Result<OlsFit, FitError> {
        let n = points.len();
        if n < 3 {
            return Err(FitError::TooFewPoints(n));
        }
        let nf = n as f64;

        let x_mean = points.iter().map(|p| p.0).sum::<f64>() / nf;
        let y_mean = points.iter().map(|p| p.1).sum::<f64>() / nf;

        let sxx: f64 = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
        if sxx == 0.0 {
            return Err(FitError::ZeroVariance);
        }
        let sxy: f64 = points
            .iter()
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum();

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let sse: f64 = points
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let sst: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();

        let df = nf - 2.0;
        let residual_var = sse / df;
        let slope_se = (residual_var / sxx).sqrt();
        let intercept_se = (residual_var * (1.0 / nf + x_mean.powi(2) / sxx)).sqrt();

        let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };
        let adj_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / df;

        Ok(OlsFit {
            n,
            intercept,
            slope,
            intercept_se,
            slope_se,
            intercept_p: Self::two_sided_p(intercept, intercept_se, df),
            slope_p: Self::two_sided_p(slope, slope_se, df),
            adj_r_squared,
        })
    }

    /// Two-tailed p-value for estimate/se under Student's t.
    fn two_sided_p(estimate: f64, se: f64, df: f64) -> f64 {
        if se == 0.0 {
            // Exact fit: the estimate is either exactly zero or exactly not.
            return if estimate == 0.0 { 1.0 } else { 0.0 };
        }
        let t = estimate / se;
        if let Ok(dist) = StudentsT::new(0.0, 1.0, df) {
            2.0 * (1.0 - dist.cdf(t.abs()))
        } else {
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_an_exact_line() {
        let points: Vec<(f64, f64)> = (2010..2020)
            .map(|year| (f64::from(year), 2.0 * f64::from(year) + 1.0))
            .collect();
        let fit = Regressor::fit(&points).unwrap();

        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.adj_r_squared - 1.0).abs() < 1e-9);
        assert!(fit.slope_p < 1e-9);
    }

    #[test]
    fn matches_hand_computed_noisy_fit() {
        // slope = 0.8, intercept = 1.4, sse = 3.6, df = 3 by hand.
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0), (4.0, 4.0)];
        let fit = Regressor::fit(&points).unwrap();

        assert!((fit.slope - 0.8).abs() < 1e-9);
        assert!((fit.intercept - 1.4).abs() < 1e-9);
        assert!((fit.slope_se - (1.2f64 / 10.0).sqrt()).abs() < 1e-9);
        // t = 0.8 / 0.34641 = 2.3094 on 3 degrees of freedom.
        assert!((fit.slope_p - 0.1046).abs() < 5e-3);
    }

    #[test]
    fn cutoff_years_never_influence_the_fit() {
        let mut by_year: Vec<(i32, usize)> = (2010..2020)
            .map(|year| (year, (year - 2000) as usize * 10))
            .collect();
        let baseline = Regressor::fit_yearly_trend(&by_year).unwrap();

        by_year.push((2020, 100_000));
        by_year.push((2021, 1));
        let with_cutoff_rows = Regressor::fit_yearly_trend(&by_year).unwrap();

        assert_eq!(baseline.n, with_cutoff_rows.n);
        assert_eq!(baseline.slope, with_cutoff_rows.slope);
        assert_eq!(baseline.intercept, with_cutoff_rows.intercept);
    }

    #[test]
    fn single_pre_cutoff_point_is_degenerate() {
        let by_year = vec![(2019, 2), (2020, 1)];
        match Regressor::fit_yearly_trend(&by_year) {
            Err(FitError::TooFewPoints(1)) => {}
            other => panic!("expected TooFewPoints(1), got {other:?}"),
        }
    }

    #[test]
    fn identical_predictors_are_degenerate() {
        let points = [(5.0, 1.0), (5.0, 2.0), (5.0, 3.0)];
        match Regressor::fit(&points) {
            Err(FitError::ZeroVariance) => {}
            other => panic!("expected ZeroVariance, got {other:?}"),
        }
    }

    #[test]
    fn fit_is_deterministic() {
        let points: Vec<(f64, f64)> = (2006..2020)
            .map(|year| (f64::from(year), f64::from((year * 37) % 100)))
            .collect();
        let a = Regressor::fit(&points).unwrap();
        let b = Regressor::fit(&points).unwrap();

        assert_eq!(a.slope, b.slope);
        assert_eq!(a.intercept, b.intercept);
        assert_eq!(a.slope_p, b.slope_p);
        assert_eq!(a.adj_r_squared, b.adj_r_squared);
    }
}
