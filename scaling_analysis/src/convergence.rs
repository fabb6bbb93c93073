use crate::AnalysisError;
use crate::error_series::ErrorSeries;
use itertools::Itertools;

/// Least-squares line through `(ln(total_darts), ln(error))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLogFit {
    pub slope: f64,
    pub intercept: f64,
}

pub fn fit_log_log(series: &ErrorSeries) -> Result<LogLogFit, AnalysisError> {
    if series.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            points: series.len(),
        });
    }
    for point in &series.points {
        if point.total_darts == 0 {
            return Err(AnalysisError::NonPositiveValue {
                quantity: "total_darts",
                value: 0.0,
            });
        }
        if !(point.error > 0.0) {
            return Err(AnalysisError::NonPositiveValue {
                quantity: "error",
                value: point.error,
            });
        }
    }
    let distinct = series.points.iter().map(|p| p.total_darts).unique().count();
    if distinct < 2 {
        return Err(AnalysisError::InsufficientData { points: distinct });
    }

    let xs: Vec<f64> = series
        .points
        .iter()
        .map(|p| (p.total_darts as f64).ln())
        .collect();
    let ys: Vec<f64> = series.points.iter().map(|p| p.error.ln()).collect();
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let (sxy, sxx) = xs.iter().zip(&ys).fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - x_mean;
        (sxy + dx * (y - y_mean), sxx + dx * dx)
    });

    let slope = sxy / sxx;
    Ok(LogLogFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Empirical convergence exponent of the error, about -0.5 for Monte-Carlo sampling.
pub fn compute_convergence_rate(series: &ErrorSeries) -> Result<f64, AnalysisError> {
    fit_log_log(series).map(|fit| fit.slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_series::ErrorPoint;

    fn series(points: &[(u64, f64)]) -> ErrorSeries {
        ErrorSeries {
            ranks: 1,
            points: points
                .iter()
                .map(|&(total_darts, error)| ErrorPoint { total_darts, error })
                .collect(),
        }
    }

    #[test]
    fn perfect_inverse_slope() {
        let rate =
            compute_convergence_rate(&series(&[(10, 0.1), (100, 0.01), (1000, 0.001)])).unwrap();
        assert!((rate + 1.0).abs() < 1e-9, "rate = {}", rate);
    }

    #[test]
    fn monte_carlo_slope_and_intercept() {
        let points: Vec<(u64, f64)> = [1000u64, 10_000, 100_000, 1_000_000]
            .iter()
            .map(|&n| (n, 2.0 / (n as f64).sqrt()))
            .collect();
        let fit = fit_log_log(&series(&points)).unwrap();
        assert!((fit.slope + 0.5).abs() < 1e-9);
        assert!((fit.intercept - 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn matches_least_squares_on_noisy_data() {
        // y = ln(error), x = ln(darts); hand-computed regression over 3 points
        let points = [(1u64, 1.0f64), (10, 0.5), (100, 0.05)];
        let xs: Vec<f64> = points.iter().map(|p| (p.0 as f64).ln()).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1.ln()).collect();
        let xm = xs.iter().sum::<f64>() / 3.0;
        let ym = ys.iter().sum::<f64>() / 3.0;
        let num: f64 = (0..3).map(|i| (xs[i] - xm) * (ys[i] - ym)).sum();
        let den: f64 = (0..3).map(|i| (xs[i] - xm) * (xs[i] - xm)).sum();
        let rate = compute_convergence_rate(&series(&points)).unwrap();
        assert!((rate - num / den).abs() <= 1e-9 * (num / den).abs());
    }

    #[test]
    fn single_point_is_insufficient() {
        assert_eq!(
            compute_convergence_rate(&series(&[(10, 0.1)])),
            Err(AnalysisError::InsufficientData { points: 1 })
        );
        assert_eq!(
            compute_convergence_rate(&series(&[])),
            Err(AnalysisError::InsufficientData { points: 0 })
        );
    }

    #[test]
    fn repeated_dart_count_is_insufficient() {
        assert_eq!(
            compute_convergence_rate(&series(&[(10, 0.1), (10, 0.2)])),
            Err(AnalysisError::InsufficientData { points: 1 })
        );
    }

    #[test]
    fn zero_error_is_rejected() {
        assert_eq!(
            compute_convergence_rate(&series(&[(10, 0.1), (100, 0.0)])),
            Err(AnalysisError::NonPositiveValue {
                quantity: "error",
                value: 0.0
            })
        );
        assert_eq!(
            compute_convergence_rate(&series(&[(0, 0.1), (100, 0.01)])),
            Err(AnalysisError::NonPositiveValue {
                quantity: "total_darts",
                value: 0.0
            })
        );
    }
}
