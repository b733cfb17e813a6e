//! Forecaster - next-period spending estimate
//!
//! Fits an ordinary least squares line of spend against period index
//! (0, 1, 2, ...) and evaluates it at the next index. Degenerate histories
//! are answered algebraically before the regression runs:
//! - no points → 0
//! - one point → that point
//! - all points equal → that value (slope is zero)
//!
//! The estimate is floored at zero.

use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use tracing::{debug, warn};

use crate::models::MonthlyAggregate;

/// How an estimate was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// No history
    Empty,
    /// Arithmetic mean (too few points, or the regression was unusable)
    Mean,
    /// Zero-variance history
    Constant,
    /// Extrapolated least squares trend
    LinearTrend,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Empty => "empty",
            ForecastMethod::Mean => "mean",
            ForecastMethod::Constant => "constant",
            ForecastMethod::LinearTrend => "linear_trend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub estimate: f64,
    pub method: ForecastMethod,
}

/// Estimate next period's spend from chronological per-period sums
pub fn predict_next_period(history: &[f64]) -> f64 {
    forecast(history).estimate
}

/// Forecast from monthly aggregates (must be chronological)
pub fn forecast_monthly(monthly: &[MonthlyAggregate]) -> Forecast {
    let history: Vec<f64> = monthly.iter().map(|m| m.amount).collect();
    forecast(&history)
}

pub fn forecast(history: &[f64]) -> Forecast {
    let result = match history {
        [] => Forecast {
            estimate: 0.0,
            method: ForecastMethod::Empty,
        },
        [only] => Forecast {
            estimate: *only,
            method: ForecastMethod::Mean,
        },
        [first, rest @ ..] if rest.iter().all(|v| v == first) => Forecast {
            estimate: *first,
            method: ForecastMethod::Constant,
        },
        _ => match linear_trend(history) {
            Some(estimate) => Forecast {
                estimate,
                method: ForecastMethod::LinearTrend,
            },
            None => Forecast {
                estimate: mean(history),
                method: ForecastMethod::Mean,
            },
        },
    };

    let clamped = Forecast {
        estimate: clamp_estimate(result.estimate),
        ..result
    };

    debug!(
        points = history.len(),
        method = clamped.method.as_str(),
        estimate = clamped.estimate,
        "Forecast next period"
    );

    clamped
}

fn clamp_estimate(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Fit spend ~ index and evaluate at `history.len()`. `None` if the
/// library rejects the fit or produces a non-finite value.
fn linear_trend(history: &[f64]) -> Option<f64> {
    let x_rows: Vec<Vec<f64>> = (0..history.len()).map(|i| vec![i as f64]).collect();
    let x = DenseMatrix::from_2d_vec(&x_rows);
    let y: Vec<f64> = history.to_vec();

    let parameters =
        LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::QR);

    let model = match LinearRegression::fit(&x, &y, parameters) {
        Ok(model) => model,
        Err(e) => {
            warn!(error = %e, "Linear regression fit failed, using mean");
            return None;
        }
    };

    let next = DenseMatrix::from_2d_vec(&vec![vec![history.len() as f64]]);
    let predicted: Vec<f64> = match model.predict(&next) {
        Ok(predicted) => predicted,
        Err(e) => {
            warn!(error = %e, "Linear regression predict failed, using mean");
            return None;
        }
    };

    predicted.first().copied().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_empty_history_is_zero() {
        assert_eq!(predict_next_period(&[]), 0.0);
        assert_eq!(forecast(&[]).method, ForecastMethod::Empty);
    }

    #[test]
    fn test_single_point_is_that_point() {
        assert_eq!(predict_next_period(&[1234.5]), 1234.5);
        assert_eq!(forecast(&[1234.5]).method, ForecastMethod::Mean);
    }

    #[test]
    fn test_constant_history_is_constant() {
        for c in [0.0, 1.0, 42.5, 10_000.0] {
            let f = forecast(&[c, c, c]);
            assert_eq!(f.estimate, c);
            assert_eq!(f.method, ForecastMethod::Constant);
        }
    }

    #[test]
    fn test_linear_trend_extrapolates() {
        let f = forecast(&[100.0, 200.0, 300.0]);
        assert_eq!(f.method, ForecastMethod::LinearTrend);
        assert!(approx(f.estimate, 400.0), "got {}", f.estimate);

        // Two points define the line exactly
        assert!(approx(predict_next_period(&[500.0, 700.0]), 900.0));
    }

    #[test]
    fn test_noisy_trend_matches_closed_form() {
        let history = [120.0, 90.0, 160.0, 150.0, 210.0];
        let n = history.len() as f64;
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = history.iter().sum::<f64>() / n;
        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (i, y) in history.iter().enumerate() {
            sxy += (i as f64 - x_mean) * (y - y_mean);
            sxx += (i as f64 - x_mean).powi(2);
        }
        let slope = sxy / sxx;
        let expected = y_mean + slope * (n - x_mean);

        assert!(approx(predict_next_period(&history), expected));
    }

    #[test]
    fn test_declining_trend_floors_at_zero() {
        assert_eq!(predict_next_period(&[300.0, 200.0, 100.0, 0.0]), 0.0);
        assert_eq!(predict_next_period(&[1000.0, 10.0]), 0.0);
    }

    #[test]
    fn test_never_negative() {
        let histories: [&[f64]; 5] = [
            &[-5.0],
            &[-5.0, -5.0],
            &[50.0, -500.0, 20.0],
            &[1e9, 0.0, 1e9, 0.0],
            &[0.0, 0.0, 0.0, 1.0],
        ];
        for history in histories {
            assert!(predict_next_period(history) >= 0.0, "{:?}", history);
        }
    }

    #[test]
    fn test_forecast_monthly_uses_amounts_in_order() {
        let monthly = vec![
            MonthlyAggregate {
                period: Period::new(2024, 1).unwrap(),
                amount: 100.0,
            },
            MonthlyAggregate {
                period: Period::new(2024, 2).unwrap(),
                amount: 150.0,
            },
        ];
        assert!(approx(forecast_monthly(&monthly).estimate, 200.0));
    }
}
