//! Interpolating cubic spline with not-a-knot end conditions.
//!
//! The spline is stored as its knot values plus the second derivative at each
//! knot. The not-a-knot condition makes the third derivative continuous across
//! the second and the second-to-last knots, so four knots produce a single
//! cubic through all of them and any cubic is reproduced exactly.

use crate::error::{DspError, DspResult};

/// Minimum number of knots for a not-a-knot cubic.
pub const MIN_KNOTS: usize = 4;

/// A piecewise-cubic C2 interpolant through a set of knots.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second: Vec<f64>,
}

impl CubicSpline {
    /// Fits a not-a-knot spline through `(xs[i], ys[i])`.
    ///
    /// `xs` must be strictly increasing and hold at least [`MIN_KNOTS`] values.
    pub fn not_a_knot(xs: Vec<f64>, ys: Vec<f64>) -> DspResult<Self> {
        if xs.len() != ys.len() {
            return Err(DspError::invalid_param(
                "knots",
                format!("{} x values but {} y values", xs.len(), ys.len()),
            ));
        }
        let n = xs.len();
        if n < MIN_KNOTS {
            return Err(DspError::TooFewKnots { count: n });
        }
        if let Some(index) = xs.windows(2).position(|w| w[1] <= w[0]) {
            return Err(DspError::UnsortedKnots { index: index + 1 });
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let mut matrix = vec![vec![0.0; n]; n];
        let mut rhs = vec![0.0; n];

        // Third derivative continuous at xs[1]
        matrix[0][0] = h[1];
        matrix[0][1] = -(h[0] + h[1]);
        matrix[0][2] = h[0];

        for i in 1..n - 1 {
            matrix[i][i - 1] = h[i - 1];
            matrix[i][i] = 2.0 * (h[i - 1] + h[i]);
            matrix[i][i + 1] = h[i];
            rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
        }

        // Third derivative continuous at xs[n - 2]
        matrix[n - 1][n - 3] = h[n - 2];
        matrix[n - 1][n - 2] = -(h[n - 3] + h[n - 2]);
        matrix[n - 1][n - 1] = h[n - 3];

        let second = solve_dense(matrix, rhs)?;

        Ok(Self { xs, ys, second })
    }

    /// Evaluates the spline at `x`.
    ///
    /// Values outside the knot range extend the outermost cubic piece.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = self
            .xs
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(n - 2);

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.second[i], self.second[i + 1]);
        let h = x1 - x0;
        let a = x1 - x;
        let b = x - x0;

        m0 * a * a * a / (6.0 * h)
            + m1 * b * b * b / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }

    /// Knot positions.
    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    /// Knot values.
    pub fn values(&self) -> &[f64] {
        &self.ys
    }

    /// First and last knot.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

/// Solves `matrix * x = rhs` by Gaussian elimination with partial pivoting.
fn solve_dense(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> DspResult<Vec<f64>> {
    let n = rhs.len();
    let scale = matrix
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale * f64::EPSILON * n as f64;

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);
        let pivot = matrix[pivot_row][col];
        if !pivot.is_finite() || pivot.abs() <= tolerance {
            return Err(DspError::SingularSystem);
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row][k] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(x: f64) -> f64 {
        0.5 * x * x * x - 2.0 * x * x + 3.0 * x - 1.0
    }

    #[test]
    fn test_passes_through_knots() {
        let xs = vec![0.0, 125.0, 500.0, 1000.0, 4000.0, 8000.0];
        let ys = vec![5.0, 5.0, 12.0, 20.0, 35.0, 35.0];
        let spline = CubicSpline::not_a_knot(xs.clone(), ys.clone()).unwrap();

        for (x, y) in xs.iter().zip(&ys) {
            assert!((spline.eval(*x) - y).abs() < 1e-9, "at {}: {}", x, spline.eval(*x));
        }
    }

    #[test]
    fn test_reproduces_cubic_exactly() {
        let xs = vec![-1.0, 0.5, 2.0, 3.0, 4.5];
        let ys: Vec<f64> = xs.iter().map(|&x| cubic(x)).collect();
        let spline = CubicSpline::not_a_knot(xs, ys).unwrap();

        for i in 0..=50 {
            let x = -1.0 + i as f64 * 0.11;
            assert!((spline.eval(x) - cubic(x)).abs() < 1e-9, "at {}", x);
        }
    }

    #[test]
    fn test_four_knots_is_single_cubic() {
        let xs = vec![0.0, 1.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|&x| cubic(x)).collect();
        let spline = CubicSpline::not_a_knot(xs, ys).unwrap();

        assert!((spline.eval(2.0) - cubic(2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_constant_data_stays_constant() {
        let spline =
            CubicSpline::not_a_knot(vec![0.0, 10.0, 50.0, 300.0, 900.0], vec![7.0; 5]).unwrap();
        for x in [0.0, 3.3, 49.0, 512.0, 900.0] {
            assert!((spline.eval(x) - 7.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_too_few_knots() {
        let err = CubicSpline::not_a_knot(vec![0.0, 1.0, 2.0], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, DspError::TooFewKnots { count: 3 }));
    }

    #[test]
    fn test_unsorted_knots() {
        let err =
            CubicSpline::not_a_knot(vec![0.0, 2.0, 2.0, 3.0], vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, DspError::UnsortedKnots { index: 2 }));
    }

    #[test]
    fn test_domain() {
        let spline = CubicSpline::not_a_knot(vec![0.0, 1.0, 2.0, 44100.0], vec![0.0; 4]).unwrap();
        assert_eq!(spline.domain(), (0.0, 44100.0));
    }
}
