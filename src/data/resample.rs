use crate::error::{InterpolationError, MIN_SPLINE_POINTS};

use super::model::{Grid, Spectrum};

// ---------------------------------------------------------------------------
// Natural cubic spline
// ---------------------------------------------------------------------------

/// A natural cubic spline through the measured points: piecewise cubics
/// with continuous first and second derivatives, second derivative zero at
/// the end knots. Exact interpolation – the curve passes through every
/// measurement.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Knot x values, strictly increasing.
    xs: Vec<f64>,
    /// Knot y values.
    ys: Vec<f64>,
    /// Second derivatives at each knot, computed at construction.
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `(xs, ys)` pairs.
    pub fn fit(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolationError> {
        debug_assert_eq!(xs.len(), ys.len());
        if xs.len() < MIN_SPLINE_POINTS {
            return Err(InterpolationError::TooFewPoints(xs.len()));
        }
        for i in 1..xs.len() {
            if xs[i] <= xs[i - 1] {
                return Err(InterpolationError::NotIncreasing(i));
            }
        }

        let n = xs.len();
        let mut y2s = vec![0.0; n];
        let mut u = vec![0.0; n - 1];

        // Forward sweep of the tridiagonal system.
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2s[i - 1] + 2.0;
            y2s[i] = (sig - 1.0) / p;
            u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        // Back substitution.
        for k in (0..n - 2).rev() {
            y2s[k + 1] = y2s[k + 1] * y2s[k + 2] + u[k + 1];
        }

        Ok(CubicSpline { xs, ys, y2s })
    }

    /// Evaluate the spline at `x`. Callers guarantee `x` lies within the
    /// knot range; values outside use the boundary polynomial.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();

        // Binary search for the enclosing interval.
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * h * h / 6.0
    }
}

// ---------------------------------------------------------------------------
// Resampling onto the shared grid
// ---------------------------------------------------------------------------

/// Resample a parsed spectrum onto the uniform grid.
///
/// Extrapolation is refused: every grid point must lie within the measured
/// wavelength range, otherwise [`InterpolationError::OutOfRange`].
pub fn resample(spectrum: &Spectrum, grid: &Grid) -> Result<Vec<f64>, InterpolationError> {
    if spectrum.len() < MIN_SPLINE_POINTS {
        return Err(InterpolationError::TooFewPoints(spectrum.len()));
    }

    let data_min = spectrum.nanometers[0];
    let data_max = spectrum.nanometers[spectrum.len() - 1];
    if grid.min_nm < data_min || grid.last_nm() > data_max {
        return Err(InterpolationError::OutOfRange {
            grid_min: grid.min_nm,
            grid_max: grid.last_nm(),
            data_min,
            data_max,
        });
    }

    let spline = CubicSpline::fit(spectrum.nanometers.clone(), spectrum.reflectances.clone())?;
    Ok(grid.points().iter().map(|&nm| spline.evaluate(nm)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(nanometers: Vec<f64>, reflectances: Vec<f64>) -> Spectrum {
        Spectrum {
            nanometers,
            reflectances,
        }
    }

    #[test]
    fn spline_passes_through_knots() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = vec![2.0, 3.0, 5.0, 4.0, 1.0];
        let spline = CubicSpline::fit(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((spline.evaluate(*x) - y).abs() < 1e-10);
        }
    }

    #[test]
    fn resampling_gridded_linear_data_is_identity() {
        // Linear data is reproduced exactly by a natural spline, so
        // resampling onto the very grid the data sits on returns it.
        let nm: Vec<f64> = (0..301).map(|i| 400.0 + i as f64).collect();
        let refl: Vec<f64> = nm.iter().map(|&x| 0.05 * x - 10.0).collect();
        let sp = spectrum(nm.clone(), refl.clone());
        let grid = Grid {
            min_nm: 400.0,
            max_nm: 700.0,
            step_nm: 1.0,
        };

        let out = resample(&sp, &grid).unwrap();
        assert_eq!(out.len(), 300);
        for (o, r) in out.iter().zip(refl.iter()) {
            assert!((o - r).abs() < 1e-9);
        }
    }

    #[test]
    fn too_few_points_is_rejected() {
        let sp = spectrum(vec![400.0, 500.0, 600.0], vec![1.0, 2.0, 3.0]);
        let grid = Grid {
            min_nm: 400.0,
            max_nm: 600.0,
            step_nm: 1.0,
        };
        assert!(matches!(
            resample(&sp, &grid),
            Err(InterpolationError::TooFewPoints(3))
        ));
    }

    #[test]
    fn duplicate_wavelengths_are_rejected() {
        let err = CubicSpline::fit(
            vec![400.0, 450.0, 450.0, 500.0],
            vec![1.0, 2.0, 2.0, 3.0],
        )
        .unwrap_err();
        assert!(matches!(err, InterpolationError::NotIncreasing(2)));
    }

    #[test]
    fn extrapolation_is_refused() {
        let sp = spectrum(
            vec![420.0, 450.0, 500.0, 550.0, 600.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        );
        let grid = Grid {
            min_nm: 400.0,
            max_nm: 600.0,
            step_nm: 1.0,
        };
        assert!(matches!(
            resample(&sp, &grid),
            Err(InterpolationError::OutOfRange { .. })
        ));
    }
}
