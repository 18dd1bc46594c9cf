// ---------------------------------------------------------------------------
// Spectrum – one parsed instrument file
// ---------------------------------------------------------------------------

/// A single reflectance spectrum as read from one instrument file.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Wavelength axis in nanometers, ascending.
    pub nanometers: Vec<f64>,
    /// Reflectance values – same length as `nanometers`.
    pub reflectances: Vec<f64>,
}

impl Spectrum {
    /// Number of measured points.
    pub fn len(&self) -> usize {
        self.nanometers.len()
    }

    /// Whether the spectrum holds no points.
    pub fn is_empty(&self) -> bool {
        self.nanometers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Grid – the shared uniform wavelength axis
// ---------------------------------------------------------------------------

/// The uniform wavelength grid all spectra are resampled onto.
///
/// The axis is half-open: points run `min_nm, min_nm + step_nm, ...` up to
/// but excluding `max_nm`, so `len == floor((max_nm - min_nm) / step_nm)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub min_nm: f64,
    pub max_nm: f64,
    pub step_nm: f64,
}

impl Grid {
    /// Number of grid points.
    pub fn len(&self) -> usize {
        // Nudge before flooring so 300.0 / 1.0 never lands on 299.999….
        ((self.max_nm - self.min_nm) / self.step_nm * (1.0 + 1e-12)).floor() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wavelength of the last grid point.
    pub fn last_nm(&self) -> f64 {
        self.min_nm + (self.len().saturating_sub(1)) as f64 * self.step_nm
    }

    /// Materialize the axis.
    pub fn points(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.min_nm + i as f64 * self.step_nm)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SpectrumMatrix – the resampled batch
// ---------------------------------------------------------------------------

/// The full resampled batch: one row per input file, all rows aligned to
/// the same wavelength grid. Row order follows input file order.
#[derive(Debug, Clone)]
pub struct SpectrumMatrix {
    /// Shared wavelength axis.
    pub grid: Vec<f64>,
    /// Per-row sample labels, derived from the source file names.
    pub labels: Vec<String>,
    /// Resampled reflectance rows – each the same length as `grid`.
    pub rows: Vec<Vec<f64>>,
}

impl SpectrumMatrix {
    pub fn new(grid: Vec<f64>) -> Self {
        SpectrumMatrix {
            grid,
            labels: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append one resampled spectrum. Rows are produced by resampling onto
    /// this matrix's grid, so a length mismatch is a programming error.
    pub fn push(&mut self, label: String, row: Vec<f64>) {
        debug_assert_eq!(row.len(), self.grid.len());
        self.labels.push(label);
        self.rows.push(row);
    }

    /// Number of samples (rows).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column-wise mean over all samples.
    pub fn mean(&self) -> Vec<f64> {
        let n = self.rows.len() as f64;
        (0..self.grid.len())
            .map(|j| self.rows.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect()
    }

    /// Column-wise population variance over all samples.
    pub fn variance(&self) -> Vec<f64> {
        let n = self.rows.len() as f64;
        let mean = self.mean();
        (0..self.grid.len())
            .map(|j| {
                self.rows
                    .iter()
                    .map(|row| (row[j] - mean[j]).powi(2))
                    .sum::<f64>()
                    / n
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_length_is_floor_of_span_over_step() {
        let grid = Grid {
            min_nm: 400.0,
            max_nm: 700.0,
            step_nm: 1.0,
        };
        assert_eq!(grid.len(), 300);
        let pts = grid.points();
        assert_eq!(pts.len(), 300);
        assert_eq!(pts[0], 400.0);
        assert_eq!(pts[299], 699.0);
        assert_eq!(grid.last_nm(), 699.0);
    }

    #[test]
    fn grid_excludes_upper_bound() {
        let grid = Grid {
            min_nm: 300.0,
            max_nm: 700.0,
            step_nm: 2.5,
        };
        assert_eq!(grid.len(), 160);
        assert!(grid.points().iter().all(|&nm| nm < 700.0));
    }

    #[test]
    fn matrix_mean_and_variance() {
        let mut m = SpectrumMatrix::new(vec![400.0, 401.0]);
        m.push("a".into(), vec![1.0, 10.0]);
        m.push("b".into(), vec![3.0, 10.0]);
        assert_eq!(m.mean(), vec![2.0, 10.0]);
        assert_eq!(m.variance(), vec![1.0, 0.0]);
    }
}
