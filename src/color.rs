use log::warn;
use serde::Serialize;

use crate::data::model::SpectrumMatrix;
use crate::error::ColorError;

// ---------------------------------------------------------------------------
// Conventions
// ---------------------------------------------------------------------------

/// The two scholarly band conventions the summary is computed under.
///
/// They differ only in the total-reflectance range and in whether the
/// ultraviolet band participates: Macedonia integrates from 325 nm and
/// carries U through chroma; Endler starts at 400 nm and excludes U (and
/// MU) from the metric entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Macedonia,
    Endler,
}

impl Convention {
    pub const ALL: [Convention; 2] = [Convention::Macedonia, Convention::Endler];

    /// Total-band range in nm, inclusive on both ends.
    fn qt_range(self) -> (f64, f64) {
        match self {
            Convention::Macedonia => (325.0, 700.0),
            Convention::Endler => (400.0, 700.0),
        }
    }

    fn uses_ultraviolet(self) -> bool {
        matches!(self, Convention::Macedonia)
    }

    pub fn name(self) -> &'static str {
        match self {
            Convention::Macedonia => "Macedonia",
            Convention::Endler => "Endler",
        }
    }
}

// Named band edges in nm. Lower-inclusive, upper-exclusive, except the red
// band which is closed at 700.
const U_BAND: (f64, f64) = (325.0, 400.0);
const B_BAND: (f64, f64) = (400.0, 475.0);
const G_BAND: (f64, f64) = (475.0, 550.0);
const Y_BAND: (f64, f64) = (550.0, 625.0);
const R_BAND: (f64, f64) = (625.0, 700.0);

// ---------------------------------------------------------------------------
// Per-sample result
// ---------------------------------------------------------------------------

/// The eleven colorimetric scalars for one sample under one convention.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColorMeasurement {
    /// Band fractions of total reflectance.
    pub u: f64,
    pub b: f64,
    pub g: f64,
    pub y: f64,
    pub r: f64,
    /// Raw summed reflectance over the convention's total range.
    pub qt: f64,
    /// Opponent differences.
    pub mu: f64,
    pub ms: f64,
    pub lm: f64,
    /// Chroma.
    pub c: f64,
    /// Hue angle in degrees; `NaN` when chroma is zero.
    pub h: f64,
}

impl ColorMeasurement {
    /// The fixed output ordering: `[U, B, G, Y, R, Qt, MU, MS, LM, C, H]`.
    pub fn as_row(&self) -> [f64; 11] {
        [
            self.u, self.b, self.g, self.y, self.r, self.qt, self.mu, self.ms, self.lm, self.c,
            self.h,
        ]
    }
}

/// Metric row names, in [`ColorMeasurement::as_row`] order.
pub const METRIC_NAMES: [&str; 11] = [
    "U (325-399nm)",
    "B (400-474nm)",
    "G (475-549nm)",
    "Y (550-624nm)",
    "R (625-700nm)",
    "Qt",
    "MU",
    "MS",
    "LM",
    "C",
    "H",
];

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// Hue angle in degrees from the opponent pair. Strict form: zero chroma
/// has no hue.
pub fn hue_degrees(lm: f64, c: f64) -> Result<f64, ColorError> {
    if c == 0.0 {
        return Err(ColorError::ZeroChroma);
    }
    // Rounding can push |LM / C| a hair past 1 when MS and MU vanish.
    Ok((lm / c).clamp(-1.0, 1.0).acos().to_degrees())
}

/// Reduce every sample of the matrix under one convention.
///
/// Numeric edge cases never fault: a zero total reflectance yields `NaN`
/// band fractions, and zero chroma yields the `NaN` hue sentinel; both are
/// logged with the sample's label.
pub fn reduce(matrix: &SpectrumMatrix, convention: Convention) -> Vec<ColorMeasurement> {
    matrix
        .rows
        .iter()
        .zip(matrix.labels.iter())
        .map(|(row, label)| reduce_sample(&matrix.grid, row, label, convention))
        .collect()
}

fn reduce_sample(
    grid: &[f64],
    row: &[f64],
    label: &str,
    convention: Convention,
) -> ColorMeasurement {
    let (qt_lo, qt_hi) = convention.qt_range();
    let qt_sum = band_sum(grid, row, |nm| nm >= qt_lo && nm <= qt_hi);
    if qt_sum == 0.0 {
        warn!("{label}: zero total reflectance in {qt_lo}-{qt_hi} nm, band fractions are NaN");
    }

    let fraction = |band: (f64, f64), closed_upper: bool| {
        let s = band_sum(grid, row, |nm| {
            nm >= band.0 && if closed_upper { nm <= band.1 } else { nm < band.1 }
        });
        s / qt_sum
    };

    let u = if convention.uses_ultraviolet() {
        fraction(U_BAND, false)
    } else {
        0.0
    };
    let b = fraction(B_BAND, false);
    let g = fraction(G_BAND, false);
    let y = fraction(Y_BAND, false);
    let r = fraction(R_BAND, true);

    let mu = if convention.uses_ultraviolet() {
        g - u
    } else {
        0.0
    };
    let ms = y - b;
    let lm = r - g;
    let c = match convention {
        Convention::Macedonia => (lm * lm + ms * ms + mu * mu).sqrt(),
        Convention::Endler => (lm * lm + ms * ms).sqrt(),
    };
    let h = match hue_degrees(lm, c) {
        Ok(h) => h,
        Err(ColorError::ZeroChroma) => {
            warn!("{label}: chroma is zero, hue is undefined ({} convention)", convention.name());
            f64::NAN
        }
    };

    ColorMeasurement {
        u,
        b,
        g,
        y,
        r,
        qt: qt_sum,
        mu,
        ms,
        lm,
        c,
        h,
    }
}

fn band_sum(grid: &[f64], row: &[f64], in_band: impl Fn(f64) -> bool) -> f64 {
    grid.iter()
        .zip(row.iter())
        .filter(|(&nm, _)| in_band(nm))
        .map(|(_, &v)| v)
        .sum()
}
