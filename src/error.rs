use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Per-stage error kinds
// ---------------------------------------------------------------------------

/// Failures while reading one instrument file into a [`Spectrum`].
///
/// [`Spectrum`]: crate::data::model::Spectrum
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    /// A data line with fewer than the two required tokens.
    #[error("line {line}: expected `wavelength reflectance`, got {got:?}")]
    MalformedLine { line: usize, got: String },

    #[error("line {line}: {token:?} is not a number")]
    BadNumber { line: usize, token: String },

    /// Nothing survived the wavelength filter — there is nothing to
    /// interpolate downstream.
    #[error("no data lines within {min_nm}-{max_nm} nm")]
    Empty { min_nm: f64, max_nm: f64 },
}

/// Failures while fitting or evaluating the interpolating spline.
#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("cubic spline needs at least {MIN_SPLINE_POINTS} points, got {0}")]
    TooFewPoints(usize),

    #[error("wavelengths must be strictly increasing (violated at index {0})")]
    NotIncreasing(usize),

    /// Extrapolation is not supported: the grid must lie entirely inside
    /// the measured wavelength range.
    #[error(
        "grid {grid_min}-{grid_max} nm extends outside measured range \
         {data_min}-{data_max} nm"
    )]
    OutOfRange {
        grid_min: f64,
        grid_max: f64,
        data_min: f64,
        data_max: f64,
    },
}

/// Minimum point count for a cubic spline fit.
pub const MIN_SPLINE_POINTS: usize = 4;

/// Failures of the windowed smoothing filter.
#[derive(Debug, Error)]
pub enum SmoothError {
    #[error("signal of {signal_len} samples is shorter than window of {window_len}")]
    SignalTooShort {
        signal_len: usize,
        window_len: usize,
    },
}

/// Failures of the colorimetric reduction.
#[derive(Debug, Error)]
pub enum ColorError {
    /// `H = degrees(acos(LM / C))` has no value when `C == 0`.
    #[error("hue is undefined when chroma is zero")]
    ZeroChroma,
}

// ---------------------------------------------------------------------------
// Batch-level error: a stage failure tagged with the offending file
// ---------------------------------------------------------------------------

/// A pipeline failure, carrying the identity of the file it occurred on so
/// batch reports can name the culprit.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: {source}", path.display())]
    Interpolation {
        path: PathBuf,
        #[source]
        source: InterpolationError,
    },

    #[error("{}: {source}", path.display())]
    Smooth {
        path: PathBuf,
        #[source]
        source: SmoothError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Every file in the batch failed (or the file list was empty).
    #[error("no input file produced a spectrum")]
    EmptyBatch,
}
