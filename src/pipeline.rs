use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::data::model::{Grid, SpectrumMatrix};
use crate::data::parser::{self, ParseOptions};
use crate::data::resample;
use crate::data::smooth::{self, WindowKind};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Optional smoothing stage.
#[derive(Debug, Clone, Copy)]
pub struct Smoothing {
    pub kind: WindowKind,
    pub window_len: usize,
}

/// What to do when one file of a batch fails: abort the whole run, or
/// record the failure and keep going. This is the single policy point –
/// nothing downstream makes its own per-call choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    Abort,
    Skip,
}

/// Everything the batch pipeline consumes. Built by the CLI (or a test);
/// the core never reads argv.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub min_nm: f64,
    pub max_nm: f64,
    pub step_nm: f64,
    pub has_header: bool,
    pub smoothing: Option<Smoothing>,
    pub on_error: ErrorPolicy,
}

impl PipelineConfig {
    pub fn grid(&self) -> Grid {
        Grid {
            min_nm: self.min_nm,
            max_nm: self.max_nm,
            step_nm: self.step_nm,
        }
    }

    /// Fail fast on nonsensical settings, before any file is opened.
    fn validate(&self) -> Result<(), PipelineError> {
        if !(self.min_nm < self.max_nm) {
            return Err(PipelineError::Config(format!(
                "min_nm ({}) must be below max_nm ({})",
                self.min_nm, self.max_nm
            )));
        }
        if !(self.step_nm > 0.0) {
            return Err(PipelineError::Config(format!(
                "step_nm ({}) must be positive",
                self.step_nm
            )));
        }
        if let Some(s) = &self.smoothing {
            if s.window_len > self.grid().len() {
                return Err(PipelineError::Config(format!(
                    "window length {} exceeds the {}-point grid",
                    s.window_len,
                    self.grid().len()
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Batch run
// ---------------------------------------------------------------------------

/// Outcome of a batch: the stacked matrix plus any files skipped under
/// [`ErrorPolicy::Skip`].
#[derive(Debug)]
pub struct BatchResult {
    pub matrix: SpectrumMatrix,
    pub skipped: Vec<(PathBuf, PipelineError)>,
}

/// Process a batch of instrument files into a [`SpectrumMatrix`].
///
/// Files are processed in the given order and rows keep that order. A file
/// that fails is either fatal ([`ErrorPolicy::Abort`]) or logged and
/// recorded in `skipped` ([`ErrorPolicy::Skip`]); a failed file never
/// contributes a partial row. A batch with no surviving rows is
/// [`PipelineError::EmptyBatch`].
pub fn run(files: &[PathBuf], cfg: &PipelineConfig) -> Result<BatchResult, PipelineError> {
    cfg.validate()?;

    let grid = cfg.grid();
    let mut matrix = SpectrumMatrix::new(grid.points());
    let mut skipped = Vec::new();

    for path in files {
        match process_one(path, cfg, &grid) {
            Ok((label, row)) => {
                info!("{}: {} points resampled", path.display(), row.len());
                matrix.push(label, row);
            }
            Err(err) => match cfg.on_error {
                ErrorPolicy::Abort => return Err(err),
                ErrorPolicy::Skip => {
                    warn!("skipping {err}");
                    skipped.push((path.clone(), err));
                }
            },
        }
    }

    if matrix.is_empty() {
        return Err(PipelineError::EmptyBatch);
    }

    Ok(BatchResult { matrix, skipped })
}

/// Parse → resample → optionally smooth one file.
fn process_one(
    path: &Path,
    cfg: &PipelineConfig,
    grid: &Grid,
) -> Result<(String, Vec<f64>), PipelineError> {
    // Parse one grid step beyond the grid on each side so the spline has
    // anchor knots outside it and never needs to extrapolate.
    let opts = ParseOptions {
        min_nm: cfg.min_nm - cfg.step_nm,
        max_nm: cfg.max_nm + cfg.step_nm,
        has_header: cfg.has_header,
    };

    let (spectrum, label) = parser::parse_file(path, &opts).map_err(|source| {
        PipelineError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut row = resample::resample(&spectrum, grid).map_err(|source| {
        PipelineError::Interpolation {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if let Some(s) = &cfg.smoothing {
        row = smooth::smooth(&row, s.window_len, s.kind).map_err(|source| {
            PipelineError::Smooth {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    Ok((label, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PipelineConfig {
        PipelineConfig {
            min_nm: 400.0,
            max_nm: 700.0,
            step_nm: 1.0,
            has_header: false,
            smoothing: None,
            on_error: ErrorPolicy::Abort,
        }
    }

    #[test]
    fn inverted_range_is_rejected_before_io() {
        let mut c = cfg();
        c.min_nm = 700.0;
        c.max_nm = 400.0;
        assert!(matches!(
            run(&[], &c),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn zero_step_is_rejected() {
        let mut c = cfg();
        c.step_nm = 0.0;
        assert!(matches!(run(&[], &c), Err(PipelineError::Config(_))));
    }

    #[test]
    fn oversized_window_is_rejected() {
        let mut c = cfg();
        c.smoothing = Some(Smoothing {
            kind: WindowKind::Hanning,
            window_len: 1000,
        });
        assert!(matches!(run(&[], &c), Err(PipelineError::Config(_))));
    }

    #[test]
    fn empty_file_list_is_an_empty_batch() {
        assert!(matches!(run(&[], &cfg()), Err(PipelineError::EmptyBatch)));
    }
}
