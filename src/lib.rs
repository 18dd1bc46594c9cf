//! Batch processor for spectrophotometer reflectance files.
//!
//! A directory of instrument text files goes in; out comes a CSV matrix of
//! spectra resampled onto a shared wavelength grid (optionally smoothed),
//! colorimetric summary tables under the Macedonia and Endler band
//! conventions, and optional diagnostic PNG plots.
//!
//! The core pipeline lives in [`data`] (parse → resample → smooth) and
//! [`color`] (band-integral reduction); [`pipeline::run`] drives a batch.
//! Everything else – discovery, CSV/JSON writing, plotting, the CLI – is
//! glue around those modules.

pub mod color;
pub mod data;
pub mod discover;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod plot;
