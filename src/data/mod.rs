/// Data layer: core types, parsing, resampling, smoothing.
///
/// Architecture:
/// ```text
///  .txt / .b / .transmission
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  instrument text → Spectrum
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resample  │  cubic spline → reflectance on the shared Grid
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  smooth   │  optional windowed convolution
///   └──────────┘
///        │
///        ▼
///   SpectrumMatrix  (rows = samples, columns = wavelength bins)
/// ```

pub mod model;
pub mod parser;
pub mod resample;
pub mod smooth;
