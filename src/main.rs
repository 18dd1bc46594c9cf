use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;

use specparse::color::{self, Convention};
use specparse::data::smooth::WindowKind;
use specparse::discover;
use specparse::output;
use specparse::pipeline::{self, ErrorPolicy, PipelineConfig, Smoothing};
use specparse::plot;

/// Convert a directory of spectrophotometer files to CSV: resample onto a
/// uniform wavelength grid, optionally smooth, and print colorimetric
/// summaries under the Macedonia and Endler conventions.
#[derive(Parser, Debug)]
#[command(name = "specparse", version)]
struct Cli {
    /// Input directory containing the spec files
    #[arg(short = 'i', long)]
    input_dir: PathBuf,

    /// CSV file to receive the merged, resampled spectra
    #[arg(short = 'o', long)]
    output_file: PathBuf,

    /// Input files wrap their data region in Begin/End marker lines
    #[arg(long)]
    header: bool,

    /// Lowest wavelength to include (nm)
    #[arg(long, default_value_t = 300.0)]
    min_nm: f64,

    /// Highest wavelength to include (nm)
    #[arg(long, default_value_t = 700.0)]
    max_nm: f64,

    /// Wavelength grid spacing (nm)
    #[arg(long, default_value_t = 1.0)]
    step_nm: f64,

    /// Smooth each resampled spectrum
    #[arg(short = 's', long)]
    smooth: bool,

    /// Smoothing kernel
    #[arg(long, value_enum, default_value_t = WindowKind::Hanning)]
    window_type: WindowKind,

    /// Smoothing window size in grid points; longer is more aggressive
    #[arg(long, default_value_t = 100)]
    window_length: usize,

    /// Skip files that fail to parse or resample instead of aborting
    #[arg(long)]
    skip_errors: bool,

    /// Directory to receive diagnostic PNG plots (mean + thumbnails)
    #[arg(short = 'p', long)]
    plot_dir: Option<PathBuf>,

    /// Also write the colorimetric summary as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let files = discover::spec_files(&cli.input_dir)?;
    if files.is_empty() {
        bail!(
            "no instrument files (.txt, .b, .transmission) in {}",
            cli.input_dir.display()
        );
    }
    if cli.output_file.exists() {
        warn!("overwriting existing output at {}", cli.output_file.display());
    }

    let cfg = PipelineConfig {
        min_nm: cli.min_nm,
        max_nm: cli.max_nm,
        step_nm: cli.step_nm,
        has_header: cli.header,
        smoothing: cli.smooth.then_some(Smoothing {
            kind: cli.window_type,
            window_len: cli.window_length,
        }),
        on_error: if cli.skip_errors {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Abort
        },
    };

    let batch = pipeline::run(&files, &cfg)?;
    if !batch.skipped.is_empty() {
        warn!(
            "{} of {} files skipped; see warnings above",
            batch.skipped.len(),
            files.len()
        );
    }
    let matrix = batch.matrix;

    let sink = File::create(&cli.output_file)
        .with_context(|| format!("creating {}", cli.output_file.display()))?;
    output::write_matrix_csv(sink, &matrix)
        .with_context(|| format!("writing {}", cli.output_file.display()))?;

    let macedonia = color::reduce(&matrix, Convention::Macedonia);
    let endler = color::reduce(&matrix, Convention::Endler);

    let stdout = io::stdout();
    println!("Macedonia Values");
    output::write_summary_csv(stdout.lock(), &matrix.labels, &macedonia)?;
    println!("\nEndler Values");
    output::write_summary_csv(stdout.lock(), &matrix.labels, &endler)?;

    if let Some(path) = &cli.json {
        let json = output::summary_json(&matrix.labels, &macedonia, &endler)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    if let Some(dir) = &cli.plot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating plot directory {}", dir.display()))?;
        plot::mean_plot(&matrix)
            .save(dir.join("mean.png"))
            .context("writing mean plot")?;
        plot::thumbnail_grid(&matrix)
            .save(dir.join("thumbnails.png"))
            .context("writing thumbnail grid")?;
    }

    Ok(())
}
