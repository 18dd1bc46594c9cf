//! Write a directory of synthetic instrument files for demos and manual
//! testing: Gaussian reflectance peaks plus deterministic noise, wrapped in
//! the Begin/End header convention.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_spec_file(
    path: &Path,
    peaks: &[(f64, f64, f64)],
    rng: &mut SimpleRng,
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "SpectraSuite Data File")?;
    writeln!(out, "Integration Time (usec): 100000")?;
    writeln!(out, ">>>>>Begin Spectral Data<<<<<")?;

    // 290–760 nm sweep, a little denser than 0.5 nm like the real probes.
    let mut nm = 290.0;
    while nm < 760.0 {
        let signal: f64 = peaks
            .iter()
            .map(|&(mu, sigma, amp)| gaussian(nm, mu, sigma, amp))
            .sum();
        let reflectance = (5.0 + signal + rng.gauss(0.0, 0.15)).max(0.0);
        writeln!(out, "{nm:.2}\t{reflectance:.4}")?;
        nm += 0.47;
    }

    writeln!(out, ">>>>>End Spectral Data<<<<<")?;
    out.flush()
}

fn main() -> std::io::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_specs".to_string());
    std::fs::create_dir_all(&out_dir)?;

    let mut rng = SimpleRng::new(42);

    // (file stem, Gaussian peaks as (center nm, width, amplitude))
    let samples: Vec<(&str, Vec<(f64, f64, f64)>)> = vec![
        ("dewlap_01", vec![(630.0, 35.0, 40.0), (380.0, 25.0, 8.0)]),
        ("dewlap_02", vec![(615.0, 40.0, 35.0), (370.0, 20.0, 10.0)]),
        ("dorsal_01", vec![(520.0, 55.0, 22.0)]),
        ("dorsal_02", vec![(535.0, 45.0, 25.0)]),
        ("ventral_01", vec![(450.0, 60.0, 18.0), (680.0, 30.0, 6.0)]),
        ("ventral_02", vec![(465.0, 50.0, 20.0)]),
    ];

    for (stem, peaks) in &samples {
        let path = Path::new(&out_dir).join(format!("{stem}.txt"));
        write_spec_file(&path, peaks, &mut rng)?;
    }

    println!("Wrote {} spec files to {out_dir}", samples.len());
    Ok(())
}
