use std::f64::consts::PI;
use std::fmt;

use clap::ValueEnum;

use crate::error::SmoothError;

// ---------------------------------------------------------------------------
// Window kernels
// ---------------------------------------------------------------------------

/// The recognized smoothing kernels. `Flat` is a uniform moving average;
/// the rest are the classic named tapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowKind {
    Flat,
    Hanning,
    Hamming,
    Bartlett,
    Blackman,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowKind::Flat => "flat",
            WindowKind::Hanning => "hanning",
            WindowKind::Hamming => "hamming",
            WindowKind::Bartlett => "bartlett",
            WindowKind::Blackman => "blackman",
        };
        write!(f, "{name}")
    }
}

impl WindowKind {
    /// Kernel weights of the given length, un-normalized. Callers only ask
    /// for `len >= 3`, so the `len - 1` divisors are safe.
    fn weights(self, len: usize) -> Vec<f64> {
        let m = (len - 1) as f64;
        (0..len)
            .map(|i| {
                let t = i as f64;
                match self {
                    WindowKind::Flat => 1.0,
                    WindowKind::Hanning => 0.5 - 0.5 * (2.0 * PI * t / m).cos(),
                    WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * t / m).cos(),
                    WindowKind::Bartlett => 2.0 / m * (m / 2.0 - (t - m / 2.0).abs()),
                    WindowKind::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * t / m).cos() + 0.08 * (4.0 * PI * t / m).cos()
                    }
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

/// Smooth a signal by convolving it with a normalized window.
///
/// The signal is first extended at both ends with mirrored copies
/// (`2 * edge - signal[mirror]`) so the filter sees plausible data past the
/// boundaries and edge transients are suppressed; the convolution result is
/// then trimmed back to the input length. `window_len < 3` is a no-op.
pub fn smooth(
    signal: &[f64],
    window_len: usize,
    kind: WindowKind,
) -> Result<Vec<f64>, SmoothError> {
    if window_len < 3 {
        return Ok(signal.to_vec());
    }
    if signal.len() < window_len {
        return Err(SmoothError::SignalTooShort {
            signal_len: signal.len(),
            window_len,
        });
    }

    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];

    // Mirrored extension: window_len samples on the left, window_len - 1 on
    // the right, matching the original filter's padding.
    let mut padded = Vec::with_capacity(n + 2 * window_len - 1);
    for i in (0..window_len).rev() {
        padded.push(2.0 * first - signal[i]);
    }
    padded.extend_from_slice(signal);
    for i in 0..window_len - 1 {
        padded.push(2.0 * last - signal[n - 2 - i]);
    }

    let mut kernel = kind.weights(window_len);
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }

    let convolved = convolve_same(&padded, &kernel);
    Ok(convolved[window_len..window_len + n].to_vec())
}

/// "Same"-mode convolution: the centered `signal.len()` values of the full
/// convolution.
fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let m = kernel.len();
    let offset = (m - 1) / 2;

    (0..n)
        .map(|i| {
            let k = i + offset;
            // full[k] = Σ_j signal[j] * kernel[k - j]
            let j_min = (k + 1).saturating_sub(m);
            let j_max = k.min(n - 1);
            (j_min..=j_max).map(|j| signal[j] * kernel[k - j]).sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [WindowKind; 5] = [
        WindowKind::Flat,
        WindowKind::Hanning,
        WindowKind::Hamming,
        WindowKind::Bartlett,
        WindowKind::Blackman,
    ];

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 3.0 + 0.25 * i as f64).collect()
    }

    #[test]
    fn tiny_window_is_identity() {
        let x = ramp(10);
        assert_eq!(smooth(&x, 0, WindowKind::Hanning).unwrap(), x);
        assert_eq!(smooth(&x, 2, WindowKind::Flat).unwrap(), x);
    }

    #[test]
    fn output_length_matches_input_for_every_kind() {
        let x = ramp(40);
        for kind in ALL_KINDS {
            for window_len in [3, 4, 11, 25] {
                let y = smooth(&x, window_len, kind).unwrap();
                assert_eq!(y.len(), x.len(), "{kind} window {window_len}");
            }
        }
    }

    #[test]
    fn constant_signal_is_unchanged() {
        let x = vec![7.5; 30];
        for kind in ALL_KINDS {
            let y = smooth(&x, 11, kind).unwrap();
            for v in y {
                assert!((v - 7.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn linear_signal_interior_survives_odd_symmetric_windows() {
        // A symmetric odd-length kernel leaves straight lines fixed wherever
        // it only sees real data; the mirrored seam perturbs the outermost
        // window_len samples slightly, so only the interior is exact.
        let x = ramp(50);
        for kind in ALL_KINDS {
            let y = smooth(&x, 11, kind).unwrap();
            for j in 11..x.len() - 11 {
                assert!((y[j] - x[j]).abs() < 1e-9, "{kind}: {} vs {}", y[j], x[j]);
            }
        }
    }

    #[test]
    fn window_longer_than_signal_is_an_error() {
        let err = smooth(&ramp(5), 11, WindowKind::Flat).unwrap_err();
        assert!(matches!(
            err,
            SmoothError::SignalTooShort {
                signal_len: 5,
                window_len: 11
            }
        ));
    }

    #[test]
    fn flat_window_is_a_moving_average() {
        let x = vec![0.0, 0.0, 0.0, 9.0, 0.0, 0.0, 0.0];
        let y = smooth(&x, 3, WindowKind::Flat).unwrap();
        // Interior of the impulse: each of the three neighbors sees 9/3.
        assert!((y[2] - 3.0).abs() < 1e-12);
        assert!((y[3] - 3.0).abs() < 1e-12);
        assert!((y[4] - 3.0).abs() < 1e-12);
        assert!(y[0].abs() < 1e-12);
    }
}
