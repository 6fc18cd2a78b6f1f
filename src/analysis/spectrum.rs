//! Spectral analysis
//!
//! Magnitude spectrum of one analysis window via an N-point FFT. Only the
//! non-redundant half `[0, N/2)` is kept, since the input is real-valued.
//! Magnitudes are scaled to a single-sided amplitude spectrum (2/N), with
//! the DC bin handled per [`DcScaling`]. No window function is applied.

use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;
use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::config::{AnalysisConfig, DcScaling};
use crate::error::{Result, VerifyError};

/// One frequency bin of a magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumBin {
    pub frequency_hz: f64,
    pub magnitude: f64,
}

/// Single-sided magnitude spectrum of a sample buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    bins: Vec<SpectrumBin>,
    window_size: usize,
    sample_rate: u32,
}

impl Spectrum {
    pub fn bins(&self) -> &[SpectrumBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Length of the analysed buffer
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frequency spacing between adjacent bins (Hz)
    pub fn bin_resolution(&self) -> f64 {
        self.sample_rate as f64 / self.window_size as f64
    }

    /// Index of the bin nearest to `frequency_hz`
    pub fn bin_for_frequency(&self, frequency_hz: f64) -> usize {
        (frequency_hz / self.bin_resolution()).round().max(0.0) as usize
    }

    /// Magnitude of the bin nearest to `frequency_hz`, if it is in range
    pub fn magnitude_at(&self, frequency_hz: f64) -> Option<f64> {
        self.bins
            .get(self.bin_for_frequency(frequency_hz))
            .map(|bin| bin.magnitude)
    }

    /// Strongest bin and its index; ties resolve to the lowest index
    pub fn peak(&self) -> Option<(usize, SpectrumBin)> {
        self.bins
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, bin)| match best {
                Some((_, b)) if b.magnitude >= bin.magnitude => best,
                _ => Some((i, bin)),
            })
    }

    pub fn magnitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bins.iter().map(|bin| bin.magnitude)
    }
}

/// Compute the single-sided magnitude spectrum of `buffer`
///
/// Bin `k` has frequency `k * sample_rate / N` and the spectrum holds
/// `floor(N / 2)` bins.
///
/// # Errors
/// * `InvalidConfig` - If the buffer is empty or the sample rate is zero
pub fn analyze_spectrum(buffer: &SampleBuffer, config: &AnalysisConfig) -> Result<Spectrum> {
    let n = buffer.len();
    if n == 0 {
        return Err(VerifyError::InvalidConfig {
            reason: "cannot analyse an empty buffer".to_string(),
        });
    }
    if config.sample_rate == 0 {
        return Err(VerifyError::InvalidConfig {
            reason: "sample_rate must be positive".to_string(),
        });
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut data: Vec<Complex<f64>> = buffer
        .samples()
        .iter()
        .map(|&s| Complex::new(s, 0.0))
        .collect();
    fft.process(&mut data);

    let bin_hz = config.sample_rate as f64 / n as f64;
    let scale = 2.0 / n as f64;

    let bins: Vec<SpectrumBin> = data
        .iter()
        .take(n / 2)
        .enumerate()
        .map(|(k, c)| {
            let factor = match (k, config.dc_scaling) {
                (0, DcScaling::Halved) => scale / 2.0,
                _ => scale,
            };
            SpectrumBin {
                frequency_hz: k as f64 * bin_hz,
                magnitude: c.norm() * factor,
            }
        })
        .collect();

    debug!(window = n, bins = bins.len(), "Computed spectrum");

    Ok(Spectrum {
        bins,
        window_size: n,
        sample_rate: config.sample_rate,
    })
}
