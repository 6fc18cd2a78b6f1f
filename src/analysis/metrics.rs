//! Signal measurements
//!
//! Objective level figures for a single buffer and error figures between
//! an original and a resynthesized buffer or spectrum.

use serde::Serialize;

use crate::analysis::spectrum::Spectrum;
use crate::buffer::SampleBuffer;
use crate::error::{Result, VerifyError};

/// Convert linear amplitude to decibels
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Calculate RMS (Root Mean Square) of samples
pub fn calculate_rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f64).sqrt()
}

/// Calculate peak (maximum absolute value) of samples
pub fn calculate_peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
}

/// Calculate DC offset (mean of samples)
pub fn calculate_dc_offset(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Level measurements of one signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalMetrics {
    pub rms: f64,
    pub rms_db: f64,
    pub peak: f64,
    pub dc_offset: f64,
    /// Frequency of the strongest spectrum bin (Hz)
    pub dominant_frequency_hz: f64,
    pub dominant_magnitude: f64,
}

impl SignalMetrics {
    pub fn measure(buffer: &SampleBuffer, spectrum: &Spectrum) -> Self {
        let samples = buffer.samples();
        let rms = calculate_rms(samples);
        let (dominant_frequency_hz, dominant_magnitude) = spectrum
            .peak()
            .map(|(_, bin)| (bin.frequency_hz, bin.magnitude))
            .unwrap_or((0.0, 0.0));

        SignalMetrics {
            rms,
            rms_db: linear_to_db(rms),
            peak: calculate_peak(samples),
            dc_offset: calculate_dc_offset(samples),
            dominant_frequency_hz,
            dominant_magnitude,
        }
    }
}

/// How far a resynthesized signal is from the original
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    /// RMS of the sample-wise difference
    pub time_rms_error: f64,
    /// Largest absolute sample-wise difference
    pub time_max_abs_error: f64,
    /// RMS of the bin-wise magnitude difference
    pub spectral_rms_error: f64,
    /// Whether both spectra peak in the same bin
    pub dominant_bin_match: bool,
}

impl ErrorMetrics {
    /// Compare two equally long buffers and their spectra
    ///
    /// # Errors
    /// * `LengthMismatch` - If the buffers differ in length
    pub fn between(
        original: &SampleBuffer,
        resynthesized: &SampleBuffer,
        original_spectrum: &Spectrum,
        resynthesized_spectrum: &Spectrum,
    ) -> Result<Self> {
        if original.len() != resynthesized.len()
            || original_spectrum.len() != resynthesized_spectrum.len()
        {
            return Err(VerifyError::LengthMismatch {
                original: original.len(),
                resynthesized: resynthesized.len(),
            });
        }

        let time_diff: Vec<f64> = original
            .samples()
            .iter()
            .zip(resynthesized.samples())
            .map(|(a, b)| a - b)
            .collect();

        let spectral_diff: Vec<f64> = original_spectrum
            .magnitudes()
            .zip(resynthesized_spectrum.magnitudes())
            .map(|(a, b)| a - b)
            .collect();

        let dominant_bin_match = match (original_spectrum.peak(), resynthesized_spectrum.peak()) {
            (Some((a, _)), Some((b, _))) => a == b,
            _ => false,
        };

        Ok(ErrorMetrics {
            time_rms_error: calculate_rms(&time_diff),
            time_max_abs_error: calculate_peak(&time_diff),
            spectral_rms_error: calculate_rms(&spectral_diff),
            dominant_bin_match,
        })
    }
}
