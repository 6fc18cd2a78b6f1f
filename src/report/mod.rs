//! Report Module
//!
//! Side-by-side view of an original and a resynthesized window:
//! - Four-panel SVG image (waveforms and log-frequency spectra)
//! - JSON summary of level and error measurements
//!
//! The reporter only borrows the buffers and spectra, so a failed render or
//! write leaves the computed data intact.

pub mod svg;

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::analysis::{ErrorMetrics, SignalMetrics, Spectrum};
use crate::buffer::SampleBuffer;
use crate::error::{Result, VerifyError};
use crate::interchange::atomic::write_atomically;

/// Original and resynthesized windows with their spectra
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    original: &'a SampleBuffer,
    resynthesized: &'a SampleBuffer,
    original_spectrum: &'a Spectrum,
    resynthesized_spectrum: &'a Spectrum,
}

impl<'a> Comparison<'a> {
    /// Pair up two windows of equal length
    ///
    /// # Errors
    /// * `LengthMismatch` - If the buffers or spectra differ in length
    pub fn new(
        original: &'a SampleBuffer,
        resynthesized: &'a SampleBuffer,
        original_spectrum: &'a Spectrum,
        resynthesized_spectrum: &'a Spectrum,
    ) -> Result<Self> {
        if original.len() != resynthesized.len()
            || original_spectrum.len() != resynthesized_spectrum.len()
        {
            return Err(VerifyError::LengthMismatch {
                original: original.len(),
                resynthesized: resynthesized.len(),
            });
        }

        Ok(Comparison {
            original,
            resynthesized,
            original_spectrum,
            resynthesized_spectrum,
        })
    }

    /// Render the four panels as an SVG document
    pub fn render_svg(&self) -> String {
        svg::render(
            self.original,
            self.resynthesized,
            self.original_spectrum,
            self.resynthesized_spectrum,
        )
    }

    /// Render and persist the four panels
    pub fn write_svg(&self, path: &Path) -> Result<()> {
        let document = self.render_svg();
        write_atomically(path, |w| w.write_all(document.as_bytes()))?;
        info!(path = %path.display(), "Wrote comparison image");
        Ok(())
    }

    /// Measure both signals and the error between them
    pub fn report(&self) -> Result<ComparisonReport> {
        let errors = ErrorMetrics::between(
            self.original,
            self.resynthesized,
            self.original_spectrum,
            self.resynthesized_spectrum,
        )?;

        Ok(ComparisonReport {
            generated_at: Utc::now(),
            window_size: self.original.len(),
            sample_rate: self.original_spectrum.sample_rate(),
            bin_resolution_hz: self.original_spectrum.bin_resolution(),
            original: SignalMetrics::measure(self.original, self.original_spectrum),
            resynthesized: SignalMetrics::measure(
                self.resynthesized,
                self.resynthesized_spectrum,
            ),
            errors,
            original_sha256: None,
            resynthesized_sha256: None,
        })
    }
}

/// Serializable summary of a comparison
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub window_size: usize,
    pub sample_rate: u32,
    pub bin_resolution_hz: f64,
    pub original: SignalMetrics,
    pub resynthesized: SignalMetrics,
    pub errors: ErrorMetrics,
    /// SHA-256 of the original interchange file, when loaded from disk
    pub original_sha256: Option<String>,
    pub resynthesized_sha256: Option<String>,
}

impl ComparisonReport {
    /// Record digests of the interchange files the buffers came from
    pub fn with_digests(mut self, original: &Path, resynthesized: &Path) -> Result<Self> {
        self.original_sha256 = Some(file_sha256(original)?);
        self.resynthesized_sha256 = Some(file_sha256(resynthesized)?);
        Ok(self)
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomically(path, |w| w.write_all(content.as_bytes()))?;
        info!(path = %path.display(), "Wrote comparison report");
        Ok(())
    }

    /// Generate a summary string for display
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Window: {} samples @ {} Hz ({:.2} Hz/bin)\n\
             Original:      RMS {:.1} dBFS | Peak {:.4} | Dominant {:.1} Hz ({:.4})\n\
             Resynthesized: RMS {:.1} dBFS | Peak {:.4} | Dominant {:.1} Hz ({:.4})\n\
             Time error:     RMS {:.6} | Max {:.6}\n\
             Spectral error: RMS {:.6}",
            self.window_size,
            self.sample_rate,
            self.bin_resolution_hz,
            self.original.rms_db,
            self.original.peak,
            self.original.dominant_frequency_hz,
            self.original.dominant_magnitude,
            self.resynthesized.rms_db,
            self.resynthesized.peak,
            self.resynthesized.dominant_frequency_hz,
            self.resynthesized.dominant_magnitude,
            self.errors.time_rms_error,
            self.errors.time_max_abs_error,
            self.errors.spectral_rms_error,
        );

        if !self.errors.dominant_bin_match {
            s.push_str("\nWarning: dominant frequencies differ");
        }

        s
    }
}

/// Hex-encoded SHA-256 of a file's contents
pub fn file_sha256(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(VerifyError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|e| VerifyError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
