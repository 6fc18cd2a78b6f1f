//! Analysis configuration
//!
//! The interchange format carries no metadata, so window size and sample
//! rate travel out-of-band through this struct. Every stage takes it by
//! reference instead of hard-coding its numbers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifyError};

/// Default analysis window size in samples
pub const DEFAULT_WINDOW_SIZE: usize = 1024;

/// Default sample rate of interchange files in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Normalization divisor the reference pipeline was built with (2^16).
///
/// Maps 16-bit samples to roughly [-0.5, 0.5). Kept as the default because
/// resynthesized dumps are produced against this scale.
pub const AS_BUILT_SCALE: f64 = 65536.0;

/// Conventional full-scale divisor for 16-bit samples (2^15), roughly [-1, 1).
pub const FULL_SCALE: f64 = 32768.0;

/// Default progress cadence in seconds of audio
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u32 = 5;

/// How the DC term (bin 0) is scaled in the single-sided spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DcScaling {
    /// Bin 0 scaled by 1/N, every other bin by 2/N
    #[default]
    Halved,
    /// Every bin scaled by 2/N, bin 0 included
    Uniform,
}

/// Configuration threaded through every pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of samples in an analysis window (and in an interchange file)
    pub window_size: usize,
    /// Sample rate assumed for interchange files (Hz)
    pub sample_rate: u32,
    /// Divisor applied to raw 16-bit samples
    pub scale: f64,
    /// Emit a progress signal every this many seconds of audio
    pub progress_interval_secs: u32,
    /// DC bin convention for spectra
    pub dc_scaling: DcScaling,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            scale: AS_BUILT_SCALE,
            progress_interval_secs: DEFAULT_PROGRESS_INTERVAL_SECS,
            dc_scaling: DcScaling::default(),
        }
    }
}

impl AnalysisConfig {
    /// Defaults with the conventional 2^15 divisor instead of the as-built one
    pub fn full_scale() -> Self {
        AnalysisConfig {
            scale: FULL_SCALE,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VerifyError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| VerifyError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(VerifyError::InvalidConfig {
                reason: format!("window_size must be at least 2, got {}", self.window_size),
            });
        }
        if self.sample_rate == 0 {
            return Err(VerifyError::InvalidConfig {
                reason: "sample_rate must be positive".to_string(),
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(VerifyError::InvalidConfig {
                reason: format!("scale must be a positive finite number, got {}", self.scale),
            });
        }
        if self.progress_interval_secs == 0 {
            return Err(VerifyError::InvalidConfig {
                reason: "progress_interval_secs must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Frequency spacing between adjacent spectrum bins (Hz)
    pub fn bin_resolution(&self) -> f64 {
        self.sample_rate as f64 / self.window_size as f64
    }
}
