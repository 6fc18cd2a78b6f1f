//! resynth-verify - Resynthesis Validation
//!
//! Checks the output of an external audio resynthesis engine against the
//! original recording, in both the time and the frequency domain.
//!
//! # Pipeline
//!
//! WAV file -> PCM decoder -> amplitude text file -> [external engine] ->
//! sample buffer loader (original and resynthesized) -> spectral analyzer ->
//! comparison report.
//!
//! Every stage hands over a file on disk, so the engine can live in any
//! process or language as long as it reads and writes the interchange
//! format: one decimal number per line, no header.

pub mod analysis;
pub mod buffer;
pub mod cli;
pub mod config;
pub mod error;
pub mod interchange;
pub mod pcm;
pub mod pipeline;
pub mod report;

pub use buffer::SampleBuffer;
pub use config::{AnalysisConfig, DcScaling};
pub use error::{FormatAccuracyWarning, Result, VerifyError};
