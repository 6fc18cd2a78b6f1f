//! Error handling for resynth-verify
//!
//! Every fatal condition of the pipeline maps to one `VerifyError` variant.
//! The only non-fatal condition, a sample width other than 16 bits, is
//! reported as a [`FormatAccuracyWarning`] value next to the decoded data.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for resynth-verify operations
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Main error type for resynth-verify operations
#[derive(Error, Debug)]
pub enum VerifyError {
    // File Errors
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // WAV Errors
    #[error("Corrupt WAV container: {}: {source}", path.display())]
    CorruptContainer {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Corrupt sample data in {}: {reason}", path.display())]
    CorruptData { path: PathBuf, reason: String },

    // Interchange Errors
    #[error("Line {line} of {} is not a number: {content:?}", path.display())]
    Format {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("{} holds more than the expected {expected} samples", path.display())]
    BufferOverrun { path: PathBuf, expected: usize },

    #[error("{} holds {found} samples, expected {expected}", path.display())]
    IncompleteBuffer {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    // Analysis Errors
    #[error("Length mismatch: original has {original} samples, resynthesized has {resynthesized}")]
    LengthMismatch {
        original: usize,
        resynthesized: usize,
    },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Serialization Errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VerifyError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            VerifyError::FileNotFound { .. } => "FILE_NOT_FOUND",
            VerifyError::FileRead { .. } => "FILE_READ",
            VerifyError::FileWrite { .. } => "FILE_WRITE",
            VerifyError::CorruptContainer { .. } => "CORRUPT_CONTAINER",
            VerifyError::CorruptData { .. } => "CORRUPT_DATA",
            VerifyError::Format { .. } => "FORMAT",
            VerifyError::BufferOverrun { .. } => "BUFFER_OVERRUN",
            VerifyError::IncompleteBuffer { .. } => "INCOMPLETE_BUFFER",
            VerifyError::LengthMismatch { .. } => "LENGTH_MISMATCH",
            VerifyError::InvalidConfig { .. } => "INVALID_CONFIG",
            VerifyError::Json(_) => "JSON",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            VerifyError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            VerifyError::CorruptContainer { .. } => vec![
                "Check that the file is an uncompressed RIFF/WAVE file",
                "Re-export the recording as 16-bit PCM WAV",
            ],
            VerifyError::CorruptData { .. } => vec![
                "The WAV file is truncated or its data chunk is malformed",
                "Re-export the recording from its source",
            ],
            VerifyError::Format { .. } => vec![
                "Each line of an interchange file must hold exactly one decimal number",
                "Check the resynthesis engine's output for headers or stray text",
            ],
            VerifyError::BufferOverrun { .. } | VerifyError::IncompleteBuffer { .. } => vec![
                "Make the window size match the number of lines in the file",
                "Check that the resynthesis engine wrote a full analysis window",
            ],
            VerifyError::LengthMismatch { .. } => vec![
                "Load both signals with the same window size",
            ],
            VerifyError::InvalidConfig { .. } => vec![
                "Fix the configuration value named in the message",
                "Delete the configuration file to fall back to defaults",
            ],
            _ => vec![],
        }
    }
}

/// Non-fatal notice that the decoded audio is not 16-bit PCM.
///
/// Decoding still proceeds by unpacking the raw bytes as 16-bit words, so
/// amplitude accuracy is not guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatAccuracyWarning {
    pub sample_width_bytes: u16,
}

impl fmt::Display for FormatAccuracyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected 16-bit samples, found {}-bit; results may be inaccurate",
            u32::from(self.sample_width_bytes) * 8
        )
    }
}
