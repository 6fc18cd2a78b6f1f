//! CLI Module
//!
//! Command-line interface for resynth-verify.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AnalysisConfig;
use crate::error::Result;

/// Validate resynthesized audio against the original recording
#[derive(Parser, Debug)]
#[command(name = "resynth-verify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (window size, sample rate, scale, ...)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a 16-bit WAV file into an amplitude text file
    #[command(name = "extract")]
    Extract {
        /// Input WAV file
        input: PathBuf,

        /// Output amplitude text file
        output: PathBuf,
    },

    /// Print the format of a WAV file
    #[command(name = "inspect")]
    Inspect {
        /// Input WAV file
        input: PathBuf,
    },

    /// Compare an original and a resynthesized amplitude text file
    #[command(name = "compare")]
    Compare {
        /// Amplitude text file of the original signal
        original: PathBuf,

        /// Amplitude text file produced by the resynthesis engine
        resynthesized: PathBuf,

        /// Write the four-panel comparison image here
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Write the JSON summary here
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

impl Cli {
    /// Configuration from `--config`, or defaults
    pub fn load_config(&self) -> Result<AnalysisConfig> {
        match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path),
            None => Ok(AnalysisConfig::default()),
        }
    }
}
