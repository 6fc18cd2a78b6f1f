//! Pipeline stages wired end to end
//!
//! `extract` covers the stages before the external resynthesis engine,
//! `analyze_pair` the stages after it. The interchange file between them
//! is the only handoff.

use std::path::Path;

use tracing::info;

use crate::analysis::{analyze_spectrum, Spectrum};
use crate::buffer::SampleBuffer;
use crate::config::AnalysisConfig;
use crate::error::{FormatAccuracyWarning, Result};
use crate::interchange::{write_amplitudes, SerializeSummary};
use crate::pcm::{decode_wav, WavHeader};
use crate::report::Comparison;

/// Result of decoding a WAV file into an interchange file
#[derive(Debug, Clone)]
pub struct Extraction {
    pub header: WavHeader,
    pub summary: SerializeSummary,
    pub warnings: Vec<FormatAccuracyWarning>,
}

/// Decode `wav` and write its normalized samples to `output`
pub fn extract(wav: &Path, output: &Path, config: &AnalysisConfig) -> Result<Extraction> {
    config.validate()?;
    let decoded = decode_wav(wav)?;
    let summary = write_amplitudes(
        &decoded.samples,
        output,
        &decoded.header,
        config,
        |_| {},
    )?;

    Ok(Extraction {
        header: decoded.header,
        summary,
        warnings: decoded.warnings,
    })
}

/// Both windows of a comparison and their spectra
#[derive(Debug, Clone)]
pub struct AnalyzedPair {
    pub original: SampleBuffer,
    pub resynthesized: SampleBuffer,
    pub original_spectrum: Spectrum,
    pub resynthesized_spectrum: Spectrum,
}

impl AnalyzedPair {
    pub fn comparison(&self) -> Result<Comparison<'_>> {
        Comparison::new(
            &self.original,
            &self.resynthesized,
            &self.original_spectrum,
            &self.resynthesized_spectrum,
        )
    }
}

/// Load two interchange files of `config.window_size` lines and analyse both
pub fn analyze_pair(
    original: &Path,
    resynthesized: &Path,
    config: &AnalysisConfig,
) -> Result<AnalyzedPair> {
    config.validate()?;

    let original_buffer = SampleBuffer::load(original, config.window_size)?;
    let resynth_buffer = SampleBuffer::load(resynthesized, config.window_size)?;

    let original_spectrum = analyze_spectrum(&original_buffer, config)?;
    let resynthesized_spectrum = analyze_spectrum(&resynth_buffer, config)?;

    info!(
        window = config.window_size,
        sample_rate = config.sample_rate,
        "Analysed original and resynthesized windows"
    );

    Ok(AnalyzedPair {
        original: original_buffer,
        resynthesized: resynth_buffer,
        original_spectrum,
        resynthesized_spectrum,
    })
}
