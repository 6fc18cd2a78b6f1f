//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::pcm::inspect_wav;
use crate::pipeline::{analyze_pair, extract as extract_wav};

/// Decode a WAV file and write its amplitudes as text.
pub fn extract(input: &Path, output: &Path, config: &AnalysisConfig) -> Result<()> {
    info!("Extracting amplitudes: {}", input.display());

    let extraction = extract_wav(input, output, config)?;
    let header = extraction.header;

    println!("WAV File Info:");
    println!("  Channels: {}", header.channel_count);
    println!("  Sample Width (bytes): {}", header.sample_width_bytes);
    println!("  Frame Rate: {} Hz", header.frame_rate);
    println!("  Total Frames: {}", header.frame_count);
    for warning in &extraction.warnings {
        println!("Warning: {}", warning);
    }
    println!(
        "Extracted {} amplitudes to '{}'",
        extraction.summary.samples_written,
        output.display()
    );

    Ok(())
}

/// Print the header of a WAV file.
pub fn inspect(input: &Path) -> Result<()> {
    let header = inspect_wav(input)?;

    println!("{}", input.display());
    println!("  Channels: {}", header.channel_count);
    println!("  Sample Width (bytes): {}", header.sample_width_bytes);
    println!("  Frame Rate: {} Hz", header.frame_rate);
    println!("  Total Frames: {}", header.frame_count);
    println!("  Duration: {:.3}s", header.duration_secs());
    if !header.is_sixteen_bit() {
        println!(
            "  Warning: {}-bit samples will be read as 16-bit words",
            u32::from(header.sample_width_bytes) * 8
        );
    }

    Ok(())
}

/// Compare an original and a resynthesized window.
pub fn compare(
    original: &Path,
    resynthesized: &Path,
    svg: Option<&Path>,
    json: Option<&Path>,
    config: &AnalysisConfig,
) -> Result<()> {
    info!(
        "Comparing {} against {}",
        resynthesized.display(),
        original.display()
    );

    let pair = analyze_pair(original, resynthesized, config)?;
    let comparison = pair.comparison()?;
    let report = comparison
        .report()?
        .with_digests(original, resynthesized)?;

    println!("{}", report.summary());

    // Image failures are logged only; the report above stands.
    if let Some(path) = svg {
        match comparison.write_svg(path) {
            Ok(()) => println!("Comparison image: {}", path.display()),
            Err(e) => warn!("Could not write comparison image: {}", e),
        }
    }

    if let Some(path) = json {
        report.write_json(path)?;
        println!("Comparison report: {}", path.display());
    }

    Ok(())
}
