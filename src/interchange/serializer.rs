//! Amplitude text serialization
//!
//! Writes samples as one decimal number per line, the wire format shared
//! with the external resynthesis engine. No header and no metadata: the
//! reader must know the window size and sample rate out-of-band.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::interchange::atomic::write_atomically;
use crate::pcm::{normalize, WavHeader};

/// Progress signal emitted every configured interval of audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Samples written so far
    pub samples_written: u64,
    /// Seconds of audio those samples cover
    pub seconds_processed: u64,
}

/// Outcome of a serialization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeSummary {
    pub path: PathBuf,
    pub samples_written: usize,
    pub progress_signals: usize,
}

/// Normalize raw samples and write them to `path`, one per line
///
/// `on_progress` is called after every `frame_rate * channel_count *
/// progress_interval_secs` samples. The target file is replaced only when
/// every line has been written.
pub fn write_amplitudes<F>(
    samples: &[i16],
    path: &Path,
    header: &WavHeader,
    config: &AnalysisConfig,
    mut on_progress: F,
) -> Result<SerializeSummary>
where
    F: FnMut(Progress),
{
    config.validate()?;
    let interval = header.samples_per_interval(config.progress_interval_secs);

    let progress_signals = write_atomically(path, |w| {
        let mut signals: usize = 0;
        for (i, &raw) in samples.iter().enumerate() {
            writeln!(w, "{}", normalize(raw, config.scale))?;

            let written = i as u64 + 1;
            if interval > 0 && written % interval == 0 {
                signals += 1;
                let progress = Progress {
                    samples_written: written,
                    seconds_processed: signals as u64 * u64::from(config.progress_interval_secs),
                };
                info!(
                    samples = progress.samples_written,
                    seconds = progress.seconds_processed,
                    "Processed amplitudes"
                );
                on_progress(progress);
            }
        }
        Ok(signals)
    })?;

    info!(
        path = %path.display(),
        samples = samples.len(),
        "Extracted amplitudes"
    );

    Ok(SerializeSummary {
        path: path.to_path_buf(),
        samples_written: samples.len(),
        progress_signals,
    })
}

/// Write already-normalized samples in the interchange format
pub fn write_samples(samples: &[f64], path: &Path) -> Result<()> {
    write_atomically(path, |w| {
        for value in samples {
            writeln!(w, "{}", value)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn header(frame_rate: u32, channel_count: u16) -> WavHeader {
        WavHeader {
            channel_count,
            sample_width_bytes: 2,
            frame_rate,
            frame_count: 0,
        }
    }

    #[test]
    fn test_writes_one_line_per_sample() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("amplitudes.txt");
        let config = AnalysisConfig::default();

        let summary =
            write_amplitudes(&[0, 16384, -32768, 1], &path, &header(44100, 1), &config, |_| {})
                .unwrap();
        assert_eq!(summary.samples_written, 4);
        assert_eq!(summary.progress_signals, 0);

        let content = fs::read_to_string(&path).unwrap();
        let values: Vec<f64> = content.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(values, vec![0.0, 0.25, -0.5, 1.0 / 65536.0]);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_full_scale_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("amplitudes.txt");
        let config = AnalysisConfig::full_scale();

        write_amplitudes(&[-32768, 16384], &path, &header(44100, 1), &config, |_| {}).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let values: Vec<f64> = content.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(values, vec![-1.0, 0.5]);
    }

    #[test]
    fn test_progress_cadence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("amplitudes.txt");
        let config = AnalysisConfig::default();
        // 10 Hz stereo: one signal every 10 * 2 * 5 = 100 samples
        let hdr = header(10, 2);

        for k in 1..=3usize {
            let samples = vec![0i16; 100 * k];
            let mut seen = Vec::new();
            let summary =
                write_amplitudes(&samples, &path, &hdr, &config, |p| seen.push(p)).unwrap();

            assert_eq!(summary.progress_signals, k);
            assert_eq!(seen.len(), k);
            assert_eq!(seen.last().unwrap().samples_written, 100 * k as u64);
            assert_eq!(seen.last().unwrap().seconds_processed, 5 * k as u64);
        }
    }

    #[test]
    fn test_no_signal_before_interval_completes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("amplitudes.txt");
        let mut count = 0;

        write_amplitudes(
            &vec![0i16; 99],
            &path,
            &header(10, 2),
            &AnalysisConfig::default(),
            |_| count += 1,
        )
        .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("amplitudes.txt");
        fs::write(&path, "stale\nstale\nstale\n").unwrap();

        write_amplitudes(&[0], &path, &header(44100, 1), &AnalysisConfig::default(), |_| {})
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0\n");
    }

    #[test]
    fn test_invalid_config_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("amplitudes.txt");
        let config = AnalysisConfig {
            scale: 0.0,
            ..AnalysisConfig::default()
        };

        assert!(write_amplitudes(&[1], &path, &header(44100, 1), &config, |_| {}).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffer.txt");
        write_samples(&[0.125, -0.0625], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0.125\n-0.0625\n");
    }
}
