//! WAV decoding
//!
//! Reads a RIFF/WAVE container and unpacks its data chunk as little-endian
//! signed 16-bit samples. Channels stay interleaved in file order.
//!
//! Containers whose samples are not 16 bits wide are still decoded, by
//! reinterpreting the raw bytes as 16-bit words, and come back with a
//! [`FormatAccuracyWarning`].

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use hound::WavReader;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{FormatAccuracyWarning, Result, VerifyError};

/// Sample width the pipeline is built for
pub const EXPECTED_SAMPLE_WIDTH_BYTES: u16 = 2;

// hound reports a partial trailing sample with these format errors
const PARTIAL_SAMPLE_MESSAGES: [&str; 2] = [
    "data chunk length is not a multiple of sample size",
    "invalid data chunk length",
];

/// Format fields read from the WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WavHeader {
    pub channel_count: u16,
    pub sample_width_bytes: u16,
    pub frame_rate: u32,
    pub frame_count: u32,
}

impl WavHeader {
    /// `sample_width_bytes` is the stored slot width, which may exceed the
    /// valid bits hound reports in `spec().bits_per_sample`.
    fn from_reader<R: Read>(reader: &WavReader<R>, sample_width_bytes: u16) -> Self {
        let spec = reader.spec();
        WavHeader {
            channel_count: spec.channels,
            sample_width_bytes,
            frame_rate: spec.sample_rate,
            frame_count: reader.duration(),
        }
    }

    /// Whether the samples are 16 bits wide
    pub fn is_sixteen_bit(&self) -> bool {
        self.sample_width_bytes == EXPECTED_SAMPLE_WIDTH_BYTES
    }

    /// Duration of the audio in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.frame_rate == 0 {
            return 0.0;
        }
        self.frame_count as f64 / self.frame_rate as f64
    }

    /// Interleaved samples covering `secs` seconds of audio
    pub fn samples_per_interval(&self, secs: u32) -> u64 {
        u64::from(self.frame_rate) * u64::from(self.channel_count) * u64::from(secs)
    }

    fn accuracy_warning(&self) -> Option<FormatAccuracyWarning> {
        if self.is_sixteen_bit() {
            None
        } else {
            Some(FormatAccuracyWarning {
                sample_width_bytes: self.sample_width_bytes,
            })
        }
    }
}

/// Decoded contents of a WAV file
#[derive(Debug, Clone)]
pub struct DecodedPcm {
    pub header: WavHeader,
    /// Interleaved raw samples in file order
    pub samples: Vec<i16>,
    /// Non-fatal format notices raised while decoding
    pub warnings: Vec<FormatAccuracyWarning>,
}

impl DecodedPcm {
    /// Samples divided by `scale`, in file order
    pub fn normalized(&self, scale: f64) -> Vec<f64> {
        self.samples.iter().map(|&s| normalize(s, scale)).collect()
    }

    /// Whether decoding degraded accuracy
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Divide a raw sample by the normalization scale
#[inline]
pub fn normalize(raw: i16, scale: f64) -> f64 {
    f64::from(raw) / scale
}

/// Read only the header of a WAV file
pub fn inspect_wav(path: &Path) -> Result<WavHeader> {
    let reader = open_reader(path)?;
    let width = stored_sample_width(path)?;
    Ok(WavHeader::from_reader(&reader, width))
}

/// Decode a WAV file into interleaved 16-bit samples
///
/// # Errors
/// * `FileNotFound` - If the path does not resolve
/// * `CorruptContainer` - If the file is not a parseable RIFF/WAVE container
/// * `CorruptData` - If the data chunk ends in a partial sample or is truncated
pub fn decode_wav(path: &Path) -> Result<DecodedPcm> {
    let reader = open_reader(path)?;
    let header = WavHeader::from_reader(&reader, stored_sample_width(path)?);

    info!(
        path = %path.display(),
        channels = header.channel_count,
        sample_width_bytes = header.sample_width_bytes,
        frame_rate = header.frame_rate,
        frames = header.frame_count,
        "WAV file info"
    );

    let mut warnings = Vec::new();
    if let Some(warning) = header.accuracy_warning() {
        warn!(path = %path.display(), "{}", warning);
        warnings.push(warning);
    }

    let byte_len = reader.len() as usize * header.sample_width_bytes as usize;
    let mut bytes = Vec::with_capacity(byte_len);
    reader
        .into_inner()
        .take(byte_len as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| VerifyError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    if bytes.len() < byte_len {
        return Err(VerifyError::CorruptData {
            path: path.to_path_buf(),
            reason: format!(
                "data chunk declares {} bytes but only {} are present",
                byte_len,
                bytes.len()
            ),
        });
    }

    let samples = unpack_i16_le(&bytes).ok_or_else(|| VerifyError::CorruptData {
        path: path.to_path_buf(),
        reason: format!("{} data bytes do not split into 16-bit samples", bytes.len()),
    })?;

    debug!(samples = samples.len(), "Unpacked samples");

    Ok(DecodedPcm {
        header,
        samples,
        warnings,
    })
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn open_reader(path: &Path) -> Result<WavReader<BufReader<File>>> {
    if !path.exists() {
        return Err(VerifyError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    WavReader::open(path).map_err(|e| classify_open_error(path, e))
}

fn classify_open_error(path: &Path, err: hound::Error) -> VerifyError {
    match err {
        hound::Error::FormatError(msg) if PARTIAL_SAMPLE_MESSAGES.contains(&msg) => {
            VerifyError::CorruptData {
                path: path.to_path_buf(),
                reason: msg.to_string(),
            }
        }
        hound::Error::IoError(ref e) if e.kind() == ErrorKind::NotFound => {
            VerifyError::FileNotFound {
                path: path.to_path_buf(),
            }
        }
        other => VerifyError::CorruptContainer {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

/// Bytes per stored sample, `block_align / channels` from the fmt chunk
///
/// Only called once hound has accepted the container, so the fmt chunk is
/// known to precede the data chunk.
fn stored_sample_width(path: &Path) -> Result<u16> {
    let read_error = |e| VerifyError::FileRead {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::new(file);
    hound::read_wave_header(&mut reader).map_err(|e| classify_open_error(path, e))?;

    loop {
        let mut chunk = [0u8; 8];
        reader.read_exact(&mut chunk).map_err(read_error)?;
        let len = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

        if &chunk[..4] == b"fmt " {
            let mut fmt = [0u8; 16];
            reader.read_exact(&mut fmt).map_err(read_error)?;
            let channels = u16::from_le_bytes([fmt[2], fmt[3]]);
            let block_align = u16::from_le_bytes([fmt[12], fmt[13]]);
            if channels == 0 {
                return Err(VerifyError::CorruptData {
                    path: path.to_path_buf(),
                    reason: "fmt chunk declares zero channels".to_string(),
                });
            }
            return Ok(block_align / channels);
        }

        reader.seek_relative(i64::from(len)).map_err(read_error)?;
    }
}

/// Unpack little-endian 16-bit words; `None` on a dangling byte
fn unpack_i16_le(bytes: &[u8]) -> Option<Vec<i16>> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::fs;
    use tempfile::tempdir;

    fn write_wav(path: &Path, channels: u16, bits: u16, samples: &[i32]) {
        let spec = WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: bits,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            match bits {
                8 => writer.write_sample(s as i8).unwrap(),
                16 => writer.write_sample(s as i16).unwrap(),
                _ => writer.write_sample(s).unwrap(),
            }
        }
        writer.finalize().unwrap();
    }

    /// Minimal PCM WAV with an arbitrary data chunk
    fn raw_wav_bytes(channels: u16, bits: u16, data: &[u8]) -> Vec<u8> {
        raw_wav_bytes_in_slots(channels, bits, (bits + 7) / 8, data)
    }

    /// Same, with `bits` valid bits stored in `slot_bytes`-wide samples
    fn raw_wav_bytes_in_slots(channels: u16, bits: u16, slot_bytes: u16, data: &[u8]) -> Vec<u8> {
        let block_align = channels * slot_bytes;
        let byte_rate = 44100 * u32::from(block_align);
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&44100u32.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&bits.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_unpack_i16_le() {
        let bytes = [0x01, 0x00, 0xff, 0xff, 0x00, 0x80];
        assert_eq!(unpack_i16_le(&bytes), Some(vec![1, -1, i16::MIN]));
        assert_eq!(unpack_i16_le(&bytes[..3]), None);
    }

    #[test]
    fn test_normalize_uses_given_scale() {
        assert_eq!(normalize(16384, 65536.0), 0.25);
        assert_eq!(normalize(-32768, 65536.0), -0.5);
        assert_eq!(normalize(-32768, 32768.0), -1.0);
    }

    #[test]
    fn test_decode_mono_16bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 1, 16, &[0, 1000, -1000, 32767, -32768]);

        let decoded = decode_wav(&path).unwrap();
        assert_eq!(decoded.header.channel_count, 1);
        assert_eq!(decoded.header.sample_width_bytes, 2);
        assert_eq!(decoded.header.frame_rate, 44100);
        assert_eq!(decoded.header.frame_count, 5);
        assert_eq!(decoded.samples, vec![0, 1000, -1000, 32767, -32768]);
        assert!(!decoded.has_warnings());
        assert_eq!(
            decoded.normalized(32768.0),
            vec![0.0, 1000.0 / 32768.0, -1000.0 / 32768.0, 32767.0 / 32768.0, -1.0]
        );
    }

    #[test]
    fn test_decode_stereo_keeps_interleaving() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, 16, &[100, -200, 101, -201, 102, -202]);

        let decoded = decode_wav(&path).unwrap();
        assert_eq!(decoded.header.channel_count, 2);
        assert_eq!(decoded.header.frame_count, 3);
        assert_eq!(decoded.samples, vec![100, -200, 101, -201, 102, -202]);
    }

    #[test]
    fn test_decode_24bit_warns_and_continues() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.wav");
        write_wav(&path, 1, 24, &[1, -1, 8_000_000, 0]);

        let decoded = decode_wav(&path).unwrap();
        assert_eq!(decoded.header.sample_width_bytes, 3);
        assert_eq!(
            decoded.warnings,
            vec![FormatAccuracyWarning {
                sample_width_bytes: 3
            }]
        );
        // 4 samples * 3 bytes, read back as 16-bit words
        assert_eq!(decoded.samples.len(), 6);
    }

    #[test]
    fn test_decode_24_valid_bits_in_4_byte_slots_reads_whole_block() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("padded24.wav");
        let data = [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
        fs::write(&path, raw_wav_bytes_in_slots(1, 24, 4, &data)).unwrap();

        let decoded = decode_wav(&path).unwrap();
        assert_eq!(decoded.header.sample_width_bytes, 4);
        assert_eq!(decoded.header.frame_count, 2);
        assert_eq!(decoded.samples, vec![1, 0, 2, 0]);
        assert_eq!(
            decoded.warnings,
            vec![FormatAccuracyWarning {
                sample_width_bytes: 4
            }]
        );
    }

    #[test]
    fn test_decode_16_valid_bits_in_4_byte_slots_warns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("padded16.wav");
        let data = [0x05, 0x00, 0x00, 0x00, 0xff, 0xff, 0x00, 0x00];
        fs::write(&path, raw_wav_bytes_in_slots(1, 16, 4, &data)).unwrap();

        let decoded = decode_wav(&path).unwrap();
        assert_eq!(decoded.samples, vec![5, 0, -1, 0]);
        assert!(decoded.has_warnings());
        assert!(!inspect_wav(&path).unwrap().is_sixteen_bit());
    }

    #[test]
    fn test_decode_8bit_odd_length_is_corrupt_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("narrow.wav");
        write_wav(&path, 1, 8, &[1, 2, 3]);

        match decode_wav(&path) {
            Err(VerifyError::CorruptData { .. }) => {}
            other => panic!("Expected CorruptData, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_partial_trailing_sample() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.wav");
        let mut bytes = raw_wav_bytes(1, 16, &[0x01, 0x00, 0x02, 0x00, 0x03]);
        bytes.push(0); // RIFF pad byte
        fs::write(&path, bytes).unwrap();

        match decode_wav(&path) {
            Err(VerifyError::CorruptData { .. }) => {}
            other => panic!("Expected CorruptData, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_truncated_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("truncated.wav");
        let mut bytes = raw_wav_bytes(1, 16, &[0x01, 0x00, 0x02, 0x00, 0x03, 0x00]);
        bytes.truncate(bytes.len() - 2);
        fs::write(&path, bytes).unwrap();

        match decode_wav(&path) {
            Err(VerifyError::CorruptData { reason, .. }) => {
                assert!(reason.contains("only 4"), "unexpected reason: {}", reason);
            }
            other => panic!("Expected CorruptData, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_not_a_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("text.wav");
        fs::write(&path, "this is not a wav file at all").unwrap();

        match decode_wav(&path) {
            Err(VerifyError::CorruptContainer { .. }) => {}
            other => panic!("Expected CorruptContainer, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_nonexistent_file() {
        let result = decode_wav(Path::new("/nonexistent/path/audio.wav"));
        match result {
            Err(VerifyError::FileNotFound { path }) => {
                assert!(path.to_string_lossy().contains("nonexistent"));
            }
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_inspect_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav(&path, 2, 16, &vec![0; 44100 * 2]);

        let header = inspect_wav(&path).unwrap();
        assert_eq!(header.channel_count, 2);
        assert_eq!(header.frame_count, 44100);
        approx::assert_relative_eq!(header.duration_secs(), 1.0);
        assert_eq!(header.samples_per_interval(5), 44100 * 2 * 5);
        assert!(header.is_sixteen_bit());
    }
}
