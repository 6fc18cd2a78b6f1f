//! Amplitude text loading
//!
//! Reads an interchange file back into a caller-sized [`SampleBuffer`].
//! The line count must equal the buffer length exactly; a longer or
//! shorter file is an error, never a silent truncation or stale tail.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::error::{Result, VerifyError};

/// Fill `buffer` from the interchange file at `path`
///
/// The buffer is only modified when the whole file loads successfully.
///
/// # Errors
/// * `FileNotFound` - If the path does not resolve
/// * `Format` - If a line is not a decimal number
/// * `BufferOverrun` - If the file has more lines than the buffer
/// * `IncompleteBuffer` - If the file has fewer lines than the buffer
pub fn load_into(path: &Path, buffer: &mut SampleBuffer) -> Result<()> {
    if !path.exists() {
        return Err(VerifyError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| VerifyError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let expected = buffer.len();
    let mut staged = Vec::with_capacity(expected);

    for (index, line) in BufReader::new(file).split(b'\n').enumerate() {
        let line = line.map_err(|e| VerifyError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if index >= expected {
            return Err(VerifyError::BufferOverrun {
                path: path.to_path_buf(),
                expected,
            });
        }

        let value = std::str::from_utf8(&line)
            .ok()
            .and_then(parse_line)
            .ok_or_else(|| VerifyError::Format {
                path: path.to_path_buf(),
                line: index + 1,
                content: String::from_utf8_lossy(&line)
                    .trim_end_matches('\r')
                    .to_string(),
            })?;
        staged.push(value);
    }

    if staged.len() < expected {
        return Err(VerifyError::IncompleteBuffer {
            path: path.to_path_buf(),
            expected,
            found: staged.len(),
        });
    }

    buffer.samples_mut().copy_from_slice(&staged);
    debug!(path = %path.display(), samples = expected, "Loaded sample buffer");
    Ok(())
}

fn parse_line(line: &str) -> Option<f64> {
    line.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_lines(path: &Path, count: usize) {
        let content: String = (0..count).map(|i| format!("{}\n", i as f64 / 8.0)).collect();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("0.25"), Some(0.25));
        assert_eq!(parse_line("-1.5e-3\r"), Some(-0.0015));
        assert_eq!(parse_line("  7 "), Some(7.0));
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("abc"), None);
    }

    #[test]
    fn test_exact_line_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        write_lines(&path, 16);

        let mut buffer = SampleBuffer::zeroed(16);
        load_into(&path, &mut buffer).unwrap();
        for i in 0..16 {
            assert_eq!(buffer[i], i as f64 / 8.0);
        }
    }

    #[test]
    fn test_one_line_too_many() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        write_lines(&path, 17);

        let mut buffer = SampleBuffer::zeroed(16);
        match load_into(&path, &mut buffer) {
            Err(VerifyError::BufferOverrun { expected, .. }) => assert_eq!(expected, 16),
            other => panic!("Expected BufferOverrun, got: {:?}", other),
        }
        assert!(buffer.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_one_line_too_few() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        write_lines(&path, 15);

        let mut buffer = SampleBuffer::from_samples(vec![9.0; 16]);
        match load_into(&path, &mut buffer) {
            Err(VerifyError::IncompleteBuffer {
                expected, found, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(found, 15);
            }
            other => panic!("Expected IncompleteBuffer, got: {:?}", other),
        }
        // Nothing committed on failure
        assert!(buffer.samples().iter().all(|&s| s == 9.0));
    }

    #[test]
    fn test_non_numeric_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        fs::write(&path, "0.1\n0.2\nnot-a-number\n0.4\n").unwrap();

        let mut buffer = SampleBuffer::zeroed(4);
        match load_into(&path, &mut buffer) {
            Err(VerifyError::Format { line, content, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(content, "not-a-number");
            }
            other => panic!("Expected Format error, got: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_line_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        fs::write(&path, b"0.1\n\xff\xfe\n").unwrap();

        let mut buffer = SampleBuffer::zeroed(2);
        match load_into(&path, &mut buffer) {
            Err(VerifyError::Format { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected Format error, got: {:?}", other),
        }
        assert!(buffer.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_crlf_line_endings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        fs::write(&path, "0.5\r\n-0.25\r\n").unwrap();

        let buffer = SampleBuffer::load(&path, 2).unwrap();
        assert_eq!(buffer.samples(), &[0.5, -0.25]);
    }

    #[test]
    fn test_missing_file() {
        let mut buffer = SampleBuffer::zeroed(4);
        let result = load_into(Path::new("/nonexistent/samples.txt"), &mut buffer);
        assert!(matches!(result, Err(VerifyError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_constructor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.txt");
        write_lines(&path, 8);

        let buffer = SampleBuffer::load(&path, 8).unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer[7], 7.0 / 8.0);
    }
}
