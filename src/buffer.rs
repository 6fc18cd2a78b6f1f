//! Fixed-length sample buffer
//!
//! One analysis window of normalized samples. Buffers are sized explicitly
//! by the caller and filled either from an interchange file or directly
//! from decoded audio. Interleaved channels are kept as they are.

use std::ops::Index;
use std::path::Path;

use crate::error::Result;
use crate::interchange::loader;

/// Ordered, fixed-length sequence of normalized samples
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
}

impl SampleBuffer {
    /// Create a buffer of `len` zero samples
    pub fn zeroed(len: usize) -> Self {
        SampleBuffer {
            samples: vec![0.0; len],
        }
    }

    /// Wrap existing samples; the buffer length is their count
    pub fn from_samples(samples: Vec<f64>) -> Self {
        SampleBuffer { samples }
    }

    /// Load exactly `len` samples from an interchange file
    pub fn load(path: &Path, len: usize) -> Result<Self> {
        let mut buffer = SampleBuffer::zeroed(len);
        loader::load_into(path, &mut buffer)?;
        Ok(buffer)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

impl Index<usize> for SampleBuffer {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.samples[index]
    }
}
