//! PCM Module
//!
//! Decoding of 16-bit PCM WAV files into raw interleaved samples.

pub mod decoder;

pub use decoder::{decode_wav, inspect_wav, normalize, DecodedPcm, WavHeader};
