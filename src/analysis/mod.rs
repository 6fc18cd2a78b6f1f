//! Analysis Module
//!
//! Frequency-domain and level measurements of sample buffers:
//! - Single-sided magnitude spectrum (FFT)
//! - RMS, peak and DC offset
//! - Original-vs-resynthesized error figures

pub mod metrics;
pub mod spectrum;

pub use metrics::{ErrorMetrics, SignalMetrics};
pub use spectrum::{analyze_spectrum, Spectrum, SpectrumBin};
