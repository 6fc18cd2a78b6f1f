//! Interchange Module
//!
//! The amplitude text format shared with the external resynthesis engine:
//! one decimal floating-point value per line, newline-terminated.

pub mod atomic;
pub mod loader;
pub mod serializer;

pub use loader::load_into;
pub use serializer::{write_amplitudes, write_samples, Progress, SerializeSummary};
