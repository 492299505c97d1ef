//! Core trait definitions
//!
//! The seams of the engine:
//! - [`Detector`]: obtains and validates one address candidate per call
//! - [`DetectorFactory`]: constructs a detector variant from a spec
//! - [`Extractor`]: pulls a scalar string out of a structured payload

pub mod detector;
pub mod extractor;

pub use detector::{Detector, DetectorFactory};
pub use extractor::Extractor;
