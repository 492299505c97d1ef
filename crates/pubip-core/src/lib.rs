// # pubip-core
//
// Core library for the address detection & validation engine.
//
// ## Architecture Overview
//
// This library provides the building blocks for detecting the machine's
// current public (or policy-permitted local) IP address:
// - **Detector**: Trait for obtaining a validated address candidate
// - **Extractor**: Trait for pulling a scalar value out of structured payloads
// - **addr**: Pure classifier functions (syntax + private-range checks)
// - **policy**: Stack selection and local-address policy evaluation
// - **DetectorRegistry**: Plugin-based registry for detector variants
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Classification, extraction, and transport
//    live behind separate seams
// 2. **Plugin-Based**: Detector variants are registered dynamically, no
//    hard-coded if-else on detection type
// 3. **Library-First**: The scheduler, config loading, and DNS providers are
//    external collaborators; this crate only supplies typed building blocks
// 4. **No Hidden State**: Detectors hold immutable configuration only; every
//    detection call performs a fresh query

pub mod addr;
pub mod config;
pub mod error;
pub mod policy;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{DetectionKind, DetectionSpec, LocalAddressPolicy, NetworkStack};
pub use error::{Error, Result};
pub use registry::DetectorRegistry;
pub use traits::{Detector, DetectorFactory, Extractor};
