// # Detector Trait
//
// Defines the capability shared by all address detection variants.
//
// ## Implementations
//
// - Third-party HTTP service: `pubip-http` crate
// - Interface-based: external crates (registered via `DetectorRegistry`)
//
// ## Lifecycle
//
// A detector is constructed once per detection spec, bound to a cancellable
// execution context, and invoked repeatedly, typically once per scheduler
// tick. It holds no mutable state between calls: every `detect()` performs a
// fresh query, and results are never cached or persisted.
//
// ## Usage
//
// ```rust,ignore
// use pubip_core::Detector;
//
// async fn tick(detector: &dyn Detector) {
//     match detector.detect().await {
//         Ok(address) => println!("current address: {address}"),
//         Err(err) => println!("skipping this cycle: {err}"),
//     }
// }
// ```

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::{DetectionSpec, NetworkStack};

/// Trait for address detection implementations
///
/// Implementations must be thread-safe. Callers are expected to invoke
/// `detect()` serially (one call per scheduler tick), but since detectors
/// hold only immutable configuration, concurrent read-only use is safe.
///
/// ## Allowed Capabilities
/// - Perform one outbound query per `detect()` call
/// - Delegate structured-data extraction to an [`Extractor`](super::Extractor)
///
/// ## Forbidden Capabilities
/// - Cache or persist detected addresses
/// - Retry internally (retry policy belongs to the external scheduler)
/// - Spawn background tasks
#[async_trait]
pub trait Detector: Send + Sync {
    /// Detect the current address for the configured stack
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: a validated address literal for the configured stack
    /// - `Err(Error)`: a typed failure; the caller treats it as "skip this
    ///   cycle"
    async fn detect(&self) -> Result<String, crate::Error>;

    /// The address family this detector targets
    fn stack(&self) -> NetworkStack;
}

/// Helper trait for constructing detectors from a detection spec
///
/// Construction resolves the concrete variant exactly once; a spec whose
/// variant does not match the factory is a configuration error.
pub trait DetectorFactory: Send + Sync {
    /// Create a detector instance
    ///
    /// # Parameters
    ///
    /// - `spec`: the detection spec to resolve
    /// - `stack`: address family the detector must target
    /// - `cancel`: parent cancellation context; cancelling it aborts any
    ///   in-flight detection promptly
    fn create(
        &self,
        spec: &DetectionSpec,
        stack: NetworkStack,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Detector>, crate::Error>;
}
