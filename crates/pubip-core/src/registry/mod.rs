//! Plugin-based detector registry
//!
//! The registry allows detector variants to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains on the detection type.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pubip_core::DetectorRegistry;
//! use tokio_util::sync::CancellationToken;
//!
//! let registry = DetectorRegistry::new();
//! pubip_http::register(&registry);
//!
//! let detector = registry.create_detector(&spec, stack, CancellationToken::new())?;
//! let address = detector.detect().await?;
//! ```
//!
//! ## Registration
//!
//! Implementations register themselves during initialization:
//!
//! ```rust,ignore
//! // In the pubip-http crate
//! pub fn register(registry: &DetectorRegistry) {
//!     registry.register_detector("third_party", Box::new(ThirdPartyFactory));
//! }
//! ```

use crate::config::{DetectionSpec, NetworkStack};
use crate::error::{Error, Result};
use crate::traits::{Detector, DetectorFactory};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Registry for plugin-based detector creation
///
/// Maintains a map of detection-kind names to factory objects, allowing
/// dynamic instantiation of detectors based on a spec.
///
/// ## Thread Safety
///
/// Uses interior mutability with RwLock, allowing concurrent reads and
/// exclusive writes.
#[derive(Default)]
pub struct DetectorRegistry {
    /// Registered detector factories, keyed by `DetectionKind::name()`
    detectors: RwLock<HashMap<String, Box<dyn DetectorFactory>>>,
}

impl DetectorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector factory
    ///
    /// # Parameters
    ///
    /// - `name`: detection-kind name (e.g., "third_party", "interface")
    /// - `factory`: factory object for creating detector instances
    pub fn register_detector(&self, name: impl Into<String>, factory: Box<dyn DetectorFactory>) {
        let name = name.into();
        tracing::debug!(detector = %name, "registering detector factory");
        let mut detectors = self.detectors.write().unwrap();
        detectors.insert(name, factory);
    }

    /// Check whether a detector kind is registered
    pub fn has_detector(&self, name: &str) -> bool {
        let detectors = self.detectors.read().unwrap();
        detectors.contains_key(name)
    }

    /// Names of all registered detector kinds
    pub fn detector_names(&self) -> Vec<String> {
        let detectors = self.detectors.read().unwrap();
        detectors.keys().cloned().collect()
    }

    /// Create a detector from a detection spec
    ///
    /// Validates the spec, then dispatches to the factory registered for its
    /// kind. Resolution happens exactly once; the returned detector is
    /// reusable across repeated `detect()` calls.
    pub fn create_detector(
        &self,
        spec: &DetectionSpec,
        stack: NetworkStack,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Detector>> {
        spec.validate()?;

        let name = spec.kind.name();
        let detectors = self.detectors.read().unwrap();
        let factory = detectors
            .get(name)
            .ok_or_else(|| Error::config(format!("no detector registered for type: {name}")))?;

        factory.create(spec, stack, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DetectionKind, ThirdPartyServiceSpec};
    use async_trait::async_trait;

    struct StaticDetector {
        address: String,
        stack: NetworkStack,
    }

    #[async_trait]
    impl Detector for StaticDetector {
        async fn detect(&self) -> Result<String> {
            Ok(self.address.clone())
        }

        fn stack(&self) -> NetworkStack {
            self.stack
        }
    }

    struct StaticFactory;

    impl DetectorFactory for StaticFactory {
        fn create(
            &self,
            _spec: &DetectionSpec,
            stack: NetworkStack,
            _cancel: CancellationToken,
        ) -> Result<Box<dyn Detector>> {
            Ok(Box::new(StaticDetector {
                address: "8.8.8.8".to_string(),
                stack,
            }))
        }
    }

    fn third_party_spec() -> DetectionSpec {
        DetectionSpec {
            kind: DetectionKind::ThirdParty,
            local_address_policy: None,
            interface: None,
            api: Some(ThirdPartyServiceSpec {
                url: "https://api.ipify.org".to_string(),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn dispatches_to_registered_factory() {
        let registry = DetectorRegistry::new();
        registry.register_detector("third_party", Box::new(StaticFactory));

        let detector = registry
            .create_detector(
                &third_party_spec(),
                NetworkStack::V4,
                CancellationToken::new(),
            )
            .unwrap();

        assert_eq!(detector.detect().await.unwrap(), "8.8.8.8");
        assert_eq!(detector.stack(), NetworkStack::V4);
    }

    #[test]
    fn unregistered_kind_is_a_config_error() {
        let registry = DetectorRegistry::new();
        let err = registry
            .create_detector(
                &third_party_spec(),
                NetworkStack::V4,
                CancellationToken::new(),
            )
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn invalid_spec_is_rejected_before_dispatch() {
        let registry = DetectorRegistry::new();
        registry.register_detector("third_party", Box::new(StaticFactory));

        let spec = DetectionSpec {
            kind: DetectionKind::ThirdParty,
            local_address_policy: None,
            interface: None,
            api: None,
        };
        let err = registry
            .create_detector(&spec, NetworkStack::V4, CancellationToken::new())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn has_detector_reflects_registration() {
        let registry = DetectorRegistry::new();
        assert!(!registry.has_detector("third_party"));
        registry.register_detector("third_party", Box::new(StaticFactory));
        assert!(registry.has_detector("third_party"));
        assert_eq!(registry.detector_names(), vec!["third_party".to_string()]);
    }
}
