// # Third-Party HTTP Detector
//
// This crate provides the third-party detection variant for the address
// detection system: it asks an external HTTP service (e.g. api.ipify.org,
// icanhazip.com) what address this machine appears as.
//
// ## Architecture
//
// One `detect()` call performs exactly one outbound GET, bounded by a
// 3-second timeout layered on the detector's parent cancellation context.
// The response is interpreted by a fixed precedence rule:
//
// - content type contains `application/json`, OR a jsonPath is configured
//   → the body is structured data and goes through the extraction engine
//   (a configured jsonPath wins even when the server declares plain text)
// - otherwise → the trimmed body text is the raw candidate
//
// The raw candidate then passes through stack validation and local-address
// policy before it is returned. No caching, no retries, no background tasks;
// retry policy belongs to the external scheduler.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use pubip_core::config::{DetectionKind, DetectionSpec, LocalAddressPolicy, NetworkStack};
use pubip_core::traits::{Detector, DetectorFactory, Extractor};
use pubip_core::{DetectorRegistry, Error, Result, policy};
use pubip_extract::JsonExtractor;

/// Per-request timeout for the third-party endpoint
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Detector that obtains the current address from a third-party HTTP service
///
/// Constructed once per detection spec with all optional fields resolved to
/// concrete defaults (empty string, empty map, `Ignore`), so nothing
/// downstream branches on "is this set". Reusable across repeated `detect()`
/// calls; holds no mutable state.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the basic-auth
/// password.
pub struct ThirdPartyDetector {
    /// Endpoint URL
    url: String,

    /// Query expression for JSON responses; empty when not configured
    json_path: String,

    /// Query-string parameters
    params: HashMap<String, String>,

    /// Request headers
    headers: HashMap<String, String>,

    /// Basic-auth username; empty when not configured
    username: String,

    /// Basic-auth password; empty when not configured
    /// ⚠️ NEVER log this value
    password: String,

    /// Treatment of private/local candidates
    policy: LocalAddressPolicy,

    /// Address family this detector targets
    stack: NetworkStack,

    /// Parent cancellation context
    cancel: CancellationToken,

    /// HTTP client
    client: reqwest::Client,

    /// Extraction strategy for structured responses
    extractor: Arc<dyn Extractor>,
}

impl std::fmt::Debug for ThirdPartyDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThirdPartyDetector")
            .field("url", &self.url)
            .field("json_path", &self.json_path)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("policy", &self.policy)
            .field("stack", &self.stack)
            .finish()
    }
}

impl ThirdPartyDetector {
    /// Create a new third-party detector from a detection spec
    ///
    /// # Parameters
    ///
    /// - `spec`: must be of type `ThirdParty` with an `api` section; anything
    ///   else is a configuration error
    /// - `stack`: address family to validate candidates against
    /// - `cancel`: parent cancellation context; cancelling it aborts any
    ///   in-flight request promptly
    pub fn new(
        spec: &DetectionSpec,
        stack: NetworkStack,
        cancel: CancellationToken,
    ) -> Result<Self> {
        if spec.kind != DetectionKind::ThirdParty {
            return Err(Error::config(format!(
                "cannot build a third-party detector from a {:?} spec",
                spec.kind
            )));
        }
        let api = spec
            .api
            .as_ref()
            .ok_or_else(|| Error::config("third-party detection requires an `api` section"))?;
        if api.url.is_empty() {
            return Err(Error::config("third-party service URL cannot be empty"));
        }

        Ok(Self {
            url: api.url.clone(),
            json_path: api.json_path.clone().unwrap_or_default(),
            params: api.params.clone().unwrap_or_default(),
            headers: api.headers.clone().unwrap_or_default(),
            username: api.username.clone().unwrap_or_default(),
            password: api.password.clone().unwrap_or_default(),
            policy: spec.policy(),
            stack,
            cancel,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            extractor: Arc::new(JsonExtractor::new()),
        })
    }

    /// Replace the extraction strategy
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Perform the HTTP request and return the raw, unvalidated candidate
    async fn request_address(&self) -> Result<String> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut request = self.client.get(&self.url);
        if !self.params.is_empty() {
            request = request.query(&self.params);
        }
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !self.username.is_empty() || !self.password.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        tracing::debug!(url = %self.url, "requesting address");
        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            result = request.send() => result.map_err(|err| Error::transport(err))?,
        };

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let body = tokio::select! {
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            result = response.bytes() => result.map_err(|err| Error::transport(err))?,
        };

        // A configured jsonPath forces structured parsing even when the
        // server declares a non-JSON content type. Extraction races the
        // parent context just like the request itself.
        if content_type.contains("application/json") || !self.json_path.is_empty() {
            if self.json_path.is_empty() {
                return Err(Error::MissingJsonPath);
            }
            tracing::debug!(jsonpath = %self.json_path, "extracting address from JSON response");
            return tokio::select! {
                _ = self.cancel.cancelled() => Err(Error::Cancelled),
                result = self.extractor.extract(&body, &self.json_path) => result,
            };
        }

        tracing::debug!("using response body as address directly");
        Ok(String::from_utf8_lossy(&body).trim().to_owned())
    }
}

#[async_trait]
impl Detector for ThirdPartyDetector {
    async fn detect(&self) -> Result<String> {
        let candidate = self.request_address().await?;
        policy::evaluate(&candidate, self.stack, self.policy)
    }

    fn stack(&self) -> NetworkStack {
        self.stack
    }
}

/// Factory for creating third-party detectors
pub struct ThirdPartyFactory;

impl DetectorFactory for ThirdPartyFactory {
    fn create(
        &self,
        spec: &DetectionSpec,
        stack: NetworkStack,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Detector>> {
        Ok(Box::new(ThirdPartyDetector::new(spec, stack, cancel)?))
    }
}

/// Register the third-party detector with a registry
pub fn register(registry: &DetectorRegistry) {
    registry.register_detector(DetectionKind::ThirdParty.name(), Box::new(ThirdPartyFactory));
}
