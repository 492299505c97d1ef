//! Contract test: cancellation & repeated detection
//!
//! Verifies the execution-context contract:
//! - a detector whose parent context is already cancelled fails immediately
//!   without touching the network
//! - cancelling the parent context mid-flight aborts the request promptly
//!   with a typed failure, never a hang
//! - sequential detections against a stable endpoint produce identical
//!   results (no hidden state between calls)

use pubip_core::Error;
use pubip_core::config::{DetectionKind, DetectionSpec, NetworkStack, ThirdPartyServiceSpec};
use pubip_core::traits::{Detector, Extractor};
use pubip_http::ThirdPartyDetector;

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn third_party_spec(url: String) -> DetectionSpec {
    DetectionSpec {
        kind: DetectionKind::ThirdParty,
        local_address_policy: None,
        interface: None,
        api: Some(ThirdPartyServiceSpec {
            url,
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn pre_cancelled_context_fails_without_network_io() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("8.8.8.8")
                .insert_header("content-type", "text/plain"),
        )
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let spec = third_party_spec(format!("{}/ip", server.uri()));
    let detector = ThirdPartyDetector::new(&spec, NetworkStack::V4, cancel).unwrap();

    let err = detector.detect().await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn cancelling_mid_flight_aborts_promptly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("8.8.8.8")
                .insert_header("content-type", "text/plain")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let spec = third_party_spec(format!("{}/ip", server.uri()));
    let detector = ThirdPartyDetector::new(&spec, NetworkStack::V4, cancel.clone()).unwrap();

    let handle = tokio::spawn(async move { detector.detect().await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    // Must resolve well inside the request timeout, not after the server's
    // 30-second delay.
    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("detection resolves promptly after cancellation")
        .expect("detection task does not panic");

    assert!(matches!(result, Err(Error::Cancelled)));
}

/// Extraction strategy that never finishes on its own
struct StalledExtractor;

#[async_trait::async_trait]
impl Extractor for StalledExtractor {
    async fn extract(&self, _payload: &[u8], _query: &str) -> Result<String, Error> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("8.8.8.8".to_string())
    }
}

#[tokio::test]
async fn cancelling_during_extraction_aborts_promptly() {
    // The response arrives quickly; the query evaluation is what stalls.
    // Cancelling the parent context must abort the extraction step too.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"ip":"8.8.8.8"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let mut spec = third_party_spec(format!("{}/ip", server.uri()));
    spec.api.as_mut().unwrap().json_path = Some(".ip".to_string());

    let detector = ThirdPartyDetector::new(&spec, NetworkStack::V4, cancel.clone())
        .unwrap()
        .with_extractor(Arc::new(StalledExtractor));

    let handle = tokio::spawn(async move { detector.detect().await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("detection resolves promptly after cancellation")
        .expect("detection task does not panic");

    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn sequential_detections_are_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("8.8.8.8")
                .insert_header("content-type", "text/plain"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let spec = third_party_spec(format!("{}/ip", server.uri()));
    let detector =
        ThirdPartyDetector::new(&spec, NetworkStack::V4, CancellationToken::new()).unwrap();

    // Two fresh queries, no caching between them: same body, same result.
    let first = detector.detect().await.unwrap();
    let second = detector.detect().await.unwrap();
    assert_eq!(first, "8.8.8.8");
    assert_eq!(first, second);
}

#[tokio::test]
async fn sequential_failures_are_stable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("192.168.1.1")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let spec = third_party_spec(format!("{}/ip", server.uri()));
    let detector =
        ThirdPartyDetector::new(&spec, NetworkStack::V4, CancellationToken::new()).unwrap();

    let first = detector.detect().await.unwrap_err();
    let second = detector.detect().await.unwrap_err();
    assert!(matches!(first, Error::LocalAddressRejected { .. }));
    assert!(matches!(second, Error::LocalAddressRejected { .. }));
}
