//! Mock sync API tests.
//!
//! These tests use wiremock to simulate the sync backend and check the
//! endpoint, the probe, and the coordinator running over both.

use std::sync::Arc;
use std::time::Duration;

use fieldsync_core::error::UploadError;
use fieldsync_core::{
    Connectivity, ConnectivityOracle, EndpointUrl, MemoryStore, Record, RecordPayload,
    RecordStore, Report, SyncEndpoint, SyncQueueCoordinator,
};
use fieldsync_http::{HttpEndpoint, HttpProbe};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create an endpoint URL from a mock server.
fn mock_url(server: &MockServer) -> EndpointUrl {
    EndpointUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn report(title: &str) -> Record {
    Record::new(RecordPayload::Report(Report::new(title)), true)
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_acknowledged() {
    let server = MockServer::start().await;
    let record = report("Pump station");

    Mock::given(method("PUT"))
        .and(path(format!("/v1/records/{}", record.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": record.id.as_str(),
            "receivedAt": "2024-05-01T10:00:00Z",
            "remoteId": "srv-42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new(mock_url(&server)).unwrap();
    let ack = endpoint.upload(&record).await.unwrap();

    assert_eq!(ack.id, record.id);
    assert_eq!(ack.remote_id.as_deref(), Some("srv-42"));
    assert!(ack.received_at.is_some());
}

#[tokio::test]
async fn test_upload_sends_record_json() {
    let server = MockServer::start().await;
    let record = report("Substation");

    Mock::given(method("PUT"))
        .and(path(format!("/v1/records/{}", record.id)))
        .and(wiremock::matchers::body_json(serde_json::to_value(&record).unwrap()))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": record.id.as_str() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new(mock_url(&server)).unwrap();
    endpoint.upload(&record).await.unwrap();
}

#[tokio::test]
async fn test_upload_with_bearer_token() {
    let server = MockServer::start().await;
    let record = report("Culvert");

    Mock::given(method("PUT"))
        .and(header("authorization", "Bearer field-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": record.id.as_str() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new(mock_url(&server))
        .unwrap()
        .with_token("field-token");
    endpoint.upload(&record).await.unwrap();
}

#[tokio::test]
async fn test_upload_rejected() {
    let server = MockServer::start().await;
    let record = report("Bridge deck");

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": "InvalidRecord",
            "message": "title too long"
        })))
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new(mock_url(&server)).unwrap();
    let err = endpoint.upload(&record).await.unwrap_err();

    match err {
        UploadError::Rejected(ref rejected) => {
            assert_eq!(rejected.status, 422);
            assert_eq!(rejected.code.as_deref(), Some("InvalidRecord"));
            assert_eq!(rejected.message.as_deref(), Some("title too long"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(!err.is_transient());
    assert!(err.to_string().contains("422"));
}

#[tokio::test]
async fn test_upload_unavailable_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new(mock_url(&server)).unwrap();
    let err = endpoint.upload(&report("Tunnel")).await.unwrap_err();

    match err {
        UploadError::Rejected(ref rejected) => {
            assert_eq!(rejected.status, 503);
            assert!(rejected.code.is_none());
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let server = MockServer::start().await;
    let url = mock_url(&server);
    drop(server);

    let endpoint = HttpEndpoint::new(url).unwrap();
    let err = endpoint.upload(&report("Dam")).await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(
        err,
        UploadError::Connection { .. } | UploadError::Timeout { .. }
    ));
}

// ============================================================================
// Probe Tests
// ============================================================================

#[tokio::test]
async fn test_probe_detects_online() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let probe = HttpProbe::new(mock_url(&server), Duration::from_secs(5)).unwrap();
    assert!(!probe.is_online());

    let mut rx = probe.subscribe();
    assert_eq!(probe.check().await, Connectivity::Online);
    assert!(probe.is_online());
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Connectivity::Online);

    // A repeated result is not a change.
    probe.check().await;
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_probe_unhealthy_is_offline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let probe = HttpProbe::new(mock_url(&server), Duration::from_secs(5)).unwrap();
    assert_eq!(probe.check().await, Connectivity::Offline);
    assert!(!probe.is_online());
}

#[tokio::test]
async fn test_probe_task_publishes_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let probe = Arc::new(HttpProbe::new(mock_url(&server), Duration::from_secs(5)).unwrap());
    let mut rx = probe.subscribe();
    let handle = probe.spawn(Duration::from_millis(50));

    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|c| c.is_online()))
        .await
        .unwrap()
        .unwrap();

    drop(probe);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}

// ============================================================================
// Coordinator Tests
// ============================================================================

#[tokio::test]
async fn test_queue_flushes_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let probe = Arc::new(HttpProbe::new(mock_url(&server), Duration::from_secs(5)).unwrap());
    let endpoint = HttpEndpoint::new(mock_url(&server)).unwrap();
    let queue = SyncQueueCoordinator::new(MemoryStore::new(), endpoint, probe.clone());

    // The probe has not checked yet, so the record is queued.
    let record = queue
        .create_record(RecordPayload::Report(Report::new("Water tower")))
        .await
        .unwrap();
    assert!(record.sync_pending);

    Mock::given(method("PUT"))
        .and(path(format!("/v1/records/{}", record.id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": record.id.as_str() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert!(probe.check().await.is_online());
    let report = queue.flush().await.unwrap();

    assert_eq!(report.synced, vec![record.id.clone()]);
    let stored = queue.store().get(&record.id).await.unwrap().unwrap();
    assert!(!stored.sync_pending);
}

#[tokio::test]
async fn test_mismatched_ack_keeps_record_pending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "someone-else" })))
        .mount(&server)
        .await;

    let probe = Arc::new(HttpProbe::new(mock_url(&server), Duration::from_secs(5)).unwrap());
    let endpoint = HttpEndpoint::new(mock_url(&server)).unwrap();
    let queue = SyncQueueCoordinator::new(MemoryStore::new(), endpoint, probe.clone());

    let record = queue
        .create_record(RecordPayload::Report(Report::new("Pylon")))
        .await
        .unwrap();
    probe.check().await;

    let report = queue.flush().await.unwrap();
    assert_eq!(report.failed, vec![record.id.clone()]);
    assert_eq!(queue.get_pending_records().await.unwrap().len(), 1);
}
