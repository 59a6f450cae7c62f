mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{full_storage, MockEgressClient};
use room_recorder::egress::EgressStatus;
use room_recorder::{RecorderError, RecordingController, StorageConfig};

fn controller(client: Arc<MockEgressClient>) -> RecordingController {
    RecordingController::new(client, full_storage())
}

#[tokio::test]
async fn start_returns_egress_id_and_initial_status() {
    let client = MockEgressClient::new();
    let outcome = controller(Arc::clone(&client))
        .start("demo-room")
        .await
        .unwrap();

    assert!(!outcome.egress_id.is_empty());
    assert!(matches!(
        outcome.status,
        EgressStatus::Starting | EgressStatus::Active
    ));
    assert_eq!(client.start_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn start_builds_room_composite_request() {
    let client = MockEgressClient::new();
    controller(Arc::clone(&client)).start("demo-room").await.unwrap();

    let requests = client.start_requests.lock().unwrap();
    let req = &requests[0];
    assert_eq!(req.room_name, "demo-room");
    assert_eq!(req.layout, "grid");
    assert!(!req.audio_only);

    let output = &req.file_outputs[0];
    assert_eq!(output.file_type, "MP4");
    assert!(output.filepath.starts_with("recordings/demo-room-"));
    assert!(output.filepath.ends_with(".mp4"));
    assert_eq!(
        output.s3.endpoint,
        "https://test-account.r2.cloudflarestorage.com"
    );
    assert_eq!(output.s3.bucket, "test-bucket");
    assert_eq!(output.s3.region, "auto");
    assert!(output.s3.force_path_style);
}

#[tokio::test]
async fn missing_storage_credential_fails_before_any_call() {
    let fields: [fn(&mut StorageConfig); 4] = [
        |s| s.access_key = None,
        |s| s.secret_key = None,
        |s| s.bucket = None,
        |s| s.account_id = None,
    ];

    for clear in fields {
        let mut storage = full_storage();
        clear(&mut storage);

        let client = MockEgressClient::new();
        let controller = RecordingController::new(client.clone(), storage);

        let err = controller.start("demo-room").await.unwrap_err();
        assert!(matches!(err, RecorderError::Config(_)));
        assert_eq!(
            client.start_calls.load(Ordering::SeqCst),
            0,
            "no egress call may happen with incomplete storage credentials"
        );
    }
}

#[tokio::test]
async fn successive_starts_use_distinct_output_paths() {
    let client = MockEgressClient::new();
    let controller = controller(Arc::clone(&client));

    controller.start("demo-room").await.unwrap();
    controller.start("demo-room").await.unwrap();

    let requests = client.start_requests.lock().unwrap();
    let first = &requests[0].file_outputs[0].filepath;
    let second = &requests[1].file_outputs[0].filepath;
    assert_ne!(first, second);
}

#[tokio::test]
async fn start_propagates_upstream_error() {
    let client = MockEgressClient::new();
    *client.fail_start.lock().unwrap() = Some("quota exceeded".into());

    let err = controller(Arc::clone(&client))
        .start("demo-room")
        .await
        .unwrap_err();
    match err {
        RecorderError::Upstream(msg) => assert!(msg.contains("quota exceeded")),
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn status_reports_only_in_progress_jobs() {
    let client = MockEgressClient::with_jobs(vec![
        MockEgressClient::job("EG_old", "demo-room", EgressStatus::Ended),
        MockEgressClient::job("EG_live", "demo-room", EgressStatus::Active),
    ]);

    let status = controller(client).status("demo-room").await.unwrap();
    assert!(status.is_recording);
    assert_eq!(status.active_egress.unwrap().egress_id, "EG_live");
}

#[tokio::test]
async fn status_with_no_jobs_is_not_recording() {
    let status = controller(MockEgressClient::new())
        .status("demo-room")
        .await
        .unwrap();
    assert!(!status.is_recording);
    assert!(status.active_egress.is_none());
}

#[tokio::test]
async fn status_first_in_progress_match_wins() {
    // The service does not enforce one egress per room; the probe surfaces
    // the first in-progress job in service order.
    let client = MockEgressClient::with_jobs(vec![
        MockEgressClient::job("EG_a", "demo-room", EgressStatus::Starting),
        MockEgressClient::job("EG_b", "demo-room", EgressStatus::Active),
    ]);

    let status = controller(client).status("demo-room").await.unwrap();
    assert_eq!(status.active_egress.unwrap().egress_id, "EG_a");
}

#[tokio::test]
async fn stop_of_ended_job_is_noop_success() {
    let client = MockEgressClient::with_jobs(vec![MockEgressClient::job(
        "EG_done",
        "demo-room",
        EgressStatus::Ended,
    )]);

    let outcome = controller(Arc::clone(&client)).stop("EG_done").await.unwrap();
    assert_eq!(outcome.status, EgressStatus::Ended);
    assert_eq!(outcome.message.as_deref(), Some("Recording already stopped"));
    assert_eq!(
        client.stop_calls.load(Ordering::SeqCst),
        0,
        "terminal jobs must never trigger the stop RPC"
    );
}

#[tokio::test]
async fn stop_of_failed_job_surfaces_underlying_error() {
    let client = MockEgressClient::with_jobs(vec![MockEgressClient::failed_job(
        "EG_bad",
        "demo-room",
        "disk full",
    )]);

    let outcome = controller(Arc::clone(&client)).stop("EG_bad").await.unwrap();
    assert_eq!(outcome.status, EgressStatus::Failed);
    assert_eq!(outcome.message.as_deref(), Some("Recording failed"));
    assert_eq!(outcome.error.as_deref(), Some("disk full"));
    assert_eq!(client.stop_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stop_of_active_job_issues_the_rpc() {
    let client = MockEgressClient::with_jobs(vec![MockEgressClient::job(
        "EG_live",
        "demo-room",
        EgressStatus::Active,
    )]);

    let outcome = controller(Arc::clone(&client)).stop("EG_live").await.unwrap();
    assert_eq!(outcome.status, EgressStatus::Ended);
    assert!(outcome.message.is_none());
    assert_eq!(client.stop_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stop_of_unknown_egress_is_an_upstream_error() {
    let err = controller(MockEgressClient::new())
        .stop("EG_missing")
        .await
        .unwrap_err();
    assert!(matches!(err, RecorderError::Upstream(_)));
}
