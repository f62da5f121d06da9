// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use std::{sync::Arc, time::Duration};

use rstest::*;
use safekart_core::{
    adapters::ExportSink,
    config::{SessionTimings, DEMO_CAMERA_PAYLOAD, DEMO_UPLOAD_PAYLOAD},
    context::memory::{Export, InMemoryContext},
    permission::PermissionState,
    scan::{ScanFailure, ScanSession, ScanState},
    Error,
};
use safekart_model::ScanSource;
use tokio::time::Instant;

#[fixture]
fn context() -> InMemoryContext {
    InMemoryContext::demo()
}

async fn wait_until_scanning(session: &ScanSession<InMemoryContext>) {
    session
        .subscribe()
        .wait_for(|state| matches!(state, ScanState::Scanning { .. }))
        .await
        .unwrap();
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn camera_scan_succeeds_after_detection_window(context: InMemoryContext) {
    let session = ScanSession::new(context.clone(), SessionTimings::default());
    let start = Instant::now();

    let result = session.start_camera_scan().await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(3));
    assert_eq!(result.payload(), DEMO_CAMERA_PAYLOAD);
    assert_eq!(result.source(), ScanSource::Camera);
    assert!(result.is_link());
    assert_eq!(session.result(), Some(result));
    assert_eq!(session.permission(), PermissionState::Granted);
    assert_eq!(context.camera_acquisitions(), 1);
    assert_eq!(context.camera_releases(), 1);
    assert!(!context.camera_in_use());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn denied_permission_fails_the_scan(context: InMemoryContext) {
    context.set_camera_permission(false);
    let session = ScanSession::new(context.clone(), SessionTimings::default());

    let err = session.start_camera_scan().await.unwrap_err();

    assert!(matches!(err, Error::PermissionDenied { .. }));
    assert!(matches!(
        session.state(),
        ScanState::Failed {
            failure: ScanFailure::PermissionDenied { .. }
        }
    ));
    assert_eq!(session.permission(), PermissionState::Denied);
    assert_eq!(context.camera_acquisitions(), 0);
    assert_eq!(context.camera_releases(), 0);

    // no automatic retry; the user re-invokes after a reset
    context.set_camera_permission(true);
    session.reset().unwrap();
    assert!(session.start_camera_scan().await.is_ok());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn nothing_detected_is_a_decode_error(context: InMemoryContext) {
    context.set_camera_payload(None);
    let session = ScanSession::new(context.clone(), SessionTimings::default());

    let err = session.start_camera_scan().await.unwrap_err();

    assert!(matches!(err, Error::DecodeError { .. }));
    assert!(matches!(
        session.state(),
        ScanState::Failed {
            failure: ScanFailure::DecodeError { .. }
        }
    ));
    assert_eq!(context.camera_releases(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn cancelled_scan_ignores_late_detection(context: InMemoryContext) {
    let session = Arc::new(ScanSession::new(context.clone(), SessionTimings::default()));
    let scan = tokio::spawn({
        let session = session.clone();
        async move { session.start_camera_scan().await }
    });
    wait_until_scanning(&session).await;

    session.cancel_scan().unwrap();
    assert_eq!(session.state(), ScanState::Idle);
    assert_eq!(context.camera_releases(), 1);

    let outcome = scan.await.unwrap();
    assert!(matches!(outcome, Err(Error::Superseded(_))));

    // well past the original detection window
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(session.state(), ScanState::Idle);
    assert_eq!(session.result(), None);
    assert_eq!(context.camera_releases(), 1);
    assert!(!context.camera_in_use());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn second_start_while_scanning_is_invalid(context: InMemoryContext) {
    let session = Arc::new(ScanSession::new(context.clone(), SessionTimings::default()));
    let scan = tokio::spawn({
        let session = session.clone();
        async move { session.start_camera_scan().await }
    });
    wait_until_scanning(&session).await;

    let err = session.start_camera_scan().await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
    let err = session.submit_image(vec![1, 2, 3]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));

    assert!(scan.await.unwrap().is_ok());
    assert_eq!(context.camera_acquisitions(), 1);
    assert_eq!(context.camera_releases(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn finished_scan_must_be_reset_first(context: InMemoryContext) {
    let session = ScanSession::new(context, SessionTimings::immediate());
    session.start_camera_scan().await.unwrap();

    let err = session.start_camera_scan().await.unwrap_err();
    match err {
        Error::InvalidState(transition) => {
            assert_eq!(transition.state, "succeeded");
        }
        other => panic!("unexpected error {other:?}"),
    }

    session.reset().unwrap();
    assert_eq!(session.state(), ScanState::Idle);
    assert_eq!(session.result(), None);
    assert!(session.start_camera_scan().await.is_ok());
}

#[rstest]
#[case::idle(false)]
#[case::reset_twice(true)]
#[tokio::test]
async fn reset_and_cancel_need_the_right_state(context: InMemoryContext, #[case] scan_first: bool) {
    let session = ScanSession::new(context, SessionTimings::immediate());
    if scan_first {
        session.submit_image(vec![0xFF]).await.unwrap();
        session.reset().unwrap();
    }
    assert!(matches!(session.reset(), Err(Error::InvalidState(_))));
    assert!(matches!(session.cancel_scan(), Err(Error::InvalidState(_))));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn camera_is_exclusive_across_sessions(context: InMemoryContext) {
    let first = Arc::new(ScanSession::new(context.clone(), SessionTimings::default()));
    let second = ScanSession::new(context.clone(), SessionTimings::default());
    let scan = tokio::spawn({
        let first = first.clone();
        async move { first.start_camera_scan().await }
    });
    wait_until_scanning(&first).await;

    let err = second.start_camera_scan().await.unwrap_err();
    assert!(matches!(err, Error::PermissionDenied { .. }));

    assert!(scan.await.unwrap().is_ok());
    second.reset().unwrap();
    assert!(second.start_camera_scan().await.is_ok());
    assert_eq!(context.camera_acquisitions(), 2);
    assert_eq!(context.camera_releases(), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn uploaded_image_is_decoded(context: InMemoryContext) {
    let session = ScanSession::new(context.clone(), SessionTimings::default());
    let start = Instant::now();

    let result = session.submit_image(b"\x89PNG".to_vec()).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(1_500));
    assert_eq!(result.payload(), DEMO_UPLOAD_PAYLOAD);
    assert_eq!(result.source(), ScanSource::FileUpload);
    // no permission is involved
    assert_eq!(session.permission(), PermissionState::Unrequested);
    assert_eq!(context.camera_acquisitions(), 0);
}

#[rstest]
#[tokio::test]
async fn unreadable_image_fails_the_scan(context: InMemoryContext) {
    let session = ScanSession::new(context, SessionTimings::immediate());

    let err = session.submit_image(Vec::new()).await.unwrap_err();

    assert!(matches!(err, Error::DecodeError { .. }));
    assert_eq!(
        session.state(),
        ScanState::Failed {
            failure: ScanFailure::DecodeError {
                reason: "image is unreadable".to_string()
            }
        }
    );
}

struct BrokenClipboard;

impl ExportSink for BrokenClipboard {
    type AdapterError = std::io::Error;

    fn copy_text(&self, _: &str) -> Result<(), Self::AdapterError> {
        Err(std::io::Error::other("clipboard unavailable"))
    }

    fn download(&self, _: &str, _: &[u8]) -> Result<(), Self::AdapterError> {
        Err(std::io::Error::other("downloads unavailable"))
    }
}

#[rstest]
#[tokio::test]
async fn result_is_copied_best_effort(context: InMemoryContext) {
    let session = ScanSession::new(context.clone(), SessionTimings::immediate());
    assert!(matches!(
        session.copy_result(&context),
        Err(Error::InvalidState(_))
    ));

    session.submit_image(vec![1]).await.unwrap();
    session.copy_result(&context).unwrap();
    assert_eq!(
        context.exports(),
        vec![Export::Copied(DEMO_UPLOAD_PAYLOAD.to_string())]
    );

    assert!(session.copy_result(&BrokenClipboard).is_ok());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn transitions_are_observable(context: InMemoryContext) {
    let session = ScanSession::new(context, SessionTimings::default());
    let mut states = session.subscribe();
    assert_eq!(*states.borrow_and_update(), ScanState::Idle);

    session.start_camera_scan().await.unwrap();

    assert!(states.has_changed().unwrap());
    assert!(matches!(
        *states.borrow_and_update(),
        ScanState::Succeeded { .. }
    ));
}
