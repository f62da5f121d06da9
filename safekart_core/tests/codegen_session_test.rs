// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use std::{sync::Arc, time::Duration};

use rstest::*;
use safekart_core::{
    codegen::{CodeGenerationSession, GenerationState, DOWNLOAD_FILENAME},
    config::SessionTimings,
    context::memory::{Export, InMemoryContext},
    Error,
};
use tokio::time::Instant;

#[fixture]
fn context() -> InMemoryContext {
    InMemoryContext::demo()
}

#[fixture]
fn session(context: InMemoryContext) -> CodeGenerationSession<InMemoryContext> {
    CodeGenerationSession::new(context, SessionTimings::immediate())
}

#[rstest]
#[tokio::test]
async fn generation_is_deterministic(session: CodeGenerationSession<InMemoryContext>) {
    let first = session.generate("https://safekart.example.com/product/ABC123").await.unwrap();
    let second = session.generate("https://safekart.example.com/product/ABC123").await.unwrap();
    let other = session.generate("https://safekart.example.com/product/XYZ789").await.unwrap();

    assert_eq!(first, second);
    assert_ne!(first.bytes, other.bytes);
    assert_eq!(first.media_type, "image/svg+xml");
    assert!(first.data_uri().starts_with("data:image/svg+xml;base64,"));
    assert_eq!(session.last_payload(), Some(other));
}

#[rstest]
#[case::empty("")]
#[case::spaces("   ")]
#[case::whitespace("\t\n ")]
#[tokio::test]
async fn blank_text_is_refused(session: CodeGenerationSession<InMemoryContext>, #[case] text: &str) {
    assert!(matches!(session.generate(text).await, Err(Error::EmptyInput)));
    assert_eq!(session.state(), GenerationState::Idle);

    // a previous payload survives a refused generation
    let payload = session.generate("hello").await.unwrap();
    assert!(matches!(session.generate(text).await, Err(Error::EmptyInput)));
    assert_eq!(session.last_payload(), Some(payload));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn generation_is_paced(context: InMemoryContext) {
    let session = CodeGenerationSession::new(context, SessionTimings::default());
    let start = Instant::now();
    session.generate("hello").await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn reset_abandons_a_running_generation(context: InMemoryContext) {
    let session = Arc::new(CodeGenerationSession::new(context, SessionTimings::default()));
    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.generate("hello").await }
    });
    session
        .subscribe()
        .wait_for(|state| *state == GenerationState::Generating)
        .await
        .unwrap();

    let err = session.generate("again").await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));

    session.reset();
    assert!(matches!(pending.await.unwrap(), Err(Error::Superseded(_))));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(session.state(), GenerationState::Idle);
    assert_eq!(session.last_payload(), None);
}

#[rstest]
#[tokio::test]
async fn exports_need_a_payload(context: InMemoryContext) {
    let session = CodeGenerationSession::new(context.clone(), SessionTimings::immediate());
    assert!(matches!(session.copy_source(&context), Err(Error::InvalidState(_))));
    assert!(matches!(session.download(&context), Err(Error::InvalidState(_))));

    let payload = session.generate("SK123456789").await.unwrap();
    session.copy_source(&context).unwrap();
    session.download(&context).unwrap();

    assert_eq!(
        context.exports(),
        vec![
            Export::Copied("SK123456789".to_string()),
            Export::Downloaded {
                filename: DOWNLOAD_FILENAME.to_string(),
                bytes: payload.bytes,
            },
        ]
    );

    session.reset();
    assert!(matches!(session.download(&context), Err(Error::InvalidState(_))));
}
