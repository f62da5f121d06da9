// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use std::{sync::Arc, time::Duration};

use rstest::*;
use safekart_core::{
    config::SessionTimings,
    context::memory::InMemoryContext,
    timeline::{self, LookupState, OrderLookup, OrderTimeline},
    Error,
};
use safekart_model::{OrderId, StepStatus};
use tokio::time::Instant;

#[fixture]
fn context() -> InMemoryContext {
    InMemoryContext::demo()
}

#[fixture]
fn orders(context: InMemoryContext) -> OrderTimeline<InMemoryContext> {
    OrderTimeline::new(context, SessionTimings::immediate())
}

#[rstest]
#[tokio::test]
async fn lookup_is_case_insensitive(orders: OrderTimeline<InMemoryContext>) {
    let lower = orders.lookup("sk123456789").await.unwrap();
    let upper = orders.lookup("SK123456789").await.unwrap();
    let padded = orders.lookup("  Sk123456789 ").await.unwrap();

    assert!(lower.is_found());
    assert_eq!(lower, upper);
    assert_eq!(upper, padded);
    assert_eq!(orders.last_result(), Some(padded));
}

#[rstest]
#[case::unknown("SK000000000", "SK000000000")]
#[case::blank("   ", "")]
#[tokio::test]
async fn unknown_order_is_not_found(
    orders: OrderTimeline<InMemoryContext>,
    #[case] raw: &str,
    #[case] canonical: &str,
) {
    let lookup = orders.lookup(raw).await.unwrap();
    assert_eq!(
        lookup,
        OrderLookup::NotFound {
            order_id: OrderId::canonicalize(canonical)
        }
    );
    assert_eq!(lookup.record(), None);
    assert!(matches!(orders.state(), LookupState::Resolved { .. }));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn resolving_is_visible_while_the_store_answers(context: InMemoryContext) {
    let timeline = Arc::new(OrderTimeline::new(context, SessionTimings::default()));
    let pending = tokio::spawn({
        let timeline = timeline.clone();
        async move { timeline.lookup("sk987654321").await }
    });

    let mut states = timeline.subscribe();
    states
        .wait_for(|state| matches!(state, LookupState::Resolving { .. }))
        .await
        .unwrap();
    assert_eq!(
        timeline.state(),
        LookupState::Resolving {
            order_id: OrderId::canonicalize("SK987654321")
        }
    );

    let lookup = pending.await.unwrap().unwrap();
    assert!(lookup.record().unwrap().is_delivered());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn newer_lookup_supersedes_older(context: InMemoryContext) {
    let timeline = Arc::new(OrderTimeline::new(context, SessionTimings::default()));
    let older = tokio::spawn({
        let timeline = timeline.clone();
        async move { timeline.lookup("SK123456789").await }
    });
    tokio::time::sleep(Duration::from_millis(500)).await;

    let newer = timeline.lookup("SK555666777").await.unwrap();

    assert!(matches!(older.await.unwrap(), Err(Error::Superseded(_))));
    assert_eq!(
        newer.record().map(|record| record.order_id.as_str()),
        Some("SK555666777")
    );
    assert_eq!(timeline.last_result(), Some(newer));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn slow_store_times_out(context: InMemoryContext) {
    context.set_order_latency(Duration::from_secs(60));
    let timeline = OrderTimeline::new(context, SessionTimings::default());
    let start = Instant::now();

    let err = timeline.lookup("SK123456789").await.unwrap_err();

    match err {
        Error::LookupTimeout { timeout } => assert_eq!(timeout, Duration::from_secs(10)),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(start.elapsed() >= Duration::from_secs(11));
    assert_eq!(timeline.state(), LookupState::Idle);
}

#[rstest]
#[tokio::test]
async fn failing_store_is_an_adapter_error(context: InMemoryContext) {
    context.set_unavailable(true);
    let timeline = OrderTimeline::new(context, SessionTimings::immediate());

    let err = timeline.lookup("SK123456789").await.unwrap_err();

    assert!(matches!(err, Error::AdapterError { .. }));
    assert_eq!(timeline.state(), LookupState::Idle);
}

#[rstest]
#[tokio::test]
async fn reset_forgets_the_last_result(orders: OrderTimeline<InMemoryContext>) {
    orders.lookup("SK123456789").await.unwrap();
    orders.reset();
    assert_eq!(orders.state(), LookupState::Idle);
    assert_eq!(orders.last_result(), None);
}

#[rstest]
#[case::in_transit("SK123456789", Some("Out for Delivery"))]
#[case::just_placed("SK555666777", Some("Payment Confirmed"))]
#[case::delivered("SK987654321", None)]
#[tokio::test]
async fn current_step_of_demo_orders(
    orders: OrderTimeline<InMemoryContext>,
    #[case] order_id: &str,
    #[case] expected: Option<&str>,
) {
    let lookup = orders.lookup(order_id).await.unwrap();
    let record = lookup.record().unwrap();

    let current = timeline::current_step(record).unwrap();
    assert_eq!(current.map(|step| step.title.as_str()), expected);

    let view = timeline::view(record).unwrap();
    let currents = view
        .entries
        .iter()
        .filter(|entry| entry.status == StepStatus::Current)
        .count();
    assert_eq!(currents, usize::from(expected.is_some()));
}
