//! Event runtime integration tests (paused clock).

mod common;

use std::time::Duration;

use common::{id, run_checkout, DelayedOracle, TestHarness, TICK};
use remoteanswer_app::{Command, PaymentStatus, Reply, RuntimeEvent, View};
use remoteanswer_core::Rating;
use remoteanswer_oracle::StaticOracle;

// ============================================================================
// Checkout timer
// ============================================================================

#[tokio::test(start_paused = true)]
async fn payment_succeeds_after_twenty_ticks() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime_without_oracle();

    runtime.handle(Command::OpenCheckout(id("p2"))).await.unwrap();
    assert_eq!(
        runtime.handle(Command::StartPayment).await.unwrap(),
        Reply::PaymentStarted
    );
    assert!(runtime.timer_running());

    let start = tokio::time::Instant::now();
    let ticks = run_checkout(&mut runtime).await;

    assert_eq!(ticks, 20);
    assert!(start.elapsed() >= TICK * 20);
    assert!(!runtime.timer_running());

    let state = runtime.storefront();
    assert_eq!(state.checkout().unwrap().status(), PaymentStatus::Success);
    assert_eq!(state.purchases().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn second_start_does_not_double_record() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime_without_oracle();

    runtime.handle(Command::OpenCheckout(id("p1"))).await.unwrap();
    runtime.handle(Command::StartPayment).await.unwrap();
    tokio::time::sleep(TICK * 3).await;
    assert_eq!(
        runtime.handle(Command::StartPayment).await.unwrap(),
        Reply::AlreadyProcessing
    );

    run_checkout(&mut runtime).await;
    tokio::time::sleep(TICK * 30).await;
    while let Ok(event) = tokio::time::timeout(Duration::ZERO, runtime.next_event()).await {
        if let Some(event) = event {
            runtime.apply(event);
        }
    }

    assert_eq!(runtime.storefront().purchases().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn close_stops_timer_and_resets() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime_without_oracle();

    runtime.handle(Command::OpenCheckout(id("p1"))).await.unwrap();
    runtime.handle(Command::StartPayment).await.unwrap();

    for _ in 0..5 {
        let event = runtime.next_event().await.unwrap();
        runtime.apply(event);
    }
    assert_eq!(runtime.storefront().checkout().unwrap().progress(), 25);

    let reply = runtime.handle(Command::CloseCheckout).await.unwrap();
    assert_eq!(reply, Reply::CheckoutClosed { was_open: true });
    assert!(!runtime.timer_running());

    tokio::time::sleep(TICK * 30).await;
    while let Ok(Some(event)) = tokio::time::timeout(Duration::ZERO, runtime.next_event()).await {
        assert_eq!(runtime.apply(event), Reply::Ignored);
    }
    assert!(runtime.storefront().purchases().is_empty());

    runtime.handle(Command::OpenCheckout(id("p1"))).await.unwrap();
    let session = runtime.storefront().checkout().unwrap();
    assert_eq!(session.status(), PaymentStatus::Idle);
    assert_eq!(session.progress(), 0);
}

#[tokio::test(start_paused = true)]
async fn opening_checkout_while_processing_is_rejected() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime_without_oracle();

    runtime.handle(Command::OpenCheckout(id("p1"))).await.unwrap();
    runtime.handle(Command::StartPayment).await.unwrap();

    assert!(runtime.handle(Command::OpenCheckout(id("p2"))).await.is_err());
    assert!(runtime.timer_running());
    assert_eq!(
        runtime.storefront().checkout().unwrap().product().id,
        id("p1")
    );
}

#[tokio::test(start_paused = true)]
async fn stale_tick_is_ignored() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime_without_oracle();

    runtime.handle(Command::OpenCheckout(id("p1"))).await.unwrap();
    runtime.handle(Command::StartPayment).await.unwrap();
    let epoch = runtime.storefront().checkout().unwrap().epoch();

    let reply = runtime.apply(RuntimeEvent::CheckoutTick { epoch: epoch + 1 });
    assert_eq!(reply, Reply::Ignored);
    assert_eq!(runtime.storefront().checkout().unwrap().progress(), 0);
}

#[tokio::test(start_paused = true)]
async fn full_purchase_flow() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime_without_oracle();

    runtime.handle(Command::ToggleWishlist(id("p2"))).await.unwrap();
    runtime.handle(Command::OpenCheckout(id("p2"))).await.unwrap();
    runtime.handle(Command::StartPayment).await.unwrap();
    run_checkout(&mut runtime).await;

    let reply = runtime.handle(Command::Download).await.unwrap();
    assert_eq!(
        reply,
        Reply::Downloaded {
            filename: "p2_guide.pdf".into()
        }
    );

    let reply = runtime.handle(Command::ReviewNow).await.unwrap();
    assert_eq!(reply, Reply::ReviewRequested { product_id: id("p2") });
    assert_eq!(runtime.storefront().view(), View::Library);

    runtime
        .handle(Command::SubmitReview {
            product_id: id("p2"),
            rating: Rating::new(5).unwrap(),
            comment: "Exactly what I needed".into(),
        })
        .await
        .unwrap();

    let state = runtime.storefront();
    assert!(state.pending_review().is_none());
    assert_eq!(state.wishlist_count(), 0);
    assert_eq!(state.library()[0].review.unwrap().rating.stars(), 5);
}

#[tokio::test(start_paused = true)]
async fn confirm_switches_to_receipt() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime_without_oracle();

    runtime.handle(Command::OpenCheckout(id("p1"))).await.unwrap();
    assert!(runtime.handle(Command::ConfirmOrder).await.is_err());

    runtime.handle(Command::StartPayment).await.unwrap();
    run_checkout(&mut runtime).await;

    let reply = runtime.handle(Command::ConfirmOrder).await.unwrap();
    assert_eq!(reply, Reply::Navigated(View::OrderSuccess));
    assert!(runtime.storefront().checkout().is_none());
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test(start_paused = true)]
async fn search_results_take_precedence() {
    let harness = TestHarness::new();
    let oracle = StaticOracle::new().with_recommendation("electromagnetism", vec![id("p1")]);
    let mut runtime = harness.runtime(oracle);

    runtime
        .handle(Command::SelectCategory("Tech".parse().unwrap()))
        .await
        .unwrap();
    let reply = runtime
        .handle(Command::SubmitSearch("electromagnetism".into()))
        .await
        .unwrap();
    assert_eq!(reply, Reply::Searching { generation: 2 });

    let event = runtime.next_event().await.unwrap();
    assert_eq!(runtime.apply(event), Reply::SearchApplied { matches: 1 });

    let page = runtime.storefront().catalog_page();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].product.id, id("p1"));
}

#[tokio::test(start_paused = true)]
async fn failed_search_falls_back_to_text_filter() {
    let harness = TestHarness::new();
    let mut runtime = harness.runtime(DelayedOracle::new());

    runtime
        .handle(Command::SubmitSearch("notes on p2".into()))
        .await
        .unwrap();
    let event = runtime.next_event().await.unwrap();
    assert_eq!(runtime.apply(event), Reply::SearchApplied { matches: 0 });

    let page = runtime.storefront().catalog_page();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].product.id, id("p2"));
}

#[tokio::test(start_paused = true)]
async fn blank_search_clears_results() {
    let harness = TestHarness::new();
    let oracle = StaticOracle::new().with_recommendation("calculus", vec![id("p1")]);
    let mut runtime = harness.runtime(oracle);

    runtime
        .handle(Command::SubmitSearch("calculus".into()))
        .await
        .unwrap();
    let event = runtime.next_event().await.unwrap();
    runtime.apply(event);
    assert!(runtime.storefront().query().has_recommendations());

    let reply = runtime
        .handle(Command::SubmitSearch("   ".into()))
        .await
        .unwrap();
    assert_eq!(reply, Reply::Updated);
    assert!(!runtime.storefront().query().has_recommendations());
    assert_eq!(runtime.storefront().catalog_page().total_items, 2);
}

#[tokio::test(start_paused = true)]
async fn superseded_search_is_cancelled() {
    let harness = TestHarness::new();
    let oracle = DelayedOracle::new()
        .answer("slow", Duration::from_secs(5), &["p1"])
        .answer("fast", Duration::from_millis(10), &["p2"]);
    let mut runtime = harness.runtime(oracle);

    runtime.handle(Command::SubmitSearch("slow".into())).await.unwrap();
    runtime.handle(Command::SubmitSearch("fast".into())).await.unwrap();
    assert_eq!(runtime.search_generation(), 2);

    let event = runtime.next_event().await.unwrap();
    assert_eq!(
        event,
        RuntimeEvent::SearchResolved {
            generation: 2,
            ids: vec![id("p2")]
        }
    );
    runtime.apply(event);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(
        tokio::time::timeout(Duration::ZERO, runtime.next_event())
            .await
            .is_err(),
        "cancelled search must not report"
    );
    assert_eq!(runtime.storefront().query().recommended, vec![id("p2")]);
}

#[tokio::test(start_paused = true)]
async fn late_result_from_old_generation_is_discarded() {
    let harness = TestHarness::new();
    let oracle = StaticOracle::new().with_recommendation("second", vec![id("p2")]);
    let mut runtime = harness.runtime(oracle);

    runtime.handle(Command::SubmitSearch("first".into())).await.unwrap();
    runtime.handle(Command::SubmitSearch("second".into())).await.unwrap();

    let reply = runtime.apply(RuntimeEvent::SearchResolved {
        generation: 1,
        ids: vec![id("p1")],
    });
    assert_eq!(reply, Reply::Ignored);
    assert!(!runtime.storefront().query().has_recommendations());
}

#[tokio::test(start_paused = true)]
async fn blank_search_discards_in_flight_result() {
    let harness = TestHarness::new();
    let oracle = DelayedOracle::new().answer("slow", Duration::from_secs(1), &["p1"]);
    let mut runtime = harness.runtime(oracle);

    runtime.handle(Command::SubmitSearch("slow".into())).await.unwrap();
    assert!(runtime.search_pending());
    runtime.handle(Command::SubmitSearch(String::new())).await.unwrap();
    assert!(!runtime.search_pending());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(tokio::time::timeout(Duration::ZERO, runtime.next_event())
        .await
        .is_err());
    assert!(!runtime.storefront().query().has_recommendations());
}

#[tokio::test(start_paused = true)]
async fn category_change_discards_in_flight_search() {
    let harness = TestHarness::new();
    let oracle = DelayedOracle::new().answer("p2", Duration::from_secs(1), &["p1"]);
    let mut runtime = harness.runtime(oracle);

    runtime.handle(Command::SubmitSearch("p2".into())).await.unwrap();
    assert!(runtime.search_pending());
    runtime
        .handle(Command::SelectCategory("Tech".parse().unwrap()))
        .await
        .unwrap();
    assert!(!runtime.search_pending());
    assert_eq!(runtime.search_generation(), 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(tokio::time::timeout(Duration::ZERO, runtime.next_event())
        .await
        .is_err());

    let reply = runtime.apply(RuntimeEvent::SearchResolved {
        generation: 1,
        ids: vec![id("p1")],
    });
    assert_eq!(reply, Reply::Ignored);

    let page = runtime.storefront().catalog_page();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].product.id, id("p2"));
}

// ============================================================================
// Sales copy
// ============================================================================

#[tokio::test(start_paused = true)]
async fn pitch_is_cached_and_falls_back() {
    let harness = TestHarness::new();
    let oracle = StaticOracle::new().with_pitch("p1 guide", "Master the fundamentals.");
    let mut runtime = harness.runtime(oracle);

    let reply = runtime.handle(Command::Pitch(id("p1"))).await.unwrap();
    assert_eq!(
        reply,
        Reply::Pitch {
            product_id: id("p1"),
            text: "Master the fundamentals.".into()
        }
    );

    let reply = runtime.handle(Command::Pitch(id("p2"))).await.unwrap();
    assert_eq!(
        reply,
        Reply::Pitch {
            product_id: id("p2"),
            text: "Notes on p2".into()
        }
    );

    let reply = runtime.handle(Command::Pitch(id("p1"))).await.unwrap();
    assert!(matches!(reply, Reply::Pitch { text, .. } if text == "Master the fundamentals."));

    assert!(runtime.handle(Command::Pitch(id("ghost"))).await.is_err());
}
