//! Integration tests for EventLoop orchestration.
//!
//! Covers the end-to-end flow of:
//! - register / trigger / remove round trips
//! - priority launch order and system trigger brackets
//! - once-gate exactly-once semantics under racing triggers
//! - interval drivers and delayed one-shots
//! - verb and trigger toggles, batch register semantics

use fuze_event::{CancelToken, Event, EventBuilder, EventError, EventKind};
use fuze_runtime::{EventLoop, LoopError, LoopFunc};
use fuze_types::{ErrorCode, EventId, TriggerName};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Diagnostic output for debugging timing-sensitive failures; enable
/// with `RUST_LOG=fuze_runtime=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn name(s: &str) -> TriggerName {
    TriggerName::try_from(s).expect("valid trigger name")
}

/// Event whose payload bumps a shared counter and returns the new
/// count as a string.
fn counting_event(trigger: &str, counter: Arc<AtomicUsize>) -> Result<Event, EventError> {
    EventBuilder::new()
        .with_trigger(trigger)
        .action(move |_| (counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
        .build()
}

/// Event that returns a fixed label, for launch-order assertions.
fn labeled_event(trigger: &str, priority: i32, label: &str) -> Result<Event, EventError> {
    let label = label.to_string();
    EventBuilder::new()
        .with_trigger(trigger)
        .with_priority(priority)
        .action(move |_| label.clone())
        .build()
}

/// Polls until the counter reaches `expected` or the deadline passes.
async fn wait_for_count(counter: &AtomicUsize, expected: usize) {
    for _ in 0..200 {
        if counter.load(Ordering::SeqCst) >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "counter stuck at {} waiting for {expected}",
        counter.load(Ordering::SeqCst)
    );
}

// =============================================================================
// Register / trigger round trips
// =============================================================================

#[tokio::test]
async fn sequential_triggers_count_up() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    event_loop
        .register(&ctx, [counting_event("ping", Arc::clone(&counter))])
        .expect("register");

    for expected in ["1", "2", "3"] {
        let outputs = event_loop
            .trigger(&ctx, &name("ping"))
            .expect("trigger")
            .join()
            .await;
        assert_eq!(outputs, vec![expected.to_string()]);
    }
}

#[tokio::test]
async fn launch_order_is_descending_priority() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    // Registered out of order on purpose.
    event_loop
        .register(
            &ctx,
            [
                labeled_event("race", 1, "low"),
                labeled_event("race", 10, "high"),
                labeled_event("race", 5, "mid"),
            ],
        )
        .expect("register");

    // Join preserves launch order, so the output order is the proof.
    for _ in 0..5 {
        let outputs = event_loop
            .trigger(&ctx, &name("race"))
            .expect("trigger")
            .join()
            .await;
        assert_eq!(outputs, vec!["high", "mid", "low"]);
    }
}

#[tokio::test]
async fn unknown_trigger_launches_nothing_and_succeeds() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    let handle = event_loop
        .trigger(&ctx, &name("nobody-home"))
        .expect("unknown trigger is not an error");
    assert!(handle.is_empty());
    assert!(handle.join().await.is_empty());
}

#[tokio::test]
async fn trigger_names_and_summaries_describe_attachments() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    event_loop
        .register(
            &ctx,
            [
                labeled_event("alpha", 2, "a"),
                labeled_event("alpha", 7, "b"),
                labeled_event("beta", 0, "c"),
            ],
        )
        .expect("register");

    let mut names = event_loop.trigger_names();
    names.sort();
    assert_eq!(names, vec![name("alpha"), name("beta")]);

    let summaries = event_loop.attached_events(&name("alpha"));
    assert_eq!(summaries.len(), 2);
    assert!(summaries[0].priority > summaries[1].priority);
    assert!(summaries[0].kinds.contains(&EventKind::Triggered));
}

// =============================================================================
// System trigger brackets
// =============================================================================

#[tokio::test]
async fn system_events_bracket_the_launch() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let log = Arc::new(log_fixture::Log::default());

    let before_log = Arc::clone(&log);
    let after_log = Arc::clone(&log);
    let main_log = Arc::clone(&log);
    event_loop
        .register(
            &ctx,
            [
                EventBuilder::new()
                    .with_trigger(TriggerName::BEFORE_TRIGGER)
                    .action(move |_| {
                        before_log.push("before");
                        String::new()
                    })
                    .build(),
                EventBuilder::new()
                    .with_trigger(TriggerName::AFTER_TRIGGER)
                    .action(move |_| {
                        after_log.push("after");
                        String::new()
                    })
                    .build(),
                EventBuilder::new()
                    .with_trigger("work")
                    .action(move |_| {
                        main_log.push("main");
                        String::new()
                    })
                    .build(),
            ],
        )
        .expect("register");

    event_loop
        .trigger(&ctx, &name("work"))
        .expect("trigger")
        .join()
        .await;

    let entries = log.entries();
    // Brackets run synchronously around the launch; the main payload
    // runs concurrently, so only "before first" is a strict ordering.
    assert_eq!(entries.first().map(String::as_str), Some("before"));
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().any(|e| e == "after"));
    assert!(entries.iter().any(|e| e == "main"));
}

/// Tiny synchronized log fixture.
mod log_fixture {
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct Log(Mutex<Vec<String>>);

    impl Log {
        pub fn push(&self, entry: &str) {
            self.0.lock().expect("log lock").push(entry.to_string());
        }

        pub fn entries(&self) -> Vec<String> {
            self.0.lock().expect("log lock").clone()
        }
    }
}

// =============================================================================
// Once gate
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn once_event_fires_exactly_once_under_racing_triggers() {
    let event_loop = Arc::new(EventLoop::new());
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let once_counter = Arc::clone(&counter);
    event_loop
        .register(
            &ctx,
            [EventBuilder::new()
                .with_trigger("boom")
                .once()
                .action(move |_| (once_counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
                .build()],
        )
        .expect("register");

    let mut racers = Vec::new();
    for _ in 0..8 {
        let event_loop = Arc::clone(&event_loop);
        let ctx = ctx.clone();
        racers.push(tokio::spawn(async move {
            event_loop
                .trigger(&ctx, &name("boom"))
                .expect("trigger")
                .join()
                .await
                .len()
        }));
    }
    let mut launched = 0;
    for racer in racers {
        launched += racer.await.expect("racer task");
    }

    assert_eq!(launched, 1, "exactly one racer wins the gate");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(event_loop.event_count(), 0, "spent event deregistered");
    assert!(event_loop.attached_events(&name("boom")).is_empty());
}

// =============================================================================
// Removal
// =============================================================================

#[tokio::test]
async fn remove_events_returns_the_missing_subset() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    event_loop
        .register(
            &ctx,
            [labeled_event("ping", 0, "a"), labeled_event("ping", 0, "b")],
        )
        .expect("register");

    let ids: Vec<EventId> = event_loop
        .attached_events(&name("ping"))
        .iter()
        .map(|s| s.id)
        .collect();
    let unknown = EventId::new();

    let missing = event_loop.remove_events(&[ids[0], unknown]);
    assert_eq!(missing, vec![unknown]);
    assert_eq!(event_loop.event_count(), 1);

    // Full list on repeat: everything already gone is reported.
    let mut full = ids.clone();
    full.push(unknown);
    let missing = event_loop.remove_events(&full);
    assert_eq!(missing, vec![ids[0], unknown]);
    assert_eq!(event_loop.event_count(), 0);

    let missing = event_loop.remove_events(&full);
    assert_eq!(missing.len(), 3, "idempotent: now all are missing");
}

#[tokio::test]
async fn remove_triggers_reports_unmatched_names() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    event_loop
        .register(&ctx, [labeled_event("ping", 0, "a")])
        .expect("register");

    let missing = event_loop.remove_triggers(&[name("ping"), name("ghost")]);
    assert_eq!(missing, vec![name("ghost")]);
    assert_eq!(event_loop.event_count(), 0);
}

// =============================================================================
// Toggles
// =============================================================================

#[tokio::test]
async fn disabled_trigger_errors_and_runs_nothing() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    event_loop
        .register(&ctx, [counting_event("ping", Arc::clone(&counter))])
        .expect("register");

    let states = event_loop.toggle_triggers(&[name("ping")]);
    assert_eq!(states, vec![(name("ping"), false)]);

    let err = event_loop
        .trigger(&ctx, &name("ping"))
        .expect_err("disabled trigger must error");
    assert_eq!(err, LoopError::TriggerDisabled(name("ping")));
    assert_eq!(err.code(), "LOOP_TRIGGER_DISABLED");
    assert!(err.is_recoverable());
    assert_eq!(counter.load(Ordering::SeqCst), 0, "zero handlers ran");

    // Double toggle restores.
    let states = event_loop.toggle_triggers(&[name("ping")]);
    assert_eq!(states, vec![(name("ping"), true)]);
    let outputs = event_loop
        .trigger(&ctx, &name("ping"))
        .expect("re-enabled")
        .join()
        .await;
    assert_eq!(outputs, vec!["1".to_string()]);
}

#[tokio::test]
async fn disabled_verb_blocks_the_operation_globally() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    let states = event_loop.toggle_funcs(&[LoopFunc::Register]);
    assert_eq!(states, vec![(LoopFunc::Register, false)]);

    let err = event_loop
        .register(&ctx, [labeled_event("ping", 0, "a")])
        .expect_err("register is disabled");
    assert_eq!(err, LoopError::FuncDisabled(LoopFunc::Register));
    assert_eq!(event_loop.event_count(), 0);

    // Other verbs are untouched.
    assert!(event_loop.trigger(&ctx, &name("ping")).is_ok());

    let states = event_loop.toggle_funcs(&[LoopFunc::Register]);
    assert_eq!(states, vec![(LoopFunc::Register, true)]);
    event_loop
        .register(&ctx, [labeled_event("ping", 0, "a")])
        .expect("re-enabled");
    assert_eq!(event_loop.event_count(), 1);
}

#[tokio::test]
async fn disabled_trigger_verb_fails_every_fire() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    event_loop
        .register(&ctx, [counting_event("ping", Arc::clone(&counter))])
        .expect("register");
    let states = event_loop.toggle_funcs(&[LoopFunc::Trigger]);
    assert_eq!(states, vec![(LoopFunc::Trigger, false)]);

    let err = event_loop
        .trigger(&ctx, &name("ping"))
        .expect_err("trigger verb is disabled");
    assert_eq!(err, LoopError::FuncDisabled(LoopFunc::Trigger));
    assert_eq!(err.code(), "LOOP_FUNC_DISABLED");
    assert!(err.is_recoverable());
    assert_eq!(counter.load(Ordering::SeqCst), 0, "zero handlers ran");

    // The per-name switch is untouched and the verb comes back.
    let states = event_loop.toggle_funcs(&[LoopFunc::Trigger]);
    assert_eq!(states, vec![(LoopFunc::Trigger, true)]);
    let outputs = event_loop
        .trigger(&ctx, &name("ping"))
        .expect("re-enabled")
        .join()
        .await;
    assert_eq!(outputs, vec!["1".to_string()]);
}

#[tokio::test]
async fn disabled_subscribe_verb_rejects_participants() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    let states = event_loop.toggle_funcs(&[LoopFunc::Subscribe]);
    assert_eq!(states, vec![(LoopFunc::Subscribe, false)]);

    let publisher = EventBuilder::new()
        .with_trigger("ping")
        .as_publisher()
        .action(|_| String::new())
        .build();
    let listener = EventBuilder::new()
        .as_listener()
        .action(|_| String::new())
        .build();
    let err = event_loop
        .subscribe(&ctx, [publisher], [listener])
        .expect_err("subscribe verb is disabled");
    assert_eq!(err, LoopError::FuncDisabled(LoopFunc::Subscribe));
    assert_eq!(event_loop.event_count(), 0, "nothing was wired");
}

#[tokio::test]
async fn cancelled_context_fails_fast() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    ctx.cancel();

    let err = event_loop
        .register(&ctx, [labeled_event("ping", 0, "a")])
        .expect_err("cancelled context");
    assert_eq!(err, LoopError::Cancelled);
    let err = event_loop
        .trigger(&ctx, &name("ping"))
        .expect_err("cancelled context");
    assert_eq!(err, LoopError::Cancelled);
}

// =============================================================================
// Validation and batch semantics
// =============================================================================

#[tokio::test]
async fn shapeless_event_is_rejected_and_registry_unchanged() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    // No trigger, no interval, no delay, no listener role.
    let err = event_loop
        .register(&ctx, [EventBuilder::new().action(|_| String::new()).build()])
        .expect_err("shapeless event");
    assert!(matches!(
        err,
        LoopError::InvalidEvent(EventError::InvalidShape(_))
    ));
    assert_eq!(err.code(), "LOOP_INVALID_EVENT");
    assert_eq!(event_loop.event_count(), 0);
    assert!(event_loop.trigger_names().is_empty());
}

#[tokio::test]
async fn batch_register_keeps_valid_siblings() {
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();

    let err = event_loop
        .register(
            &ctx,
            [
                labeled_event("ping", 0, "ok"),
                EventBuilder::new().action(|_| String::new()).build(),
                EventBuilder::new().with_trigger("pong").build(),
            ],
        )
        .expect_err("two of three fail");

    match err {
        LoopError::Batch { total, failures } => {
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 2);
        }
        other => panic!("expected batch error, got {other}"),
    }

    // The valid sibling survived and is live.
    assert_eq!(event_loop.event_count(), 1);
    let outputs = event_loop
        .trigger(&ctx, &name("ping"))
        .expect("trigger")
        .join()
        .await;
    assert_eq!(outputs, vec!["ok".to_string()]);
}

// =============================================================================
// Interval drivers and delayed one-shots
// =============================================================================

#[tokio::test]
async fn once_interval_runs_exactly_once_then_deregisters() {
    init_tracing();
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let tick_counter = Arc::clone(&counter);
    event_loop
        .register(
            &ctx,
            [EventBuilder::new()
                .every(Duration::from_millis(20))
                .once()
                .action(move |_| (tick_counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
                .build()],
        )
        .expect("register");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1, "one tick, then done");
    assert_eq!(event_loop.event_count(), 0, "spent ticker deregistered");
}

#[tokio::test]
async fn removal_stops_a_live_interval_driver() {
    init_tracing();
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let tick_counter = Arc::clone(&counter);
    event_loop
        .register(
            &ctx,
            [EventBuilder::new()
                .with_trigger("tick")
                .every(Duration::from_millis(20))
                .action(move |_| (tick_counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
                .build()],
        )
        .expect("register");

    wait_for_count(&counter, 2).await;
    assert!(event_loop.remove_triggers(&[name("tick")]).is_empty());

    let frozen = counter.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(
        counter.load(Ordering::SeqCst),
        frozen,
        "no tick after removal"
    );
}

#[tokio::test]
async fn delayed_oneshot_runs_once_after_the_delay() {
    init_tracing();
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let delayed_counter = Arc::clone(&counter);
    event_loop
        .register(
            &ctx,
            [EventBuilder::new()
                .delayed_by(Duration::from_millis(40))
                .action(move |_| (delayed_counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
                .build()],
        )
        .expect("register");

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0, "still inside the delay");

    wait_for_count(&counter, 1).await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1, "one-shot never repeats");
    assert_eq!(event_loop.event_count(), 0);
}

#[tokio::test]
async fn removal_mid_delay_cancels_the_oneshot() {
    init_tracing();
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let delayed_counter = Arc::clone(&counter);
    let event = EventBuilder::new()
        .delayed_by(Duration::from_millis(60))
        .action(move |_| (delayed_counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
        .build()
        .expect("valid event");
    let id = event.id();
    event_loop.register(&ctx, [Ok(event)]).expect("register");

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(event_loop.remove_events(&[id]).is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0, "payload never ran");
    assert_eq!(event_loop.event_count(), 0);
}

#[tokio::test]
async fn trigger_anchored_delay_never_self_fires() {
    init_tracing();
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    // A delay on a trigger-anchored event staggers nothing by itself;
    // the payload must stay dormant until the trigger fires, and the
    // attachment must outlive the deadline.
    let delayed_counter = Arc::clone(&counter);
    event_loop
        .register(
            &ctx,
            [EventBuilder::new()
                .with_trigger("ping")
                .delayed_by(Duration::from_millis(20))
                .action(move |_| (delayed_counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
                .build()],
        )
        .expect("register");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0, "no run without a trigger");
    assert_eq!(event_loop.event_count(), 1, "attachment survived the deadline");

    let outputs = event_loop
        .trigger(&ctx, &name("ping"))
        .expect("trigger")
        .join()
        .await;
    assert_eq!(outputs, vec!["1".to_string()]);
    assert_eq!(event_loop.event_count(), 1, "still attached after firing");
}

// =============================================================================
// Shutdown
// =============================================================================

#[tokio::test]
async fn shutdown_stops_drivers_and_fails_further_calls() {
    init_tracing();
    let event_loop = EventLoop::new();
    let ctx = CancelToken::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let tick_counter = Arc::clone(&counter);
    event_loop
        .register(
            &ctx,
            [EventBuilder::new()
                .with_trigger("tick")
                .every(Duration::from_millis(20))
                .action(move |_| (tick_counter.fetch_add(1, Ordering::SeqCst) + 1).to_string())
                .build()],
        )
        .expect("register");

    wait_for_count(&counter, 1).await;
    event_loop.shutdown();

    tokio::time::sleep(Duration::from_millis(30)).await;
    let frozen = counter.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(counter.load(Ordering::SeqCst), frozen, "driver stopped");

    let err = event_loop
        .trigger(&ctx, &name("tick"))
        .expect_err("loop is shut down");
    assert_eq!(err, LoopError::Cancelled);
}
