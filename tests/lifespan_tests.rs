//! Integration Tests for the lifespan runner

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mctools::{Event, Lifespan, LifespanError, Phase};
use serde_json::json;

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Log, entry: &str) {
    log.lock().unwrap().push(entry.to_string());
}

#[tokio::test]
async fn test_sync_startup_and_async_shutdown() {
    let log = new_log();
    let mut lifespan = Lifespan::new();

    let l = log.clone();
    lifespan.on_startup(move || {
        push(&l, "sync_startup");
        Ok(())
    });
    let l = log.clone();
    lifespan.on_shutdown_async(move || {
        let l = l.clone();
        async move {
            push(&l, "async_shutdown");
            Ok(())
        }
    });

    let inner_log = log.clone();
    lifespan
        .run(async move {
            assert_eq!(*inner_log.lock().unwrap(), vec!["sync_startup"]);
        })
        .await
        .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["sync_startup", "async_shutdown"]);
    assert_eq!(lifespan.phase(), Phase::Closed);
}

#[tokio::test]
async fn test_events_run_in_registration_order() {
    let log = new_log();
    let mut lifespan = Lifespan::new();

    for name in ["a", "b", "c", "d"] {
        let l = log.clone();
        if name == "b" || name == "d" {
            lifespan.add_startup(Event::from_async(move || {
                let l = l.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    push(&l, name);
                    Ok(())
                }
            }));
        } else {
            lifespan.add_startup(Event::sync(move || {
                push(&l, name);
                Ok(())
            }));
        }
    }
    let l = log.clone();
    lifespan.on_shutdown(move || {
        push(&l, "down1");
        Ok(())
    });
    let l = log.clone();
    lifespan.on_shutdown(move || {
        push(&l, "down2");
        Ok(())
    });

    lifespan.enter().await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "d"]);

    lifespan.exit().await.unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["a", "b", "c", "d", "down1", "down2"]
    );
}

#[tokio::test]
async fn test_shutdown_error_aborts_remaining_shutdown_events() {
    let log = new_log();
    let mut lifespan = Lifespan::new();

    lifespan.on_shutdown(|| Err(anyhow::anyhow!("flush failed")));
    let l = log.clone();
    lifespan.on_shutdown(move || {
        push(&l, "after_failure");
        Ok(())
    });

    lifespan.enter().await.unwrap();
    let err = lifespan.exit().await.unwrap_err();

    match err {
        LifespanError::Action { phase, source } => {
            assert_eq!(phase, Phase::Exiting);
            assert_eq!(source.to_string(), "flush failed");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(lifespan.phase(), Phase::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_applies_to_each_phase_separately() {
    let mut lifespan = Lifespan::with_timeout(Duration::from_secs(2));

    // Each phase alone fits in the deadline; together they would not
    for _ in 0..2 {
        lifespan.on_startup_async(|| async {
            tokio::time::sleep(Duration::from_millis(700)).await;
            Ok(())
        });
        lifespan.on_shutdown_async(|| async {
            tokio::time::sleep(Duration::from_millis(700)).await;
            Ok(())
        });
    }

    lifespan.run(async {}).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_timeout_abandons_remaining_events() {
    let log = new_log();
    let mut lifespan = Lifespan::with_timeout(Duration::from_secs(1));

    lifespan.on_shutdown_async(|| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok(())
    });
    let l = log.clone();
    lifespan.on_shutdown(move || {
        push(&l, "never");
        Ok(())
    });

    let err = lifespan.run(async {}).await.unwrap_err();

    assert!(matches!(
        err,
        LifespanError::Timeout {
            phase: Phase::Exiting,
            timeout
        } if timeout == Duration::from_secs(1)
    ));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_returns_body_output() {
    let mut lifespan = Lifespan::new();
    let output = lifespan.run(async { 40 + 2 }).await.unwrap();
    assert_eq!(output, 42);
}

#[test]
fn test_states_guard() {
    let mut lifespan = Lifespan::new();

    lifespan.set_states(json!({"foo": "bar"}));
    assert_eq!(lifespan.states().unwrap().unwrap()["foo"], "bar");

    lifespan.set_states_with(|| json!({"baz": 123}));
    assert_eq!(lifespan.states().unwrap().unwrap()["baz"], 123);

    lifespan.set_states(42);
    assert!(matches!(
        lifespan.states(),
        Err(LifespanError::InvalidStates(_))
    ));
}
