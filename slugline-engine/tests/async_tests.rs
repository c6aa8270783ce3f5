//! Async coordinator tests

#![cfg(feature = "async")]

use slugline_engine::*;
use std::sync::Arc;
use std::time::Duration;

fn coordinator(engine: EngineConfig, max_in_flight: usize) -> AsyncCoordinator {
    AsyncCoordinator::new(BatchDispatcher::new(engine).unwrap(), max_in_flight).unwrap()
}

#[tokio::test]
async fn test_async_slugify() {
    let coordinator = coordinator(EngineConfig::serial(), DEFAULT_MAX_IN_FLIGHT);
    let config = Arc::new(SlugConfig::default());
    assert_eq!(
        coordinator.slugify("Hello, world!", &config).await.unwrap(),
        "hello-world"
    );
    assert_eq!(coordinator.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_batch_preserves_order() {
    let coordinator = coordinator(
        EngineConfig {
            chunk_size: 10,
            workers: Some(3),
            ..EngineConfig::threaded()
        },
        2,
    );
    let config = Arc::new(SlugConfig::default());
    let texts: Vec<String> = (0..95).map(|i| format!("Title Number {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let slugs = coordinator.batch_slugify(&refs, &config).await.unwrap();
    let expected: Vec<String> = (0..95).map(|i| format!("title-number-{i}")).collect();
    assert_eq!(slugs, expected);
    assert_eq!(coordinator.in_flight(), 0);
}

#[tokio::test]
async fn test_async_empty_batch() {
    let coordinator = coordinator(EngineConfig::serial(), 1);
    let slugs = coordinator
        .batch_slugify(&[], &Arc::new(SlugConfig::default()))
        .await
        .unwrap();
    assert!(slugs.is_empty());
}

#[tokio::test]
async fn test_async_type_error() {
    let coordinator = coordinator(EngineConfig::serial(), 4);
    let items = vec![serde_json::json!("ok"), serde_json::json!(false)];
    let err = coordinator
        .batch_slugify_inputs(&items, &Arc::new(SlugConfig::default()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Type));
}

#[tokio::test]
async fn test_zero_concurrency_rejected() {
    let dispatcher = BatchDispatcher::new(EngineConfig::serial()).unwrap();
    assert!(AsyncCoordinator::new(dispatcher, 0).is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_callers_share_limit() {
    let coordinator = Arc::new(coordinator(EngineConfig::serial(), 3));
    let config = Arc::new(SlugConfig::default());

    let mut handles = Vec::new();
    for i in 0..20 {
        let coordinator = coordinator.clone();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            coordinator.slugify(&format!("Caller {i}"), &config).await
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), format!("caller-{i}"));
    }
    assert_eq!(coordinator.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancellation_leaves_coordinator_usable() {
    let coordinator = coordinator(
        EngineConfig {
            chunk_size: 1,
            ..EngineConfig::serial()
        },
        1,
    );
    let config = Arc::new(SlugConfig::default());
    let texts: Vec<String> = (0..20_000).map(|i| format!("Long Batch Item {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let result = coordinator
        .batch_slugify_until(&refs, &config, async {})
        .await;
    assert!(matches!(result, Err(EngineError::Cancelled)));

    // running jobs drain and release their permits
    for _ in 0..100 {
        if coordinator.in_flight() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(coordinator.in_flight(), 0);

    let slugs = coordinator.batch_slugify(&refs[..3], &config).await.unwrap();
    assert_eq!(
        slugs,
        vec!["long-batch-item-0", "long-batch-item-1", "long-batch-item-2"]
    );
}

#[tokio::test]
async fn test_coordinators_share_gate() {
    let gate = InFlightGate::new(2).unwrap();
    let serial = Arc::new(BatchDispatcher::new(EngineConfig::serial()).unwrap());
    let threaded = Arc::new(
        BatchDispatcher::new(EngineConfig {
            workers: Some(2),
            ..EngineConfig::threaded()
        })
        .unwrap(),
    );
    let first = AsyncCoordinator::with_gate(serial, gate.clone());
    let second = AsyncCoordinator::with_gate(threaded, gate.clone())
        .limit_batch(5)
        .unwrap();
    assert_eq!(first.max_in_flight(), 2);
    assert_eq!(second.max_in_flight(), 2);
    assert!(first.clone().limit_batch(0).is_err());

    let config = Arc::new(SlugConfig::default());
    let mut calls = tokio::task::JoinSet::new();
    for i in 0..300 {
        let coordinator = if i % 2 == 0 { first.clone() } else { second.clone() };
        let config = config.clone();
        calls.spawn(async move {
            let slug = coordinator.slugify(&format!("Shared {i}"), &config).await;
            (i, slug)
        });
    }

    let mut peak = 0;
    let mut done = 0;
    while done < 300 {
        peak = peak.max(gate.in_flight());
        tokio::select! {
            joined = calls.join_next() => {
                let (i, slug) = joined.unwrap().unwrap();
                assert_eq!(slug.unwrap(), format!("shared-{i}"));
                done += 1;
            }
            () = tokio::task::yield_now() => {}
        }
    }
    assert!(peak <= 2);
    assert_eq!(gate.in_flight(), 0);
}

#[tokio::test]
async fn test_batch_limit_below_gate() {
    let gate = InFlightGate::default();
    assert_eq!(gate.limit(), DEFAULT_MAX_IN_FLIGHT);
    let dispatcher = Arc::new(
        BatchDispatcher::new(EngineConfig {
            chunk_size: 3,
            ..EngineConfig::serial()
        })
        .unwrap(),
    );
    let coordinator = AsyncCoordinator::with_gate(dispatcher, gate)
        .limit_batch(1)
        .unwrap();
    let texts: Vec<String> = (0..10).map(|i| format!("Row {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let slugs = coordinator
        .batch_slugify(&refs, &Arc::new(SlugConfig::default()))
        .await
        .unwrap();
    assert_eq!(slugs[9], "row-9");
    assert_eq!(coordinator.in_flight(), 0);
}
