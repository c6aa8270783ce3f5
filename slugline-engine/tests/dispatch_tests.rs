//! Mode equivalence and ordering tests for slugline-engine

use proptest::prelude::*;
use slugline_engine::*;
use std::sync::Arc;

fn sample_texts(n: usize) -> Vec<String> {
    let seeds = [
        "Hello, world!",
        "Café déjà vu!",
        "Привет мир",
        "  lots   of   space  ",
        "Tom &amp; Jerry",
        "",
        "???",
    ];
    (0..n)
        .map(|i| format!("{} #{i}", seeds[i % seeds.len()]))
        .collect()
}

fn run(config: EngineConfig, texts: &[String], slug_config: &Arc<SlugConfig>) -> Vec<String> {
    let dispatcher = BatchDispatcher::new(config).unwrap();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    dispatcher.dispatch(&refs, slug_config).unwrap()
}

#[test]
fn test_serial_and_thread_agree() {
    let texts = sample_texts(2_500);
    let config = Arc::new(SlugConfig::default());

    let serial = run(EngineConfig::serial(), &texts, &config);
    let threaded = run(
        EngineConfig {
            workers: Some(4),
            chunk_size: 97,
            ..EngineConfig::threaded()
        },
        &texts,
        &config,
    );

    assert_eq!(serial.len(), texts.len());
    assert_eq!(serial, threaded);
    assert_eq!(serial[0], "hello-world-0");
    assert_eq!(serial[2], "privet-mir-2");
}

#[test]
fn test_empty_batch() {
    let config = Arc::new(SlugConfig::default());
    for engine in [EngineConfig::serial(), EngineConfig::threaded(), EngineConfig::process()] {
        let dispatcher = BatchDispatcher::new(engine).unwrap();
        assert!(dispatcher.dispatch(&[], &config).unwrap().is_empty());
    }
}

#[test]
fn test_single_item_batch() {
    let config = Arc::new(SlugConfig::default());
    let dispatcher = BatchDispatcher::new(EngineConfig::threaded()).unwrap();
    assert_eq!(
        dispatcher.dispatch(&["One Item"], &config).unwrap(),
        vec!["one-item"]
    );
}

#[test]
fn test_thread_cache_shared_across_batches() {
    let config = Arc::new(SlugConfig::default());
    let dispatcher = BatchDispatcher::new(EngineConfig {
        workers: Some(2),
        ..EngineConfig::threaded()
    })
    .unwrap();

    let repeated = vec!["Same Title"; 100];
    let first = dispatcher.dispatch(&repeated, &config).unwrap();
    let second = dispatcher.dispatch(&repeated, &config).unwrap();
    assert_eq!(first, second);

    let cache = dispatcher.cache().unwrap();
    assert_eq!(cache.len(), 1);
    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 200);
    assert!(stats.hits >= 198);
}

#[test]
fn test_different_configs_do_not_collide_in_cache() {
    let dispatcher = BatchDispatcher::new(EngineConfig::serial()).unwrap();
    let dash = Arc::new(SlugConfig::default());
    let underscore = Arc::new(SlugConfig::builder().separator("_").build().unwrap());

    assert_eq!(dispatcher.dispatch(&["a b"], &dash).unwrap(), vec!["a-b"]);
    assert_eq!(dispatcher.dispatch(&["a b"], &underscore).unwrap(), vec!["a_b"]);
}

#[test]
fn test_type_error_names_index() {
    let dispatcher = BatchDispatcher::new(EngineConfig::threaded()).unwrap();
    let items: Vec<Option<&str>> = vec![Some("a"), Some("b"), None];
    let err = dispatcher
        .dispatch_inputs(&items, &Arc::new(SlugConfig::default()))
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Type));
    assert_eq!(err.to_string(), "expected text at index 2, found none");
}

#[test]
fn test_worker_count_resolution() {
    let config = EngineConfig::threaded();
    assert_eq!(config.worker_count(), default_workers());
    assert!(BatchDispatcher::new(EngineConfig {
        workers: Some(0),
        ..EngineConfig::threaded()
    })
    .is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_thread_mode_preserves_order(
        texts in prop::collection::vec("[A-Za-z0-9 ]{0,12}", 0..120),
        chunk_size in 1usize..20,
        workers in 1usize..6,
    ) {
        let config = Arc::new(SlugConfig::default());
        let serial = run(EngineConfig::serial(), &texts, &config);
        let threaded = run(
            EngineConfig { workers: Some(workers), chunk_size, ..EngineConfig::threaded() },
            &texts,
            &config,
        );
        prop_assert_eq!(serial.len(), texts.len());
        prop_assert_eq!(serial, threaded);
    }
}
