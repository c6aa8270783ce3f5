//! Async API tests for slugline

#![cfg(feature = "async")]

use slugline::*;

#[tokio::test]
async fn test_async_slugify() {
    let config = SlugConfig::default();
    assert_eq!(
        async_slugify("Hello, world!", &config).await.unwrap(),
        "hello-world"
    );

    let err = async_slugify(&serde_json::json!(null), &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Type));
}

#[tokio::test]
async fn test_async_batch_matches_sync() {
    let config = SlugConfig::builder().max_length(Some(12)).build().unwrap();
    let texts: Vec<String> = (0..250).map(|i| format!("Async item number {i}")).collect();
    let options = BatchOptions::new().chunk_size(20).max_in_flight(3);

    let expected = batch_slugify(&texts, &config, &options).unwrap();
    let actual = async_batch_slugify(&texts, &config, &options).await.unwrap();
    assert_eq!(actual, expected);
    assert_eq!(actual[0], "async-item");
}

#[tokio::test]
async fn test_async_batch_type_error() {
    let items = vec![Some("a"), None];
    let err = async_batch_slugify(&items, &SlugConfig::default(), &BatchOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.index(), Some(1));
}

#[tokio::test]
async fn test_slugifier_async_batch() {
    let slugifier = Slugifier::with_options(
        SlugConfig::default(),
        BatchOptions::threaded().workers(2).chunk_size(2),
    )
    .unwrap();
    let slugs = slugifier
        .async_batch(&["A", "B", "C", "D", "E"])
        .await
        .unwrap();
    assert_eq!(slugs, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_async_empty_batch_still_validates_options() {
    let empty: [&str; 0] = [];
    let err = async_batch_slugify(
        &empty,
        &SlugConfig::default(),
        &BatchOptions::new().max_in_flight(0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Config));
}

#[tokio::test]
async fn test_free_async_calls_share_limit() {
    let mut calls = tokio::task::JoinSet::new();
    for i in 0..400 {
        calls.spawn(async move {
            let slug = async_slugify(&format!("Item {i}"), &SlugConfig::default()).await;
            (i, slug)
        });
    }

    let mut peak = 0;
    let mut done = 0;
    while done < 400 {
        peak = peak.max(async_in_flight());
        tokio::select! {
            joined = calls.join_next() => {
                let (i, slug) = joined.unwrap().unwrap();
                assert_eq!(slug.unwrap(), format!("item-{i}"));
                done += 1;
            }
            () = tokio::task::yield_now() => {}
        }
    }
    assert!(peak <= DEFAULT_MAX_IN_FLIGHT);
}

#[tokio::test]
async fn test_slugifier_async_calls_share_limit() {
    let slugifier = Slugifier::with_options(
        SlugConfig::default(),
        BatchOptions::threaded().workers(2).max_in_flight(4),
    )
    .unwrap();

    let mut calls = tokio::task::JoinSet::new();
    for i in 0..300 {
        let slugifier = slugifier.clone();
        calls.spawn(async move { (i, slugifier.async_slugify(&format!("Post {i}")).await) });
    }

    let mut peak = 0;
    let mut done = 0;
    while done < 300 {
        peak = peak.max(slugifier.in_flight());
        tokio::select! {
            joined = calls.join_next() => {
                let (i, slug) = joined.unwrap().unwrap();
                assert_eq!(slug.unwrap(), format!("post-{i}"));
                done += 1;
            }
            () = tokio::task::yield_now() => {}
        }
    }
    assert!(peak <= 4);
    assert_eq!(slugifier.in_flight(), 0);

    let err = slugifier.async_slugify(&serde_json::json!(3)).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Type));
}
