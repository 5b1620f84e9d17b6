//! Counter store tests. Require a running Valkey.

use conveyor_rs::counter::CounterStore;

async fn test_counter(key: &str) -> CounterStore {
    let url =
        std::env::var("VALKEY_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    CounterStore::connect(&url, key).await.unwrap()
}

fn test_key() -> String {
    format!("conveyor:test:{}", uuid::Uuid::new_v4())
}

#[tokio::test]
#[ignore] // Requires running Valkey
async fn unset_counter_reads_as_zero() {
    let counter = test_counter(&test_key()).await;
    assert_eq!(counter.processed_count().await.unwrap(), 0);
}

#[tokio::test]
#[ignore] // Requires running Valkey
async fn increment_is_monotonic() {
    let counter = test_counter(&test_key()).await;
    assert_eq!(counter.increment().await.unwrap(), 1);
    assert_eq!(counter.increment().await.unwrap(), 2);
    assert_eq!(counter.processed_count().await.unwrap(), 2);
}

#[tokio::test]
#[ignore] // Requires running Valkey
async fn key_count_reflects_new_keys() {
    let counter = test_counter(&test_key()).await;
    let before = counter.key_count().await.unwrap();
    counter.increment().await.unwrap();
    let after = counter.key_count().await.unwrap();
    assert!(after > before);
}
