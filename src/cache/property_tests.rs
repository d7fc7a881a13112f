//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache invariants over generated operation
//! sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::TimeDelta;

use crate::cache::{Cache, CacheStore};

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

fn new_store(capacity: usize) -> CacheStore<String> {
    CacheStore::new(capacity, TEST_DEFAULT_TTL)
}

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f0-9]{1,3}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}"
}

/// Generates distinct keys, in generation order
fn unique_keys_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{4,12}", min..max).prop_map(|keys| {
        let mut seen = HashSet::new();
        keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
    })
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    PutTtl { key: String, value: String, ttl_secs: i64 },
    Get { key: String },
    Delete { key: String },
    Advance { secs: u64 },
    Sweep,
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Put { key, value }),
        2 => (key_strategy(), value_strategy(), -5i64..10)
            .prop_map(|(key, value, ttl_secs)| CacheOp::PutTtl { key, value, ttl_secs }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => (0u64..5).prop_map(|secs| CacheOp::Advance { secs }),
        1 => Just(CacheOp::Sweep),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every completed operation leaves the store within capacity, each get
    // counts exactly one hit or miss, and counters never decrease.
    #[test]
    fn prop_invariants_hold_for_any_sequence(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut store = new_store(capacity);
        let mut now = Instant::now();
        let mut gets: u64 = 0;
        let mut observed_hits: u64 = 0;
        let mut previous = store.stats();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => store.put(key, value, None, now),
                CacheOp::PutTtl { key, value, ttl_secs } => {
                    store.put(key, value, Some(TimeDelta::seconds(ttl_secs)), now)
                }
                CacheOp::Get { key } => {
                    gets += 1;
                    if store.get(&key, now).is_some() {
                        observed_hits += 1;
                    }
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
                CacheOp::Advance { secs } => now += Duration::from_secs(secs),
                CacheOp::Sweep => {
                    store.remove_expired(now);
                }
                CacheOp::Clear => store.clear(),
            }

            let stats = store.stats();
            prop_assert!(stats.current_size <= capacity, "size {} > capacity {}", stats.current_size, capacity);
            prop_assert!(stats.hits >= previous.hits);
            prop_assert!(stats.misses >= previous.misses);
            prop_assert!(stats.evictions >= previous.evictions);
            prop_assert!(stats.expired_removals >= previous.expired_removals);
            previous = stats;
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, observed_hits, "Hits mismatch");
        prop_assert_eq!(stats.hits + stats.misses, gets, "Every get counts once");
        prop_assert_eq!(stats.total_requests, gets);
    }

    // Storing a value and reading it back before expiry returns that value.
    #[test]
    fn prop_put_then_get(key in key_strategy(), value in value_strategy()) {
        let mut store = new_store(TEST_CAPACITY);
        let now = Instant::now();

        store.put(key.clone(), value.clone(), None, now);

        prop_assert_eq!(store.get(&key, now), Some(value));
    }

    // A second put on the same key wins and does not grow the store.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = new_store(TEST_CAPACITY);
        let now = Instant::now();

        store.put(key.clone(), value1, None, now);
        store.put(key.clone(), value2.clone(), None, now);

        prop_assert_eq!(store.get(&key, now), Some(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // After delete, the key is gone and delete reports it was present.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let mut store = new_store(TEST_CAPACITY);
        let now = Instant::now();

        store.put(key.clone(), value, None, now);

        prop_assert!(store.delete(&key));
        prop_assert!(!store.delete(&key));
        prop_assert_eq!(store.get(&key, now), None);
    }

    // Once the TTL has elapsed, a get misses and counts an expired removal.
    #[test]
    fn prop_ttl_expiration(
        key in key_strategy(),
        value in value_strategy(),
        ttl_ms in 0i64..10_000
    ) {
        let mut store = new_store(TEST_CAPACITY);
        let now = Instant::now();
        let ttl = Duration::from_millis(ttl_ms as u64);

        store.put(key.clone(), value.clone(), Some(TimeDelta::milliseconds(ttl_ms)), now);

        prop_assert_eq!(store.get(&key, now + ttl), Some(value));
        prop_assert_eq!(store.get(&key, now + ttl + Duration::from_millis(1)), None);

        let stats = store.stats();
        prop_assert_eq!(stats.expired_removals, 1);
        prop_assert_eq!(stats.misses, 1);
    }

    // Any negative TTL behaves exactly like the default TTL.
    #[test]
    fn prop_negative_ttl_falls_back_to_default(key in key_strategy(), ttl_secs in -10_000_000_000i64..0) {
        let mut store = new_store(TEST_CAPACITY);
        let now = Instant::now();

        store.put(key.clone(), "v".to_string(), Some(TimeDelta::seconds(ttl_secs)), now);
        store.put("default".to_string(), "v".to_string(), None, now);

        let entries = store.entries(now);
        prop_assert_eq!(entries.len(), 2);
        prop_assert_eq!(entries[0].ttl_remaining, entries[1].ttl_remaining);
        prop_assert_eq!(entries[0].ttl_remaining, TEST_DEFAULT_TTL);
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Filling the cache and inserting one more key evicts the first key.
    #[test]
    fn prop_lru_eviction_order(keys in unique_keys_strategy(3, 12), new_key in "[A-Z]{4}") {
        prop_assume!(keys.len() >= 2);

        let capacity = keys.len();
        let mut store = new_store(capacity);
        let now = Instant::now();

        for key in &keys {
            store.put(key.clone(), format!("value_{key}"), None, now);
        }
        store.put(new_key.clone(), "new".to_string(), None, now);

        prop_assert_eq!(store.len(), capacity);
        prop_assert_eq!(store.stats().evictions, 1);
        prop_assert!(!store.contains(&keys[0], now), "Oldest key should be evicted");
        prop_assert!(store.contains(&new_key, now));
        for key in keys.iter().skip(1) {
            prop_assert!(store.contains(key, now), "Key '{}' should survive", key);
        }
    }

    // A get or an update makes the key most recently used, so the next
    // eviction takes the following key instead.
    #[test]
    fn prop_lru_access_tracking(
        keys in unique_keys_strategy(3, 10),
        touch_with_put in any::<bool>(),
        new_key in "[A-Z]{4}"
    ) {
        prop_assume!(keys.len() >= 3);

        let capacity = keys.len();
        let mut store = new_store(capacity);
        let now = Instant::now();

        for key in &keys {
            store.put(key.clone(), format!("value_{key}"), None, now);
        }

        if touch_with_put {
            store.put(keys[0].clone(), "updated".to_string(), None, now);
            prop_assert_eq!(store.stats().evictions, 0, "Update must not evict");
        } else {
            prop_assert!(store.get(&keys[0], now).is_some());
        }

        store.put(new_key.clone(), "new".to_string(), None, now);

        prop_assert!(store.contains(&keys[0], now), "Touched key must survive");
        prop_assert!(!store.contains(&keys[1], now), "Next oldest key must be evicted");
        prop_assert!(store.contains(&new_key, now));
    }

    // Clear empties the store but keeps every counter.
    #[test]
    fn prop_clear_keeps_counters(
        keys in unique_keys_strategy(1, 20),
        lookups in prop::collection::vec(key_strategy(), 0..20)
    ) {
        let mut store = new_store(5);
        let now = Instant::now();

        for key in &keys {
            store.put(key.clone(), "v".to_string(), None, now);
        }
        for key in &lookups {
            store.get(key, now);
        }
        let before = store.stats();

        store.clear();

        let after = store.stats();
        prop_assert_eq!(after.current_size, 0);
        prop_assert_eq!(after.hits, before.hits);
        prop_assert_eq!(after.misses, before.misses);
        prop_assert_eq!(after.evictions, before.evictions);
        prop_assert_eq!(after.expired_removals, before.expired_removals);
        for key in &keys {
            prop_assert!(store.get(key, now).is_none());
        }
    }
}

// == Property Test for Error Response Format ==
// This tests the CacheError -> HTTP response conversion

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error converts into a JSON body with a string "error" field.
    #[test]
    fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::NotFound(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::Internal(error_msg.clone()),
            CacheError::InvalidCapacity(0),
        ];

        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = tokio_test::block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
            let json: serde_json::Value =
                serde_json::from_slice(&bytes).expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
// Runs generated workloads from several threads against one shared Cache

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // With N threads hammering a shared cache, the size never exceeds
    // capacity and hits + misses equals the number of completed gets.
    #[test]
    fn prop_concurrent_operation_correctness(
        capacity in 1usize..16,
        workloads in prop::collection::vec(
            prop::collection::vec((key_strategy(), any::<bool>()), 10..100),
            2..6
        )
    ) {
        use std::sync::Arc;
        use std::thread;

        let cache: Arc<Cache<String>> = Arc::new(
            Cache::builder()
                .capacity(capacity)
                .sweep_interval(Duration::from_millis(5))
                .build()
                .unwrap(),
        );

        let handles: Vec<_> = workloads
            .into_iter()
            .map(|ops| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let mut gets = 0u64;
                    for (key, is_get) in ops {
                        if is_get {
                            if let Some(value) = cache.get(&key) {
                                // Values are written whole; a read never sees a torn one
                                assert_eq!(value, format!("value_{key}"));
                            }
                            gets += 1;
                        } else {
                            cache.put(key.clone(), format!("value_{key}"));
                        }
                        assert!(cache.len() <= capacity);
                    }
                    gets
                })
            })
            .collect();

        let total_gets: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

        let stats = cache.stats();
        prop_assert!(stats.current_size <= capacity);
        prop_assert_eq!(stats.hits + stats.misses, total_gets);
        cache.shutdown();
    }
}
