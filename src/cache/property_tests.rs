//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the codec contract and the coordinator's
//! observable behavior against an in-memory store.

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::{Cache, Lookup};
use crate::codec::{decode, encode, Value, NULL_SENTINEL};
use crate::store::MemoryStore;

// == Test Configuration ==
const TEST_DEFAULT_TTL: u64 = 300;

// == Strategies ==
/// Generates namespace and id parts (no separator)
fn key_part_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

/// Generates arbitrary strings that never look like date-times
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _:.-]{0,24}".prop_filter("date-time shaped", |s| {
        !crate::codec::looks_like_datetime(s)
    })
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        // quarters are exact in binary and print exactly
        (-1_000_000i64..1_000_000).prop_map(|n| {
            serde_json::Number::from_f64(n as f64 / 4.0).map_or(Value::Null, Value::Number)
        }),
        text_strategy().prop_map(Value::String),
    ]
}

/// Generates nested objects and arrays of scalars
fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key_part_strategy(), inner, 0..6)
                .prop_map(|m: BTreeMap<String, Value>| Value::Object(m)),
        ]
    })
}

/// Values that have a literal payload (not null, not falsy)
fn stored_value_strategy() -> impl Strategy<Value = Value> {
    value_strategy().prop_filter("no literal payload", |v| !v.is_null() && !v.is_falsy())
}

fn memory_cache() -> Cache {
    Cache::new(Arc::new(MemoryStore::new()), TEST_DEFAULT_TTL)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Round-trip: values free of date-time strings decode to themselves.
    #[test]
    fn prop_codec_round_trip(value in stored_value_strategy()) {
        let encoded = encode(&value).unwrap().unwrap();
        prop_assert_ne!(encoded.as_str(), NULL_SENTINEL);
        prop_assert_eq!(decode(&encoded).unwrap(), value);
    }

    // Every falsy non-null value is written without a payload.
    #[test]
    fn prop_falsy_has_no_payload(value in scalar_strategy()) {
        let encoded = encode(&value).unwrap();
        if value.is_null() {
            prop_assert_eq!(encoded.as_deref(), Some(NULL_SENTINEL));
        } else if value.is_falsy() {
            prop_assert!(encoded.is_none());
        } else {
            prop_assert!(encoded.is_some());
        }
    }

    // Put then get returns the stored value.
    #[test]
    fn prop_put_then_get(
        namespace in key_part_strategy(),
        id in key_part_strategy(),
        value in stored_value_strategy()
    ) {
        let cache = memory_cache();
        let found = tokio_test::block_on(async {
            cache.put(&namespace, &id, value.clone(), None).await;
            cache.get(&namespace, &id).await
        }).unwrap();
        prop_assert_eq!(found, Lookup::Hit(value));
    }

    // The same id under two namespaces holds two independent entries.
    #[test]
    fn prop_namespace_isolation(
        ns_a in key_part_strategy(),
        ns_b in key_part_strategy(),
        id in key_part_strategy(),
        v1 in stored_value_strategy(),
        v2 in stored_value_strategy()
    ) {
        prop_assume!(ns_a != ns_b);
        let cache = memory_cache();

        let (a, b) = tokio_test::block_on(async {
            cache.put(&ns_a, &id, v1.clone(), None).await;
            cache.put(&ns_b, &id, v2.clone(), None).await;
            (cache.get(&ns_a, &id).await, cache.get(&ns_b, &id).await)
        });
        prop_assert_eq!(a.unwrap(), Lookup::Hit(v1));
        prop_assert_eq!(b.unwrap(), Lookup::Hit(v2));
    }

    // After a flush nothing put before it is found, whatever the namespace.
    #[test]
    fn prop_flush_clears_all_namespaces(
        entries in prop::collection::vec(
            (key_part_strategy(), key_part_strategy(), stored_value_strategy()),
            1..10
        )
    ) {
        let cache = memory_cache();

        let lookups = tokio_test::block_on(async {
            for (namespace, id, value) in &entries {
                cache.put(namespace, id, value.clone(), None).await;
            }
            cache.flush_all().await.unwrap();

            let mut lookups = Vec::new();
            for (namespace, id, _) in &entries {
                lookups.push(cache.get(namespace, id).await.unwrap());
            }
            lookups
        });

        for lookup in lookups {
            prop_assert!(lookup.is_miss());
        }
    }

    // Fetch on an empty store computes once; later reads are hits.
    #[test]
    fn prop_fetch_computes_once(
        id in key_part_strategy(),
        value in stored_value_strategy()
    ) {
        let cache = memory_cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let (first, second, lookup) = tokio_test::block_on(async {
            let counter = calls.clone();
            let computed = value.clone();
            let first = cache
                .fetch("ns", &id, |_| async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(computed)
                })
                .await
                .unwrap();

            // let the background write land
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;

            let counter = calls.clone();
            let second = cache
                .fetch("ns", &id, |_| async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Null)
                })
                .await
                .unwrap();
            (first, second, cache.get("ns", &id).await.unwrap())
        });

        prop_assert_eq!(&first, &value);
        prop_assert_eq!(&second, &value);
        prop_assert_eq!(lookup, Lookup::Hit(value));
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
