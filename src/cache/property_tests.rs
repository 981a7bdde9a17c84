//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the in-memory driver against a plain HashMap model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use tokio_test::block_on;

use crate::cache::{CacheDriver, InMemoryCacheDriver, MemoryStore};

// == Strategies ==
/// Generates raw keys, some of which share `user:` / `other:` prefixes
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,8}".prop_map(|s| format!("user:{}", s)),
        "[a-z0-9]{1,8}".prop_map(|s| format!("other:{}", s)),
        "[a-z0-9:_]{1,16}",
    ]
}

fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

fn entries_strategy() -> impl Strategy<Value = HashMap<String, Vec<u8>>> {
    prop::collection::hash_map(key_strategy(), value_strategy(), 0..32)
}

/// Generates a sequence of driver operations
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Delete { key: String },
    DeletePrefix { prefix: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
        prop_oneof![Just("user:"), Just("other:"), Just("u"), Just("")]
            .prop_map(|p| CacheOp::DeletePrefix { prefix: p.to_string() }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let driver = InMemoryCacheDriver::new("prop");

        block_on(driver.set(&key, &value, None));

        prop_assert_eq!(block_on(driver.get(&key)), Some(value));
    }

    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let driver = InMemoryCacheDriver::new("prop");

        block_on(driver.set(&key, &value1, None));
        block_on(driver.set(&key, &value2, None));

        prop_assert_eq!(block_on(driver.get(&key)), Some(value2));
        prop_assert_eq!(block_on(driver.keys()).len(), 1);
    }

    #[test]
    fn prop_namespace_isolation(key in key_strategy(), a in value_strategy(), b in value_strategy()) {
        let store = MemoryStore::new();
        let ns_a = InMemoryCacheDriver::with_store("a", store.clone());
        let ns_b = InMemoryCacheDriver::with_store("b", store);

        block_on(ns_a.set(&key, &a, None));
        block_on(ns_b.set(&key, &b, None));

        prop_assert_eq!(block_on(ns_a.get(&key)), Some(a));
        prop_assert_eq!(block_on(ns_b.get(&key)), Some(b));
    }

    #[test]
    fn prop_get_many_returns_only_resolved(
        stored in entries_strategy(),
        extra in prop::collection::vec(key_strategy(), 0..8)
    ) {
        let driver = InMemoryCacheDriver::new("prop");
        block_on(driver.set_many(&stored, None));

        let mut requested: Vec<String> = stored.keys().cloned().collect();
        requested.extend(extra);

        let found = block_on(driver.get_many(&requested));
        prop_assert_eq!(found, stored);
    }

    #[test]
    fn prop_operations_match_model(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let driver = InMemoryCacheDriver::new("prop");
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    block_on(driver.set(&key, &value, None));
                    model.insert(key, value);
                }
                CacheOp::Delete { key } => {
                    block_on(driver.delete(&key));
                    model.remove(&key);
                }
                CacheOp::DeletePrefix { prefix } => {
                    block_on(driver.delete_prefix(&prefix));
                    model.retain(|key, _| !key.starts_with(&prefix));
                }
            }
        }

        let expected: HashSet<String> = model.keys().cloned().collect();
        prop_assert_eq!(block_on(driver.keys()), expected);
        for (key, value) in model {
            prop_assert_eq!(block_on(driver.get(&key)), Some(value));
        }
    }

    #[test]
    fn prop_flush_leaves_other_namespace(stored in entries_strategy()) {
        let store = MemoryStore::new();
        let flushed = InMemoryCacheDriver::with_store("flushed", store.clone());
        let kept = InMemoryCacheDriver::with_store("kept", store);

        block_on(flushed.set_many(&stored, None));
        block_on(kept.set_many(&stored, None));
        block_on(flushed.flush_namespace());

        prop_assert!(block_on(flushed.keys()).is_empty());
        let requested: Vec<String> = stored.keys().cloned().collect();
        prop_assert_eq!(block_on(kept.get_many(&requested)), stored);
    }

    #[test]
    fn prop_structured_roundtrip(
        fields in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..16)
    ) {
        let driver = InMemoryCacheDriver::new("prop");
        let value = serde_json::to_value(&fields).unwrap();

        block_on(driver.set_structured("doc", &value, None)).unwrap();

        let decoded = block_on(driver.get_structured("doc")).unwrap().unwrap();
        prop_assert_eq!(serde_json::Value::Object(decoded), value);
    }
}
