//! Property-based tests for PersistentTreeMap.
//!
//! `BTreeMap` serves as the reference model for every operation.

use arbors::persistent::PersistentTreeMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Strategies
// =============================================================================

fn entries(max_size: usize) -> impl Strategy<Value = Vec<(i16, i32)>> {
    prop::collection::vec((any::<i16>(), any::<i32>()), 0..max_size)
}

fn map_with_model(
    max_size: usize,
) -> impl Strategy<Value = (PersistentTreeMap<i16, i32>, BTreeMap<i16, i32>)> {
    entries(max_size).prop_map(|entries| {
        (
            entries.iter().copied().collect(),
            entries.into_iter().collect(),
        )
    })
}

fn key_set(map: &PersistentTreeMap<i16, i32>) -> Vec<i16> {
    map.keys().copied().collect()
}

proptest! {
    #[test]
    fn prop_bulk_build_matches_model((map, model) in map_with_model(200)) {
        prop_assert!(map.iter().eq(model.iter()));
        prop_assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn prop_incremental_build_equals_bulk_build(entries in entries(120)) {
        let bulk: PersistentTreeMap<i16, i32> = entries.iter().copied().collect();
        let incremental = entries
            .iter()
            .fold(PersistentTreeMap::new(), |map, (key, value)| map.add_or_update(*key, *value));
        prop_assert!(incremental.check_invariants().is_ok());
        prop_assert_eq!(incremental.hash_code(), bulk.hash_code());
        prop_assert_eq!(incremental, bulk);
    }

    #[test]
    fn prop_remove_matches_model((map, mut model) in map_with_model(120), removals in prop::collection::vec(any::<i16>(), 0..60)) {
        let mut current = map;
        for key in &removals {
            current = current.remove(key);
            model.remove(key);
        }
        prop_assert!(current.iter().eq(model.iter()));
        prop_assert!(current.check_invariants().is_ok());
    }

    #[test]
    fn prop_add_then_find((map, _model) in map_with_model(80), key: i16, value: i32) {
        let updated = map.add_or_update(key, value);
        prop_assert_eq!(updated.find(&key), Some(&value));
        match map.add(key, value) {
            Ok(added) => {
                prop_assert!(!map.contains_key(&key));
                prop_assert_eq!(added.len(), map.len() + 1);
            }
            Err(_) => prop_assert!(map.contains_key(&key)),
        }
    }

    #[test]
    fn prop_range_matches_model((map, model) in map_with_model(150), from: i16, to: i16) {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        let found: Vec<(i16, i32)> = map.find_range(&from, &to).map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(i16, i32)> = model.range(low..=high).map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(found, expected);
        let half_open: Vec<i16> = map.range(low..high).map(|(k, _)| *k).collect();
        let expected_keys: Vec<i16> = model.range(low..high).map(|(k, _)| *k).collect();
        prop_assert_eq!(half_open, expected_keys);
    }

    #[test]
    fn prop_set_algebra_matches_model((left, left_model) in map_with_model(80), (right, right_model) in map_with_model(80)) {
        let union: Vec<i16> = left_model.keys().chain(right_model.keys()).copied()
            .collect::<std::collections::BTreeSet<_>>().into_iter().collect();
        let intersection: Vec<i16> = left_model.keys().filter(|k| right_model.contains_key(k)).copied().collect();
        let difference: Vec<i16> = left_model.keys().filter(|k| !right_model.contains_key(k)).copied().collect();

        let merged = left.union(&right);
        prop_assert_eq!(key_set(&merged), union);
        prop_assert!(merged.check_invariants().is_ok());
        for (key, value) in &left {
            prop_assert_eq!(merged.find(key), Some(value));
        }
        prop_assert_eq!(key_set(&left.intersect(&right)), intersection);
        prop_assert_eq!(key_set(&left.except(&right)), difference);
        prop_assert_eq!(left.symmetric_except(&right), left.except(&right).union(&right.except(&left)));
    }

    #[test]
    fn prop_filter_matches_model((map, model) in map_with_model(150)) {
        let filtered = map.filter(|key, value| (i32::from(*key) + value) % 2 == 0);
        prop_assert!(filtered.check_invariants().is_ok());
        prop_assert!(filtered.iter().eq(model.iter().filter(|(key, value)| (i32::from(**key) + **value) % 2 == 0)));
    }
}
