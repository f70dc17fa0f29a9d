//! Sharing collections between threads.
//!
//! Requires the `arc` feature, which makes every collection `Send + Sync`.

#![cfg(feature = "arc")]

use arbors::persistent::{PersistentList, PersistentTreeMap, PersistentTreeSet};
use rstest::rstest;
use std::sync::Arc;
use std::thread;

#[rstest]
fn test_list_versions_are_shared_across_threads() {
    let base: PersistentList<i32> = (0..1_000).collect();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let base = base.clone();
            thread::spawn(move || {
                let derived = base.push_back(worker).set_item(0, -worker).unwrap();
                assert_eq!(derived.len(), 1_001);
                derived
            })
        })
        .collect();

    for (worker, handle) in (0..4).zip(handles) {
        let derived = handle.join().unwrap();
        assert_eq!(derived.last(), Some(&worker));
        assert_eq!(derived.first(), Some(&-worker));
    }
    assert_eq!(base.len(), 1_000);
    assert_eq!(base.first(), Some(&0));
}

#[rstest]
fn test_map_is_readable_from_many_threads() {
    let map: Arc<PersistentTreeMap<i32, String>> =
        Arc::new((0..500).map(|key| (key, key.to_string())).collect());
    thread::scope(|scope| {
        for worker in 0..4 {
            let map = &map;
            scope.spawn(move || {
                for key in (worker..500).step_by(4) {
                    assert_eq!(map.find(&key), Some(&key.to_string()));
                }
                assert_eq!(map.range(100..200).count(), 100);
            });
        }
    });
}

#[rstest]
fn test_sets_built_in_parallel_combine() {
    let parts: Vec<PersistentTreeSet<i32>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|worker| scope.spawn(move || (worker * 100..(worker + 1) * 100).collect::<PersistentTreeSet<i32>>()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    let merged = parts
        .iter()
        .fold(PersistentTreeSet::new(), |acc, part| acc.union(part));
    assert_eq!(merged.len(), 400);
    assert_eq!(merged.check_invariants(), Ok(()));
}
