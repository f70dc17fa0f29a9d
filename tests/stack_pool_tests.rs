//! Integration tests for StackPool: diagnostics, concurrency and recovery
//! from traversals that are never finished.

use arbors::diagnostics::{Diagnostic, DiagnosticSink, DiscardReason};
use arbors::persistent::{Direction, PersistentList, PersistentTreeMap, StackPool, StackPoolConfig};
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use std::sync::Arc;

/// Sink that keeps every event for later inspection.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    fn discards(&self) -> Vec<DiscardReason> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Diagnostic::StackDiscarded { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, event: &Diagnostic) {
        self.events.lock().push(event.clone());
    }
}

#[fixture]
fn sink() -> Arc<RecordingSink> {
    Arc::new(RecordingSink::default())
}

fn pool_with(sink: &Arc<RecordingSink>, config: StackPoolConfig) -> StackPool {
    StackPool::with_sink(config, sink.clone()).with_name("recording")
}

// =============================================================================
// Diagnostics
// =============================================================================

#[rstest]
fn test_traversal_reports_allocation_then_recycling(sink: Arc<RecordingSink>) {
    let pool = pool_with(&sink, StackPoolConfig::new().with_stack_capacity(16));
    let list: PersistentList<i32> = (0..100).collect();

    assert_eq!(list.iter_with(&pool, Direction::Forward, 0).count(), 100);
    assert_eq!(list.iter_with(&pool, Direction::Reverse, 0).count(), 100);

    assert_eq!(
        sink.events(),
        vec![
            Diagnostic::StackAllocated { pool: "recording", capacity: 16 },
            Diagnostic::StackRecycled { pool: "recording", capacity: 16 },
            Diagnostic::StackRecycled { pool: "recording", capacity: 16 },
        ]
    );
    let statistics = pool.statistics();
    assert_eq!(statistics.acquired, 2);
    assert_eq!(statistics.reused, 1);
    assert_eq!(statistics.allocated, 1);
}

#[rstest]
fn test_full_pool_reports_pool_full(sink: Arc<RecordingSink>) {
    let pool = pool_with(&sink, StackPoolConfig::new());
    let stacks: Vec<Vec<&u8>> = (0..StackPool::SLOTS + 2).map(|_| pool.acquire()).collect();
    for stack in stacks {
        pool.release(stack);
    }
    assert_eq!(pool.retained(), StackPool::SLOTS);
    assert_eq!(sink.discards(), vec![DiscardReason::PoolFull, DiscardReason::PoolFull]);
}

#[rstest]
fn test_grown_stack_reports_oversized(sink: Arc<RecordingSink>) {
    let pool = pool_with(
        &sink,
        StackPoolConfig::new()
            .with_stack_capacity(4)
            .with_max_retained_capacity(8),
    );
    let value = 0_u8;
    let mut stack: Vec<&u8> = pool.acquire();
    stack.extend(std::iter::repeat_n(&value, 100));
    pool.release(stack);
    assert_eq!(pool.retained(), 0);
    assert_eq!(sink.discards(), vec![DiscardReason::Oversized]);
    assert_eq!(pool.statistics().discarded, 1);
}

// =============================================================================
// Abandoned traversals
// =============================================================================

#[rstest]
fn test_dropped_iterator_returns_its_stack(sink: Arc<RecordingSink>) {
    let pool = pool_with(&sink, StackPoolConfig::new());
    let map: PersistentTreeMap<i32, i32> = (0..1000).map(|key| (key, key)).collect();
    let mut iterator = map.iter_with(&pool, Direction::Forward, 500);
    assert_eq!(iterator.next(), Some((&500, &500)));
    drop(iterator);
    assert_eq!(pool.retained(), 1);
}

#[rstest]
fn test_leaked_iterator_only_costs_one_allocation(sink: Arc<RecordingSink>) {
    let pool = pool_with(&sink, StackPoolConfig::new());
    let list: PersistentList<i32> = (0..1000).collect();

    let mut leaked = list.iter_with(&pool, Direction::Forward, 0);
    assert_eq!(leaked.next(), Some(&0));
    std::mem::forget(leaked);
    assert_eq!(pool.retained(), 0);

    assert_eq!(list.iter_with(&pool, Direction::Forward, 10).next(), Some(&10));
    assert_eq!(pool.retained(), 1);
    assert_eq!(pool.statistics().allocated, 2);
    assert_eq!(list.iter_with(&pool, Direction::Forward, 0).count(), 1000);
    assert_eq!(pool.statistics().allocated, 2);
}

// =============================================================================
// Concurrency
// =============================================================================

#[rstest]
fn test_concurrent_traversals_share_one_pool(sink: Arc<RecordingSink>) {
    let pool = pool_with(&sink, StackPoolConfig::new());
    let list: PersistentList<u64> = (0..2_000).collect();
    let expected: u64 = (0..2_000).sum();
    let snapshot = list.iter().copied().collect::<Vec<_>>();

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let pool = &pool;
            let snapshot = &snapshot;
            scope.spawn(move || {
                let local: PersistentList<u64> = snapshot.iter().copied().collect();
                for round in 0..50 {
                    let direction = if (worker + round) % 2 == 0 {
                        Direction::Forward
                    } else {
                        Direction::Reverse
                    };
                    let sum: u64 = local.iter_with(pool, direction, 0).sum();
                    assert_eq!(sum, expected);
                }
            });
        }
    });

    let statistics = pool.statistics();
    assert_eq!(statistics.acquired, 400);
    assert_eq!(statistics.acquired, statistics.reused + statistics.allocated);
    assert_eq!(statistics.recycled + statistics.discarded, 400);
    assert!(pool.retained() <= StackPool::SLOTS);
    assert!(statistics.allocated <= 400);
}

#[rstest]
fn test_shared_pool_serves_plain_iteration() {
    let before = StackPool::shared().statistics().acquired;
    let list: PersistentList<i32> = (0..10).collect();
    assert_eq!(list.iter().count(), 10);
    assert!(StackPool::shared().statistics().acquired > before);
}
