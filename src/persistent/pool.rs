//! A thread-safe pool of traversal stacks.
//!
//! Every in-order traversal needs a stack of node references no deeper than
//! the tree is high. Iterating many small collections in a hot loop would
//! allocate and free one such stack per iterator, so iterators borrow their
//! stack from a [`StackPool`] and return it when they finish or are dropped.
//!
//! The pool holds at most [`StackPool::SLOTS`] buffers behind a
//! [`parking_lot::Mutex`]. The lock is held only to push or pop a buffer, never
//! while a traversal runs, and diagnostics are reported after it is released.
//!
//! # Ownership
//!
//! A buffer handed out by [`StackPool::acquire`] is moved out of the pool, so
//! two callers can never hold the same buffer. A caller that never releases
//! its buffer only costs the pool one future allocation: the pool falls back
//! to allocating whenever it is empty.
//!
//! # Examples
//!
//! ```rust
//! use arbors::persistent::{PersistentList, StackPool, StackPoolConfig};
//! use arbors::diagnostics::NullSink;
//! use std::sync::Arc;
//!
//! let pool = StackPool::with_sink(StackPoolConfig::new(), Arc::new(NullSink));
//! let list: PersistentList<i32> = (0..100).collect();
//!
//! for _ in 0..10 {
//!     let total: i32 = list.iter_with(&pool, Default::default(), 0).sum();
//!     assert_eq!(total, 4950);
//! }
//!
//! let statistics = pool.statistics();
//! assert_eq!(statistics.acquired, 10);
//! assert_eq!(statistics.allocated, 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use arrayvec::ArrayVec;
use parking_lot::Mutex;

use crate::diagnostics::{Diagnostic, DiagnosticSink, DiscardReason, TracingSink};

// =============================================================================
// Configuration
// =============================================================================

/// Sizing of the stacks a [`StackPool`] hands out and keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackPoolConfig {
    stack_capacity: usize,
    max_retained_capacity: usize,
}

impl StackPoolConfig {
    /// Initial capacity of a freshly allocated stack.
    ///
    /// An AVL tree of height 32 holds more than three million elements, so
    /// stacks of this size rarely grow.
    pub const DEFAULT_STACK_CAPACITY: usize = 32;

    /// Stacks that grew beyond this capacity are dropped on release.
    pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 1024;

    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stack_capacity: Self::DEFAULT_STACK_CAPACITY,
            max_retained_capacity: Self::DEFAULT_MAX_RETAINED_CAPACITY,
        }
    }

    /// Sets the capacity of freshly allocated stacks.
    #[must_use]
    pub const fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    /// Sets the largest capacity the pool keeps on release.
    #[must_use]
    pub const fn with_max_retained_capacity(mut self, capacity: usize) -> Self {
        self.max_retained_capacity = capacity;
        self
    }

    /// Initial capacity of freshly allocated stacks.
    #[must_use]
    pub const fn stack_capacity(&self) -> usize {
        self.stack_capacity
    }

    /// Largest capacity kept on release.
    #[must_use]
    pub const fn max_retained_capacity(&self) -> usize {
        self.max_retained_capacity
    }
}

impl Default for StackPoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Counters describing how a pool has been used since it was created.
///
/// The counters are read independently, so a snapshot taken while other
/// threads use the pool may be slightly inconsistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PoolStatistics {
    /// Calls to [`StackPool::acquire`].
    pub acquired: usize,
    /// Acquisitions served from a stored stack.
    pub reused: usize,
    /// Acquisitions that had to allocate a new stack.
    pub allocated: usize,
    /// Released stacks stored for reuse.
    pub recycled: usize,
    /// Released stacks that were dropped.
    pub discarded: usize,
}

#[derive(Default)]
struct Counters {
    acquired: AtomicUsize,
    reused: AtomicUsize,
    allocated: AtomicUsize,
    recycled: AtomicUsize,
    discarded: AtomicUsize,
}

impl Counters {
    #[inline]
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PoolStatistics {
        PoolStatistics {
            acquired: self.acquired.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
            recycled: self.recycled.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// StackPool
// =============================================================================

const POOL_SLOTS: usize = 32;

/// A bounded, thread-safe free list of traversal stacks.
///
/// Stored buffers are type-erased to `Vec<usize>`; a buffer takes on the
/// element type of whichever traversal acquires it. Converting an empty
/// vector between pointer-sized element types reuses its allocation.
pub struct StackPool {
    name: &'static str,
    config: StackPoolConfig,
    slots: Mutex<ArrayVec<Vec<usize>, POOL_SLOTS>>,
    sink: Arc<dyn DiagnosticSink>,
    counters: Counters,
}

impl StackPool {
    /// Number of stacks a pool retains.
    pub const SLOTS: usize = POOL_SLOTS;

    /// Creates a pool reporting to `sink`.
    #[must_use]
    pub fn with_sink(config: StackPoolConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            name: "stack-pool",
            config,
            slots: Mutex::new(ArrayVec::new()),
            sink,
            counters: Counters::default(),
        }
    }

    /// Creates a pool that logs through [`TracingSink`].
    #[must_use]
    pub fn new(config: StackPoolConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Sets the name reported in diagnostics.
    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// The process-wide pool used by the collections' `iter` methods.
    ///
    /// Created on first use with the default configuration, reporting
    /// through [`TracingSink`] under the name `"shared"`.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<StackPool> = OnceLock::new();
        SHARED.get_or_init(|| Self::new(StackPoolConfig::new()).with_name("shared"))
    }

    /// Name reported in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Configuration the pool was created with.
    #[must_use]
    pub const fn config(&self) -> &StackPoolConfig {
        &self.config
    }

    /// Number of stacks currently stored.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.slots.lock().len()
    }

    /// Snapshot of the usage counters.
    #[must_use]
    pub fn statistics(&self) -> PoolStatistics {
        self.counters.snapshot()
    }

    /// Takes an empty stack out of the pool, allocating one if none is stored.
    ///
    /// The returned stack has at least the configured capacity.
    #[must_use]
    pub fn acquire<'a, T>(&self) -> Vec<&'a T> {
        Counters::bump(&self.counters.acquired);
        let stored = self.slots.lock().pop();
        if let Some(buffer) = stored {
            Counters::bump(&self.counters.reused);
            let mut stack: Vec<&'a T> = retype(buffer);
            stack.reserve(self.config.stack_capacity);
            return stack;
        }
        Counters::bump(&self.counters.allocated);
        self.sink.record(&Diagnostic::StackAllocated {
            pool: self.name,
            capacity: self.config.stack_capacity,
        });
        Vec::with_capacity(self.config.stack_capacity)
    }

    /// Returns a stack to the pool.
    ///
    /// The stack is cleared first. It is dropped instead of stored if it has
    /// no capacity, grew beyond the configured maximum, or every slot is taken.
    pub fn release<T>(&self, stack: Vec<&T>) {
        let capacity = stack.capacity();
        if capacity == 0 || capacity > self.config.max_retained_capacity {
            self.discard(capacity, DiscardReason::Oversized);
            return;
        }
        let rejected = self.slots.lock().try_push(retype(stack)).is_err();
        if rejected {
            self.discard(capacity, DiscardReason::PoolFull);
        } else {
            Counters::bump(&self.counters.recycled);
            self.sink.record(&Diagnostic::StackRecycled {
                pool: self.name,
                capacity,
            });
        }
    }

    fn discard(&self, capacity: usize, reason: DiscardReason) {
        Counters::bump(&self.counters.discarded);
        self.sink.record(&Diagnostic::StackDiscarded {
            pool: self.name,
            capacity,
            reason,
        });
    }
}

impl fmt::Debug for StackPool {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StackPool")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("retained", &self.retained())
            .field("statistics", &self.statistics())
            .finish_non_exhaustive()
    }
}

/// Empties `buffer` and reinterprets it as a vector of another element type.
///
/// The standard library collects a `vec::IntoIter` through `filter_map` in
/// place when both element types share a layout, so the allocation survives.
fn retype<A, B>(mut buffer: Vec<A>) -> Vec<B> {
    buffer.clear();
    buffer.into_iter().filter_map(|_| None).collect()
}

// =============================================================================
// PooledStack
// =============================================================================

/// A traversal stack that goes back to its pool when dropped.
pub(crate) struct PooledStack<'a, T> {
    items: Vec<&'a T>,
    pool: &'a StackPool,
}

impl<'a, T> PooledStack<'a, T> {
    pub(crate) fn acquire(pool: &'a StackPool) -> Self {
        Self {
            items: pool.acquire(),
            pool,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, item: &'a T) {
        self.items.push(item);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<&'a T> {
        self.items.pop()
    }
}

impl<T> Drop for PooledStack<'_, T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.items));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use rstest::{fixture, rstest};

    #[fixture]
    fn pool() -> StackPool {
        StackPool::with_sink(StackPoolConfig::new(), Arc::new(NullSink)).with_name("test")
    }

    #[rstest]
    fn test_acquire_from_empty_pool_allocates(pool: StackPool) {
        let stack: Vec<&i32> = pool.acquire();
        assert!(stack.is_empty());
        assert!(stack.capacity() >= StackPoolConfig::DEFAULT_STACK_CAPACITY);
        assert_eq!(pool.statistics().allocated, 1);
    }

    #[rstest]
    fn test_released_stack_is_reused(pool: StackPool) {
        let value = 7;
        let mut stack: Vec<&i32> = pool.acquire();
        stack.push(&value);
        pool.release(stack);
        assert_eq!(pool.retained(), 1);

        let again: Vec<&String> = pool.acquire();
        assert!(again.is_empty());
        assert_eq!(pool.retained(), 0);

        let statistics = pool.statistics();
        assert_eq!(statistics.acquired, 2);
        assert_eq!(statistics.reused, 1);
        assert_eq!(statistics.allocated, 1);
        assert_eq!(statistics.recycled, 1);
    }

    #[rstest]
    fn test_oversized_and_empty_stacks_are_discarded() {
        let pool = StackPool::with_sink(
            StackPoolConfig::new().with_max_retained_capacity(64),
            Arc::new(NullSink),
        );
        pool.release::<i32>(Vec::with_capacity(128));
        pool.release::<i32>(Vec::new());
        assert_eq!(pool.retained(), 0);
        assert_eq!(pool.statistics().discarded, 2);
    }

    #[rstest]
    fn test_full_pool_discards(pool: StackPool) {
        for _ in 0..StackPool::SLOTS + 3 {
            pool.release::<i32>(Vec::with_capacity(8));
        }
        assert_eq!(pool.retained(), StackPool::SLOTS);
        assert_eq!(pool.statistics().recycled, StackPool::SLOTS);
        assert_eq!(pool.statistics().discarded, 3);
    }

    #[rstest]
    fn test_pooled_stack_releases_on_drop(pool: StackPool) {
        let values = [1, 2, 3];
        {
            let mut stack = PooledStack::acquire(&pool);
            for value in &values {
                stack.push(value);
            }
            assert_eq!(stack.pop(), Some(&3));
        }
        assert_eq!(pool.retained(), 1);
    }

    #[rstest]
    fn test_config_builders() {
        let config = StackPoolConfig::new()
            .with_stack_capacity(16)
            .with_max_retained_capacity(256);
        assert_eq!(config.stack_capacity(), 16);
        assert_eq!(config.max_retained_capacity(), 256);
        assert_eq!(StackPoolConfig::default(), StackPoolConfig::new());
    }

    #[rstest]
    fn test_shared_pool_is_a_singleton() {
        assert!(std::ptr::eq(StackPool::shared(), StackPool::shared()));
        assert_eq!(StackPool::shared().name(), "shared");
    }
}
