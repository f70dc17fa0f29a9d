//! Diagnostic events emitted by the traversal stack pool.
//!
//! Nothing in the collections logs on its own. The only component with
//! observable side effects worth reporting is the
//! [`StackPool`](crate::persistent::StackPool), and it reports through a
//! [`DiagnosticSink`] handed to it at construction time:
//!
//! - [`TracingSink`] forwards every event to [`tracing`] as structured fields
//!   (this is what [`StackPool::shared`](crate::persistent::StackPool::shared)
//!   uses);
//! - [`NullSink`] drops every event;
//! - any other implementation can collect events for tests or metrics.
//!
//! A sink lives exactly as long as the pool holding it.

use std::fmt;

/// Why the pool dropped a stack instead of keeping it for reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// Every slot of the pool was already occupied.
    PoolFull,
    /// The stack had no capacity, or more than the pool is allowed to retain.
    Oversized,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoolFull => formatter.write_str("pool full"),
            Self::Oversized => formatter.write_str("oversized"),
        }
    }
}

/// A single event reported by a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// The pool was empty, so a fresh stack was allocated.
    StackAllocated {
        /// Name of the reporting pool.
        pool: &'static str,
        /// Capacity of the new stack.
        capacity: usize,
    },
    /// A released stack was stored for reuse.
    StackRecycled {
        /// Name of the reporting pool.
        pool: &'static str,
        /// Capacity of the stored stack.
        capacity: usize,
    },
    /// A released stack was dropped.
    StackDiscarded {
        /// Name of the reporting pool.
        pool: &'static str,
        /// Capacity of the dropped stack.
        capacity: usize,
        /// Why it was not kept.
        reason: DiscardReason,
    },
}

/// Receives [`Diagnostic`] events.
///
/// Sinks are shared between threads through the pool, and `record` may be
/// called concurrently. Implementations must not call back into the pool
/// that reports to them.
pub trait DiagnosticSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &Diagnostic);
}

/// Forwards events to the `tracing` ecosystem.
///
/// Allocations and recycling are reported at `TRACE`; discards, which mean
/// the pool is undersized or callers release unusually large stacks, at
/// `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &Diagnostic) {
        match event {
            Diagnostic::StackAllocated { pool, capacity } => {
                tracing::trace!(pool, capacity, "allocated traversal stack");
            }
            Diagnostic::StackRecycled { pool, capacity } => {
                tracing::trace!(pool, capacity, "recycled traversal stack");
            }
            Diagnostic::StackDiscarded {
                pool,
                capacity,
                reason,
            } => {
                tracing::debug!(pool, capacity, %reason, "discarded traversal stack");
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    #[inline]
    fn record(&self, _event: &Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DiscardReason::PoolFull, "pool full")]
    #[case(DiscardReason::Oversized, "oversized")]
    fn test_discard_reason_display(#[case] reason: DiscardReason, #[case] expected: &str) {
        assert_eq!(reason.to_string(), expected);
    }

    #[rstest]
    fn test_sinks_accept_every_event() {
        let events = [
            Diagnostic::StackAllocated {
                pool: "test",
                capacity: 32,
            },
            Diagnostic::StackRecycled {
                pool: "test",
                capacity: 32,
            },
            Diagnostic::StackDiscarded {
                pool: "test",
                capacity: 4096,
                reason: DiscardReason::Oversized,
            },
        ];
        for event in &events {
            TracingSink.record(event);
            NullSink.record(event);
        }
    }

    #[rstest]
    fn test_sinks_are_object_safe() {
        let sinks: Vec<Box<dyn DiagnosticSink>> = vec![Box::new(TracingSink), Box::new(NullSink)];
        assert_eq!(sinks.len(), 2);
    }
}
