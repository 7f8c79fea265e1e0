//! Stacking order counter shared by every front-bring trigger.

use core::sync::atomic::{AtomicI64, Ordering};

/// First value handed out is one above this.
pub const DEFAULT_Z_INDEX_BASE: i64 = 1000;

/// Source of ever-increasing z-index values.
pub trait ZIndexAllocator {
    /// Increment the counter and return the new value. Every call returns a
    /// value strictly greater than all earlier ones.
    fn next_z_index(&self) -> i64;

    /// Most recently issued value (the baseline before the first call).
    fn current_z_index(&self) -> i64;
}

static GLOBAL_Z_INDEX: AtomicI64 = AtomicI64::new(DEFAULT_Z_INDEX_BASE);

/// Process-wide counter; every kit using it shares one stacking order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalZIndex;

impl ZIndexAllocator for GlobalZIndex {
    fn next_z_index(&self) -> i64 {
        GLOBAL_Z_INDEX
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1)
    }

    fn current_z_index(&self) -> i64 {
        GLOBAL_Z_INDEX.load(Ordering::Relaxed)
    }
}

/// Counter owned by one kit, starting at a chosen baseline.
#[derive(Debug)]
pub struct CounterZIndex {
    value: AtomicI64,
}

impl CounterZIndex {
    pub const fn new(base: i64) -> Self {
        Self {
            value: AtomicI64::new(base),
        }
    }
}

impl Default for CounterZIndex {
    fn default() -> Self {
        Self::new(DEFAULT_Z_INDEX_BASE)
    }
}

impl ZIndexAllocator for CounterZIndex {
    fn next_z_index(&self) -> i64 {
        self.value
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1)
    }

    fn current_z_index(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}
