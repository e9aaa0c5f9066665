// src/counter.rs

//! Process-wide modification counters.
//!
//! One [`ModificationCounter`] is created per tree-owning session and shared
//! (via `Arc`) with every component that reads or bumps it. Both counters
//! only ever grow.
//!
//! Increments happen inside the editing engine's write-exclusive section and
//! use `Release`; reads use `Acquire`. A reader that starts after a dispatch
//! finished therefore sees its increments, and a racing reader sees either
//! the old or the new value, never a torn one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which counter a [`Stamp`] was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    AllChanges,
    OutOfBlock,
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKind::AllChanges => f.write_str("all-changes"),
            CounterKind::OutOfBlock => f.write_str("out-of-block"),
        }
    }
}

/// Snapshot of one counter, stored next to a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stamp {
    pub counter: CounterKind,
    pub value: u64,
}

#[derive(Debug, Default)]
pub struct ModificationCounter {
    all_changes: AtomicU64,
    out_of_block: AtomicU64,
}

impl ModificationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one out-of-block modification. Also counts as a change.
    pub fn increment_out_of_block(&self) {
        self.out_of_block.fetch_add(1, Ordering::Release);
        self.all_changes.fetch_add(1, Ordering::Release);
    }

    pub fn out_of_block_count(&self) -> u64 {
        self.out_of_block.load(Ordering::Acquire)
    }

    pub fn all_changes_count(&self) -> u64 {
        self.all_changes.load(Ordering::Acquire)
    }

    pub fn count(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::AllChanges => self.all_changes_count(),
            CounterKind::OutOfBlock => self.out_of_block_count(),
        }
    }

    pub fn stamp(&self, kind: CounterKind) -> Stamp {
        Stamp {
            counter: kind,
            value: self.count(kind),
        }
    }

    /// A value cached under `stamp` is stale once its counter moved past it.
    pub fn is_stale(&self, stamp: &Stamp) -> bool {
        self.count(stamp.counter) > stamp.value
    }
}
