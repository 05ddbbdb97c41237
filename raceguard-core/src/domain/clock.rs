//! Vector clocks.
//!
//! A [`VectorClock`] is a total function from thread id to logical time;
//! threads it has never heard of implicitly read as `0`. It is the single
//! data structure the whole analyzer is built from: per-thread clocks,
//! per-variable read/write clocks, and per-lock clocks are all the same
//! type, just stored in different tables.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Sparse vector clock keyed by thread id `T`.
///
/// Backed by `FxHashMap` rather than a fixed-size array: the analyzer does
/// not know the traced program's thread count up front, and ids are never
/// reused, so a dense array would grow without bound anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct VectorClock<T: Eq + Hash>(FxHashMap<T, u64>);

impl<T: Eq + Hash + Clone> VectorClock<T> {
    /// The zero vector clock: every thread reads as time 0.
    pub fn zero() -> Self {
        Self(FxHashMap::default())
    }

    /// Logical time for `thread`, or `0` if `thread` has never been recorded.
    pub fn get(&self, thread: &T) -> u64 {
        self.0.get(thread).copied().unwrap_or(0)
    }

    /// Sets the logical time for `thread` directly.
    pub fn set(&mut self, thread: T, time: u64) {
        if time == 0 {
            self.0.remove(&thread);
        } else {
            self.0.insert(thread, time);
        }
    }

    /// Increments the logical time for `thread` by one and returns the new value.
    pub fn increment(&mut self, thread: T) -> u64 {
        let next = self.get(&thread) + 1;
        self.0.insert(thread, next);
        next
    }

    /// Destructive pointwise maximum: `self <- self ⊔ other`.
    pub fn join(&mut self, other: &Self) {
        for (thread, &time) in other.0.iter() {
            let slot = self.0.entry(thread.clone()).or_insert(0);
            if time > *slot {
                *slot = time;
            }
        }
    }

    /// Happens-before: `self ⊑ other`, i.e. for every thread t, `self[t] <= other[t]`.
    pub fn happens_before(&self, other: &Self) -> bool {
        self.0.iter().all(|(thread, &time)| time <= other.get(thread))
    }

    /// Iterates over the threads this clock has a non-zero entry for.
    pub fn entries(&self) -> impl Iterator<Item = (&T, u64)> {
        self.0.iter().map(|(t, &time)| (t, time))
    }
}
