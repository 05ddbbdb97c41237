//! Final-dump snapshot.

use std::collections::HashMap;
use std::hash::Hash;

use super::clock::VectorClock;
use super::ids::ThreadId;

/// A point-in-time, read-only copy of every clock the analyzer holds.
///
/// Produced by `Analyzer::snapshot`; formatting is left to the caller
/// (a reporter).
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalyzerSnapshot<V: Eq + Hash, L: Eq + Hash> {
    pub threads: HashMap<ThreadId, VectorClock<ThreadId>>,
    pub reads: HashMap<V, VectorClock<ThreadId>>,
    pub writes: HashMap<V, VectorClock<ThreadId>>,
    pub locks: HashMap<L, VectorClock<ThreadId>>,
}
