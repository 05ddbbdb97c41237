//! Violation reports.

use super::clock::VectorClock;
use super::event::AccessKind;
use super::ids::ThreadId;

/// A snapshot of the clocks involved in a detected race, handed to a
/// violation callback after the triggering event's state update has
/// already been applied.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation<V> {
    pub thread: ThreadId,
    pub var: V,
    pub kind: AccessKind,
    /// `C[t]` at the time of the access.
    pub thread_clock: VectorClock<ThreadId>,
    /// `R[x]` at the time of the access.
    pub read_clock: VectorClock<ThreadId>,
    /// `W[x]` at the time of the access.
    pub write_clock: VectorClock<ThreadId>,
}
