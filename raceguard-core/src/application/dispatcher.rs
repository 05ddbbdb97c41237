//! The Event Dispatcher.
//!
//! A thin, cheaply-`Clone`able handle around a shared [`Analyzer`]. Every
//! `submit_*` call forwards straight into the corresponding `Analyzer`
//! method, so serialization is entirely the analyzer lock's job — the
//! dispatcher adds no buffering or reordering of its own.
//!
//! Dispatcher operations are total: recoverable analyzer errors are logged
//! and dropped here, never propagated to the event source.

use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::domain::ThreadId;

use super::analyzer::Analyzer;

/// Serializes concurrent event submissions onto a shared [`Analyzer`].
pub struct Dispatcher<H, V, L>
where
    H: Eq + Hash,
    V: Eq + Hash + Clone,
    L: Eq + Hash + Clone,
{
    analyzer: Arc<Analyzer<H, V, L>>,
}

impl<H, V, L> Clone for Dispatcher<H, V, L>
where
    H: Eq + Hash,
    V: Eq + Hash + Clone,
    L: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self { analyzer: Arc::clone(&self.analyzer) }
    }
}

impl<H, V, L> Dispatcher<H, V, L>
where
    H: Eq + Hash + std::fmt::Debug,
    V: Eq + Hash + Clone + std::fmt::Debug,
    L: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new(analyzer: Arc<Analyzer<H, V, L>>) -> Self {
        Self { analyzer }
    }

    /// The underlying analyzer, for queries and final-dump access.
    pub fn analyzer(&self) -> &Analyzer<H, V, L> {
        &self.analyzer
    }

    pub fn submit_read(&self, thread: ThreadId, var: V) {
        if let Err(err) = self.analyzer.read(thread, var) {
            debug!(%err, "read event dropped");
        }
    }

    pub fn submit_write(&self, thread: ThreadId, var: V) {
        if let Err(err) = self.analyzer.write(thread, var) {
            debug!(%err, "write event dropped");
        }
    }

    pub fn submit_acquire(&self, thread: ThreadId, lock: L) {
        if let Err(err) = self.analyzer.acquire(thread, lock) {
            debug!(%err, "acquire event dropped");
        }
    }

    pub fn submit_release(&self, thread: ThreadId, lock: L) {
        if let Err(err) = self.analyzer.release(thread, lock) {
            debug!(%err, "release event dropped");
        }
    }

    /// Returns the newly-assigned id for `child`, since the caller needs it
    /// to address the new thread in subsequent events.
    pub fn submit_fork(&self, thread: ThreadId, child: H) -> ThreadId {
        self.analyzer.fork(thread, child)
    }

    pub fn submit_join(&self, thread: ThreadId, child: H) {
        if let Err(err) = self.analyzer.join(thread, child) {
            debug!(%err, "join event dropped");
        }
    }
}
