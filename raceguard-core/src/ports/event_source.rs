//! The Event Source port.
//!
//! The core declines to specify how events are produced — a file replay, a
//! language-level tracing runtime, or a binary-instrumentation front-end all
//! satisfy this trait equally. `raceguard-io` provides the file-replay
//! implementation; nothing in `raceguard-core` depends on it.

use std::hash::Hash;

use crate::application::Dispatcher;

/// Drives events from some external origin into a [`Dispatcher`].
///
/// Implementations are expected to block until the stream is exhausted —
/// there is no back-pressure from the analyzer, so the source is assumed
/// to wait for each `submit_*` call to return before producing the next
/// event.
pub trait EventSource<H, V, L>
where
    H: Eq + Hash,
    V: Eq + Hash + Clone,
    L: Eq + Hash + Clone,
{
    type Error;

    /// Runs the event source to completion, submitting every event it
    /// produces to `dispatcher`.
    fn run(&mut self, dispatcher: &Dispatcher<H, V, L>) -> Result<(), Self::Error>;
}
