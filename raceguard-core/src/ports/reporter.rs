//! The Reporter port.
//!
//! Formatting is the reporter's concern, not the analyzer's — this trait is
//! the seam `raceguard-io` hangs `TextReporter`/`JsonReporter` off of. A
//! `Reporter` is typically wrapped in an `Arc` and handed to
//! [`Analyzer::set_read_violation_callback`](crate::application::Analyzer::set_read_violation_callback)
//! and its write counterpart as two small forwarding closures.

use std::hash::Hash;

use crate::domain::{AnalyzerSnapshot, Violation};

/// Consumes violation reports and, optionally, a final state dump.
pub trait Reporter<V, L>: Send + Sync
where
    V: Eq + Hash + Clone,
    L: Eq + Hash + Clone,
{
    fn read_violation(&self, violation: &Violation<V>);
    fn write_violation(&self, violation: &Violation<V>);

    /// Called once, after the event stream is exhausted, with the
    /// analyzer's final clock state. Default: does nothing.
    fn dump(&self, _snapshot: &AnalyzerSnapshot<V, L>) {}
}
