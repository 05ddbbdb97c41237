//! Error handling.
//!
//! Every variant here is a *recoverable* condition the analyzer handles
//! locally: dropped, logged via `tracing::warn!`, with no effect on state.
//! Dispatcher operations stay total regardless — nothing here is ever
//! propagated back to the event source — this type exists so callers that
//! want to observe drops (tests, a verbose reporter) can ask `why`.

use thiserror::Error;

/// Why an event was dropped instead of updating analyzer state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// The event referenced a variable that was never registered, and the
    /// analyzer is running under [`RegistrationPolicy::WatchSet`](crate::domain::RegistrationPolicy::WatchSet).
    #[error("unknown variable: event dropped")]
    UnknownVariable,

    /// The event referenced a lock that was never registered, under the
    /// same policy.
    #[error("unknown lock: event dropped")]
    UnknownLock,

    /// A `join` named a child handle that was never bound by a prior
    /// `fork` — indicates event-source corruption.
    #[error("unknown thread handle in join: event dropped")]
    UnknownThreadHandle,

    /// A thread attempted to join itself. Treated as a programming error
    /// in the event source; the join is refused rather than corrupting
    /// `C[t]`.
    #[error("self-join is not supported")]
    SelfJoin,
}
