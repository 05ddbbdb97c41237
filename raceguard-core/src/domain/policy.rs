//! Registration policy.
//!
//! Either policy is defensible for how the analyzer treats accesses to
//! variables/locks it hasn't seen registered; whichever is chosen must be
//! documented and consistent, hence this is a required constructor argument
//! rather than a default.

/// How the analyzer treats an access to an unregistered variable or lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPolicy {
    /// Register the entity on first access. Suited to a replay file, where
    /// every id mentioned in the stream is implicitly of interest.
    Lazy,
    /// Silently ignore accesses to entities that were not explicitly
    /// registered ahead of time. Suited to binary instrumentation driven by
    /// a watch set.
    WatchSet,
}
