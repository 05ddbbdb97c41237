//! Identity types for the entities the analyzer tracks.

/// Stable thread identifier, assigned by the analyzer at fork time.
///
/// Ids are drawn from a monotonically increasing counter and are never
/// reused, even after the thread has joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ThreadId(pub u64);

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}
