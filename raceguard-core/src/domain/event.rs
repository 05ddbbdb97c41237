//! The event stream the analyzer consumes.
//!
//! Generic over the variable id type `V`, lock id type `L`, and the opaque
//! fork/join child-handle type `H` a particular event source uses to name a
//! not-yet-registered thread — a replay file might use a small integer, a
//! binary-instrumentation front-end might use a native thread handle. The
//! analyzer itself only ever deals in [`ThreadId`](super::ids::ThreadId)s it
//! assigns; `H` exists purely so `Fork`/`Join` can refer to a child before
//! the analyzer has minted an id for it.

use super::ids::ThreadId;

/// A single record in the event stream.
///
/// Carries `#[derive(Serialize, Deserialize)]` with a tagged, snake_case
/// wire shape so `raceguard-io`'s replay format is just this type's JSON
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event<H, V, L> {
    /// `t` reads `x`.
    Read { thread: ThreadId, var: V },
    /// `t` writes `x`.
    Write { thread: ThreadId, var: V },
    /// `t` acquires `m` (after the underlying lock call returns).
    Acquire { thread: ThreadId, lock: L },
    /// `t` releases `m` (before the underlying unlock call proceeds).
    Release { thread: ThreadId, lock: L },
    /// `t` creates a new thread, identified for now only by `child`.
    Fork { thread: ThreadId, child: H },
    /// `t` joins a previously forked `child`.
    Join { thread: ThreadId, child: H },
}

/// Which kind of memory access a [`Violation`] was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum AccessKind {
    Read,
    Write,
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessKind::Read => write!(f, "read"),
            AccessKind::Write => write!(f, "write"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type StrEvent = Event<String, String, String>;

    #[test]
    fn wire_format_is_tagged_and_snake_case() {
        let event: StrEvent = Event::Acquire { thread: ThreadId(3), lock: "m".to_string() };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"acquire","thread":3,"lock":"m"}"#);

        let round_tripped: StrEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(round_tripped, event);
    }

    #[test]
    fn fork_and_join_carry_an_opaque_child_handle() {
        let event: StrEvent = Event::Fork { thread: ThreadId(0), child: "t1".to_string() };
        let json = serde_json::to_string(&event).unwrap();
        let round_tripped: StrEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(round_tripped, event);
    }
}
