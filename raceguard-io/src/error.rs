//! Errors raised at the IO boundary. The analyzer itself handles its own
//! recoverable errors locally; this crate's errors are the ordinary kind
//! any file-backed collaborator has — a bad path, a malformed line — and
//! are propagated to the caller, not swallowed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read event source: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed watch-set entry on line {line}: {reason}")]
    WatchSet { line: usize, reason: String },

    #[error("failed to open watch-set file `{path}`: {source}")]
    WatchSetOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown thread handle on line {line}: `{handle}` was never bound by an earlier fork in this trace")]
    UnknownThreadHandle { line: usize, handle: String },
}
