//! A file-backed [`EventSource`] that replays newline-delimited JSON event
//! records — a drop-in substitute for any live event origin, as long as it
//! emits the same event stream.
//!
//! One JSON object per line. `thread` (and `acquire`/`release`'s implicit
//! accessor) may be given either as the numeric [`ThreadId`] the analyzer
//! has already assigned — `0` for the first thread observed, or any id an
//! earlier line in the trace has seen — or as the string handle a `fork`
//! line bound for its child. A forked child has no numeric id until its
//! `fork` line has been replayed, so later lines addressing it by number
//! would have to predict the analyzer's internal counter; addressing it by
//! the same handle the `fork` line used avoids that entirely:
//!
//! ```text
//! {"type":"acquire","thread":0,"lock":"m"}
//! {"type":"write","thread":0,"var":"x"}
//! {"type":"release","thread":0,"lock":"m"}
//! {"type":"fork","thread":0,"child":"t1"}
//! {"type":"write","thread":"t1","var":"y"}
//! {"type":"join","thread":0,"child":"t1"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped, so a trace can
//! carry comments.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use raceguard_core::{Dispatcher, EventSource, ThreadId};
use tracing::trace;

use crate::error::IoError;

/// Variable and lock ids are opaque strings — a string name or integer
/// address both suffice, and a string is what a hand- or tool-authored
/// replay file naturally carries. Fork/join child handles are likewise
/// strings for the same reason.
pub type ReplayDispatcher = Dispatcher<String, String, String>;

/// A thread reference in the wire format: either the numeric id the
/// analyzer has already assigned, or the string handle a `fork` line
/// bound for a child the analyzer has not minted an id for yet.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(untagged)]
enum ThreadRef {
    Id(u64),
    Handle(String),
}

/// The on-disk shape of one trace line. Distinct from
/// [`raceguard_core::Event`] because that type's `thread` field is a bare
/// [`ThreadId`] — this type additionally accepts a string handle, resolved
/// against `JsonlEventSource::aliases` before dispatch.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Read { thread: ThreadRef, var: String },
    Write { thread: ThreadRef, var: String },
    Acquire { thread: ThreadRef, lock: String },
    Release { thread: ThreadRef, lock: String },
    Fork { thread: ThreadRef, child: String },
    Join { thread: ThreadRef, child: String },
}

pub struct JsonlEventSource<R> {
    reader: BufReader<R>,
    /// Maps a fork's child handle to the `ThreadId` the analyzer minted for
    /// it, so a later line can address that thread by the same handle.
    aliases: HashMap<String, ThreadId>,
}

impl JsonlEventSource<std::fs::File> {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, IoError> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> JsonlEventSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader: BufReader::new(reader), aliases: HashMap::new() }
    }

    fn resolve(&self, line: usize, thread: ThreadRef) -> Result<ThreadId, IoError> {
        match thread {
            ThreadRef::Id(n) => Ok(ThreadId(n)),
            ThreadRef::Handle(handle) => self
                .aliases
                .get(&handle)
                .copied()
                .ok_or(IoError::UnknownThreadHandle { line, handle }),
        }
    }
}

impl<R: Read> EventSource<String, String, String> for JsonlEventSource<R> {
    type Error = IoError;

    fn run(&mut self, dispatcher: &ReplayDispatcher) -> Result<(), IoError> {
        let mut line_no = 0usize;
        let mut buf = String::new();
        loop {
            buf.clear();
            let bytes_read = self.reader.read_line(&mut buf)?;
            if bytes_read == 0 {
                break;
            }
            line_no += 1;
            let line = buf.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let event: WireEvent = serde_json::from_str(line)
                .map_err(|source| IoError::Parse { line: line_no, source })?;

            trace!(line = line_no, ?event, "replaying event");
            match event {
                WireEvent::Read { thread, var } => {
                    let t = self.resolve(line_no, thread)?;
                    dispatcher.submit_read(t, var);
                }
                WireEvent::Write { thread, var } => {
                    let t = self.resolve(line_no, thread)?;
                    dispatcher.submit_write(t, var);
                }
                WireEvent::Acquire { thread, lock } => {
                    let t = self.resolve(line_no, thread)?;
                    dispatcher.submit_acquire(t, lock);
                }
                WireEvent::Release { thread, lock } => {
                    let t = self.resolve(line_no, thread)?;
                    dispatcher.submit_release(t, lock);
                }
                WireEvent::Fork { thread, child } => {
                    let t = self.resolve(line_no, thread)?;
                    let child_id = dispatcher.submit_fork(t, child.clone());
                    self.aliases.insert(child, child_id);
                }
                WireEvent::Join { thread, child } => {
                    let t = self.resolve(line_no, thread)?;
                    dispatcher.submit_join(t, child);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use raceguard_core::{Analyzer, RegistrationPolicy};

    use super::*;

    #[test]
    fn replays_a_race_free_critical_section() {
        let src = "\
            {\"type\":\"acquire\",\"thread\":0,\"lock\":\"m\"}\n\
            {\"type\":\"write\",\"thread\":0,\"var\":\"x\"}\n\
            {\"type\":\"release\",\"thread\":0,\"lock\":\"m\"}\n\
            # a comment line, ignored\n\
            \n\
            {\"type\":\"acquire\",\"thread\":1,\"lock\":\"m\"}\n\
            {\"type\":\"read\",\"thread\":1,\"var\":\"x\"}\n\
            {\"type\":\"release\",\"thread\":1,\"lock\":\"m\"}\n\
        ";

        let analyzer = Arc::new(Analyzer::<String, String, String>::new(RegistrationPolicy::Lazy));
        let violations = Arc::new(parking_lot::Mutex::new(0usize));
        let v2 = Arc::clone(&violations);
        analyzer.set_write_violation_callback(move |_| *v2.lock() += 1);

        let dispatcher = Dispatcher::new(analyzer);
        let mut source = JsonlEventSource::new(src.as_bytes());
        source.run(&dispatcher).unwrap();

        assert_eq!(*violations.lock(), 0);
    }

    #[test]
    fn malformed_line_is_reported_with_its_line_number() {
        let src = "{\"type\":\"acquire\",\"thread\":0,\"lock\":\"m\"}\nnot json\n";
        let analyzer = Arc::new(Analyzer::<String, String, String>::new(RegistrationPolicy::Lazy));
        let dispatcher = Dispatcher::new(analyzer);
        let mut source = JsonlEventSource::new(src.as_bytes());

        let err = source.run(&dispatcher).unwrap_err();
        match err {
            IoError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected a Parse error, got {other:?}"),
        }
    }

    #[test]
    fn opens_a_trace_file_from_disk() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"type\":\"acquire\",\"thread\":0,\"lock\":\"m\"}}").unwrap();
        writeln!(file, "{{\"type\":\"release\",\"thread\":0,\"lock\":\"m\"}}").unwrap();

        let analyzer = Arc::new(Analyzer::<String, String, String>::new(RegistrationPolicy::Lazy));
        let dispatcher = Dispatcher::new(analyzer);
        let mut source = JsonlEventSource::open(file.path()).unwrap();
        source.run(&dispatcher).unwrap();
    }

    #[test]
    fn fork_handle_is_a_string_and_join_resolves_it() {
        let src = "\
            {\"type\":\"fork\",\"thread\":0,\"child\":\"t1\"}\n\
            {\"type\":\"write\",\"thread\":0,\"var\":\"x\"}\n\
            {\"type\":\"join\",\"thread\":0,\"child\":\"t1\"}\n\
        ";
        let analyzer = Arc::new(Analyzer::<String, String, String>::new(RegistrationPolicy::Lazy));
        let dispatcher = Dispatcher::new(analyzer);
        let mut source = JsonlEventSource::new(src.as_bytes());
        source.run(&dispatcher).unwrap();
    }

    /// The gap the handle-alias resolution exists to close: a forked
    /// child's own write, addressed by the same string handle its `fork`
    /// line used, with no join ordering it against the parent's write.
    #[test]
    fn forked_child_can_be_addressed_by_its_handle_for_a_race() {
        let src = "\
            {\"type\":\"fork\",\"thread\":0,\"child\":\"t1\"}\n\
            {\"type\":\"write\",\"thread\":0,\"var\":\"x\"}\n\
            {\"type\":\"write\",\"thread\":\"t1\",\"var\":\"x\"}\n\
        ";
        let analyzer = Arc::new(Analyzer::<String, String, String>::new(RegistrationPolicy::Lazy));
        let violations = Arc::new(parking_lot::Mutex::new(0usize));
        let v2 = Arc::clone(&violations);
        analyzer.set_write_violation_callback(move |_| *v2.lock() += 1);

        let dispatcher = Dispatcher::new(analyzer);
        let mut source = JsonlEventSource::new(src.as_bytes());
        source.run(&dispatcher).unwrap();

        assert_eq!(*violations.lock(), 1, "no join orders the child's write before the parent's");
    }

    #[test]
    fn unbound_thread_handle_is_reported_with_its_line_number() {
        let src = "{\"type\":\"write\",\"thread\":\"ghost\",\"var\":\"x\"}\n";
        let analyzer = Arc::new(Analyzer::<String, String, String>::new(RegistrationPolicy::Lazy));
        let dispatcher = Dispatcher::new(analyzer);
        let mut source = JsonlEventSource::new(src.as_bytes());

        let err = source.run(&dispatcher).unwrap_err();
        match err {
            IoError::UnknownThreadHandle { line, handle } => {
                assert_eq!(line, 1);
                assert_eq!(handle, "ghost");
            }
            other => panic!("expected an UnknownThreadHandle error, got {other:?}"),
        }
    }
}
