//! Concrete [`Reporter`] implementations: a human-readable terminal
//! reporter and a structured JSON-lines reporter. Format is entirely the
//! reporter's concern, not the analyzer's.

use std::io::Write;
use std::sync::Mutex;

use raceguard_core::{AnalyzerSnapshot, Reporter, Violation};

/// Writes one line per violation in a short human-readable form, and the
/// final dump as an indented table of non-zero clock entries.
///
/// Wraps its writer in a `Mutex` because a `Reporter` is `Send + Sync` and
/// may be invoked from the analyzer lock on whatever thread submitted the
/// triggering event.
pub struct TextReporter<W> {
    out: Mutex<W>,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    fn record(&self, kind: &str, violation: &Violation<String>) {
        let mut out = self.out.lock().expect("reporter writer poisoned");
        let _ = writeln!(
            out,
            "RACE: {kind} by {} on `{}` (thread clock {:?}, read clock {:?}, write clock {:?})",
            violation.thread,
            violation.var,
            clock_entries(&violation.thread_clock),
            clock_entries(&violation.read_clock),
            clock_entries(&violation.write_clock),
        );
    }
}

fn clock_entries(vc: &raceguard_core::VectorClock<raceguard_core::ThreadId>) -> Vec<(String, u64)> {
    let mut entries: Vec<_> = vc.entries().map(|(t, time)| (t.to_string(), time)).collect();
    entries.sort();
    entries
}

impl<W: Write + Send> Reporter<String, String> for TextReporter<W> {
    fn read_violation(&self, violation: &Violation<String>) {
        self.record("read", violation);
    }

    fn write_violation(&self, violation: &Violation<String>) {
        self.record("write", violation);
    }

    fn dump(&self, snapshot: &AnalyzerSnapshot<String, String>) {
        let mut out = self.out.lock().expect("reporter writer poisoned");
        let _ = writeln!(out, "-- final state --");
        let mut threads: Vec<_> = snapshot.threads.iter().collect();
        threads.sort_by_key(|(t, _)| t.0);
        for (t, vc) in threads {
            let _ = writeln!(out, "C[{t}] = {:?}", clock_entries(vc));
        }
        let mut vars: Vec<_> = snapshot.reads.keys().collect();
        vars.sort();
        for x in vars {
            let r = &snapshot.reads[x];
            let w = &snapshot.writes[x];
            let _ = writeln!(out, "R[{x}] = {:?}, W[{x}] = {:?}", clock_entries(r), clock_entries(w));
        }
        let mut locks: Vec<_> = snapshot.locks.keys().collect();
        locks.sort();
        for m in locks {
            let _ = writeln!(out, "L[{m}] = {:?}", clock_entries(&snapshot.locks[m]));
        }
    }
}

/// Emits one JSON object per line: violations as they occur, and (if
/// `dump` is called) a trailing `{"final_dump": ...}` record.
pub struct JsonReporter<W> {
    out: Mutex<W>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    fn write_line(&self, value: &impl serde::Serialize) {
        let mut out = self.out.lock().expect("reporter writer poisoned");
        if let Ok(line) = serde_json::to_string(value) {
            let _ = writeln!(out, "{line}");
        }
    }
}

#[derive(serde::Serialize)]
struct ViolationRecord<'a> {
    kind: &'static str,
    violation: &'a Violation<String>,
}

impl<W: Write + Send> Reporter<String, String> for JsonReporter<W> {
    fn read_violation(&self, violation: &Violation<String>) {
        self.write_line(&ViolationRecord { kind: "read", violation });
    }

    fn write_violation(&self, violation: &Violation<String>) {
        self.write_line(&ViolationRecord { kind: "write", violation });
    }

    fn dump(&self, snapshot: &AnalyzerSnapshot<String, String>) {
        #[derive(serde::Serialize)]
        struct Dump<'a> {
            final_dump: &'a AnalyzerSnapshot<String, String>,
        }
        self.write_line(&Dump { final_dump: snapshot });
    }
}
