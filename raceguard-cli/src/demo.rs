//! The demo driver: scripts a hard-coded sequence of events for
//! illustration, separate from anything the core itself needs to know
//! about.
//!
//! Runs one of six worked scenarios (S1-S6) against a real [`Analyzer`]
//! and prints whatever violations it reports.

use std::io::stdout;
use std::sync::Arc;

use raceguard_core::{Analyzer, Dispatcher, RegistrationPolicy, Reporter as _, ThreadId};
use raceguard_io::TextReporter;

use crate::error::CliError;

type DemoDispatcher = Dispatcher<String, String, String>;

pub fn run(scenario: &str) -> Result<(), CliError> {
    let analyzer = Arc::new(Analyzer::<String, String, String>::new(RegistrationPolicy::Lazy));
    let reporter = Arc::new(TextReporter::new(stdout()));

    let r = Arc::clone(&reporter);
    analyzer.set_read_violation_callback(move |v| r.read_violation(v));
    let r = Arc::clone(&reporter);
    analyzer.set_write_violation_callback(move |v| r.write_violation(v));

    let dispatcher = Dispatcher::new(Arc::clone(&analyzer));

    match scenario.to_ascii_lowercase().as_str() {
        "s1" => s1_unprotected_writes_race(&dispatcher),
        "s2" => s2_lock_protected_accesses(&dispatcher),
        "s3" => s3_fork_join_edge(&dispatcher),
        "s4" => s4_missing_synchronization(&dispatcher),
        "s5" => s5_repeated_races(&dispatcher),
        "s6" => s6_acquire_ordering(&dispatcher),
        other => return Err(CliError::UnknownScenario(other.to_string())),
    }

    reporter.dump(&analyzer.snapshot());
    Ok(())
}

fn t(n: u64) -> ThreadId {
    ThreadId(n)
}

fn var(name: &str) -> String {
    name.to_string()
}

fn lock(name: &str) -> String {
    name.to_string()
}

/// S1: `rd(0,x) rd(1,x) wr(0,x) wr(1,x)` — two write violations expected.
fn s1_unprotected_writes_race(d: &DemoDispatcher) {
    d.submit_read(t(0), var("x"));
    d.submit_read(t(1), var("x"));
    d.submit_write(t(0), var("x"));
    d.submit_write(t(1), var("x"));
}

/// S2: a mutex-protected critical section on each thread — zero violations.
fn s2_lock_protected_accesses(d: &DemoDispatcher) {
    d.submit_acquire(t(0), lock("m"));
    d.submit_read(t(0), var("x"));
    d.submit_write(t(0), var("x"));
    d.submit_release(t(0), lock("m"));
    d.submit_acquire(t(1), lock("m"));
    d.submit_read(t(1), var("x"));
    d.submit_write(t(1), var("x"));
    d.submit_release(t(1), lock("m"));
}

/// S3: parent forks a child, joins it, then writes — the join orders the
/// child's write before the parent's, so zero violations.
fn s3_fork_join_edge(d: &DemoDispatcher) {
    let child = d.submit_fork(t(0), "child".to_string());
    d.submit_write(child, var("x"));
    d.submit_join(t(0), "child".to_string());
    d.submit_write(t(0), var("x"));
}

/// S4: parent forks a child but never joins it — the writes race.
fn s4_missing_synchronization(d: &DemoDispatcher) {
    let child = d.submit_fork(t(0), "child".to_string());
    d.submit_write(t(0), var("x"));
    d.submit_write(child, var("x"));
}

/// S5: S1 extended with a third write — the detector reports every
/// violation, not just the first.
fn s5_repeated_races(d: &DemoDispatcher) {
    s1_unprotected_writes_race(d);
    d.submit_write(t(0), var("x"));
}

/// S6: a write under a lock followed by a read under the same lock on a
/// different thread — zero violations, `R[x]` is stamped for thread 1.
fn s6_acquire_ordering(d: &DemoDispatcher) {
    d.submit_acquire(t(0), lock("m"));
    d.submit_write(t(0), var("x"));
    d.submit_release(t(0), lock("m"));
    d.submit_acquire(t(1), lock("m"));
    d.submit_read(t(1), var("x"));
    d.submit_release(t(1), lock("m"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scenario_is_an_error() {
        let err = run("s7").unwrap_err();
        assert!(matches!(err, CliError::UnknownScenario(s) if s == "s7"));
    }

    #[test]
    fn every_named_scenario_runs_without_panicking() {
        for scenario in ["s1", "s2", "s3", "s4", "s5", "s6", "S1"] {
            run(scenario).unwrap();
        }
    }
}
