//! End-to-end scenarios S1-S6, run against a real `Analyzer` through the
//! `Dispatcher`, with thread ids 0 and 1 so that `C[0] = <1,0>` and
//! `C[1] = <0,1>` after the first access from each.

use std::sync::{Arc, Mutex};

use raceguard_core::{Analyzer, AnalyzerSnapshot, Dispatcher, RegistrationPolicy, ThreadId, Violation};

type TestAnalyzer = Analyzer<u64, String, String>;

fn new_dispatcher() -> (Dispatcher<u64, String, String>, Arc<Mutex<Vec<Violation<String>>>>, Arc<Mutex<Vec<Violation<String>>>>) {
    let analyzer = Arc::new(TestAnalyzer::new(RegistrationPolicy::Lazy));
    let read_violations = Arc::new(Mutex::new(Vec::new()));
    let write_violations = Arc::new(Mutex::new(Vec::new()));

    let rv = Arc::clone(&read_violations);
    analyzer.set_read_violation_callback(move |v| rv.lock().unwrap().push(v.clone()));
    let wv = Arc::clone(&write_violations);
    analyzer.set_write_violation_callback(move |v| wv.lock().unwrap().push(v.clone()));

    (Dispatcher::new(analyzer), read_violations, write_violations)
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

#[test]
fn s1_unprotected_writes_race() {
    let (d, reads, writes) = new_dispatcher();

    d.submit_read(t(0), var("x"));
    d.submit_read(t(1), var("x"));
    d.submit_write(t(0), var("x"));
    d.submit_write(t(1), var("x"));

    assert_eq!(reads.lock().unwrap().len(), 0, "no read should race here");
    assert_eq!(writes.lock().unwrap().len(), 2, "both writes race in this scenario");
}

#[test]
fn s2_lock_protected_accesses_do_not_race() {
    let (d, reads, writes) = new_dispatcher();

    d.submit_acquire(t(0), lock("m"));
    d.submit_read(t(0), var("x"));
    d.submit_write(t(0), var("x"));
    d.submit_release(t(0), lock("m"));
    d.submit_acquire(t(1), lock("m"));
    d.submit_read(t(1), var("x"));
    d.submit_write(t(1), var("x"));
    d.submit_release(t(1), lock("m"));

    assert_eq!(reads.lock().unwrap().len(), 0);
    assert_eq!(writes.lock().unwrap().len(), 0);

    let lm = d.analyzer().lock_clock(&lock("m"));
    assert_eq!(lm.get(&t(0)), 2);
    assert_eq!(lm.get(&t(1)), 2);

    let c0 = d.analyzer().thread_clock(t(0));
    assert_eq!(c0.get(&t(0)), 2);
    assert_eq!(c0.get(&t(1)), 0);

    let c1 = d.analyzer().thread_clock(t(1));
    assert_eq!(c1.get(&t(0)), 2);
    assert_eq!(c1.get(&t(1)), 2);
}

#[test]
fn s3_fork_join_edge_protects_child_write() {
    let (d, reads, writes) = new_dispatcher();

    // parent=0 forks child, bound for now by opaque handle `1`.
    let child = d.submit_fork(t(0), 1);
    d.submit_write(child, var("x"));
    d.submit_join(t(0), 1);
    d.submit_write(t(0), var("x"));

    assert_eq!(reads.lock().unwrap().len(), 0);
    assert_eq!(writes.lock().unwrap().len(), 0, "join must order child's write before parent's");

    let c0 = d.analyzer().thread_clock(t(0));
    assert!(c0.get(&child) >= 1, "parent's post-join clock dominates the child");
}

#[test]
fn s4_missing_synchronization_across_fork_without_join() {
    let (d, _reads, writes) = new_dispatcher();

    let child = d.submit_fork(t(0), 1);
    d.submit_write(t(0), var("x"));
    d.submit_write(child, var("x"));

    assert!(!writes.lock().unwrap().is_empty(), "no join means the writes are unordered");
}

#[test]
fn s5_repeated_races_are_all_reported() {
    let (d, _reads, writes) = new_dispatcher();

    d.submit_read(t(0), var("x"));
    d.submit_read(t(1), var("x"));
    d.submit_write(t(0), var("x"));
    d.submit_write(t(1), var("x"));
    d.submit_write(t(0), var("x"));

    assert_eq!(writes.lock().unwrap().len(), 3, "the detector does not suppress duplicate reports");
}

#[test]
fn s6_acquire_ordering_prevents_race_and_joins_lock_clock() {
    let (d, reads, writes) = new_dispatcher();

    d.submit_acquire(t(0), lock("m"));
    d.submit_write(t(0), var("x"));
    d.submit_release(t(0), lock("m"));

    d.submit_acquire(t(1), lock("m"));
    d.submit_read(t(1), var("x"));
    d.submit_release(t(1), lock("m"));

    assert_eq!(reads.lock().unwrap().len(), 0);
    assert_eq!(writes.lock().unwrap().len(), 0);

    assert_eq!(d.analyzer().read_clock(&var("x")).get(&t(1)), 1, "R[x][1] is stamped with C[1][1] at the time of the read, before the trailing release bumps it");
    let c1 = d.analyzer().thread_clock(t(1));
    assert_eq!(c1.get(&t(0)), 2);
}

#[test]
fn read_immediately_following_own_write_never_races() {
    let (d, reads, _writes) = new_dispatcher();

    d.submit_write(t(0), var("x"));
    d.submit_read(t(0), var("x"));

    assert_eq!(reads.lock().unwrap().len(), 0);
}

#[test]
fn registering_twice_is_a_no_op() {
    let analyzer = TestAnalyzer::new(RegistrationPolicy::Lazy);
    assert!(analyzer.register_variable(var("x")));
    assert!(!analyzer.register_variable(var("x")));
    assert!(analyzer.register_lock(lock("m")));
    assert!(!analyzer.register_lock(lock("m")));
}

#[test]
fn watch_set_policy_drops_unregistered_accesses() {
    let analyzer = TestAnalyzer::new(RegistrationPolicy::WatchSet);
    let err = analyzer.read(t(0), var("x")).unwrap_err();
    assert_eq!(err, raceguard_core::AnalyzerError::UnknownVariable);
    assert_eq!(analyzer.read_clock(&var("x")).get(&t(0)), 0, "dropped event must not mutate state");

    analyzer.register_variable(var("x"));
    assert!(analyzer.read(t(0), var("x")).is_ok());
}

#[test]
fn snapshot_reflects_final_state() {
    let (d, _reads, _writes) = new_dispatcher();
    d.submit_acquire(t(0), lock("m"));
    d.submit_write(t(0), var("x"));
    d.submit_release(t(0), lock("m"));

    let snap: AnalyzerSnapshot<String, String> = d.analyzer().snapshot();
    assert!(snap.writes.contains_key(&var("x")));
    assert!(snap.locks.contains_key(&lock("m")));
    assert!(snap.threads.contains_key(&t(0)));
}

#[test]
fn join_with_unknown_handle_is_dropped() {
    let analyzer = TestAnalyzer::new(RegistrationPolicy::Lazy);
    let err = analyzer.join(t(0), 999).unwrap_err();
    assert_eq!(err, raceguard_core::AnalyzerError::UnknownThreadHandle);
}
