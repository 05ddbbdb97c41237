//! The Analyzer: the vector-clock core.
//!
//! All mutable state — thread clocks, per-variable read/write clocks,
//! per-lock clocks, the fork/join handle table, the thread-id counter, and
//! the violation callbacks themselves — lives behind one `parking_lot::Mutex`.
//! No method here ever holds a second lock, and callbacks run with that one
//! lock still held, so they must not call back into the `Analyzer`.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use crate::domain::{AccessKind, RegistrationPolicy, ThreadId, VectorClock, Violation};
use crate::error::AnalyzerError;

type ViolationCallback<V> = Box<dyn Fn(&Violation<V>) + Send + Sync>;

struct State<H, V, L> {
    thread_clocks: FxHashMap<ThreadId, VectorClock<ThreadId>>,
    reads: FxHashMap<V, VectorClock<ThreadId>>,
    writes: FxHashMap<V, VectorClock<ThreadId>>,
    locks: FxHashMap<L, VectorClock<ThreadId>>,
    thread_handles: FxHashMap<H, ThreadId>,
    next_thread_id: u64,
    on_read_violation: Option<ViolationCallback<V>>,
    on_write_violation: Option<ViolationCallback<V>>,
}

impl<H, V, L> State<H, V, L>
where
    H: Eq + Hash,
    V: Eq + Hash + Clone,
    L: Eq + Hash + Clone,
{
    fn ensure_thread(&mut self, t: ThreadId) {
        self.thread_clocks.entry(t).or_insert_with(|| {
            let mut vc = VectorClock::zero();
            vc.set(t, 1);
            vc
        });
        // Keep the fork counter ahead of any id addressed directly (as the
        // very first event from a thread always is, including the root
        // thread) so a later `fork` can never mint an id that collides
        // with one already in use.
        if t.0 >= self.next_thread_id {
            self.next_thread_id = t.0 + 1;
        }
    }

    fn is_registered_var(&self, x: &V) -> bool {
        self.reads.contains_key(x)
    }

    fn register_var(&mut self, x: &V) -> bool {
        if self.reads.contains_key(x) {
            false
        } else {
            self.reads.insert(x.clone(), VectorClock::zero());
            self.writes.insert(x.clone(), VectorClock::zero());
            true
        }
    }

    fn is_registered_lock(&self, m: &L) -> bool {
        self.locks.contains_key(m)
    }

    fn register_lock(&mut self, m: &L) -> bool {
        if self.locks.contains_key(m) {
            false
        } else {
            self.locks.insert(m.clone(), VectorClock::zero());
            true
        }
    }
}

/// The Djit+ vector-clock analyzer.
///
/// Generic over the fork/join child-handle type `H`, the variable id type
/// `V`, and the lock id type `L` — see [`crate::domain::event::Event`] for
/// why these are left to the caller rather than fixed.
pub struct Analyzer<H, V, L>
where
    H: Eq + Hash,
    V: Eq + Hash + Clone,
    L: Eq + Hash + Clone,
{
    state: Mutex<State<H, V, L>>,
    policy: RegistrationPolicy,
}

impl<H, V, L> Analyzer<H, V, L>
where
    H: Eq + Hash + std::fmt::Debug,
    V: Eq + Hash + Clone + std::fmt::Debug,
    L: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Creates an analyzer with no registered entities and no observed
    /// threads, using `policy` to decide how to treat unregistered
    /// variables and locks.
    pub fn new(policy: RegistrationPolicy) -> Self {
        Self {
            state: Mutex::new(State {
                thread_clocks: FxHashMap::default(),
                reads: FxHashMap::default(),
                writes: FxHashMap::default(),
                locks: FxHashMap::default(),
                thread_handles: FxHashMap::default(),
                next_thread_id: 0,
                on_read_violation: None,
                on_write_violation: None,
            }),
            policy,
        }
    }

    /// The registration policy this analyzer was constructed with.
    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// Installs the callback invoked after a read races with a prior write.
    pub fn set_read_violation_callback(
        &self,
        f: impl Fn(&Violation<V>) + Send + Sync + 'static,
    ) {
        self.state.lock().on_read_violation = Some(Box::new(f));
    }

    /// Installs the callback invoked after a write races with a prior
    /// read or write.
    pub fn set_write_violation_callback(
        &self,
        f: impl Fn(&Violation<V>) + Send + Sync + 'static,
    ) {
        self.state.lock().on_write_violation = Some(Box::new(f));
    }

    /// Registers `x`, initializing `R[x] = W[x] = 0`. Idempotent.
    /// Returns `true` if `x` was not already registered.
    pub fn register_variable(&self, x: V) -> bool {
        self.state.lock().register_var(&x)
    }

    /// Registers `m`, initializing `L[m] = 0`. Idempotent. Returns `true`
    /// if `m` was not already registered.
    pub fn register_lock(&self, m: L) -> bool {
        self.state.lock().register_lock(&m)
    }

    /// `Read(t, x)`.
    pub fn read(&self, t: ThreadId, x: V) -> Result<(), AnalyzerError> {
        let mut st = self.state.lock();
        st.ensure_thread(t);

        if self.policy == RegistrationPolicy::WatchSet && !st.is_registered_var(&x) {
            warn!(thread = %t, var = ?x, "read on unregistered variable dropped");
            return Err(AnalyzerError::UnknownVariable);
        }
        st.register_var(&x);

        let c_t = st.thread_clocks.get(&t).cloned().unwrap_or_else(VectorClock::zero);
        let w_x = st.writes.get(&x).cloned().unwrap_or_else(VectorClock::zero);
        let no_race = w_x.happens_before(&c_t);

        let c_tt = c_t.get(&t);
        st.reads.entry(x.clone()).or_insert_with(VectorClock::zero).set(t, c_tt);

        trace!(thread = %t, var = ?x, no_race, "read");

        if !no_race {
            let r_x = st.reads.get(&x).cloned().unwrap_or_else(VectorClock::zero);
            let violation = Violation {
                thread: t,
                var: x,
                kind: AccessKind::Read,
                thread_clock: c_t,
                read_clock: r_x,
                write_clock: w_x,
            };
            if let Some(cb) = &st.on_read_violation {
                cb(&violation);
            }
        }
        Ok(())
    }

    /// `Write(t, x)`.
    pub fn write(&self, t: ThreadId, x: V) -> Result<(), AnalyzerError> {
        let mut st = self.state.lock();
        st.ensure_thread(t);

        if self.policy == RegistrationPolicy::WatchSet && !st.is_registered_var(&x) {
            warn!(thread = %t, var = ?x, "write on unregistered variable dropped");
            return Err(AnalyzerError::UnknownVariable);
        }
        st.register_var(&x);

        let c_t = st.thread_clocks.get(&t).cloned().unwrap_or_else(VectorClock::zero);
        let r_x = st.reads.get(&x).cloned().unwrap_or_else(VectorClock::zero);
        let w_x = st.writes.get(&x).cloned().unwrap_or_else(VectorClock::zero);
        let no_race = r_x.happens_before(&c_t) && w_x.happens_before(&c_t);

        let c_tt = c_t.get(&t);
        st.writes.entry(x.clone()).or_insert_with(VectorClock::zero).set(t, c_tt);

        trace!(thread = %t, var = ?x, no_race, "write");

        if !no_race {
            let w_x_after = st.writes.get(&x).cloned().unwrap_or_else(VectorClock::zero);
            let violation = Violation {
                thread: t,
                var: x,
                kind: AccessKind::Write,
                thread_clock: c_t,
                read_clock: r_x,
                write_clock: w_x_after,
            };
            if let Some(cb) = &st.on_write_violation {
                cb(&violation);
            }
        }
        Ok(())
    }

    /// `Acquire(t, m)`. No race check; `L[m]` is unchanged.
    pub fn acquire(&self, t: ThreadId, m: L) -> Result<(), AnalyzerError> {
        let mut st = self.state.lock();
        st.ensure_thread(t);

        if self.policy == RegistrationPolicy::WatchSet && !st.is_registered_lock(&m) {
            warn!(thread = %t, lock = ?m, "acquire on unregistered lock dropped");
            return Err(AnalyzerError::UnknownLock);
        }
        st.register_lock(&m);

        let l_m = st.locks.get(&m).cloned().unwrap_or_else(VectorClock::zero);
        st.thread_clocks.get_mut(&t).expect("ensured above").join(&l_m);

        trace!(thread = %t, lock = ?m, "acquire");
        Ok(())
    }

    /// `Release(t, m)`: increments `C[t][t]`, then publishes
    /// `C[t]` into `L[m]`.
    pub fn release(&self, t: ThreadId, m: L) -> Result<(), AnalyzerError> {
        let mut st = self.state.lock();
        st.ensure_thread(t);

        if self.policy == RegistrationPolicy::WatchSet && !st.is_registered_lock(&m) {
            warn!(thread = %t, lock = ?m, "release on unregistered lock dropped");
            return Err(AnalyzerError::UnknownLock);
        }
        st.register_lock(&m);

        st.thread_clocks.get_mut(&t).expect("ensured above").increment(t);
        let c_t = st.thread_clocks.get(&t).cloned().unwrap();
        st.locks.insert(m.clone(), c_t);

        trace!(thread = %t, lock = ?m, "release");
        Ok(())
    }

    /// `Fork(t, child)`. Allocates a fresh id for `child`,
    /// binds it, and returns it so the caller can continue addressing the
    /// new thread by its analyzer-assigned id.
    pub fn fork(&self, t: ThreadId, child: H) -> ThreadId {
        let mut st = self.state.lock();
        st.ensure_thread(t);

        let child_id = ThreadId(st.next_thread_id);
        st.next_thread_id += 1;

        let mut c_u = st.thread_clocks.get(&t).cloned().unwrap();
        c_u.set(child_id, 1);
        st.thread_clocks.insert(child_id, c_u);
        st.thread_handles.insert(child, child_id);

        st.thread_clocks.get_mut(&t).expect("ensured above").increment(t);

        trace!(thread = %t, child = %child_id, "fork");
        child_id
    }

    /// `Join(t, child)`.
    pub fn join(&self, t: ThreadId, child: H) -> Result<(), AnalyzerError> {
        let mut st = self.state.lock();
        st.ensure_thread(t);

        let child_id = match st.thread_handles.get(&child) {
            Some(id) => *id,
            None => {
                warn!(thread = %t, child = ?child, "join of unknown thread handle dropped");
                return Err(AnalyzerError::UnknownThreadHandle);
            }
        };
        if child_id == t {
            warn!(thread = %t, "self-join rejected");
            return Err(AnalyzerError::SelfJoin);
        }

        let c_u = st.thread_clocks.get(&child_id).cloned().unwrap();
        st.thread_clocks.get_mut(&t).expect("ensured above").join(&c_u);
        st.thread_clocks.get_mut(&child_id).expect("child must exist").increment(child_id);

        trace!(thread = %t, child = %child_id, "join");
        Ok(())
    }

    /// `C[t]`, or the zero clock if `t` has never been observed.
    pub fn thread_clock(&self, t: ThreadId) -> VectorClock<ThreadId> {
        self.state.lock().thread_clocks.get(&t).cloned().unwrap_or_else(VectorClock::zero)
    }

    /// `R[x]`, or the zero clock if `x` is unregistered.
    pub fn read_clock(&self, x: &V) -> VectorClock<ThreadId> {
        self.state.lock().reads.get(x).cloned().unwrap_or_else(VectorClock::zero)
    }

    /// `W[x]`, or the zero clock if `x` is unregistered.
    pub fn write_clock(&self, x: &V) -> VectorClock<ThreadId> {
        self.state.lock().writes.get(x).cloned().unwrap_or_else(VectorClock::zero)
    }

    /// `L[m]`, or the zero clock if `m` is unregistered.
    pub fn lock_clock(&self, m: &L) -> VectorClock<ThreadId> {
        self.state.lock().locks.get(m).cloned().unwrap_or_else(VectorClock::zero)
    }

    /// All currently registered variable ids.
    pub fn registered_variables(&self) -> Vec<V> {
        self.state.lock().reads.keys().cloned().collect()
    }

    /// All currently registered lock ids.
    pub fn registered_locks(&self) -> Vec<L> {
        self.state.lock().locks.keys().cloned().collect()
    }

    /// A read-only copy of every clock the analyzer holds.
    pub fn snapshot(&self) -> crate::domain::AnalyzerSnapshot<V, L> {
        let st = self.state.lock();
        crate::domain::AnalyzerSnapshot {
            threads: st.thread_clocks.clone().into_iter().collect(),
            reads: st.reads.clone().into_iter().collect(),
            writes: st.writes.clone().into_iter().collect(),
            locks: st.locks.clone().into_iter().collect(),
        }
    }
}
