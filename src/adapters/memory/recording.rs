//! Recording session and engine for tests and single-process development.
//!
//! `RecordingSession` tracks every lifecycle call instead of talking to a
//! store; `RecordingEngine` opens such sessions and lets tests inject
//! open/begin/commit/rollback failures. Deterministic and synchronous, in
//! the spirit of the in-memory event bus adapter.
//!
//! # Panics
//!
//! Inspection helpers use `.expect()` on lock operations and panic if locks
//! are poisoned. This adapter is not meant for production engines.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::foundation::{CallContext, ContextMode, ExecutionContextId};
use crate::domain::transaction::{Propagation, SessionError};
use crate::ports::{Session, SessionEngine, SessionRegistry};

use super::InMemorySessionRegistry;

/// Failure injection switches shared between an engine and the sessions it
/// opens.
#[derive(Default)]
struct FailurePlan {
    open: Mutex<Option<String>>,
    begin: Mutex<Option<String>>,
    commit: Mutex<Option<String>>,
    rollback: Mutex<Option<String>>,
}

impl FailurePlan {
    fn get(slot: &Mutex<Option<String>>) -> Option<String> {
        slot.lock().expect("FailurePlan: lock poisoned").clone()
    }

    fn set(slot: &Mutex<Option<String>>, message: &str) {
        *slot.lock().expect("FailurePlan: lock poisoned") = Some(message.to_string());
    }
}

/// Session that records lifecycle calls instead of executing them.
pub struct RecordingSession {
    begins: Mutex<Vec<Propagation>>,
    last_propagation: RwLock<Propagation>,
    bound: Mutex<Vec<CallContext>>,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    closed: AtomicBool,
    failures: Arc<FailurePlan>,
}

impl RecordingSession {
    /// Creates a session with no recorded calls and no failure plan.
    pub fn new() -> Self {
        Self::with_failures(Arc::new(FailurePlan::default()))
    }

    fn with_failures(failures: Arc<FailurePlan>) -> Self {
        Self {
            begins: Mutex::new(Vec::new()),
            last_propagation: RwLock::new(Propagation::Never),
            bound: Mutex::new(Vec::new()),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            failures,
        }
    }

    /// Overrides the reported last-begun mode, for inheritance tests.
    pub fn set_last_propagation(&self, propagation: Propagation) {
        *self
            .last_propagation
            .write()
            .expect("RecordingSession: lock poisoned") = propagation;
    }

    /// Modes of every successful begin, in call order.
    pub fn begins(&self) -> Vec<Propagation> {
        self.begins
            .lock()
            .expect("RecordingSession: lock poisoned")
            .clone()
    }

    /// Contexts bound to this session, in call order.
    pub fn bound_contexts(&self) -> Vec<CallContext> {
        self.bound
            .lock()
            .expect("RecordingSession: lock poisoned")
            .clone()
    }

    /// Number of commits.
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of rollbacks.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    /// Whether the session was closed.
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Session for RecordingSession {
    fn bind(&self, ctx: &CallContext) {
        self.bound
            .lock()
            .expect("RecordingSession: lock poisoned")
            .push(ctx.clone());
    }

    async fn begin(&self, propagation: Propagation) -> Result<(), SessionError> {
        if let Some(message) = FailurePlan::get(&self.failures.begin) {
            return Err(SessionError::begin_failed(message));
        }
        self.begins
            .lock()
            .expect("RecordingSession: lock poisoned")
            .push(propagation);
        *self
            .last_propagation
            .write()
            .expect("RecordingSession: lock poisoned") = propagation;
        Ok(())
    }

    async fn commit(&self) -> Result<(), SessionError> {
        if let Some(message) = FailurePlan::get(&self.failures.commit) {
            return Err(SessionError::commit_failed(message));
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&self) -> Result<(), SessionError> {
        if let Some(message) = FailurePlan::get(&self.failures.rollback) {
            return Err(SessionError::rollback_failed(message));
        }
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn last_propagation(&self) -> Propagation {
        *self
            .last_propagation
            .read()
            .expect("RecordingSession: lock poisoned")
    }
}

/// Engine opening [`RecordingSession`]s over an [`InMemorySessionRegistry`].
pub struct RecordingEngine {
    registry: Arc<InMemorySessionRegistry>,
    sessions: Mutex<Vec<Arc<RecordingSession>>>,
    open_hints: Mutex<Vec<String>>,
    mode: ContextMode,
    failures: Arc<FailurePlan>,
}

impl RecordingEngine {
    /// Engine in shared-context mode with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(InMemorySessionRegistry::new()),
            sessions: Mutex::new(Vec::new()),
            open_hints: Mutex::new(Vec::new()),
            mode: ContextMode::Shared,
            failures: Arc::new(FailurePlan::default()),
        }
    }

    /// Builder: select the context-resolution mode.
    pub fn with_mode(mut self, mode: ContextMode) -> Self {
        self.mode = mode;
        self
    }

    /// Makes the next and all following `open_session` calls fail.
    pub fn fail_open(&self, message: &str) {
        FailurePlan::set(&self.failures.open, message);
    }

    /// Makes `begin` fail on sessions opened by this engine.
    pub fn fail_begin(&self, message: &str) {
        FailurePlan::set(&self.failures.begin, message);
    }

    /// Makes `commit` fail on sessions opened by this engine.
    pub fn fail_commit(&self, message: &str) {
        FailurePlan::set(&self.failures.commit, message);
    }

    /// Makes `rollback` fail on sessions opened by this engine.
    pub fn fail_rollback(&self, message: &str) {
        FailurePlan::set(&self.failures.rollback, message);
    }

    /// Registers an externally created session, as if an outer call on the
    /// same context id had opened it.
    pub fn preregister(&self, id: ExecutionContextId, session: Arc<RecordingSession>) {
        self.registry.put(id, session);
    }

    /// The `i`-th session opened by this engine, in open order.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `i + 1` sessions were opened.
    pub fn session(&self, i: usize) -> Arc<RecordingSession> {
        self.sessions
            .lock()
            .expect("RecordingEngine: lock poisoned")[i]
            .clone()
    }

    /// Number of sessions opened by this engine.
    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .expect("RecordingEngine: lock poisoned")
            .len()
    }

    /// Identity hints passed to `open_session`, in call order.
    pub fn open_hints(&self) -> Vec<String> {
        self.open_hints
            .lock()
            .expect("RecordingEngine: lock poisoned")
            .clone()
    }

    /// Number of sessions currently registered.
    pub fn registry_entry_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionEngine for RecordingEngine {
    async fn open_session(&self, identity_hint: &str) -> Result<Arc<dyn Session>, SessionError> {
        if let Some(message) = FailurePlan::get(&self.failures.open) {
            return Err(SessionError::open_failed(message));
        }
        self.open_hints
            .lock()
            .expect("RecordingEngine: lock poisoned")
            .push(identity_hint.to_string());

        let session = Arc::new(RecordingSession::with_failures(Arc::clone(&self.failures)));
        self.sessions
            .lock()
            .expect("RecordingEngine: lock poisoned")
            .push(Arc::clone(&session));
        Ok(session)
    }

    fn registry(&self) -> Arc<dyn SessionRegistry> {
        Arc::clone(&self.registry) as Arc<dyn SessionRegistry>
    }

    fn context_mode(&self) -> ContextMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_records_lifecycle_calls() {
        let session = RecordingSession::new();
        assert_eq!(session.last_propagation(), Propagation::Never);

        session.bind(&CallContext::shared());
        session.begin(Propagation::Required).await.unwrap();
        session.commit().await.unwrap();
        session.close().await;

        assert_eq!(session.begins(), vec![Propagation::Required]);
        assert_eq!(session.last_propagation(), Propagation::Required);
        assert_eq!(session.commits(), 1);
        assert_eq!(session.rollbacks(), 0);
        assert!(session.closed());
        assert_eq!(session.bound_contexts().len(), 1);
    }

    #[tokio::test]
    async fn failed_begin_does_not_update_last_propagation() {
        let engine = RecordingEngine::new();
        engine.fail_begin("no luck");
        let session = engine.open_session("svc").await.unwrap();

        assert!(session.begin(Propagation::Required).await.is_err());
        assert_eq!(session.last_propagation(), Propagation::Never);
    }

    #[tokio::test]
    async fn engine_tracks_opened_sessions_and_hints() {
        let engine = RecordingEngine::new();
        engine.open_session("a::Svc").await.unwrap();
        engine.open_session("b::Svc").await.unwrap();

        assert_eq!(engine.session_count(), 2);
        assert_eq!(engine.open_hints(), vec!["a::Svc", "b::Svc"]);
    }

    #[tokio::test]
    async fn fail_open_rejects_new_sessions() {
        let engine = RecordingEngine::new();
        engine.fail_open("down");
        let result = engine.open_session("svc").await;
        assert_eq!(
            result.err(),
            Some(SessionError::open_failed("down"))
        );
    }
}
