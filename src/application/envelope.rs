//! Per-call transactional state machine.
//!
//! One envelope run moves through
//! `NoSession -> SessionResolved -> Began -> (Committed | RolledBack) -> Released`:
//!
//! 1. resolve the execution-context id for the call,
//! 2. reuse the registered session for that id, or open one and become its
//!    owner,
//! 3. bind the call context, begin with the declared or inherited mode,
//! 4. run the delegate under a panic guard,
//! 5. commit, or roll back on a marker match or abrupt failure,
//! 6. if owner: close the session and deregister the id on every exit path.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::foundation::{CallContext, ContextMode, ExecutionContextId};
use crate::domain::transaction::{MethodPolicy, RollbackPredicate, TxError, TxOutcome};
use crate::ports::{Session, SessionEngine};

/// Runtime envelope shared by every invocation of one proxied method.
///
/// Holds the method's identity and policy; all per-call state lives on the
/// stack of [`run`](TransactionEnvelope::run), so one envelope serves
/// concurrent calls.
pub struct TransactionEnvelope {
    method: String,
    service: String,
    policy: MethodPolicy,
    predicate: RollbackPredicate,
    engine: Arc<dyn SessionEngine>,
}

/// How a guarded call section ended: with a value for the caller, or with a
/// panic payload to re-raise after the owned session is released.
enum Flow<R> {
    Done(Result<R, TxError>),
    Panicked(Box<dyn Any + Send>),
}

impl TransactionEnvelope {
    pub(crate) fn new(
        method: String,
        service: String,
        policy: MethodPolicy,
        engine: Arc<dyn SessionEngine>,
    ) -> Self {
        let predicate = RollbackPredicate::new(policy.rollback_marker.clone());
        Self {
            method,
            service,
            policy,
            predicate,
            engine,
        }
    }

    /// Name of the wrapped method, as registered.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Fully-qualified service type name, used as the session-creation hint.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Runs `delegate` inside the transactional envelope.
    ///
    /// Returns the delegate's own result on commit and on marker-triggered
    /// rollback; envelope failures (session acquisition, begin, commit,
    /// rollback) surface as [`TxError`]. A delegate panic is re-raised
    /// unchanged after rollback and session release.
    pub async fn run<R, Fut>(&self, ctx: &CallContext, delegate: Fut) -> Result<R, TxError>
    where
        R: TxOutcome,
        Fut: Future<Output = R>,
    {
        let id = self.resolve_context_id(ctx);
        let registry = self.engine.registry();

        let (session, owned) = match registry.get(id) {
            Some(existing) => (existing, false),
            None => {
                let session = self
                    .engine
                    .open_session(&self.service)
                    .await
                    .map_err(|source| TxError::AcquireSession {
                        service: self.service.clone(),
                        source,
                    })?;
                registry.put(id, Arc::clone(&session));
                (session, true)
            }
        };

        session.bind(ctx);
        let flow = self.drive(session.as_ref(), delegate).await;

        // Guaranteed release: only the call that created the session closes
        // and deregisters it, on every exit path including the panic path.
        if owned {
            session.close().await;
            registry.remove(id);
            debug!(method = %self.method, context = %id, "session released");
        }

        match flow {
            Flow::Done(result) => result,
            Flow::Panicked(payload) => panic::resume_unwind(payload),
        }
    }

    fn resolve_context_id(&self, ctx: &CallContext) -> ExecutionContextId {
        match self.engine.context_mode() {
            ContextMode::Shared => ExecutionContextId::SHARED,
            ContextMode::PerContext => ctx.execution_context(),
        }
    }

    /// Began-through-committed/rolled-back section. Never touches the
    /// registry; release stays with [`run`](TransactionEnvelope::run).
    async fn drive<R, Fut>(&self, session: &dyn Session, delegate: Fut) -> Flow<R>
    where
        R: TxOutcome,
        Fut: Future<Output = R>,
    {
        let mode = self.policy.effective_propagation(session.last_propagation());
        if let Err(source) = session.begin(mode).await {
            return Flow::Done(Err(TxError::Begin {
                propagation: mode,
                source,
            }));
        }

        match AssertUnwindSafe(delegate).catch_unwind().await {
            Err(payload) => {
                let cause = panic_text(payload.as_ref());
                match session.rollback().await {
                    Ok(()) => {
                        error!(
                            method = %self.method,
                            %cause,
                            "method failed abruptly, transaction rolled back"
                        );
                        Flow::Panicked(payload)
                    }
                    Err(source) => Flow::Done(Err(TxError::RollbackAfterFailure {
                        method: self.method.clone(),
                        cause,
                        source,
                    })),
                }
            }
            Ok(returned) => {
                if self.predicate.matches(&returned) {
                    match session.rollback().await {
                        Ok(()) => {
                            debug!(method = %self.method, "rollback marker matched, transaction rolled back");
                            Flow::Done(Ok(returned))
                        }
                        Err(source) => Flow::Done(Err(TxError::Rollback {
                            method: self.method.clone(),
                            source,
                        })),
                    }
                } else {
                    match session.commit().await {
                        Ok(()) => Flow::Done(Ok(returned)),
                        Err(source) => Flow::Done(Err(TxError::Commit {
                            method: self.method.clone(),
                            source,
                        })),
                    }
                }
            }
        }
    }
}

/// Renders a panic payload for diagnostics and merged failures.
fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
