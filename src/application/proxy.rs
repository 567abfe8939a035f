//! Proxy construction over a service's methods.
//!
//! `ServiceProxy` takes ownership of a service value and builds one
//! [`TxMethod`] decorator per business method. Each decorator retains the
//! original callable as its delegate and carries the method's explicit
//! transaction policy; invoking it runs the delegate inside a
//! [`TransactionEnvelope`]. The assembled set of decorators is the drop-in
//! replacement for the original service.
//!
//! # Example
//!
//! ```ignore
//! let proxy = ServiceProxy::new(engine, AccountService::new(store));
//!
//! let transfer = proxy
//!     .method("transfer")
//!     .propagation(Propagation::Required)
//!     .rollback_on("InsufficientFunds")
//!     .wrap(|svc, (from, to, amount)| async move { svc.transfer(from, to, amount).await });
//!
//! let receipt = transfer.invoke(&CallContext::shared(), (a, b, 100)).await?;
//! ```

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

use crate::domain::foundation::CallContext;
use crate::domain::transaction::{MethodPolicy, Propagation, TxError, TxOutcome};
use crate::ports::SessionEngine;

use super::TransactionEnvelope;

/// Builds transactional decorators over one service instance.
///
/// Taking the service by value makes the build step a one-shot, exclusive
/// operation: the original callables are only reachable through the
/// decorators afterwards. The service's fully-qualified type name is
/// recorded as the session-creation hint.
pub struct ServiceProxy<S> {
    service: Arc<S>,
    engine: Arc<dyn SessionEngine>,
    identity: String,
}

impl<S: Send + Sync + 'static> ServiceProxy<S> {
    /// Wraps `service`, binding it to `engine` for session management.
    pub fn new(engine: Arc<dyn SessionEngine>, service: S) -> Self {
        Self {
            service: Arc::new(service),
            engine,
            identity: std::any::type_name::<S>().to_string(),
        }
    }

    /// Starts the decorator for one method. `name` identifies the method in
    /// diagnostics and error messages.
    pub fn method(&self, name: impl Into<String>) -> MethodBuilder<'_, S> {
        MethodBuilder {
            proxy: self,
            name: name.into(),
            policy: MethodPolicy::inherit(),
        }
    }

    /// The session-creation hint used for methods built on this proxy.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// Per-method configuration step between [`ServiceProxy::method`] and
/// [`MethodBuilder::wrap`].
pub struct MethodBuilder<'a, S> {
    proxy: &'a ServiceProxy<S>,
    name: String,
    policy: MethodPolicy,
}

impl<'a, S: Send + Sync + 'static> MethodBuilder<'a, S> {
    /// Declares the explicit propagation mode for this method.
    pub fn propagation(mut self, propagation: Propagation) -> Self {
        self.policy = self.policy.with_propagation(propagation);
        self
    }

    /// Declares the propagation mode from a declarative token; unknown
    /// tokens resolve to [`Propagation::Never`].
    pub fn propagation_token(self, token: &str) -> Self {
        let mode = Propagation::parse(token);
        self.propagation(mode)
    }

    /// Declares the rollback marker matched against error-like returned
    /// values. Empty markers are ignored.
    pub fn rollback_on(mut self, marker: impl Into<String>) -> Self {
        self.policy = self.policy.with_rollback_marker(marker);
        self
    }

    /// Finishes the decorator, capturing `delegate` as the original
    /// callable. The delegate receives the shared service instance and the
    /// call arguments; its output is what the rollback predicate inspects
    /// and what the caller gets back.
    pub fn wrap<A, R, F, Fut>(self, delegate: F) -> TxMethod<A, R>
    where
        A: Send + 'static,
        R: TxOutcome + Send + 'static,
        F: Fn(Arc<S>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let service = Arc::clone(&self.proxy.service);
        let envelope = TransactionEnvelope::new(
            self.name,
            self.proxy.identity.clone(),
            self.policy,
            Arc::clone(&self.proxy.engine),
        );
        let delegate: Box<dyn Fn(A) -> BoxFuture<'static, R> + Send + Sync> =
            Box::new(move |args: A| Box::pin(delegate(Arc::clone(&service), args)));
        TxMethod { envelope, delegate }
    }
}

/// One decorated service method: the original callable plus its
/// transactional envelope. Immutable after construction.
pub struct TxMethod<A, R> {
    envelope: TransactionEnvelope,
    delegate: Box<dyn Fn(A) -> BoxFuture<'static, R> + Send + Sync>,
}

impl<A, R: TxOutcome> TxMethod<A, R> {
    /// Invokes the delegate inside its transactional envelope.
    ///
    /// # Errors
    ///
    /// [`TxError`] for envelope failures (session acquisition, begin,
    /// commit, rollback). The delegate's own result, error or not, comes
    /// back in the `Ok` variant. A delegate panic is re-raised after
    /// rollback.
    pub async fn invoke(&self, ctx: &CallContext, args: A) -> Result<R, TxError> {
        self.envelope.run(ctx, (self.delegate)(args)).await
    }

    /// Name of the wrapped method, as registered.
    pub fn name(&self) -> &str {
        self.envelope.method()
    }
}
