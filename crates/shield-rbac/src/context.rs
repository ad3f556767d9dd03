//! Request context
//!
//! The host builds one [`RequestContext`] per incoming operation and merges
//! the [`RbacContext`] produced by [`Rbac::build_context`](crate::Rbac::build_context)
//! into it. Role rules find the user lookup under the agreed `user` field.

use crate::user::{User, UserLookup};
use serde_json::{Map, Value};
use shield_rules::{RuleError, RuleResult};
use std::fmt;
use tokio::sync::watch;
use uuid::Uuid;

/// Name of the context field that carries the user lookup.
pub const USER_CONTEXT_KEY: &str = "user";

/// Context fragment exported by the RBAC layer.
#[derive(Clone)]
pub struct RbacContext {
    /// Resolves the caller of the current operation
    pub user: UserLookup,
}

impl RbacContext {
    /// Wrap a user lookup.
    pub fn new(user: UserLookup) -> Self {
        Self { user }
    }
}

impl fmt::Debug for RbacContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbacContext")
            .field(USER_CONTEXT_KEY, &"<UserResolver>")
            .finish()
    }
}

/// Host-side cancellation signal for one operation.
///
/// # Example
///
/// ```
/// use shield_rbac::CancellationSignal;
///
/// let (trigger, signal) = CancellationSignal::new();
/// assert!(!signal.is_cancelled());
/// trigger.send(true).unwrap();
/// assert!(signal.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    receiver: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// Create a signal and the sender that triggers it.
    pub fn new() -> (watch::Sender<bool>, Self) {
        let (sender, receiver) = watch::channel(false);
        (sender, Self { receiver })
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait until cancellation is requested.
    ///
    /// Never completes if the sender is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Execution context for one operation.
#[derive(Clone)]
pub struct RequestContext {
    /// Request identifier
    pub request_id: Uuid,

    /// Opaque host data (headers, session tokens, arguments)
    pub attributes: Map<String, Value>,

    /// RBAC fragment, present once merged
    pub rbac: Option<RbacContext>,

    /// Cancellation signal supplied by the host
    pub cancellation: Option<CancellationSignal>,
}

impl RequestContext {
    /// Create an empty context with a fresh request ID.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7(),
            attributes: Map::new(),
            rbac: None,
            cancellation: None,
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merge the RBAC fragment into this context.
    pub fn with_rbac(mut self, rbac: RbacContext) -> Self {
        self.rbac = Some(rbac);
        self
    }

    /// Attach a cancellation signal.
    pub fn with_cancellation(mut self, signal: CancellationSignal) -> Self {
        self.cancellation = Some(signal);
        self
    }

    /// Get an attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Get a string attribute.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }

    /// Get the user lookup, if the RBAC fragment was merged.
    pub fn user_lookup(&self) -> Option<&UserLookup> {
        self.rbac.as_ref().map(|rbac| &rbac.user)
    }

    /// Check if the host cancelled this operation.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(CancellationSignal::is_cancelled)
            .unwrap_or(false)
    }

    /// Resolve the caller through the installed user lookup.
    ///
    /// Fails with [`RuleError::MissingContext`] when no lookup is installed
    /// and with [`RuleError::Cancelled`] when the host cancels first.
    pub async fn resolve_user(&self) -> RuleResult<User> {
        let lookup = self
            .user_lookup()
            .ok_or_else(|| RuleError::MissingContext(USER_CONTEXT_KEY.to_string()))?;

        match &self.cancellation {
            Some(signal) => {
                if signal.is_cancelled() {
                    return Err(RuleError::Cancelled);
                }
                tokio::select! {
                    user = lookup.get_user(self) => user,
                    _ = signal.cancelled() => Err(RuleError::Cancelled),
                }
            }
            None => lookup.get_user(self).await,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("attributes", &self.attributes)
            .field("rbac", &self.rbac)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
