//! Caller identity
//!
//! The compiled tree never decides who the caller is. It asks the
//! [`UserResolver`] installed in the request context, which may suspend
//! (session stores, identity providers).

use crate::context::RequestContext;
use crate::role::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shield_rules::RuleResult;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// The caller as seen by role rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Caller identifier, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The caller's role
    pub role: Role,
}

impl User {
    /// Create a user with a role and no identifier.
    pub fn new(role: impl Into<Role>) -> Self {
        Self {
            id: None,
            role: role.into(),
        }
    }

    /// Set the caller identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Resolves the caller of an operation.
///
/// Implementations must be safe to call concurrently: one resolver serves
/// every in-flight operation.
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Look up the caller for `ctx`.
    ///
    /// Failures (including cancellation) must be returned, not replaced by
    /// a default user.
    async fn get_user(&self, ctx: &RequestContext) -> RuleResult<User>;
}

/// Shared user resolver.
pub type UserLookup = Arc<dyn UserResolver>;

/// Function-based resolver.
///
/// The handler reads what it needs from the context and returns a future
/// that owns its data.
///
/// # Example
///
/// ```
/// use shield_rbac::{FnResolver, User, UserLookup};
/// use shield_rules::RuleError;
/// use std::sync::Arc;
///
/// let lookup: UserLookup = Arc::new(FnResolver::new(|ctx| {
///     let role = ctx.attribute_str("role").map(str::to_string);
///     async move {
///         role.map(User::new)
///             .ok_or_else(|| RuleError::Resolution("anonymous caller".to_string()))
///     }
/// }));
/// ```
pub struct FnResolver<F, Fut> {
    handler: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnResolver<F, Fut>
where
    F: Fn(&RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = RuleResult<User>> + Send,
{
    /// Create a new function-based resolver.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _future: PhantomData,
        }
    }
}

impl<F, Fut> fmt::Debug for FnResolver<F, Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> UserResolver for FnResolver<F, Fut>
where
    F: Fn(&RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = RuleResult<User>> + Send,
{
    async fn get_user(&self, ctx: &RequestContext) -> RuleResult<User> {
        (self.handler)(ctx).await
    }
}
