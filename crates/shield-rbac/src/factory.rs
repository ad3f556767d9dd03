//! # Role Predicates
//!
//! One rule per declared role: "does the caller's resolved role equal this
//! role?". Building the map performs no I/O; the user lookup only runs when
//! a predicate is evaluated.

use crate::context::RequestContext;
use crate::role::Role;
use async_trait::async_trait;
use shield_rules::{Rule, RuleResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Rule granting callers whose role equals `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePredicate {
    role: Role,
}

impl RolePredicate {
    /// Create the predicate for a role.
    pub fn new(role: impl Into<Role>) -> Self {
        Self { role: role.into() }
    }

    /// Get the role this predicate grants.
    pub fn role(&self) -> &Role {
        &self.role
    }
}

#[async_trait]
impl Rule<RequestContext> for RolePredicate {
    fn name(&self) -> String {
        format!("role:{}", self.role)
    }

    async fn evaluate(&self, ctx: &RequestContext) -> RuleResult<bool> {
        let user = ctx.resolve_user().await?;
        Ok(user.role == self.role)
    }
}

/// Role name to its predicate.
pub type RolePredicateMap = HashMap<Role, Arc<RolePredicate>>;

/// Build one predicate per distinct role.
///
/// Repeated names are redundant, not errors: the later entry replaces the
/// earlier one.
///
/// # Example
///
/// ```
/// use shield_rbac::build_role_predicates;
///
/// let predicates = build_role_predicates(["admin", "user", "admin"]);
/// assert_eq!(predicates.len(), 2);
/// assert!(predicates.contains_key("admin"));
/// ```
pub fn build_role_predicates<I>(roles: I) -> RolePredicateMap
where
    I: IntoIterator,
    I::Item: Into<Role>,
{
    let mut predicates = RolePredicateMap::new();

    for role in roles.into_iter().map(Into::into) {
        let predicate = Arc::new(RolePredicate::new(role.clone()));
        if predicates.insert(role.clone(), predicate).is_some() {
            tracing::debug!(role = %role, "Duplicate role declaration ignored");
        }
    }

    tracing::debug!(roles = predicates.len(), "Role predicates built");
    predicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RbacContext;
    use crate::user::{FnResolver, User, UserLookup};
    use shield_rules::RuleError;

    fn context_for(role: &str) -> RequestContext {
        let role = role.to_string();
        let lookup: UserLookup = Arc::new(FnResolver::new(move |_: &RequestContext| {
            let role = role.clone();
            async move { Ok(User::new(role)) }
        }));
        RequestContext::new().with_rbac(RbacContext::new(lookup))
    }

    #[test]
    fn test_one_predicate_per_role() {
        let predicates = build_role_predicates(["admin", "user", "editor"]);
        assert_eq!(predicates.len(), 3);
        for name in ["admin", "user", "editor"] {
            assert_eq!(predicates[name].role().as_str(), name);
        }
    }

    #[test]
    fn test_duplicates_collapse() {
        let predicates = build_role_predicates(["admin", "admin", "user", "admin"]);
        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates["admin"].as_ref(), &RolePredicate::new("admin"));
    }

    #[test]
    fn test_empty_roles() {
        let predicates = build_role_predicates(Vec::<Role>::new());
        assert!(predicates.is_empty());
    }

    #[tokio::test]
    async fn test_predicate_matches_exact_role() {
        let admin = RolePredicate::new("admin");

        assert_eq!(admin.evaluate(&context_for("admin")).await, Ok(true));
        assert_eq!(admin.evaluate(&context_for("user")).await, Ok(false));
        assert_eq!(admin.evaluate(&context_for("Admin")).await, Ok(false));
        assert_eq!(admin.name(), "role:admin");
    }

    #[tokio::test]
    async fn test_predicate_propagates_lookup_failure() {
        let lookup: UserLookup = Arc::new(FnResolver::new(|_: &RequestContext| async {
            Err(RuleError::Resolution("session expired".to_string()))
        }));
        let ctx = RequestContext::new().with_rbac(RbacContext::new(lookup));

        assert_eq!(
            RolePredicate::new("admin").evaluate(&ctx).await,
            Err(RuleError::Resolution("session expired".to_string()))
        );
    }

    #[tokio::test]
    async fn test_predicate_without_lookup_fails() {
        let result = RolePredicate::new("admin")
            .evaluate(&RequestContext::new())
            .await;
        assert_eq!(result, Err(RuleError::MissingContext("user".to_string())));
    }
}
