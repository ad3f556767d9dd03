//! # RBAC Entry Point
//!
//! [`Rbac`] holds the declared roles, the permission schema and the user
//! lookup, and hands out the two artifacts a host needs:
//!
//! ```text
//! Rbac { roles, schema, get_user }
//!   ├─ compile_authorization_tree() ─→ PermissionTree   (install in the shield)
//!   └─ build_context()              ─→ RbacContext      (merge per request)
//! ```

use crate::compiler::{compile, PermissionTree};
use crate::config::RbacConfig;
use crate::context::{RbacContext, RequestContext};
use crate::error::RbacResult;
use crate::factory::{build_role_predicates, RolePredicateMap};
use crate::role::Role;
use crate::schema::Schema;
use crate::user::UserLookup;
use shield_rules::{Shield, ShieldOptions};
use std::fmt;

/// Construction input for [`Rbac`].
pub struct RbacArgs {
    /// Every role the system recognizes
    pub roles: Vec<Role>,

    /// Which roles may run which operations
    pub schema: Schema,

    /// Resolves the caller of an operation
    pub get_user: UserLookup,
}

/// Role-based permission compiler.
///
/// # Example
///
/// ```rust,no_run
/// use shield_rbac::{roles, FnResolver, Rbac, RbacArgs, RequestContext, Schema, User};
/// use shield_rules::{RuleError, ShieldOptions};
/// use std::sync::Arc;
///
/// async fn example() {
///     let rbac = Rbac::new(RbacArgs {
///         roles: roles(["admin", "user"]),
///         schema: Schema::new()
///             .with_roles("Query", ["admin", "user"])
///             .with_field_roles("Mutation", "deletePost", ["admin"]),
///         get_user: Arc::new(FnResolver::new(|ctx: &RequestContext| {
///             let role = ctx.attribute_str("x-role").map(str::to_string);
///             async move {
///                 role.map(User::new)
///                     .ok_or_else(|| RuleError::Resolution("anonymous".to_string()))
///             }
///         })),
///     });
///
///     let shield = rbac.shield(ShieldOptions::default()).unwrap();
///     let ctx = rbac.extend_context(RequestContext::new().with_attribute("x-role", "user"));
///
///     assert!(shield.check("Query", "posts", &ctx).await.is_allowed());
///     assert!(!shield.check("Mutation", "deletePost", &ctx).await.is_allowed());
/// }
/// ```
pub struct Rbac {
    roles: Vec<Role>,
    schema: Schema,
    get_user: UserLookup,
}

impl Rbac {
    /// Create a new RBAC instance. Performs no validation.
    pub fn new(args: RbacArgs) -> Self {
        let RbacArgs {
            roles,
            schema,
            get_user,
        } = args;
        Self {
            roles,
            schema,
            get_user,
        }
    }

    /// Create an instance from loaded configuration.
    pub fn from_config(config: RbacConfig, get_user: UserLookup) -> Self {
        Self::new(RbacArgs {
            roles: config.roles,
            schema: config.schema,
            get_user,
        })
    }

    /// Get the declared roles.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Get the permission schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Build one predicate per declared role.
    pub fn role_predicates(&self) -> RolePredicateMap {
        build_role_predicates(self.roles.iter().cloned())
    }

    /// Compile the schema into a permission tree.
    ///
    /// Every call builds a fresh tree; the tree is immutable once returned.
    ///
    /// # Errors
    ///
    /// [`RbacError::UnknownRole`](crate::RbacError::UnknownRole) when the
    /// schema names an undeclared role.
    pub fn compile_authorization_tree(&self) -> RbacResult<PermissionTree> {
        compile(&self.schema, &self.role_predicates())
    }

    /// Build the context fragment carrying the user lookup.
    pub fn build_context(&self) -> RbacContext {
        RbacContext::new(self.get_user.clone())
    }

    /// Merge the context fragment into a host-built context.
    pub fn extend_context(&self, base: RequestContext) -> RequestContext {
        base.with_rbac(self.build_context())
    }

    /// Compile the tree and install it into a shield.
    pub fn shield(
        &self,
        options: ShieldOptions<RequestContext>,
    ) -> RbacResult<Shield<RequestContext>> {
        Ok(Shield::new(self.compile_authorization_tree()?, options))
    }
}

impl fmt::Debug for Rbac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rbac")
            .field("roles", &self.roles)
            .field("schema", &self.schema)
            .field("get_user", &"<UserResolver>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RbacError;
    use crate::role::roles;
    use crate::user::{FnResolver, User};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fixed_lookup(role: &'static str) -> UserLookup {
        Arc::new(FnResolver::new(move |_: &RequestContext| async move {
            Ok(User::new(role))
        }))
    }

    fn blog_rbac(role: &'static str) -> Rbac {
        Rbac::new(RbacArgs {
            roles: roles(["admin", "user"]),
            schema: Schema::new()
                .with_roles("Query", ["admin", "user"])
                .with_field_roles("Mutation", "createPost", ["admin", "user"])
                .with_field_roles("Mutation", "deletePost", ["admin"]),
            get_user: fixed_lookup(role),
        })
    }

    #[test]
    fn test_accessors() {
        let rbac = blog_rbac("admin");
        assert_eq!(rbac.roles(), roles(["admin", "user"]).as_slice());
        assert_eq!(rbac.schema().len(), 2);
        assert_eq!(rbac.role_predicates().len(), 2);
    }

    #[test]
    fn test_compile_authorization_tree() {
        let rbac = blog_rbac("admin");
        let tree = rbac.compile_authorization_tree().unwrap();

        assert_eq!(tree.shape(), rbac.schema().shape());
        assert_eq!(tree.rule_count(), 3);
    }

    #[test]
    fn test_compile_rejects_undeclared_role() {
        let rbac = Rbac::new(RbacArgs {
            roles: roles(["admin"]),
            schema: Schema::new().with_roles("Query", ["admin", "user"]),
            get_user: fixed_lookup("admin"),
        });

        assert!(matches!(
            rbac.compile_authorization_tree(),
            Err(RbacError::UnknownRole { .. })
        ));
        assert!(rbac.shield(ShieldOptions::default()).is_err());
    }

    #[tokio::test]
    async fn test_build_context_exposes_lookup() {
        let rbac = blog_rbac("user");
        let fragment = rbac.build_context();

        let user = fragment.user.get_user(&RequestContext::new()).await;
        assert_eq!(user, Ok(User::new("user")));
    }

    #[tokio::test]
    async fn test_extend_context_keeps_host_data() {
        let rbac = blog_rbac("admin");
        let base = RequestContext::new().with_attribute("authorization", "Bearer abc");
        let request_id = base.request_id;

        let ctx = rbac.extend_context(base);
        assert_eq!(ctx.request_id, request_id);
        assert_eq!(ctx.attribute_str("authorization"), Some("Bearer abc"));
        assert_eq!(ctx.resolve_user().await, Ok(User::new("admin")));
    }

    #[tokio::test]
    async fn test_lookup_only_runs_during_evaluation() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let rbac = Rbac::new(RbacArgs {
            roles: roles(["admin"]),
            schema: Schema::new().with_roles("Query", ["admin"]),
            get_user: Arc::new(FnResolver::new(move |_: &RequestContext| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(User::new("admin")) }
            })),
        });

        let shield = rbac.shield(ShieldOptions::default()).unwrap();
        let ctx = rbac.extend_context(RequestContext::new());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(shield.check("Query", "posts", &ctx).await.is_allowed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_hides_lookup() {
        let debug = format!("{:?}", blog_rbac("admin"));
        assert!(debug.contains("<UserResolver>"));
        assert!(debug.contains("admin"));
    }
}
