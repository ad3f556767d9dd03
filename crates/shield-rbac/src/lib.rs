//! # Shield RBAC (Role-Based Access Control)
//!
//! This crate compiles a declarative role schema into a permission tree for
//! the shield evaluator in `shield-rules`.
//!
//! ## Overview
//!
//! The shield-rbac crate handles:
//! - **Roles**: Opaque, case-sensitive role names
//! - **Schema**: Operation type (optionally field) to permitted roles
//! - **Predicates**: One "caller has role X" rule per declared role
//! - **Compilation**: Schema to isomorphic tree of OR-combined predicates
//! - **Context**: The user lookup carried into every request
//!
//! ## Architecture
//!
//! ```text
//! roles ──→ build_role_predicates ──┐
//!                                   ├──→ compile ──→ PermissionTree ──→ Shield
//! schema ───────────────────────────┘
//!
//! get_user ──→ build_context ──→ RbacContext ──→ RequestContext.rbac
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shield_rbac::{roles, FnResolver, Rbac, RbacArgs, RequestContext, Schema, User};
//! use shield_rules::{RuleError, ShieldOptions};
//! use std::sync::Arc;
//!
//! async fn example() {
//!     let rbac = Rbac::new(RbacArgs {
//!         roles: roles(["admin", "user"]),
//!         schema: Schema::new()
//!             .with_roles("Query", ["admin", "user"])
//!             .with_field_roles("Mutation", "createPost", ["admin", "user"])
//!             .with_field_roles("Mutation", "deletePost", ["admin"]),
//!         get_user: Arc::new(FnResolver::new(|ctx: &RequestContext| {
//!             let role = ctx.attribute_str("x-role").map(str::to_string);
//!             async move {
//!                 role.map(User::new)
//!                     .ok_or_else(|| RuleError::Resolution("anonymous".to_string()))
//!             }
//!         })),
//!     });
//!
//!     // Once, at startup
//!     let shield = rbac.shield(ShieldOptions::default()).unwrap();
//!
//!     // Per request
//!     let ctx = rbac.extend_context(RequestContext::new().with_attribute("x-role", "user"));
//!     assert!(shield.check("Mutation", "createPost", &ctx).await.is_allowed());
//!     assert!(!shield.check("Mutation", "deletePost", &ctx).await.is_allowed());
//! }
//! ```
//!
//! ## Role Semantics
//!
//! - A leaf grants access if the caller's role is in its list
//! - An empty list grants nobody
//! - There is no hierarchy: `admin` does not imply `user`
//! - Schema references to undeclared roles fail compilation

pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod rbac;
pub mod role;
pub mod schema;
pub mod user;

// Re-export main types for convenience
pub use compiler::{compile, PermissionTree};
pub use config::{RbacConfig, CONFIG_PATH_ENV};
pub use context::{CancellationSignal, RbacContext, RequestContext, USER_CONTEXT_KEY};
pub use error::{RbacError, RbacResult};
pub use factory::{build_role_predicates, RolePredicate, RolePredicateMap};
pub use rbac::{Rbac, RbacArgs};
pub use role::{roles, Role};
pub use schema::{Permissions, Schema};
pub use user::{FnResolver, User, UserLookup, UserResolver};
