//! # Shield Rules
//!
//! This crate provides the rule algebra and the permission shield used to
//! gate GraphQL-style operations before they execute.
//!
//! ## Overview
//!
//! The shield-rules crate handles:
//! - **Rules**: Async predicates over a host-defined execution context
//! - **Logic**: `or`, `and`, `not`, `allow`, `deny` combinators
//! - **Trees**: Operation type (and optionally field) to rule mapping
//! - **Shield**: Tree evaluation with fallback rule and timeout
//!
//! ## Architecture
//!
//! ```text
//! Shield
//!   ├─ RuleTree
//!   │    ├─ "Query"    ─→ or(role:admin, role:user)
//!   │    └─ "Mutation" ─→ { "deletePost" ─→ or(role:admin) }
//!   └─ ShieldOptions (fallback rule, timeout)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shield_rules::{or, FunctionRule, RuleTree, SharedRule, Shield, ShieldOptions};
//! use std::sync::Arc;
//!
//! struct Request {
//!     role: String,
//! }
//!
//! fn role(name: &'static str) -> SharedRule<Request> {
//!     Arc::new(FunctionRule::new(format!("role:{}", name), move |req: &Request| {
//!         Ok(req.role == name)
//!     }))
//! }
//!
//! async fn example() {
//!     let mut tree = RuleTree::new();
//!     tree.insert_type("Query", or(vec![role("admin"), role("user")]));
//!     tree.insert_field("Mutation", "deletePost", or(vec![role("admin")]));
//!
//!     let shield = Shield::new(tree, ShieldOptions::default());
//!     let request = Request { role: "user".to_string() };
//!
//!     assert!(shield.check("Query", "posts", &request).await.is_allowed());
//!     assert!(!shield.check("Mutation", "deletePost", &request).await.is_allowed());
//! }
//! ```
//!
//! ## Failure Semantics
//!
//! A rule that cannot decide returns an error instead of `false`.
//! Combinators propagate errors, and the shield turns every error into a
//! deny. A failed rule never grants access.

pub mod error;
pub mod logic;
pub mod rule;
pub mod shield;
pub mod tree;

// Re-export main types for convenience
pub use error::{RuleError, RuleResult};
pub use logic::{allow, and, deny, not, or, Allow, Deny, RuleAnd, RuleNot, RuleOr};
pub use rule::{FunctionRule, Rule, SharedRule};
pub use shield::{Decision, DenyReason, Shield, ShieldOptions};
pub use tree::{NodeShape, RuleNode, RuleTree};
