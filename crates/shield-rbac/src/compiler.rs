//! # Schema Compiler
//!
//! Turns a [`Schema`] into a [`PermissionTree`] of the same shape. Every
//! leaf role list becomes one `or` over the predicates of its roles:
//!
//! ```text
//! "Query":    ["admin", "user"]        ─→ or(role:admin, role:user)
//! "Mutation": { "deletePost": [] }     ─→ { "deletePost": or() }   (deny)
//! ```
//!
//! Role names are resolved against the predicate map while compiling, so an
//! undeclared role stops the compilation instead of surfacing during a
//! request.

use crate::context::RequestContext;
use crate::error::{RbacError, RbacResult};
use crate::factory::RolePredicateMap;
use crate::role::Role;
use crate::schema::{Permissions, Schema};
use shield_rules::{or, RuleNode, RuleTree, SharedRule};
use std::collections::BTreeMap;

/// Compiled permission tree.
pub type PermissionTree = RuleTree<RequestContext>;

/// Compile `schema` against the role predicates.
///
/// Operations and fields are visited in sorted order, so the first
/// undeclared role reported is stable across runs.
///
/// # Errors
///
/// [`RbacError::UnknownRole`] when the schema names a role missing from
/// `predicates`.
///
/// # Example
///
/// ```
/// use shield_rbac::{build_role_predicates, compile, Schema};
///
/// let schema = Schema::new()
///     .with_roles("Query", ["admin", "user"])
///     .with_field_roles("Mutation", "deletePost", ["admin"]);
/// let tree = compile(&schema, &build_role_predicates(["admin", "user"])).unwrap();
///
/// assert_eq!(tree.shape(), schema.shape());
/// assert_eq!(
///     tree.rule_for("Query", "posts").map(|r| r.name()),
///     Some("or(role:admin, role:user)".to_string())
/// );
/// ```
pub fn compile(schema: &Schema, predicates: &RolePredicateMap) -> RbacResult<PermissionTree> {
    let mut tree = PermissionTree::new();

    for (operation, permissions) in schema.iter() {
        let node = match permissions {
            Permissions::FlatRoles(roles) => {
                RuleNode::Type(combine(roles, predicates, operation, None)?)
            }
            Permissions::FieldRoles(fields) => {
                let mut rules = BTreeMap::new();
                for (field, roles) in fields {
                    let rule = combine(roles, predicates, operation, Some(field))?;
                    rules.insert(field.clone(), rule);
                }
                RuleNode::Fields(rules)
            }
        };
        tree.insert_node(operation.clone(), node);
    }

    tracing::info!(
        operations = tree.len(),
        rules = tree.rule_count(),
        "Permission tree compiled"
    );

    Ok(tree)
}

/// OR together the predicates of `roles`.
fn combine(
    roles: &[Role],
    predicates: &RolePredicateMap,
    operation: &str,
    field: Option<&String>,
) -> RbacResult<SharedRule<RequestContext>> {
    let rules = roles
        .iter()
        .map(|role| {
            predicates
                .get(role)
                .map(|predicate| predicate.clone() as SharedRule<RequestContext>)
                .ok_or_else(|| RbacError::UnknownRole {
                    operation: operation.to_string(),
                    field: field.cloned(),
                    role: role.to_string(),
                })
        })
        .collect::<RbacResult<Vec<_>>>()?;

    if rules.is_empty() {
        tracing::debug!(
            operation = operation,
            field = field.map(String::as_str),
            "Empty role list compiled to deny"
        );
    }

    Ok(or(rules))
}
