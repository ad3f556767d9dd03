//! # Permission Schema
//!
//! The declarative input of the compiler: which roles may run which
//! operations.
//!
//! ```text
//! Schema
//!   ├─ "Query"    ─→ FlatRoles(["admin", "user"])           (whole type)
//!   └─ "Mutation" ─→ FieldRoles
//!                      ├─ "createPost" ─→ ["admin", "user"]
//!                      └─ "deletePost" ─→ ["admin"]
//! ```
//!
//! The JSON form is the one operators write by hand:
//!
//! ```json
//! {
//!   "Query": ["admin", "user"],
//!   "Mutation": { "createPost": ["admin", "user"], "deletePost": ["admin"] }
//! }
//! ```

use crate::role::Role;
use serde::{Deserialize, Serialize};
use shield_rules::NodeShape;
use std::collections::{BTreeMap, BTreeSet};

/// Roles granted on one operation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Permissions {
    /// Roles allowed on every field of the type.
    FlatRoles(Vec<Role>),
    /// Roles allowed per field.
    FieldRoles(BTreeMap<String, Vec<Role>>),
}

impl Permissions {
    /// Iterate over every role referenced by these permissions.
    pub fn roles(&self) -> Box<dyn Iterator<Item = &Role> + '_> {
        match self {
            Permissions::FlatRoles(roles) => Box::new(roles.iter()),
            Permissions::FieldRoles(fields) => Box::new(fields.values().flatten()),
        }
    }

    /// Key structure of these permissions.
    pub fn shape(&self) -> NodeShape {
        match self {
            Permissions::FlatRoles(_) => NodeShape::Type,
            Permissions::FieldRoles(fields) => NodeShape::Fields(fields.keys().cloned().collect()),
        }
    }
}

/// Operation type name to permissions.
///
/// # Example
///
/// ```
/// use shield_rbac::{Permissions, Schema};
///
/// let schema = Schema::new()
///     .with_roles("Query", ["admin", "user"])
///     .with_field_roles("Mutation", "deletePost", ["admin"]);
///
/// assert_eq!(schema.len(), 2);
/// assert!(matches!(schema.get("Mutation"), Some(Permissions::FieldRoles(_))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    operations: BTreeMap<String, Permissions>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self {
            operations: BTreeMap::new(),
        }
    }

    /// Grant `roles` on every field of `operation`.
    ///
    /// Replaces any permissions previously set for the operation.
    pub fn with_roles<I>(mut self, operation: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Role>,
    {
        self.insert(
            operation,
            Permissions::FlatRoles(roles.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Grant `roles` on a single field of `operation`.
    ///
    /// Type-level permissions previously set for the operation are replaced
    /// by a field map.
    pub fn with_field_roles<I>(
        mut self,
        operation: impl Into<String>,
        field: impl Into<String>,
        roles: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Role>,
    {
        let entry = self
            .operations
            .entry(operation.into())
            .or_insert_with(|| Permissions::FieldRoles(BTreeMap::new()));

        if let Permissions::FlatRoles(_) = entry {
            *entry = Permissions::FieldRoles(BTreeMap::new());
        }
        if let Permissions::FieldRoles(fields) = entry {
            fields.insert(field.into(), roles.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Set the permissions of an operation type.
    pub fn insert(&mut self, operation: impl Into<String>, permissions: Permissions) {
        self.operations.insert(operation.into(), permissions);
    }

    /// Get the permissions of an operation type.
    pub fn get(&self, operation: &str) -> Option<&Permissions> {
        self.operations.get(operation)
    }

    /// Iterate over operation types in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Permissions)> {
        self.operations.iter()
    }

    /// Every distinct role referenced anywhere in the schema.
    pub fn referenced_roles(&self) -> BTreeSet<&Role> {
        self.operations.values().flat_map(Permissions::roles).collect()
    }

    /// Key structure of the schema.
    pub fn shape(&self) -> BTreeMap<String, NodeShape> {
        self.operations
            .iter()
            .map(|(name, permissions)| (name.clone(), permissions.shape()))
            .collect()
    }

    /// Number of operation types.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl FromIterator<(String, Permissions)> for Schema {
    fn from_iter<T: IntoIterator<Item = (String, Permissions)>>(iter: T) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_and_field_roles() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "Query": ["admin", "user"],
                "Mutation": { "createPost": ["admin", "user"], "deletePost": ["admin"] }
            }"#,
        )
        .unwrap();

        assert_eq!(
            schema.get("Query"),
            Some(&Permissions::FlatRoles(vec![Role::new("admin"), Role::new("user")]))
        );
        match schema.get("Mutation") {
            Some(Permissions::FieldRoles(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields["deletePost"], vec![Role::new("admin")]);
            }
            other => panic!("expected field roles, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_role_list() {
        let schema: Schema = serde_json::from_str(r#"{ "Query": [] }"#).unwrap();
        assert_eq!(schema.get("Query"), Some(&Permissions::FlatRoles(vec![])));
    }

    #[test]
    fn test_parse_rejects_deeper_nesting() {
        let result = serde_json::from_str::<Schema>(r#"{ "Query": { "posts": { "x": ["admin"] } } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_replaces_flat_with_fields() {
        let schema = Schema::new()
            .with_roles("Mutation", ["admin"])
            .with_field_roles("Mutation", "createPost", ["user"]);

        assert_eq!(
            schema.shape().get("Mutation"),
            Some(&NodeShape::Fields(vec!["createPost".to_string()]))
        );
    }

    #[test]
    fn test_referenced_roles() {
        let schema = Schema::new()
            .with_roles("Query", ["admin", "user"])
            .with_field_roles("Mutation", "createPost", ["user", "editor"]);

        let referenced: Vec<&str> = schema
            .referenced_roles()
            .into_iter()
            .map(Role::as_str)
            .collect();
        assert_eq!(referenced, vec!["admin", "editor", "user"]);
    }

    #[test]
    fn test_round_trip_keeps_json_shape() {
        let schema = Schema::new().with_field_roles("Mutation", "deletePost", ["admin"]);
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json, serde_json::json!({ "Mutation": { "deletePost": ["admin"] } }));
    }
}
