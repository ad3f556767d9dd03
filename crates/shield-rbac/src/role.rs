//! # Roles
//!
//! A role is an opaque name. Two roles are equal only if their names match
//! exactly (case-sensitive); there is no hierarchy between roles.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Role identifier.
///
/// # Example
///
/// ```
/// use shield_rbac::Role;
///
/// let role = Role::new("admin");
/// assert_eq!(role.as_str(), "admin");
/// assert_ne!(role, Role::new("Admin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Create a role from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the role name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Role {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Role {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Convert a list of names into roles.
///
/// # Example
///
/// ```
/// use shield_rbac::role::roles;
///
/// let declared = roles(["admin", "user"]);
/// assert_eq!(declared.len(), 2);
/// ```
pub fn roles<I>(names: I) -> Vec<Role>
where
    I: IntoIterator,
    I::Item: Into<Role>,
{
    names.into_iter().map(Into::into).collect()
}
