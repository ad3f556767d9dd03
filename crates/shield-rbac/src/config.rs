//! RBAC configuration loading.
//!
//! Roles and schema are usually kept in a JSON document next to the
//! service:
//!
//! ```json
//! {
//!   "roles": ["admin", "user"],
//!   "schema": {
//!     "Query": ["admin", "user"],
//!     "Mutation": { "deletePost": ["admin"] }
//!   }
//! }
//! ```

use crate::compiler::compile;
use crate::error::{RbacError, RbacResult};
use crate::factory::build_role_predicates;
use crate::role::Role;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "RBAC_CONFIG_PATH";

/// Declared roles and permission schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Every role the system recognizes.
    pub roles: Vec<Role>,

    /// Which roles may run which operations.
    #[serde(default)]
    pub schema: Schema,
}

impl RbacConfig {
    /// Parse configuration from a JSON document.
    pub fn from_json_str(json: &str) -> RbacResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> RbacResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;

        tracing::debug!(
            path = %path.display(),
            roles = config.roles.len(),
            operations = config.schema.len(),
            "RBAC configuration loaded"
        );

        Ok(config)
    }

    /// Load configuration from the file named by environment variables.
    ///
    /// Environment variables:
    /// - `RBAC_CONFIG_PATH`: Path to the JSON configuration file (required)
    pub fn from_env() -> RbacResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_err(|_| RbacError::MissingEnvVar(CONFIG_PATH_ENV.to_string()))?;
        Self::from_file(path)
    }

    /// Validate the configuration.
    ///
    /// Fails when no role is declared while the schema grants some, or when
    /// the schema names an undeclared role.
    pub fn validate(&self) -> RbacResult<()> {
        if self.roles.is_empty() && !self.schema.referenced_roles().is_empty() {
            return Err(RbacError::Config("no roles declared".to_string()));
        }

        compile(&self.schema, &build_role_predicates(self.roles.iter().cloned()))?;
        Ok(())
    }
}
