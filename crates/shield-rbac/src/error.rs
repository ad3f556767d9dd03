//! Error types for RBAC configuration and compilation
//!
//! All of these are construction-time errors. Failures while a compiled
//! tree is evaluated are reported as [`shield_rules::RuleError`].

use thiserror::Error;

/// RBAC error types.
#[derive(Debug, Error)]
pub enum RbacError {
    /// The schema references a role that was never declared
    #[error(
        "Unknown role '{role}' referenced by {operation}{}",
        .field.as_ref().map(|f| format!(".{}", f)).unwrap_or_default()
    )]
    UnknownRole {
        /// Operation type holding the reference
        operation: String,
        /// Field holding the reference, for field-level permissions
        field: Option<String>,
        /// The undeclared role name
        role: String,
    },

    /// Missing required environment variable
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for RBAC operations.
pub type RbacResult<T> = Result<T, RbacError>;

impl RbacError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RbacError::UnknownRole { .. } => "UNKNOWN_ROLE",
            RbacError::MissingEnvVar(_) => "MISSING_ENV_VAR",
            RbacError::Config(_) => "CONFIG_ERROR",
            RbacError::Io(_) => "IO_ERROR",
            RbacError::Json(_) => "INVALID_JSON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_message_names_operation() {
        let err = RbacError::UnknownRole {
            operation: "Query".to_string(),
            field: None,
            role: "editor".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown role 'editor' referenced by Query");
        assert_eq!(err.error_code(), "UNKNOWN_ROLE");
    }

    #[test]
    fn test_unknown_role_message_names_field() {
        let err = RbacError::UnknownRole {
            operation: "Mutation".to_string(),
            field: Some("deletePost".to_string()),
            role: "moderator".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown role 'moderator' referenced by Mutation.deletePost"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RbacError = parse_err.into();
        assert_eq!(err.error_code(), "INVALID_JSON");
    }
}
