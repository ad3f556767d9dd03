//! Shield implementation
//!
//! The shield holds a rule tree and answers one question per resolved
//! field: may this operation proceed? Every failure to reach a decision is
//! reported as a deny.

use crate::error::RuleError;
use crate::logic::allow;
use crate::rule::SharedRule;
use crate::tree::RuleTree;
use std::fmt;
use std::time::Duration;

/// Shield configuration.
pub struct ShieldOptions<C> {
    /// Rule applied to coordinates the tree does not cover.
    ///
    /// Defaults to `allow`, so only the operations named in the tree are
    /// guarded.
    pub fallback_rule: SharedRule<C>,

    /// Upper bound on a single rule evaluation. `None` waits indefinitely.
    pub evaluation_timeout: Option<Duration>,
}

impl<C> ShieldOptions<C>
where
    C: Send + Sync + 'static,
{
    /// Options that deny every coordinate the tree does not cover.
    pub fn strict() -> Self {
        Self {
            fallback_rule: crate::logic::deny(),
            evaluation_timeout: None,
        }
    }

    /// Set the fallback rule.
    pub fn with_fallback(mut self, rule: SharedRule<C>) -> Self {
        self.fallback_rule = rule;
        self
    }

    /// Set the evaluation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.evaluation_timeout = Some(timeout);
        self
    }
}

impl<C> Default for ShieldOptions<C>
where
    C: Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            fallback_rule: allow(),
            evaluation_timeout: None,
        }
    }
}

impl<C> fmt::Debug for ShieldOptions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShieldOptions")
            .field("fallback_rule", &self.fallback_rule.name())
            .field("evaluation_timeout", &self.evaluation_timeout)
            .finish()
    }
}

/// Why an operation was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The rule evaluated to `false`.
    NotAuthorised {
        /// Name of the deciding rule
        rule: String,
    },

    /// The rule could not reach a decision.
    Error {
        /// Name of the failing rule
        rule: String,
        /// The evaluation failure
        error: RuleError,
    },
}

/// Outcome of a shield check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed.
    Allow,
    /// The operation must not proceed.
    Deny(DenyReason),
}

impl Decision {
    /// Check if the operation may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Get the deny reason, if denied.
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }
}

/// Evaluates a rule tree against incoming operations.
///
/// # Example
///
/// ```rust,no_run
/// use shield_rules::{deny, RuleTree, Shield, ShieldOptions};
///
/// async fn example() {
///     let mut tree = RuleTree::<()>::new();
///     tree.insert_field("Mutation", "deletePost", deny());
///     let shield = Shield::new(tree, ShieldOptions::default());
///
///     assert!(!shield.check("Mutation", "deletePost", &()).await.is_allowed());
///     assert!(shield.check("Query", "posts", &()).await.is_allowed());
/// }
/// ```
pub struct Shield<C> {
    tree: RuleTree<C>,
    options: ShieldOptions<C>,
}

impl<C> Shield<C>
where
    C: Send + Sync + 'static,
{
    /// Create a shield over a rule tree.
    pub fn new(tree: RuleTree<C>, options: ShieldOptions<C>) -> Self {
        tracing::debug!(
            types = tree.len(),
            rules = tree.rule_count(),
            timeout_ms = options.evaluation_timeout.map(|t| t.as_millis() as u64),
            "Shield installed"
        );
        Self { tree, options }
    }

    /// Get the installed rule tree.
    pub fn tree(&self) -> &RuleTree<C> {
        &self.tree
    }

    /// Get the shield options.
    pub fn options(&self) -> &ShieldOptions<C> {
        &self.options
    }

    /// Decide whether `type_name.field_name` may be resolved for `ctx`.
    pub async fn check(&self, type_name: &str, field_name: &str, ctx: &C) -> Decision {
        let rule = self
            .tree
            .rule_for(type_name, field_name)
            .unwrap_or(&self.options.fallback_rule);

        let outcome = match self.options.evaluation_timeout {
            Some(limit) => tokio::time::timeout(limit, rule.evaluate(ctx))
                .await
                .unwrap_or(Err(RuleError::Timeout)),
            None => rule.evaluate(ctx).await,
        };

        match outcome {
            Ok(true) => Decision::Allow,
            Ok(false) => Decision::Deny(DenyReason::NotAuthorised { rule: rule.name() }),
            Err(error) => {
                tracing::warn!(
                    type_name = type_name,
                    field_name = field_name,
                    rule = %rule.name(),
                    error = %error,
                    "Rule evaluation failed, denying"
                );
                Decision::Deny(DenyReason::Error {
                    rule: rule.name(),
                    error,
                })
            }
        }
    }
}

impl<C> fmt::Debug for Shield<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shield")
            .field("tree", &self.tree)
            .field("options", &self.options)
            .finish()
    }
}
