//! # Logic Rules
//!
//! Combinators that build one rule out of many.
//!
//! | Combinator | Result | Short-circuit | Empty |
//! |------------|--------|---------------|-------|
//! | `or`  | any child true  | first `true`            | `false` |
//! | `and` | all children true | first `false` or failure | `true` |
//! | `not` | inverted child  | -                       | -       |
//!
//! Children are evaluated sequentially in declaration order.

use crate::error::{RuleError, RuleResult};
use crate::rule::{Rule, SharedRule};
use async_trait::async_trait;
use std::sync::Arc;

/// Logical OR over child rules.
///
/// A failing child does not stop the evaluation: a later child may still
/// grant access. When no child grants access, the first failure is returned
/// so the caller never mistakes an undecided evaluation for a plain deny.
pub struct RuleOr<C> {
    rules: Vec<SharedRule<C>>,
}

impl<C> RuleOr<C> {
    /// Create an OR over the given rules.
    pub fn new(rules: Vec<SharedRule<C>>) -> Self {
        Self { rules }
    }

    /// Number of child rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the OR has no children (always denies).
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[async_trait]
impl<C> Rule<C> for RuleOr<C>
where
    C: Send + Sync,
{
    fn name(&self) -> String {
        format!("or({})", join_names(&self.rules))
    }

    async fn evaluate(&self, ctx: &C) -> RuleResult<bool> {
        let mut failure: Option<RuleError> = None;

        for rule in &self.rules {
            match rule.evaluate(ctx).await {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(false),
        }
    }
}

/// Logical AND over child rules.
pub struct RuleAnd<C> {
    rules: Vec<SharedRule<C>>,
}

impl<C> RuleAnd<C> {
    /// Create an AND over the given rules.
    pub fn new(rules: Vec<SharedRule<C>>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl<C> Rule<C> for RuleAnd<C>
where
    C: Send + Sync,
{
    fn name(&self) -> String {
        format!("and({})", join_names(&self.rules))
    }

    async fn evaluate(&self, ctx: &C) -> RuleResult<bool> {
        for rule in &self.rules {
            if !rule.evaluate(ctx).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Logical NOT of a single rule.
pub struct RuleNot<C> {
    rule: SharedRule<C>,
}

impl<C> RuleNot<C> {
    /// Create the negation of a rule.
    pub fn new(rule: SharedRule<C>) -> Self {
        Self { rule }
    }
}

#[async_trait]
impl<C> Rule<C> for RuleNot<C>
where
    C: Send + Sync,
{
    fn name(&self) -> String {
        format!("not({})", self.rule.name())
    }

    async fn evaluate(&self, ctx: &C) -> RuleResult<bool> {
        Ok(!self.rule.evaluate(ctx).await?)
    }
}

/// Rule that always grants access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allow;

#[async_trait]
impl<C> Rule<C> for Allow
where
    C: Send + Sync,
{
    fn name(&self) -> String {
        "allow".to_string()
    }

    async fn evaluate(&self, _ctx: &C) -> RuleResult<bool> {
        Ok(true)
    }
}

/// Rule that always denies access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deny;

#[async_trait]
impl<C> Rule<C> for Deny
where
    C: Send + Sync,
{
    fn name(&self) -> String {
        "deny".to_string()
    }

    async fn evaluate(&self, _ctx: &C) -> RuleResult<bool> {
        Ok(false)
    }
}

/// Combine rules with logical OR.
///
/// # Example
///
/// ```
/// use shield_rules::{allow, deny, or, Rule};
///
/// let rule = or::<()>(vec![deny(), allow()]);
/// assert_eq!(rule.name(), "or(deny, allow)");
/// ```
pub fn or<C>(rules: Vec<SharedRule<C>>) -> SharedRule<C>
where
    C: Send + Sync + 'static,
{
    Arc::new(RuleOr::new(rules))
}

/// Combine rules with logical AND.
pub fn and<C>(rules: Vec<SharedRule<C>>) -> SharedRule<C>
where
    C: Send + Sync + 'static,
{
    Arc::new(RuleAnd::new(rules))
}

/// Negate a rule.
pub fn not<C>(rule: SharedRule<C>) -> SharedRule<C>
where
    C: Send + Sync + 'static,
{
    Arc::new(RuleNot::new(rule))
}

/// Rule that grants every caller.
pub fn allow<C>() -> SharedRule<C>
where
    C: Send + Sync + 'static,
{
    Arc::new(Allow)
}

/// Rule that denies every caller.
pub fn deny<C>() -> SharedRule<C>
where
    C: Send + Sync + 'static,
{
    Arc::new(Deny)
}

fn join_names<C>(rules: &[SharedRule<C>]) -> String {
    rules
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(", ")
}
