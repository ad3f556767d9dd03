//! Rule trait and closure-backed rules
//!
//! A rule is an asynchronous predicate over an execution context. Rules are
//! stored behind `Arc` so one rule value can be shared by every node of a
//! permission tree that references it.

use crate::error::RuleResult;
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Trait for rule implementations.
///
/// `C` is the execution context the host builds for each incoming
/// operation. Rules receive it explicitly and never capture it.
#[async_trait]
pub trait Rule<C>: Send + Sync {
    /// Human-readable rule name, used in logs and deny reasons.
    fn name(&self) -> String;

    /// Decide whether the operation may proceed.
    ///
    /// `Ok(false)` is a deny. `Err(_)` means no decision could be reached;
    /// combinators propagate it and the shield treats it as a deny.
    async fn evaluate(&self, ctx: &C) -> RuleResult<bool>;
}

/// Shared, type-erased rule.
pub type SharedRule<C> = Arc<dyn Rule<C>>;

/// Function-based rule implementation.
///
/// Wraps a synchronous check over the context. Rules that need to suspend
/// (remote lookups) implement [`Rule`] directly.
///
/// # Example
///
/// ```
/// use shield_rules::{FunctionRule, Rule};
///
/// let rule = FunctionRule::new("is_even", |n: &u32| Ok(n % 2 == 0));
/// assert_eq!(rule.name(), "is_even");
/// ```
pub struct FunctionRule<C, F> {
    name: String,
    handler: F,
    _context: PhantomData<fn(&C)>,
}

impl<C, F> FunctionRule<C, F>
where
    F: Fn(&C) -> RuleResult<bool> + Send + Sync,
{
    /// Create a new function-based rule.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
            _context: PhantomData,
        }
    }
}

impl<C, F> fmt::Debug for FunctionRule<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRule").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<C, F> Rule<C> for FunctionRule<C, F>
where
    C: Send + Sync,
    F: Fn(&C) -> RuleResult<bool> + Send + Sync,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn evaluate(&self, ctx: &C) -> RuleResult<bool> {
        (self.handler)(ctx)
    }
}
