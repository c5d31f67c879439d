//! Authorization checks
//!
//! Checks resolve the live subject and object to their keys, scan the rules
//! in insertion order and stop at the first rule for the same subject and
//! object type that grants either `Manage` or the requested action:
//!
//! - `Manage` allows immediately, without looking at the condition
//! - an exact action match returns the result of its condition
//!
//! Later rules are never consulted once one of these is found.

use std::any::Any;
use std::sync::Arc;

use super::action::Action;
use super::condition::Condition;
use super::permission::Permission;
use super::set::PermissionSet;
use crate::resolve::{resolve_identity, resolve_type, Resource, Subject};

/// Outcome of a permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// The set has no rules at all
    NoRules,
    /// No rule matched subject, object type and action
    NoMatchingRule,
    /// Allowed by a `Manage` rule at this index
    Managed { rule: usize },
    /// Allowed by the rule at this index, whose condition held
    Granted { rule: usize },
    /// The rule at this index matched but its condition did not hold
    ConditionFailed { rule: usize },
}

impl CheckResult {
    /// Whether the action is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, CheckResult::Managed { .. } | CheckResult::Granted { .. })
    }

    /// Index of the rule that decided the check, if any
    pub fn rule(&self) -> Option<usize> {
        match self {
            CheckResult::Managed { rule }
            | CheckResult::Granted { rule }
            | CheckResult::ConditionFailed { rule } => Some(*rule),
            CheckResult::NoRules | CheckResult::NoMatchingRule => None,
        }
    }
}

impl PermissionSet {
    /// Check whether `subject` can perform `action` on `object`, and why
    pub fn check<S, O>(&self, subject: &S, object: &O, action: Action) -> CheckResult
    where
        S: Subject + Any,
        O: Resource + Any,
    {
        self.decide(subject, object, action, |condition| {
            condition.evaluate(subject, object)
        })
    }

    /// Check whether `subject` can perform `action` on `object`
    pub fn can<S, O>(&self, subject: &S, object: &O, action: Action) -> bool
    where
        S: Subject + Any,
        O: Resource + Any,
    {
        self.check(subject, object, action).is_allowed()
    }

    /// The inverse of [`can`](PermissionSet::can)
    pub fn cannot<S, O>(&self, subject: &S, object: &O, action: Action) -> bool
    where
        S: Subject + Any,
        O: Resource + Any,
    {
        !self.can(subject, object, action)
    }

    /// Check borrowed, non-`'static` values such as `PostView<'a>`
    ///
    /// Conditions cannot inspect values that are not `'static`, so a matching
    /// conditional rule denies. `Manage` and unconditional rules behave as in
    /// [`check`](PermissionSet::check).
    pub fn check_borrowed<S, O>(&self, subject: &S, object: &O, action: Action) -> CheckResult
    where
        S: Subject + ?Sized,
        O: Resource + ?Sized,
    {
        self.decide(subject, object, action, |condition| {
            if !condition.is_unconditional() {
                tracing::warn!("Conditional rule cannot inspect borrowed values; denying");
            }
            condition.is_unconditional()
        })
    }

    /// Borrowed variant of [`can`](PermissionSet::can)
    pub fn can_borrowed<S, O>(&self, subject: &S, object: &O, action: Action) -> bool
    where
        S: Subject + ?Sized,
        O: Resource + ?Sized,
    {
        self.check_borrowed(subject, object, action).is_allowed()
    }

    /// Borrowed variant of [`cannot`](PermissionSet::cannot)
    pub fn cannot_borrowed<S, O>(&self, subject: &S, object: &O, action: Action) -> bool
    where
        S: Subject + ?Sized,
        O: Resource + ?Sized,
    {
        !self.can_borrowed(subject, object, action)
    }

    fn decide<S, O, E>(&self, subject: &S, object: &O, action: Action, evaluate: E) -> CheckResult
    where
        S: Subject + ?Sized,
        O: Resource + ?Sized,
        E: FnOnce(&dyn Condition) -> bool,
    {
        let subject_key = resolve_identity(subject);
        let object_type = resolve_type(object);

        // Pick the deciding rule under the read lock, evaluate after release
        let found: Option<(usize, Arc<Permission>)> = {
            let rules = self.read();
            if rules.is_empty() {
                tracing::debug!("Denied {} {} for {}: no rules", action, object_type, subject_key);
                return CheckResult::NoRules;
            }

            rules
                .iter()
                .enumerate()
                .find(|(_, rule)| rule.matches(&subject_key, &object_type) && rule.covers(action))
                .map(|(index, rule)| (index, rule.clone()))
        };

        let result = match found {
            None => CheckResult::NoMatchingRule,
            Some((rule, permission)) if permission.action() == Action::Manage => {
                CheckResult::Managed { rule }
            }
            Some((rule, permission)) => {
                if evaluate(&**permission.condition()) {
                    CheckResult::Granted { rule }
                } else {
                    CheckResult::ConditionFailed { rule }
                }
            }
        };

        tracing::debug!(
            "{} {} {} for {}: {:?}",
            if result.is_allowed() { "Allowed" } else { "Denied" },
            action,
            object_type,
            subject_key,
            result
        );

        result
    }
}
