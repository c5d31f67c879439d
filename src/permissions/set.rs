//! The permission registry
//!
//! An ordered, append-only list of rules behind an `RwLock`. Many evaluators
//! can read concurrently; registration and reset take the write lock.

use std::any::Any;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::action::Action;
use super::condition::{Condition, Typed};
use super::permission::{Permission, RuleSummary};
use crate::config::PolicyConfig;
use crate::resolve::SubjectKey;

/// Ordered set of permission rules
///
/// Rules are scanned in insertion order and the first match decides, so a
/// rule registered after an equivalent one is shadowed. Use [`rules`] to
/// inspect the order.
///
/// Wrap in `Arc` to share one set between owners:
///
/// ```ignore
/// let permissions = Arc::new(PermissionSet::new());
/// permissions.authorize("admin", "post", Action::Manage);
///
/// let checker = permissions.clone();
/// assert!(checker.can(&"admin", &post, Action::Delete));
/// ```
///
/// `can` needs `'static` subjects and objects so conditions can downcast
/// them. Borrowed views go through [`can_borrowed`] instead.
///
/// [`rules`]: PermissionSet::rules
/// [`can_borrowed`]: PermissionSet::can_borrowed
#[derive(Debug, Default)]
pub struct PermissionSet {
    rules: RwLock<Vec<Arc<Permission>>>,
}

impl PermissionSet {
    /// Create an empty permission set
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Create a set with initial rules
    pub fn with_rules(rules: Vec<Permission>) -> Self {
        Self {
            rules: RwLock::new(rules.into_iter().map(Arc::new).collect()),
        }
    }

    /// Create a set from a policy configuration
    pub fn from_config(config: &PolicyConfig) -> Self {
        let set = Self::new();
        config.apply(&set);
        set
    }

    /// Remove every rule
    pub fn reset(&self) {
        let mut rules = self.write();
        tracing::info!("Resetting permission set ({} rules dropped)", rules.len());
        rules.clear();
    }

    /// Allow `subject_key` to perform `action` on any `object_type` object
    pub fn authorize(
        &self,
        subject_key: impl Into<SubjectKey>,
        object_type: impl Into<String>,
        action: Action,
    ) {
        self.add_rule(Permission::new(subject_key, object_type, action));
    }

    /// Allow `action` only when `condition` holds for the subject and object
    ///
    /// The predicate is bound to the concrete subject and object types passed
    /// to [`can`](PermissionSet::can), seen through one `Box`/`Rc`/`Arc`
    /// layer. A check with different types is denied.
    ///
    /// ```ignore
    /// permissions.conditional_authorize("user", "post", Action::Read, |_: &Role, post: &Post| {
    ///     !post.hidden
    /// });
    /// ```
    pub fn conditional_authorize<S, O, F>(
        &self,
        subject_key: impl Into<SubjectKey>,
        object_type: impl Into<String>,
        action: Action,
        condition: F,
    ) where
        S: Any,
        O: Any,
        F: Fn(&S, &O) -> bool + Send + Sync + 'static,
    {
        self.authorize_with(subject_key, object_type, action, Typed::new(condition));
    }

    /// Allow `action` gated by any [`Condition`] implementation
    pub fn authorize_with<C: Condition + 'static>(
        &self,
        subject_key: impl Into<SubjectKey>,
        object_type: impl Into<String>,
        action: Action,
        condition: C,
    ) {
        self.add_rule(Permission::with_condition(
            subject_key,
            object_type,
            action,
            condition,
        ));
    }

    /// Append a pre-built rule
    pub fn add_rule(&self, rule: Permission) {
        tracing::info!(
            "Adding permission rule: {} may {} {}{}",
            rule.subject_key(),
            rule.action(),
            rule.object_type(),
            if rule.is_conditional() { " (conditional)" } else { "" }
        );
        self.write().push(Arc::new(rule));
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if no rules are registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Describe every rule in scan order
    pub fn rules(&self) -> Vec<RuleSummary> {
        self.read()
            .iter()
            .enumerate()
            .map(|(index, rule)| RuleSummary::describe(index, rule))
            .collect()
    }

    // Writers only push or clear, so a poisoned lock still guards a valid list

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<Permission>>> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<Permission>>> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_is_empty() {
        let set = PermissionSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.rules().is_empty());
    }

    #[test]
    fn test_authorize_appends_in_order() {
        let set = PermissionSet::new();
        set.authorize("admin", "post", Action::Manage);
        set.authorize("user", "post", Action::Read);
        set.conditional_authorize("user", "comment", Action::Create, |_: &String, _: &String| true);

        let rules = set.rules();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].subject_key, SubjectKey::from("admin"));
        assert_eq!(rules[0].action, Action::Manage);
        assert_eq!(rules[1].object_type, "post");
        assert!(!rules[1].conditional);
        assert_eq!(rules[2].index, 2);
        assert!(rules[2].conditional);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let set = PermissionSet::new();
        set.authorize("user", "post", Action::Read);
        set.authorize("user", "post", Action::Read);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_reset_clears_rules() {
        let set = PermissionSet::new();
        set.authorize("admin", "post", Action::Manage);
        set.authorize(1i64, "post", Action::Create);
        assert_eq!(set.len(), 2);

        set.reset();
        assert!(set.is_empty());

        set.authorize("admin", "post", Action::Read);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_with_rules() {
        let set = PermissionSet::with_rules(vec![
            Permission::new("admin", "post", Action::Manage),
            Permission::new("user", "post", Action::Read),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[1].action, Action::Read);
    }

    #[test]
    fn test_shared_across_owners() {
        let set = Arc::new(PermissionSet::new());
        let writer = set.clone();

        writer.authorize("admin", "post", Action::Manage);

        // Visible through every handle immediately
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_concurrent_registration() {
        let set = Arc::new(PermissionSet::new());

        let handles: Vec<_> = (0..4i64)
            .map(|id| {
                let set = set.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        set.authorize(id, "post", Action::Read);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(set.len(), 100);
    }
}
