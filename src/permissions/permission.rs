//! The permission rule type

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::condition::{Always, ArcCondition, Condition};
use crate::resolve::SubjectKey;

/// A single permission rule
///
/// "`subject_key` may perform `action` on objects of `object_type`, if
/// `condition` holds". Fields are fixed at construction.
#[derive(Clone)]
pub struct Permission {
    subject_key: SubjectKey,
    object_type: String,
    action: Action,
    condition: ArcCondition,
}

impl Permission {
    /// Create an unconditional rule
    pub fn new(
        subject_key: impl Into<SubjectKey>,
        object_type: impl Into<String>,
        action: Action,
    ) -> Self {
        Self::with_condition(subject_key, object_type, action, Always)
    }

    /// Create a rule gated by a condition
    pub fn with_condition<C: Condition + 'static>(
        subject_key: impl Into<SubjectKey>,
        object_type: impl Into<String>,
        action: Action,
        condition: C,
    ) -> Self {
        Self {
            subject_key: subject_key.into(),
            object_type: object_type.into(),
            action,
            condition: Arc::new(condition),
        }
    }

    /// Key of the subject this rule applies to
    pub fn subject_key(&self) -> &SubjectKey {
        &self.subject_key
    }

    /// Object type this rule applies to
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Action this rule grants
    pub fn action(&self) -> Action {
        self.action
    }

    /// The rule's condition
    pub fn condition(&self) -> &ArcCondition {
        &self.condition
    }

    /// Whether this rule has a real condition (as opposed to `Always`)
    pub fn is_conditional(&self) -> bool {
        !self.condition.is_unconditional()
    }

    /// Check if this rule applies to the given subject and object type
    pub fn matches(&self, subject_key: &SubjectKey, object_type: &str) -> bool {
        self.subject_key == *subject_key && self.object_type == object_type
    }

    /// Check if this rule grants `action`, ignoring the condition
    ///
    /// `Manage` covers every action.
    pub fn covers(&self, action: Action) -> bool {
        self.action == Action::Manage || self.action == action
    }
}

impl fmt::Debug for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permission")
            .field("subject_key", &self.subject_key)
            .field("object_type", &self.object_type)
            .field("action", &self.action)
            .field("conditional", &self.is_conditional())
            .finish()
    }
}

/// Serializable description of a registered rule
///
/// Returned by [`PermissionSet::rules`](super::PermissionSet::rules) to
/// inspect scan order, e.g. to spot rules shadowed by an earlier match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    /// Position in scan order
    pub index: usize,
    /// Subject key the rule was registered for
    pub subject_key: SubjectKey,
    /// Object type the rule was registered for
    pub object_type: String,
    /// Granted action (`Manage` covers all)
    pub action: Action,
    /// False when the rule uses the always-true condition
    pub conditional: bool,
}

impl RuleSummary {
    pub(crate) fn describe(index: usize, permission: &Permission) -> Self {
        Self {
            index,
            subject_key: permission.subject_key.clone(),
            object_type: permission.object_type.clone(),
            action: permission.action,
            conditional: permission.is_conditional(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[test]
    fn test_rule_matches() {
        let rule = Permission::new("admin", "post", Action::Read);

        assert!(rule.matches(&"admin".into(), "post"));
        assert!(!rule.matches(&"user".into(), "post"));
        assert!(!rule.matches(&"admin".into(), "comment"));
        assert!(!rule.matches(&SubjectKey::Id(0), "post"));
    }

    #[test]
    fn test_rule_covers() {
        let read = Permission::new("user", "post", Action::Read);
        assert!(read.covers(Action::Read));
        assert!(!read.covers(Action::Create));
        assert!(!read.covers(Action::Manage));

        let manage = Permission::new("admin", "post", Action::Manage);
        for action in Action::ALL {
            assert!(manage.covers(action));
        }
    }

    #[test]
    fn test_conditional_flag() {
        let plain = Permission::new(1i64, "post", Action::Create);
        assert!(!plain.is_conditional());

        let deny = |_: &dyn Any, _: &dyn Any| false;
        let gated = Permission::with_condition(1i64, "post", Action::Read, deny);
        assert!(gated.is_conditional());
    }

    #[test]
    fn test_summary() {
        let rule = Permission::new(2i64, "post", Action::Update);
        let summary = RuleSummary::describe(3, &rule);

        assert_eq!(summary.index, 3);
        assert_eq!(summary.subject_key, SubjectKey::Id(2));
        assert_eq!(summary.object_type, "post");
        assert_eq!(summary.action, Action::Update);
        assert!(!summary.conditional);
    }
}
