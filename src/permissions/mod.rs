//! Permission rules and checks
//!
//! A rule says "subject may perform action on objects of a type", optionally
//! gated by a condition on the concrete subject and object:
//!
//! - `Create`, `Read`, `Update`, `Delete`: the action itself
//! - `Manage`: every action, and the condition is never consulted
//!
//! Rules live in a [`PermissionSet`] and are scanned in insertion order. The
//! first rule for the same subject and object type that grants `Manage` or
//! the requested action decides the check. An empty set denies everything.
//!
//! ## Example
//!
//! ```rust,ignore
//! use corral::permissions::{Action, PermissionSet};
//! use std::sync::Arc;
//!
//! let permissions = Arc::new(PermissionSet::new());
//! permissions.authorize("admin", "post", Action::Manage);
//! permissions.conditional_authorize("user", "post", Action::Read, |_: &Role, post: &Post| {
//!     !post.hidden
//! });
//!
//! assert!(permissions.can(&admin_role, &post, Action::Delete));
//! assert!(permissions.cannot(&user_role, &hidden_post, Action::Read));
//! ```

mod action;
mod condition;
mod evaluator;
mod permission;
mod set;

pub use action::Action;
pub use condition::{Always, ArcCondition, Condition, Typed};
pub use evaluator::CheckResult;
pub use permission::{Permission, RuleSummary};
pub use set::PermissionSet;
