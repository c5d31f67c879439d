pub mod core;
pub mod permissions;
pub mod resolve;

// Declarative policy files
pub mod config;

// Optional subscriber setup
pub mod logging;

pub use crate::core::{CorralError, CorralResult};
pub use config::{GrantConfig, PolicyConfig};
pub use permissions::{Action, CheckResult, Condition, Permission, PermissionSet, RuleSummary};
pub use resolve::{resolve_identity, resolve_type, Resource, Structural, Subject, SubjectKey};
