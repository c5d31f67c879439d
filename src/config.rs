//! Policy configuration
//!
//! Unconditional grants can be declared in JSON and loaded into a
//! [`PermissionSet`]. Conditions are code and can only be registered through
//! the API.
//!
//! ```json
//! {
//!   "grants": [
//!     { "subject": "admin", "object_type": "post", "action": "manage" },
//!     { "subject": 2, "object_type": "post", "action": "read" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{CorralError, CorralResult};
use crate::permissions::{Action, PermissionSet};
use crate::resolve::SubjectKey;

/// A single unconditional grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConfig {
    /// Subject key (JSON string for names, integer for ids)
    pub subject: SubjectKey,

    /// Object type name the grant applies to
    pub object_type: String,

    /// Granted action
    pub action: Action,
}

impl GrantConfig {
    /// Create a new grant
    pub fn new(
        subject: impl Into<SubjectKey>,
        object_type: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            subject: subject.into(),
            object_type: object_type.into(),
            action,
        }
    }
}

/// Declarative permission policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Grants, registered in order
    #[serde(default)]
    pub grants: Vec<GrantConfig>,
}

impl PolicyConfig {
    /// Create an empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grant
    pub fn with_grant(mut self, grant: GrantConfig) -> Self {
        self.grants.push(grant);
        self
    }

    /// Parse and validate a policy from JSON
    pub fn from_json(json: &str) -> CorralResult<Self> {
        let config: PolicyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a policy file
    pub fn from_file(path: impl AsRef<Path>) -> CorralResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading policy from {:?}", path);
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject grants with an empty object type or subject name
    pub fn validate(&self) -> CorralResult<()> {
        for (index, grant) in self.grants.iter().enumerate() {
            if grant.object_type.trim().is_empty() {
                return Err(CorralError::invalid_config(format!(
                    "grant {} has an empty object_type",
                    index
                )));
            }
            if matches!(&grant.subject, SubjectKey::Name(name) if name.trim().is_empty()) {
                return Err(CorralError::invalid_config(format!(
                    "grant {} has an empty subject",
                    index
                )));
            }
        }
        Ok(())
    }

    /// Register every grant on `set`, returning how many were added
    pub fn apply(&self, set: &PermissionSet) -> usize {
        for grant in &self.grants {
            set.authorize(grant.subject.clone(), grant.object_type.clone(), grant.action);
        }
        tracing::info!("Applied {} policy grants", self.grants.len());
        self.grants.len()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> CorralResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
