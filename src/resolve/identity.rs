//! Subject identity resolution
//!
//! A subject is whatever principal a rule is written for: a role, a user, a
//! profile. Rules store a [`SubjectKey`]; at check time the live subject is
//! reduced to a key with [`resolve_identity`] and compared by equality.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized identity of a subject
///
/// Keys compare by variant and value, so `Name("1")` and `Id(1)` are
/// different subjects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectKey {
    /// Numeric identifier (e.g. a role's database id)
    Id(i64),
    /// Named identifier (e.g. `"admin"`)
    Name(String),
}

impl Default for SubjectKey {
    /// The zero value, which unresolvable subjects collapse to
    fn default() -> Self {
        SubjectKey::Id(0)
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectKey::Id(id) => write!(f, "#{}", id),
            SubjectKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for SubjectKey {
    fn from(name: &str) -> Self {
        SubjectKey::Name(name.to_string())
    }
}

impl From<String> for SubjectKey {
    fn from(name: String) -> Self {
        SubjectKey::Name(name)
    }
}

impl From<i64> for SubjectKey {
    fn from(id: i64) -> Self {
        SubjectKey::Id(id)
    }
}

impl From<i32> for SubjectKey {
    fn from(id: i32) -> Self {
        SubjectKey::Id(id.into())
    }
}

impl From<u32> for SubjectKey {
    fn from(id: u32) -> Self {
        SubjectKey::Id(id.into())
    }
}

/// Capability trait for values that can act as a subject
///
/// Both accessors are optional. Implement `subject_key` when the type knows
/// its own key, or `subject_id` when it only has a numeric id. A type that
/// implements neither resolves to [`SubjectKey::default`], which only matches
/// rules registered for the zero key.
///
/// ```ignore
/// struct Role { id: i64, name: String }
///
/// impl Subject for Role {
///     fn subject_key(&self) -> Option<SubjectKey> {
///         Some(self.name.as_str().into())
///     }
/// }
/// ```
pub trait Subject {
    /// The key this subject is registered under
    fn subject_key(&self) -> Option<SubjectKey> {
        None
    }

    /// A generic numeric identifier, used when there is no explicit key
    fn subject_id(&self) -> Option<i64> {
        None
    }
}

/// Resolve a subject to the key rules are matched against
///
/// Prefers `subject_key`, then `subject_id`, then the default key. Never fails.
pub fn resolve_identity<S: Subject + ?Sized>(subject: &S) -> SubjectKey {
    if let Some(key) = subject.subject_key() {
        return key;
    }

    if let Some(id) = subject.subject_id() {
        return SubjectKey::Id(id);
    }

    SubjectKey::default()
}

// Pre-resolved keys are their own subjects.

impl Subject for SubjectKey {
    fn subject_key(&self) -> Option<SubjectKey> {
        Some(self.clone())
    }
}

impl Subject for str {
    fn subject_key(&self) -> Option<SubjectKey> {
        Some(self.into())
    }
}

impl Subject for String {
    fn subject_key(&self) -> Option<SubjectKey> {
        Some(self.as_str().into())
    }
}

impl Subject for i64 {
    fn subject_key(&self) -> Option<SubjectKey> {
        Some((*self).into())
    }
}

impl Subject for i32 {
    fn subject_key(&self) -> Option<SubjectKey> {
        Some((*self).into())
    }
}

impl Subject for u32 {
    fn subject_key(&self) -> Option<SubjectKey> {
        Some((*self).into())
    }
}

// Indirection is transparent: a subject and a pointer to it share a key.

impl<T: Subject + ?Sized> Subject for &T {
    fn subject_key(&self) -> Option<SubjectKey> {
        (**self).subject_key()
    }

    fn subject_id(&self) -> Option<i64> {
        (**self).subject_id()
    }
}

impl<T: Subject + ?Sized> Subject for Box<T> {
    fn subject_key(&self) -> Option<SubjectKey> {
        (**self).subject_key()
    }

    fn subject_id(&self) -> Option<i64> {
        (**self).subject_id()
    }
}

impl<T: Subject + ?Sized> Subject for Rc<T> {
    fn subject_key(&self) -> Option<SubjectKey> {
        (**self).subject_key()
    }

    fn subject_id(&self) -> Option<i64> {
        (**self).subject_id()
    }
}

impl<T: Subject + ?Sized> Subject for Arc<T> {
    fn subject_key(&self) -> Option<SubjectKey> {
        (**self).subject_key()
    }

    fn subject_id(&self) -> Option<i64> {
        (**self).subject_id()
    }
}

impl<T: Subject> Subject for Option<T> {
    fn subject_key(&self) -> Option<SubjectKey> {
        self.as_ref().and_then(Subject::subject_key)
    }

    fn subject_id(&self) -> Option<i64> {
        self.as_ref().and_then(Subject::subject_id)
    }
}

// ============================================================================
// Structural fallback (opt-in)
// ============================================================================

/// Read a top-level `id` field from any serializable value
///
/// The field name is matched ASCII case-insensitively (`id`, `ID`, `Id`) and
/// must hold an integer that fits in `i64`. Anything else yields `None`.
///
/// This is the structural fallback for types that carry an id field but do
/// not implement [`Subject`] by hand. It is never applied implicitly: call it
/// from `subject_id`, or wrap the value in [`Structural`].
pub fn structural_id<T: Serialize + ?Sized>(value: &T) -> Option<i64> {
    let fields = match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => fields,
        _ => return None,
    };

    fields
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("id"))
        .and_then(|(_, id)| id.as_i64())
}

/// Adapter that resolves a subject's identity from its `id` field
///
/// ```ignore
/// #[derive(Serialize)]
/// struct Role { id: i64, name: String }
///
/// let admin = Structural(Role { id: 1, name: "Administrator".into() });
/// assert_eq!(resolve_identity(&admin), SubjectKey::Id(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Structural<T>(pub T);

impl<T> Structural<T> {
    /// Unwrap the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Structural<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Serialize> Subject for Structural<T> {
    fn subject_id(&self) -> Option<i64> {
        structural_id(&self.0)
    }
}
