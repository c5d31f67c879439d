//! Identity and type resolution
//!
//! Rules are stored against normalized keys, never against live values. This
//! module turns values into those keys:
//!
//! - [`resolve_identity`] maps a [`Subject`] to a [`SubjectKey`]
//! - [`resolve_type`] maps a [`Resource`] to its object-type name
//!
//! Registration and checks must go through the same resolvers, otherwise a
//! rule can never match.

mod identity;
mod object_type;

pub use identity::{resolve_identity, structural_id, Structural, Subject, SubjectKey};
pub use object_type::{canonical_type_name, resolve_type, Resource};
