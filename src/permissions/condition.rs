//! Rule conditions
//!
//! A condition is the fine-grained part of a rule: once subject, object type
//! and action match, the condition sees the raw subject and object and
//! decides. Conditions must be side-effect free.

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

/// Trait for condition implementations
pub trait Condition: Send + Sync {
    /// Decide whether `subject` meets this condition on `object`
    fn evaluate(&self, subject: &dyn Any, object: &dyn Any) -> bool;

    /// Whether this condition always holds (used when listing rules)
    fn is_unconditional(&self) -> bool {
        false
    }
}

/// Implement Condition for untyped closures
impl<F> Condition for F
where
    F: Fn(&dyn Any, &dyn Any) -> bool + Send + Sync,
{
    fn evaluate(&self, subject: &dyn Any, object: &dyn Any) -> bool {
        (self)(subject, object)
    }
}

/// Type alias for stored conditions
pub type ArcCondition = Arc<dyn Condition>;

/// The default condition: always holds
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Condition for Always {
    fn evaluate(&self, _subject: &dyn Any, _object: &dyn Any) -> bool {
        true
    }

    fn is_unconditional(&self) -> bool {
        true
    }
}

/// A predicate bound to concrete subject and object types
///
/// The subject and object are downcast before the predicate runs. One level
/// of `&'static`, `Box`, `Rc` or `Arc` around the registered type is looked
/// through, matching how subjects and objects resolve. Any other type fails
/// the condition closed.
pub struct Typed<S, O, F> {
    predicate: F,
    _types: PhantomData<fn(&S, &O)>,
}

impl<S, O, F> Typed<S, O, F>
where
    S: Any,
    O: Any,
    F: Fn(&S, &O) -> bool + Send + Sync,
{
    /// Wrap a typed predicate
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _types: PhantomData,
        }
    }
}

impl<S, O, F> Condition for Typed<S, O, F>
where
    S: Any,
    O: Any,
    F: Fn(&S, &O) -> bool + Send + Sync,
{
    fn evaluate(&self, subject: &dyn Any, object: &dyn Any) -> bool {
        match (unwrap::<S>(subject), unwrap::<O>(object)) {
            (Some(subject), Some(object)) => (self.predicate)(subject, object),
            _ => {
                tracing::warn!(
                    "Condition expects ({}, {}), got a different subject or object type; denying",
                    std::any::type_name::<S>(),
                    std::any::type_name::<O>()
                );
                false
            }
        }
    }
}

/// Downcast `value` to `T`, looking through one pointer layer
fn unwrap<T: Any>(value: &dyn Any) -> Option<&T> {
    value
        .downcast_ref::<T>()
        .or_else(|| value.downcast_ref::<&'static T>().copied())
        .or_else(|| value.downcast_ref::<Box<T>>().map(|inner| &**inner))
        .or_else(|| value.downcast_ref::<Rc<T>>().map(|inner| &**inner))
        .or_else(|| value.downcast_ref::<Arc<T>>().map(|inner| &**inner))
}

impl<S, O, F> std::fmt::Debug for Typed<S, O, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typed")
            .field("subject", &std::any::type_name::<S>())
            .field("object", &std::any::type_name::<O>())
            .finish()
    }
}
