//! Object type resolution

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// Capability trait for values that permissions are checked against
///
/// An empty `impl Resource for Post {}` is enough: the type name falls back
/// to the canonical runtime name (`"Post"`). Override `object_type` to
/// register rules under a logical name instead.
pub trait Resource {
    /// Logical object-type name, used verbatim when present
    fn object_type(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Runtime type name of the implementing type
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Resolve an object to the type name rules are matched against
pub fn resolve_type<R: Resource + ?Sized>(object: &R) -> String {
    match object.object_type() {
        Some(name) => name.into_owned(),
        None => canonical_type_name(object.type_name()),
    }
}

/// Normalize a runtime type name
///
/// Strips reference and raw pointer markers and collapses every path to its
/// last segment, so `&mut app::models::Post` becomes `Post` and
/// `alloc::vec::Vec<app::Post>` becomes `Vec<Post>`.
pub fn canonical_type_name(raw: &str) -> String {
    let mut rest = raw.trim();
    loop {
        let stripped = ["&mut ", "&", "*const ", "*mut "]
            .iter()
            .find_map(|marker| rest.strip_prefix(marker));
        match stripped {
            Some(inner) => rest = inner.trim_start(),
            None => break,
        }
    }

    let mut out = String::with_capacity(rest.len());
    let mut path = String::new();
    for c in rest.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            push_last_segment(&mut out, &path);
            path.clear();
            out.push(c);
        }
    }
    push_last_segment(&mut out, &path);

    out
}

fn push_last_segment(out: &mut String, path: &str) {
    if let Some(segment) = path.rsplit("::").next() {
        out.push_str(segment);
    }
}

impl<T: Resource + ?Sized> Resource for &T {
    fn object_type(&self) -> Option<Cow<'_, str>> {
        (**self).object_type()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

impl<T: Resource + ?Sized> Resource for Box<T> {
    fn object_type(&self) -> Option<Cow<'_, str>> {
        (**self).object_type()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

impl<T: Resource + ?Sized> Resource for Rc<T> {
    fn object_type(&self) -> Option<Cow<'_, str>> {
        (**self).object_type()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

impl<T: Resource + ?Sized> Resource for Arc<T> {
    fn object_type(&self) -> Option<Cow<'_, str>> {
        (**self).object_type()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}
