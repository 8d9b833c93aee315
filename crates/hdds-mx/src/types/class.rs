// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime class handles.
//!
//! A [`Class`] identifies a Rust type at runtime (`TypeId` + type name) and,
//! for sequences, carries the element class plus a function that exposes the
//! elements of a type-erased value. The mapper only ever looks at this handle;
//! it never inspects the layout of domain types.

use std::any::{Any, TypeId};
use std::fmt;
use std::time::SystemTime;

/// Exposes the elements of a type-erased sequence value.
pub type ElementsFn = fn(&dyn Any) -> Option<Vec<&dyn Any>>;

#[derive(Clone)]
enum Shape {
    Plain,
    Sequence {
        element: Box<Class>,
        elements: ElementsFn,
    },
}

/// Runtime handle for a Rust type.
#[derive(Clone)]
pub struct Class {
    id: TypeId,
    name: &'static str,
    shape: Shape,
}

impl Class {
    /// Plain (non-sequence) class of `T`.
    ///
    /// Crate-internal: public handles come from [`TypeClass::class`], so a
    /// sequence type is never seen with a plain shape.
    pub(crate) fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            shape: Shape::Plain,
        }
    }

    /// Sequence class `S` whose elements are of class `element`.
    pub(crate) fn sequence<S: ?Sized + 'static>(element: Class, elements: ElementsFn) -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
            shape: Shape::Sequence {
                element: Box::new(element),
                elements,
            },
        }
    }

    /// `TypeId` of the underlying Rust type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name (`alloc::string::String`).
    pub fn qualified_name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped (`String`, `Vec<Address>`).
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }

    /// Qualified or short name, as selected by `qualified`.
    pub fn display_name(&self, qualified: bool) -> String {
        if qualified {
            self.name.to_string()
        } else {
            self.short_name()
        }
    }

    /// Element class of a sequence, `None` for plain classes.
    pub fn element(&self) -> Option<&Class> {
        match &self.shape {
            Shape::Sequence { element, .. } => Some(element),
            Shape::Plain => None,
        }
    }

    pub(crate) fn elements_fn(&self) -> Option<ElementsFn> {
        match &self.shape {
            Shape::Sequence { elements, .. } => Some(*elements),
            Shape::Plain => None,
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("element", &self.element().map(|e| e.name))
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// Strip module paths from every path segment of a type name.
///
/// `alloc::vec::Vec<app::model::Address>` becomes `Vec<Address>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut token = String::new();
    for ch in full.chars() {
        if matches!(ch, '<' | '>' | ',' | ';' | '[' | ']' | '(' | ')' | '&' | '*' | ' ') {
            push_last_segment(&mut out, &token);
            token.clear();
            out.push(ch);
        } else {
            token.push(ch);
        }
    }
    push_last_segment(&mut out, &token);
    out
}

fn push_last_segment(out: &mut String, token: &str) {
    if let Some(last) = token.rsplit("::").next() {
        out.push_str(last);
    }
}

/// Rust types that can name their [`Class`].
///
/// Scalars and the standard sequences implement this already. Domain types
/// opt in with an empty impl:
///
/// ```rust
/// use hdds_mx::TypeClass;
///
/// struct Address {
///     city: String,
/// }
///
/// impl TypeClass for Address {}
/// ```
///
/// Implementing `TypeClass` only names the type; mapping it to a composite
/// still requires a registered `CompositeDataWriter`.
pub trait TypeClass: 'static {
    fn class() -> Class
    where
        Self: Sized,
    {
        Class::of::<Self>()
    }
}

macro_rules! impl_plain_class {
    ($($ty:ty),* $(,)?) => {
        $(impl TypeClass for $ty {})*
    };
}

impl_plain_class!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Box<str>,
    std::sync::Arc<str>,
    SystemTime,
);

fn vec_elements<T: 'static>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    value
        .downcast_ref::<Vec<T>>()
        .map(|items| items.iter().map(|item| item as &dyn Any).collect())
}

fn boxed_slice_elements<T: 'static>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    value
        .downcast_ref::<Box<[T]>>()
        .map(|items| items.iter().map(|item| item as &dyn Any).collect())
}

fn array_elements<T: 'static, const N: usize>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    value
        .downcast_ref::<[T; N]>()
        .map(|items| items.iter().map(|item| item as &dyn Any).collect())
}

impl<T: TypeClass> TypeClass for Vec<T> {
    fn class() -> Class {
        Class::sequence::<Self>(T::class(), vec_elements::<T>)
    }
}

impl<T: TypeClass> TypeClass for Box<[T]> {
    fn class() -> Class {
        Class::sequence::<Self>(T::class(), boxed_slice_elements::<T>)
    }
}

impl<T: TypeClass, const N: usize> TypeClass for [T; N] {
    fn class() -> Class {
        Class::sequence::<Self>(T::class(), array_elements::<T, N>)
    }
}
