//! Type tags and the type-erased payload view handed to observers.
//!
//! A [`TypeTag`] is the key of a signal's typed buckets. It wraps a `TypeId`, so two tags are
//! equal exactly when they describe the same concrete type; there is no supertype or trait
//! matching.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable, comparable identifier of a payload type.
///
/// Equality and hashing only look at the `TypeId`. The name is kept for diagnostics and is
/// `None` for tags taken from a type-erased value at runtime.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: Option<&'static str>,
}

impl TypeTag {
    /// Tag of the statically known type `T`.
    pub fn of<T: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: Some(std::any::type_name::<T>()),
        }
    }

    /// Tag of the concrete type behind a type-erased value.
    pub fn of_val(value: &dyn Any) -> Self {
        Self {
            id: value.type_id(),
            name: None,
        }
    }

    /// Tag of `dyn Any`, the catch-all bucket a caller routes into explicitly.
    pub fn any() -> Self {
        Self::of::<dyn Any>()
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "TypeTag({name})"),
            None => write!(f, "TypeTag({:?})", self.id),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{:?}", self.id),
        }
    }
}

/// Borrowed view of the value carried by a call, together with the tag it was routed under.
///
/// The tag is usually the value's own type, but `Signal::call_tagged` lets the caller route a
/// value under any tag, so `tag()` and the concrete type can differ.
#[derive(Clone, Copy)]
pub struct Payload<'a> {
    value: &'a dyn Any,
    tag: TypeTag,
}

impl<'a> Payload<'a> {
    pub(crate) fn new(value: &'a dyn Any, tag: TypeTag) -> Self {
        Self { value, tag }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn value(&self) -> &'a dyn Any {
        self.value
    }

    /// Returns `true` if the concrete value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Checked downcast of the concrete value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload").field("tag", &self.tag).finish()
    }
}
