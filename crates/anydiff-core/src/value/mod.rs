//! Borrowed value views produced by member accessors.
//!
//! A [`Value`] is what a type descriptor hands back when one of its members
//! is read from an instance. Scalars are copied out, objects stay borrowed
//! behind an [`ObjectRef`], and collections are normalized into ordered
//! snapshots regardless of their backing storage.

pub mod scalar;

pub use scalar::{Delta, Scalar};

use crate::descriptor::{descriptor_of, CustomEquality, Diffable, TypeDescriptor};
use crate::diff::model::DiffValue;
use chrono::{DateTime, Utc};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Identity of an object during one comparison: its address plus its type.
///
/// The type is part of the key because a struct and its first field share an
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjectIdentity {
    addr: usize,
    type_id: TypeId,
}

/// Type-erased borrow of a [`Diffable`] value.
#[derive(Clone)]
pub struct ObjectRef<'a> {
    instance: &'a dyn Any,
    type_id: TypeId,
    descriptor: Arc<TypeDescriptor>,
    equality: Option<&'a dyn CustomEquality>,
}

impl<'a> ObjectRef<'a> {
    pub fn new<T: Diffable>(value: &'a T) -> Self {
        Self {
            instance: value,
            type_id: TypeId::of::<T>(),
            descriptor: descriptor_of::<T>(),
            equality: value.custom_equality(),
        }
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        self.descriptor.type_name()
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn instance(&self) -> &'a dyn Any {
        self.instance
    }

    /// The custom equality capability, when the type exposes one
    pub fn custom_equality(&self) -> Option<&'a dyn CustomEquality> {
        self.equality
    }

    pub(crate) fn identity(&self) -> ObjectIdentity {
        ObjectIdentity {
            addr: self.instance as *const dyn Any as *const () as usize,
            type_id: self.type_id,
        }
    }
}

impl std::fmt::Debug for ObjectRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name())
            .field("custom_equality", &self.equality.is_some())
            .finish()
    }
}

/// A member's current value, as read through its accessor.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Null,
    Scalar(Scalar),
    Object(ObjectRef<'a>),
    Sequence(Vec<Value<'a>>),
    /// Entries sorted by key
    Keyed(Vec<(Scalar, Value<'a>)>),
    Set(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        Value::Scalar(value.into())
    }

    pub fn optional_scalar<S: Into<Scalar>>(value: Option<S>) -> Self {
        value.map_or(Value::Null, Value::scalar)
    }

    pub fn object<T: Diffable>(value: &'a T) -> Self {
        Value::Object(ObjectRef::new(value))
    }

    pub fn optional_object<T: Diffable>(value: Option<&'a T>) -> Self {
        value.map_or(Value::Null, Value::object)
    }

    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value<'a>>,
    {
        Value::Sequence(items.into_iter().collect())
    }

    /// Sequence of scalar elements
    pub fn scalars<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Value::Sequence(items.into_iter().map(Value::scalar).collect())
    }

    /// Sequence of object elements
    pub fn objects<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        T: Diffable,
    {
        Value::Sequence(items.into_iter().map(Value::object).collect())
    }

    /// Keyed collection; entries are sorted by key so hash-ordered maps
    /// produce the same snapshot on every call.
    pub fn keyed<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value<'a>)>,
        K: Into<Scalar>,
    {
        let mut entries: Vec<(Scalar, Value<'a>)> =
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Keyed(entries)
    }

    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value<'a>>,
    {
        Value::Set(items.into_iter().collect())
    }

    /// Set of scalar elements, sorted
    pub fn scalar_set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        let mut items: Vec<Scalar> = items.into_iter().map(Into::into).collect();
        items.sort();
        Value::Set(items.into_iter().map(Value::Scalar).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the value's shape, used in descriptor mismatch errors
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(_) => "scalar",
            Value::Object(_) => "object",
            Value::Sequence(_) => "sequence",
            Value::Keyed(_) => "keyed collection",
            Value::Set(_) => "set",
        }
    }

    /// Element count for collection shapes
    pub fn collection_len(&self) -> Option<usize> {
        match self {
            Value::Sequence(items) | Value::Set(items) => Some(items.len()),
            Value::Keyed(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Owned snapshot for a difference record
    pub(crate) fn snapshot(&self) -> DiffValue {
        match self {
            Value::Null => DiffValue::Absent,
            Value::Scalar(s) => DiffValue::Scalar(s.clone()),
            Value::Object(o) => DiffValue::Object {
                type_name: o.type_name().to_string(),
            },
            Value::Sequence(_) | Value::Keyed(_) | Value::Set(_) => DiffValue::Collection {
                len: self.collection_len().unwrap_or(0),
            },
        }
    }
}

impl From<Scalar> for Value<'_> {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl<'a> From<Option<Value<'a>>> for Value<'a> {
    fn from(value: Option<Value<'a>>) -> Self {
        value.unwrap_or(Value::Null)
    }
}

macro_rules! value_from_scalar {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Value<'_> {
                fn from(value: $source) -> Self {
                    Value::Scalar(Scalar::from(value))
                }
            }
        )+
    };
}

value_from_scalar!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, String,
    DateTime<Utc>
);

impl From<&str> for Value<'_> {
    fn from(value: &str) -> Self {
        Value::Scalar(Scalar::from(value))
    }
}

impl From<&String> for Value<'_> {
    fn from(value: &String) -> Self {
        Value::Scalar(Scalar::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_entries_are_sorted() {
        let value = Value::keyed(vec![
            (3_i32, Value::from("c")),
            (1_i32, Value::from("a")),
            (2_i32, Value::from("b")),
        ]);
        let Value::Keyed(entries) = value else {
            panic!("expected keyed value");
        };
        let keys: Vec<Scalar> = entries.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)]);
    }

    #[test]
    fn test_optional_helpers() {
        assert!(Value::optional_scalar::<i32>(None).is_null());
        assert!(matches!(
            Value::optional_scalar(Some(4_u8)),
            Value::Scalar(Scalar::UInt(4))
        ));
        assert!(Value::from(None::<Value<'_>>).is_null());
    }

    #[test]
    fn test_snapshot_of_collections_records_length() {
        let value = Value::scalars([1, 2, 3]);
        assert_eq!(value.snapshot(), DiffValue::Collection { len: 3 });
        assert_eq!(Value::Null.snapshot(), DiffValue::Absent);
    }

    #[test]
    fn test_scalar_set_is_sorted() {
        let Value::Set(items) = Value::scalar_set(["b", "a"]) else {
            panic!("expected set");
        };
        assert!(matches!(&items[0], Value::Scalar(Scalar::Str(s)) if s == "a"));
    }
}
