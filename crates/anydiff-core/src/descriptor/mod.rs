//! Type descriptors: per-type member metadata built once and shared.
//!
//! Types opt into comparison by implementing [`Diffable`] and describing
//! their members with [`TypeDescriptor::builder`]. The engine never looks at
//! a type any other way.

pub mod cache;

pub use cache::descriptor_of;

use crate::errors::EqualityError;
use crate::value::Value;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// A type whose instances can be compared member by member.
///
/// # Example
///
/// ```
/// use anydiff_core::descriptor::{Diffable, TypeDescriptor};
/// use anydiff_core::value::Value;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Diffable for Point {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>("Point")
///             .scalar("X", |p| Value::from(p.x))
///             .scalar("Y", |p| Value::from(p.y))
///             .build()
///     }
/// }
/// ```
pub trait Diffable: Any {
    /// Build this type's descriptor. Called at most once per type by the
    /// descriptor cache, so it should not be called directly.
    fn describe() -> TypeDescriptor
    where
        Self: Sized;

    /// Capability query for a semantic equality that replaces the
    /// member-by-member comparison when `ALLOW_EQUALS_OVERRIDE` is set.
    fn custom_equality(&self) -> Option<&dyn CustomEquality> {
        None
    }
}

/// Semantic equality supplied by a type.
///
/// `other` is always an instance of the same concrete type; implementations
/// downcast it. An `Err` aborts the whole comparison.
pub trait CustomEquality {
    fn equals(&self, other: &dyn Any) -> Result<bool, EqualityError>;
}

/// Classification of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Scalar,
    Object,
    SequentialCollection,
    KeyedCollection,
    SetLikeCollection,
}

impl MemberKind {
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            MemberKind::SequentialCollection
                | MemberKind::KeyedCollection
                | MemberKind::SetLikeCollection
        )
    }

    /// Whether a value read through an accessor fits this kind.
    /// `Null` fits every kind.
    pub fn accepts(&self, value: &Value<'_>) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (MemberKind::Scalar, Value::Scalar(_))
                | (MemberKind::Object, Value::Object(_))
                | (MemberKind::SequentialCollection, Value::Sequence(_))
                | (MemberKind::KeyedCollection, Value::Keyed(_))
                | (MemberKind::SetLikeCollection, Value::Set(_))
        )
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MemberKind::Scalar => "scalar",
            MemberKind::Object => "object",
            MemberKind::SequentialCollection => "sequential collection",
            MemberKind::KeyedCollection => "keyed collection",
            MemberKind::SetLikeCollection => "set-like collection",
        };
        write!(f, "{}", label)
    }
}

trait ReadMember: Send + Sync {
    fn read<'a>(&self, instance: &'a dyn Any) -> Value<'a>;
}

struct TypedReader<T, F> {
    read: F,
    _owner: PhantomData<fn(&T)>,
}

impl<T, F> ReadMember for TypedReader<T, F>
where
    T: 'static,
    F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync,
{
    fn read<'a>(&self, instance: &'a dyn Any) -> Value<'a> {
        match instance.downcast_ref::<T>() {
            Some(owner) => (self.read)(owner),
            None => Value::Null,
        }
    }
}

/// One comparable member of a type
pub struct Member {
    name: String,
    kind: MemberKind,
    element: Option<fn() -> Arc<TypeDescriptor>>,
    reader: Box<dyn ReadMember>,
}

impl Member {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Descriptor of the member's object type (for `Object` members) or of
    /// its element type (for collections of objects)
    pub fn element_descriptor(&self) -> Option<Arc<TypeDescriptor>> {
        self.element.map(|describe| describe())
    }

    /// Read the member's current value from an instance of the owning type.
    /// An instance of any other type reads as `Null`.
    pub fn read<'a>(&self, instance: &'a dyn Any) -> Value<'a> {
        self.reader.read(instance)
    }
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_element_type", &self.element.is_some())
            .finish()
    }
}

/// Immutable per-type metadata: the ordered list of comparable members
#[derive(Debug)]
pub struct TypeDescriptor {
    type_name: String,
    members: Vec<Member>,
}

impl TypeDescriptor {
    pub fn builder<T: 'static>(type_name: impl Into<String>) -> DescriptorBuilder<T> {
        DescriptorBuilder {
            type_name: type_name.into(),
            members: Vec::new(),
            _owner: PhantomData,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Members in declaration order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Fluent builder for a [`TypeDescriptor`].
///
/// Members are compared in the order they are added. Adding a member with a
/// name that already exists replaces the earlier one in place.
pub struct DescriptorBuilder<T> {
    type_name: String,
    members: Vec<Member>,
    _owner: PhantomData<fn(&T)>,
}

impl<T: 'static> DescriptorBuilder<T> {
    fn push<F>(
        mut self,
        name: &str,
        kind: MemberKind,
        element: Option<fn() -> Arc<TypeDescriptor>>,
        read: F,
    ) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        let member = Member {
            name: name.to_string(),
            kind,
            element,
            reader: Box::new(TypedReader {
                read,
                _owner: PhantomData,
            }),
        };
        match self.members.iter().position(|m| m.name == name) {
            Some(index) => self.members[index] = member,
            None => self.members.push(member),
        }
        self
    }

    pub fn scalar<F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(name, MemberKind::Scalar, None, read)
    }

    pub fn object<U: Diffable, F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(name, MemberKind::Object, Some(descriptor_of::<U>), read)
    }

    /// Sequential collection of scalars
    pub fn sequence<F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(name, MemberKind::SequentialCollection, None, read)
    }

    /// Sequential collection of `U` objects
    pub fn sequence_of<U: Diffable, F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(
            name,
            MemberKind::SequentialCollection,
            Some(descriptor_of::<U>),
            read,
        )
    }

    /// Keyed collection with scalar values
    pub fn keyed<F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(name, MemberKind::KeyedCollection, None, read)
    }

    /// Keyed collection with `U` object values
    pub fn keyed_of<U: Diffable, F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(
            name,
            MemberKind::KeyedCollection,
            Some(descriptor_of::<U>),
            read,
        )
    }

    /// Set-like collection of scalars
    pub fn set<F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(name, MemberKind::SetLikeCollection, None, read)
    }

    /// Set-like collection of `U` objects
    pub fn set_of<U: Diffable, F>(self, name: &str, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.push(
            name,
            MemberKind::SetLikeCollection,
            Some(descriptor_of::<U>),
            read,
        )
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            type_name: self.type_name,
            members: self.members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    struct Pair {
        left: i32,
        right: Option<String>,
        tags: Vec<String>,
    }

    impl Diffable for Pair {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>("Pair")
                .scalar("Left", |p| Value::from(p.left))
                .scalar("Right", |p| Value::optional_scalar(p.right.as_deref()))
                .sequence("Tags", |p| Value::scalars(p.tags.iter()))
                .build()
        }
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let descriptor = Pair::describe();
        let names: Vec<&str> = descriptor.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Left", "Right", "Tags"]);
        assert_eq!(
            descriptor.member("Tags").map(|m| m.kind()),
            Some(MemberKind::SequentialCollection)
        );
    }

    #[test]
    fn test_member_read_through_erased_instance() {
        let pair = Pair {
            left: 7,
            right: None,
            tags: vec!["a".to_string()],
        };
        let descriptor = Pair::describe();
        let left = descriptor.member("Left").unwrap().read(&pair);
        assert!(matches!(left, Value::Scalar(Scalar::Int(7))));
        let right = descriptor.member("Right").unwrap().read(&pair);
        assert!(right.is_null());
        let tags = descriptor.member("Tags").unwrap().read(&pair);
        assert_eq!(tags.collection_len(), Some(1));
    }

    #[test]
    fn test_reading_foreign_instance_yields_null() {
        let descriptor = Pair::describe();
        let value = descriptor.member("Left").unwrap().read(&42_u32);
        assert!(value.is_null());
    }

    #[test]
    fn test_duplicate_member_replaces_in_place() {
        let descriptor = TypeDescriptor::builder::<Pair>("Pair")
            .scalar("Left", |p| Value::from(p.left))
            .scalar("Right", |_| Value::Null)
            .scalar("Left", |p| Value::from(i64::from(p.left) * 2))
            .build();
        assert_eq!(descriptor.members().len(), 2);
        assert_eq!(descriptor.members()[0].name(), "Left");
    }

    #[test]
    fn test_kind_accepts_matching_shapes() {
        assert!(MemberKind::Scalar.accepts(&Value::from(1)));
        assert!(MemberKind::KeyedCollection.accepts(&Value::Null));
        assert!(!MemberKind::Scalar.accepts(&Value::scalars([1])));
        assert!(!MemberKind::SetLikeCollection.accepts(&Value::scalars([1])));
    }
}
