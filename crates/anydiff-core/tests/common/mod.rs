//! Shared fixtures for the integration tests

#![allow(dead_code)]

use anydiff_core::{CustomEquality, Diffable, EqualityError, TypeDescriptor, Value};
use std::any::Any;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Flat object with one member per collection shape
#[derive(Debug, Default)]
pub struct TestObject {
    pub name: Option<String>,
    pub int_array: Vec<i32>,
    pub int_collection: Option<Vec<i32>>,
    pub int_dictionary: Option<HashMap<i32, String>>,
}

impl Diffable for TestObject {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("TestObject")
            .scalar("Name", |o| Value::optional_scalar(o.name.as_deref()))
            .sequence("IntArray", |o| Value::scalars(&o.int_array))
            .sequence("IntCollection", |o| {
                Value::from(o.int_collection.as_ref().map(Value::scalars))
            })
            .keyed("IntDictionary", |o| {
                Value::from(
                    o.int_dictionary
                        .as_ref()
                        .map(|d| Value::keyed(d.iter().map(|(k, v)| (*k, Value::from(v))))),
                )
            })
            .build()
    }
}

pub fn with_array(values: &[i32]) -> TestObject {
    TestObject {
        int_array: values.to_vec(),
        ..TestObject::default()
    }
}

pub fn with_collection(values: Option<&[i32]>) -> TestObject {
    TestObject {
        int_collection: values.map(<[i32]>::to_vec),
        ..TestObject::default()
    }
}

pub fn with_dictionary(entries: &[(i32, &str)]) -> TestObject {
    TestObject {
        int_dictionary: Some(
            entries
                .iter()
                .map(|(k, v)| (*k, (*v).to_string()))
                .collect(),
        ),
        ..TestObject::default()
    }
}

pub struct ComplexObject {
    pub id: i32,
}

impl Diffable for ComplexObject {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("ComplexObject")
            .scalar("Id", |o| Value::from(o.id))
            .build()
    }
}

/// Recursive child: a name plus nested children of the same type
#[derive(Clone, Default)]
pub struct BasicChild {
    pub basic_child_id: i32,
    pub basic_child_name: String,
    pub children: Vec<BasicChild>,
}

impl Diffable for BasicChild {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("BasicChild")
            .scalar("BasicChildId", |c| Value::from(c.basic_child_id))
            .scalar("BasicChildName", |c| Value::from(&c.basic_child_name))
            .sequence_of::<BasicChild, _>("Children", |c| Value::objects(&c.children))
            .build()
    }
}

#[derive(Clone, Default)]
pub struct ListChild {
    pub basic_child: BasicChild,
}

impl Diffable for ListChild {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("ListChild")
            .object::<BasicChild, _>("BasicChild", |c| Value::object(&c.basic_child))
            .build()
    }
}

#[derive(Clone, Default)]
pub struct ComplexObjectWithListChildren {
    pub id: i32,
    pub name: String,
    pub children: Vec<ListChild>,
    pub basic_child: BasicChild,
}

impl Diffable for ComplexObjectWithListChildren {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("ComplexObjectWithListChildren")
            .scalar("Id", |o| Value::from(o.id))
            .scalar("Name", |o| Value::from(&o.name))
            .sequence_of::<ListChild, _>("Children", |o| Value::objects(&o.children))
            .object::<BasicChild, _>("BasicChild", |o| Value::object(&o.basic_child))
            .build()
    }
}

pub fn basic_child(id: i32, name: &str) -> BasicChild {
    BasicChild {
        basic_child_id: id,
        basic_child_name: name.to_string(),
        children: Vec::new(),
    }
}

/// Identity is the id alone; the name is presentation only
pub struct EqualsObject {
    pub id: i32,
    pub name: String,
}

impl EqualsObject {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl Diffable for EqualsObject {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("EqualsObject")
            .scalar("Id", |o| Value::from(o.id))
            .scalar("Name", |o| Value::from(&o.name))
            .build()
    }

    fn custom_equality(&self) -> Option<&dyn CustomEquality> {
        Some(self)
    }
}

impl CustomEquality for EqualsObject {
    fn equals(&self, other: &dyn Any) -> Result<bool, EqualityError> {
        let other = other
            .downcast_ref::<EqualsObject>()
            .ok_or_else(|| EqualityError::new("expected EqualsObject"))?;
        if self.id < 0 || other.id < 0 {
            return Err(EqualityError::new("negative ids are not comparable"));
        }
        Ok(self.id == other.id)
    }
}

pub struct ReadOnlyCollectionObject {
    collection: Vec<EqualsObject>,
    pub label: String,
}

impl ReadOnlyCollectionObject {
    pub fn new(collection: Vec<EqualsObject>) -> Self {
        Self {
            collection,
            label: String::new(),
        }
    }
}

impl Diffable for ReadOnlyCollectionObject {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("ReadOnlyCollectionObject")
            .sequence_of::<EqualsObject, _>("Collection", |o| Value::objects(&o.collection))
            .scalar("Label", |o| Value::from(&o.label))
            .build()
    }
}

#[derive(Default)]
pub struct DeepChild3Object {
    pub name: String,
    pub other: i32,
}

#[derive(Default)]
pub struct DeepChild2Object {
    pub deep_child3_object: DeepChild3Object,
    pub name: String,
}

#[derive(Default)]
pub struct DeepChildObject {
    pub deep_child2_object: Option<DeepChild2Object>,
    pub name: String,
}

#[derive(Default)]
pub struct DeepObject {
    pub deep_child_object: DeepChildObject,
    pub name: String,
}

impl Diffable for DeepChild3Object {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("DeepChild3Object")
            .scalar("Name", |o| Value::from(&o.name))
            .scalar("Other", |o| Value::from(o.other))
            .build()
    }
}

impl Diffable for DeepChild2Object {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("DeepChild2Object")
            .object::<DeepChild3Object, _>("DeepChild3Object", |o| {
                Value::object(&o.deep_child3_object)
            })
            .scalar("Name", |o| Value::from(&o.name))
            .build()
    }
}

impl Diffable for DeepChildObject {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("DeepChildObject")
            .object::<DeepChild2Object, _>("DeepChild2Object", |o| {
                Value::optional_object(o.deep_child2_object.as_ref())
            })
            .scalar("Name", |o| Value::from(&o.name))
            .build()
    }
}

impl Diffable for DeepObject {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("DeepObject")
            .object::<DeepChildObject, _>("DeepChildObject", |o| Value::object(&o.deep_child_object))
            .scalar("Name", |o| Value::from(&o.name))
            .build()
    }
}

pub fn deep_object(top: &str, middle: &str, leaf: &str, other: i32) -> DeepObject {
    DeepObject {
        deep_child_object: DeepChildObject {
            deep_child2_object: Some(DeepChild2Object {
                deep_child3_object: DeepChild3Object {
                    name: leaf.to_string(),
                    other,
                },
                name: middle.to_string(),
            }),
            name: middle.to_string(),
        },
        name: top.to_string(),
    }
}

/// Graph node whose `Next` can point back at an ancestor
pub struct Node {
    pub value: i32,
    pub next: OnceCell<Rc<Node>>,
}

impl Node {
    pub fn new(value: i32) -> Rc<Self> {
        Rc::new(Self {
            value,
            next: OnceCell::new(),
        })
    }
}

impl Diffable for Node {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Node")
            .scalar("Value", |n| Value::from(n.value))
            .object::<Node, _>("Next", |n| Value::optional_object(n.next.get().map(|next| &**next)))
            .build()
    }
}

/// Two-node cycle `a -> b -> a` with the given values
pub fn cycle(a: i32, b: i32) -> (Rc<Node>, Rc<Node>) {
    let first = Node::new(a);
    let second = Node::new(b);
    let _ = second.next.set(Rc::clone(&first));
    let _ = first.next.set(Rc::clone(&second));
    (first, second)
}
