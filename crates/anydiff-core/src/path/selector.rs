//! Typed member selectors and their compilation into canonical paths.
//!
//! A [`Selector`] is a chain of member accesses, optionally projecting
//! through a collection member onto its elements. Projection style (every
//! element or the first one) never shows up in the compiled path:
//!
//! ```
//! use anydiff_core::descriptor::{Diffable, TypeDescriptor};
//! use anydiff_core::path::Selector;
//! use anydiff_core::value::Value;
//!
//! struct Child { x: i32 }
//! struct Parent { children: Vec<Child> }
//!
//! impl Diffable for Child {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>("Child").scalar("X", |c| Value::from(c.x)).build()
//!     }
//! }
//!
//! impl Diffable for Parent {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>("Parent")
//!             .sequence_of::<Child, _>("Children", |p| Value::objects(&p.children))
//!             .build()
//!     }
//! }
//!
//! let each = Selector::<Parent>::root().member("Children").each().member("X");
//! let first = Selector::<Parent>::root().member("Children").first().member("X");
//! assert_eq!(each.compile().unwrap(), first.compile().unwrap());
//! assert_eq!(each.compile().unwrap().to_string(), ".Children.X");
//! ```

use super::CanonicalPath;
use crate::descriptor::{descriptor_of, Diffable, MemberKind, TypeDescriptor};
use crate::errors::{DiffError, Result};
use std::marker::PhantomData;
use std::sync::Arc;

/// How a projection picks elements out of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionStyle {
    /// Every element
    Each,
    /// The first element only
    First,
}

/// One node of a selector chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Member(String),
    Project(ProjectionStyle),
}

/// Member-access expression rooted at `T`
pub struct Selector<T> {
    steps: Vec<Step>,
    _root: PhantomData<fn() -> T>,
}

impl<T> Clone for Selector<T> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            _root: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("root", &std::any::type_name::<T>())
            .field("steps", &self.steps)
            .finish()
    }
}

impl<T> PartialEq for Selector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl<T> std::fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x => x")?;
        for step in &self.steps {
            match step {
                Step::Member(name) => write!(f, ".{}", name)?,
                Step::Project(ProjectionStyle::Each) => write!(f, "[*]")?,
                Step::Project(ProjectionStyle::First) => write!(f, "[0]")?,
            }
        }
        Ok(())
    }
}

/// Where compilation currently stands in the type structure
enum Cursor {
    Object(Arc<TypeDescriptor>),
    Scalar,
    Collection { element: Option<Arc<TypeDescriptor>> },
    Elements { element: Option<Arc<TypeDescriptor>> },
}

impl<T: Diffable> Selector<T> {
    /// Empty selector; add at least one member before compiling
    pub fn root() -> Self {
        Self {
            steps: Vec::new(),
            _root: PhantomData,
        }
    }

    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Member(name.into()));
        self
    }

    /// Project onto every element of the preceding collection member
    pub fn each(mut self) -> Self {
        self.steps.push(Step::Project(ProjectionStyle::Each));
        self
    }

    /// Project onto the first element of the preceding collection member
    pub fn first(mut self) -> Self {
        self.steps.push(Step::Project(ProjectionStyle::First));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn rejected(&self, root: &TypeDescriptor, reason: impl Into<String>) -> DiffError {
        DiffError::InvalidSelector {
            root_type: root.type_name().to_string(),
            selector: self.to_string(),
            reason: reason.into(),
        }
    }

    /// Resolve the chain against `T`'s descriptors.
    ///
    /// # Errors
    ///
    /// `InvalidSelector` when the chain is empty, names an unknown member,
    /// projects through something that is not a collection, or accesses a
    /// member without projecting first.
    pub fn compile(&self) -> Result<CanonicalPath> {
        let root = descriptor_of::<T>();
        if self.steps.is_empty() {
            return Err(self.rejected(&root, "selector selects no member"));
        }

        let mut segments: Vec<String> = Vec::with_capacity(self.steps.len());
        let mut cursor = Cursor::Object(Arc::clone(&root));

        for step in &self.steps {
            cursor = match (step, cursor) {
                (Step::Member(name), Cursor::Object(owner))
                | (Step::Member(name), Cursor::Elements { element: Some(owner) }) => {
                    let member = owner.member(name).ok_or_else(|| {
                        self.rejected(
                            &root,
                            format!("{} has no member named `{}`", owner.type_name(), name),
                        )
                    })?;
                    segments.push(name.clone());
                    match member.kind() {
                        MemberKind::Scalar => Cursor::Scalar,
                        MemberKind::Object => match member.element_descriptor() {
                            Some(descriptor) => Cursor::Object(descriptor),
                            None => {
                                return Err(self.rejected(
                                    &root,
                                    format!("object member `{}` has no described type", name),
                                ))
                            }
                        },
                        _ => Cursor::Collection {
                            element: member.element_descriptor(),
                        },
                    }
                }
                (Step::Member(name), Cursor::Elements { element: None }) => {
                    return Err(self.rejected(
                        &root,
                        format!("`{}` accessed on elements that are scalars", name),
                    ))
                }
                (Step::Member(name), Cursor::Collection { .. }) => {
                    return Err(self.rejected(
                        &root,
                        format!(
                            "`{}` accessed on a collection; project with each() or first() first",
                            name
                        ),
                    ))
                }
                (Step::Member(name), Cursor::Scalar) => {
                    return Err(
                        self.rejected(&root, format!("`{}` accessed on a scalar member", name))
                    )
                }
                (Step::Project(_), Cursor::Collection { element }) => Cursor::Elements { element },
                (Step::Project(_), _) => {
                    return Err(self.rejected(&root, "projection requires a collection member"))
                }
            };
        }

        Ok(CanonicalPath::from_segments(segments))
    }
}

/// Compile several selectors, preserving input order.
///
/// # Errors
///
/// The first selector that fails to compile aborts the whole batch.
pub fn compile_all<T: Diffable>(selectors: &[Selector<T>]) -> Result<Vec<CanonicalPath>> {
    selectors.iter().map(Selector::compile).collect()
}
