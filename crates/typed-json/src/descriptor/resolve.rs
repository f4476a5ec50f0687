//! Building descriptors for generic containers from explicit element shapes.
//!
//! Only the element descriptors a caller supplies are used; nothing is
//! inferred beyond them. A container requested without element descriptors
//! falls back to [`TypeDescriptor::Inferred`] elements: the decoded elements
//! then take whatever shape the JSON itself has (a date inside such a mapping
//! comes back as a string). This degrades rather than fails, and is reported
//! as an [`UnresolvedGeneric`] warning.

use std::fmt;
use std::sync::Arc;

use super::{DescriptorCache, TypeDescriptor};
use crate::error::{CodecError, Result};
use crate::value::Value;

/// Generic container shapes that take element descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Sequence,
    Mapping,
}

impl Container {
    /// Number of element descriptors the container is parameterized by.
    pub fn arity(self) -> usize {
        match self {
            Self::Sequence => 1,
            Self::Mapping => 2,
        }
    }

    /// The container shape of a value, if it is one.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Seq(_) => Some(Self::Sequence),
            Value::Map(_) => Some(Self::Mapping),
            _ => None,
        }
    }

    fn build(self, elements: &[TypeDescriptor]) -> TypeDescriptor {
        match (self, elements) {
            (Self::Sequence, [element]) => TypeDescriptor::seq(element.clone()),
            (Self::Mapping, [key, value]) => TypeDescriptor::map(key.clone(), value.clone()),
            (Self::Sequence, _) => TypeDescriptor::seq(TypeDescriptor::Inferred),
            (Self::Mapping, _) => {
                TypeDescriptor::map(TypeDescriptor::Inferred, TypeDescriptor::Inferred)
            }
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequence => "seq",
            Self::Mapping => "map",
        })
    }
}

/// Non-fatal notice that a container's element type could not be narrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnresolvedGeneric {
    pub container: Container,
    pub expected: usize,
    pub supplied: usize,
}

impl fmt::Display for UnresolvedGeneric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} element type unresolved ({} of {} descriptors supplied); elements are inferred from JSON structure",
            self.container, self.supplied, self.expected
        )
    }
}

/// Resolves `container` parameterized by `elements` into a cached descriptor.
///
/// With no elements the container falls back to inferred elements and a
/// warning is logged. Any other count that does not match the container's
/// arity is an error.
pub fn resolve(container: Container, elements: &[TypeDescriptor]) -> Result<Arc<TypeDescriptor>> {
    resolve_checked(container, elements).map(|(descriptor, _)| descriptor)
}

/// Like [`resolve`], also returning the warning when elements were missing.
pub fn resolve_checked(
    container: Container,
    elements: &[TypeDescriptor],
) -> Result<(Arc<TypeDescriptor>, Option<UnresolvedGeneric>)> {
    let expected = container.arity();
    let warning = match elements.len() {
        0 => Some(UnresolvedGeneric {
            container,
            expected,
            supplied: 0,
        }),
        n if n == expected => None,
        supplied => {
            return Err(CodecError::Arity {
                container,
                expected,
                supplied,
            })
        }
    };
    if let Some(warning) = &warning {
        tracing::warn!(%warning, "unresolved generic container");
    }
    let descriptor = DescriptorCache::global().intern(container.build(elements));
    Ok((descriptor, warning))
}

/// Derives a descriptor from a value's own concrete shape.
///
/// Scalars and records are exact. Sequences and mappings only reveal their
/// container, so their elements are inferred (see the module docs).
pub fn infer(value: &Value) -> TypeDescriptor {
    match value {
        Value::Null => TypeDescriptor::Inferred,
        Value::Bool(_) => TypeDescriptor::bool(),
        Value::Int(_) => TypeDescriptor::int(),
        Value::Float(_) => TypeDescriptor::float(),
        Value::Str(_) => TypeDescriptor::str(),
        Value::Date(_) => TypeDescriptor::date(),
        Value::Record(record) => TypeDescriptor::Record(record.descriptor().clone()),
        Value::Seq(_) => infer_container(Container::Sequence),
        Value::Map(_) => infer_container(Container::Mapping),
    }
}

fn infer_container(container: Container) -> TypeDescriptor {
    let warning = UnresolvedGeneric {
        container,
        expected: container.arity(),
        supplied: 0,
    };
    tracing::warn!(%warning, "inferring container shape from value");
    container.build(&[])
}
