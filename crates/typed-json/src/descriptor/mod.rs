//! Type descriptors: the explicit shapes that drive decoding.
//!
//! A descriptor is immutable once built. Nested shapes are shared through
//! `Arc`, so a descriptor can be cloned cheaply and cached for the process
//! lifetime (see [`cache`]).

pub mod cache;
pub mod resolve;
pub mod signature;

pub use cache::{descriptor_of, record_descriptor_of, DescriptorCache};
pub use resolve::{infer, resolve, resolve_checked, Container, UnresolvedGeneric};

use std::fmt;
use std::sync::Arc;

use crate::null_policy::NullPolicy;
use crate::value::{Mapping, Record, Value};

/// Leaf kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Str,
    Date,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Date => "date",
        }
    }
}

/// The shape a JSON document is decoded into.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// No narrower type known: the JSON value's own structure is used.
    Inferred,
    Scalar(ScalarKind),
    Sequence(Arc<TypeDescriptor>),
    Mapping {
        key: Arc<TypeDescriptor>,
        value: Arc<TypeDescriptor>,
    },
    Record(Arc<RecordDescriptor>),
}

impl TypeDescriptor {
    pub fn inferred() -> Self {
        Self::Inferred
    }

    pub fn bool() -> Self {
        Self::Scalar(ScalarKind::Bool)
    }

    pub fn int() -> Self {
        Self::Scalar(ScalarKind::Int)
    }

    pub fn float() -> Self {
        Self::Scalar(ScalarKind::Float)
    }

    pub fn str() -> Self {
        Self::Scalar(ScalarKind::Str)
    }

    pub fn date() -> Self {
        Self::Scalar(ScalarKind::Date)
    }

    pub fn seq(element: TypeDescriptor) -> Self {
        Self::Sequence(Arc::new(element))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Mapping {
            key: Arc::new(key),
            value: Arc::new(value),
        }
    }

    pub fn record(record: RecordDescriptor) -> Self {
        Self::Record(Arc::new(record))
    }

    /// Shape name used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inferred => "any",
            Self::Scalar(kind) => kind.as_str(),
            Self::Sequence(_) => "sequence",
            Self::Mapping { .. } => "mapping",
            Self::Record(_) => "record",
        }
    }

    pub fn as_record(&self) -> Option<&Arc<RecordDescriptor>> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Whether every container slot along this descriptor is narrowed.
    ///
    /// Records count as resolved: a record field typed `any` was declared so
    /// on purpose.
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Inferred => false,
            Self::Scalar(_) | Self::Record(_) => true,
            Self::Sequence(element) => element.is_resolved(),
            Self::Mapping { key, value } => key.is_resolved() && value.is_resolved(),
        }
    }

    /// The canonical empty value of this type.
    pub fn empty_value(&self) -> Value {
        match self {
            Self::Inferred | Self::Scalar(ScalarKind::Date) => Value::Null,
            Self::Scalar(ScalarKind::Bool) => Value::Bool(false),
            Self::Scalar(ScalarKind::Int) => Value::Int(0),
            Self::Scalar(ScalarKind::Float) => Value::Float(0.0),
            Self::Scalar(ScalarKind::Str) => Value::Str(String::new()),
            Self::Sequence(_) => Value::Seq(Vec::new()),
            Self::Mapping { .. } => Value::Map(Mapping::new()),
            Self::Record(record) => Value::Record(Record::new(record.clone())),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inferred => f.write_str("any"),
            Self::Scalar(kind) => f.write_str(kind.as_str()),
            Self::Sequence(element) => write!(f, "seq<{element}>"),
            Self::Mapping { key, value } => write!(f, "map<{key},{value}>"),
            Self::Record(record) => write!(f, "{record}"),
        }
    }
}

impl std::str::FromStr for TypeDescriptor {
    type Err = crate::error::CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        signature::parse_signature(s)
    }
}

// -------------------------------------------------------------------------
// Records

/// One declared field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    descriptor: TypeDescriptor,
    policy: NullPolicy,
    default: Value,
}

impl FieldDescriptor {
    /// A field with a `null` default and [`NullPolicy::KeepAsNull`].
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
            policy: NullPolicy::default(),
            default: Value::Null,
        }
    }

    /// The value the field holds before decoding begins.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    /// What an explicit JSON `null` becomes for this field.
    pub fn on_null(mut self, policy: NullPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn policy(&self) -> NullPolicy {
        self.policy
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

/// A named record shape with fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declares a field. Redeclaring a name replaces it in place.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn into_descriptor(self) -> TypeDescriptor {
        TypeDescriptor::record(self)
    }
}

impl fmt::Display for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", field.name, field.descriptor)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_nested_signature() {
        let d = TypeDescriptor::seq(TypeDescriptor::map(
            TypeDescriptor::str(),
            TypeDescriptor::map(TypeDescriptor::str(), TypeDescriptor::date()),
        ));
        assert_eq!(d.to_string(), "seq<map<str,map<str,date>>>");
    }

    #[test]
    fn record_display_lists_fields_in_order() {
        let d = RecordDescriptor::new("Student")
            .field(FieldDescriptor::new("name", TypeDescriptor::str()))
            .field(FieldDescriptor::new("age", TypeDescriptor::int()))
            .into_descriptor();
        assert_eq!(d.to_string(), "Student{name:str,age:int}");
    }

    #[test]
    fn redeclared_field_replaces_in_place() {
        let r = RecordDescriptor::new("R")
            .field(FieldDescriptor::new("a", TypeDescriptor::str()))
            .field(FieldDescriptor::new("b", TypeDescriptor::str()))
            .field(FieldDescriptor::new("a", TypeDescriptor::int()));
        assert_eq!(r.fields().len(), 2);
        assert_eq!(r.fields()[0].descriptor(), &TypeDescriptor::int());
    }

    #[test]
    fn empty_values_per_kind() {
        assert_eq!(TypeDescriptor::str().empty_value(), Value::Str(String::new()));
        assert_eq!(TypeDescriptor::int().empty_value(), Value::Int(0));
        assert_eq!(TypeDescriptor::float().empty_value(), Value::Float(0.0));
        assert_eq!(TypeDescriptor::bool().empty_value(), Value::Bool(false));
        assert_eq!(TypeDescriptor::date().empty_value(), Value::Null);
        assert_eq!(
            TypeDescriptor::seq(TypeDescriptor::int()).empty_value(),
            Value::Seq(vec![])
        );
    }

    #[test]
    fn resolution_follows_container_chain() {
        assert!(TypeDescriptor::seq(TypeDescriptor::date()).is_resolved());
        assert!(!TypeDescriptor::seq(TypeDescriptor::inferred()).is_resolved());
        assert!(!TypeDescriptor::map(TypeDescriptor::str(), TypeDescriptor::inferred())
            .is_resolved());
    }
}
