//! Decoded value tree.
//!
//! Unlike `serde_json::Value` this tree has first-class dates, typed mapping
//! keys and records that remember their descriptor, so it can carry the
//! narrowed shape a decoder produced.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::date::DateParser;
use crate::descriptor::RecordDescriptor;
use crate::encode::Encoder;
use crate::error::{CodecError, Result};
use crate::typed::JsonType;

/// Mapping entries, kept in insertion order.
pub type Mapping = IndexMap<Key, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDateTime),
    Seq(Vec<Value>),
    Map(Mapping),
    Record(Record),
}

impl Value {
    /// Short shape name used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "mapping",
            Value::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Looks up a mapping entry by text key or a record field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(&Key::Str(key.to_string())),
            Value::Record(record) => record.get(key),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl FromIterator<(Key, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}

// -------------------------------------------------------------------------
// Key

/// A mapping key.
///
/// JSON object keys are always text; narrower keys come from decoding the
/// text against a key descriptor and are stringified again on output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Date(NaiveDateTime),
}

impl Key {
    pub fn into_value(self) -> Value {
        match self {
            Key::Null => Value::Null,
            Key::Bool(b) => Value::Bool(b),
            Key::Int(i) => Value::Int(i),
            Key::Str(s) => Value::Str(s),
            Key::Date(d) => Value::Date(d),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<Value> for Key {
    /// Narrows a value to a key. Floats and structured values have no key
    /// form and are stringified as JSON text.
    ///
    /// That text is fixed when the key is built, before any codec sees it,
    /// so dates nested in such keys always use [`CANONICAL_LAYOUT`] rather
    /// than a codec's `date_output_format`.
    ///
    /// [`CANONICAL_LAYOUT`]: crate::date::CANONICAL_LAYOUT
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Key::Null,
            Value::Bool(b) => Key::Bool(b),
            Value::Int(i) => Key::Int(i),
            Value::Str(s) => Key::Str(s),
            Value::Date(d) => Key::Date(d),
            other => Key::Str(Encoder::new(&DateParser::default()).encode(&other)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => f.write_str("null"),
            Key::Bool(b) => write!(f, "{b}"),
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
            Key::Date(d) => write!(f, "{d}"),
        }
    }
}

// -------------------------------------------------------------------------
// Record

/// A record value: named fields in declaration order, tied to the
/// descriptor that declared them.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    descriptor: Arc<RecordDescriptor>,
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates a record holding every field's declared default.
    pub fn new(descriptor: Arc<RecordDescriptor>) -> Self {
        let fields = descriptor
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), field.default_value().clone()))
            .collect();
        Self { descriptor, fields }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &Arc<RecordDescriptor> {
        &self.descriptor
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a declared field, returning the previous value.
    ///
    /// Names the descriptor does not declare are ignored and yield `None`.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Option<Value> {
        let slot = self.fields.get_mut(field)?;
        Some(std::mem::replace(slot, value.into()))
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Removes a field's value (leaving `Null`) and converts it to `T`.
    ///
    /// A `null` field becomes [`JsonType::from_null`].
    pub fn take_as<T: JsonType>(&mut self, field: &str) -> Result<T> {
        let value = self
            .fields
            .get_mut(field)
            .map(std::mem::take)
            .unwrap_or_default();
        match value {
            Value::Null => T::from_null(),
            value => T::from_value(value),
        }
        .map_err(|err| err.at(field))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Unwraps a record value, or fails naming the expected record.
    pub fn try_from_value(value: Value, expected: &str) -> Result<Self> {
        match value {
            Value::Record(record) => Ok(record),
            other => Err(CodecError::mismatch(expected, other.kind())),
        }
    }
}
