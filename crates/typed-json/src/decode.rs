//! Descriptor-driven decoder.
//!
//! serde_json parses the text; this module walks the parsed document against
//! a [`TypeDescriptor`] and builds a [`Value`] tree of the narrowed shape.
//! Errors unwind through [`CodecError::at`] so their paths name the full
//! location.

use std::sync::Arc;

use serde_json::{Map, Number, Value as Json};

use crate::date::DateParser;
use crate::descriptor::{RecordDescriptor, ScalarKind, TypeDescriptor};
use crate::error::{CodecError, Result};
use crate::options::CodecOptions;
use crate::value::{Key, Mapping, Record, Value};

pub struct Decoder<'a> {
    options: &'a CodecOptions,
    dates: &'a DateParser,
}

impl<'a> Decoder<'a> {
    pub fn new(options: &'a CodecOptions, dates: &'a DateParser) -> Self {
        Self { options, dates }
    }

    /// Parses `text` and decodes it against `descriptor`.
    pub fn decode_str(&self, text: &str, descriptor: &TypeDescriptor) -> Result<Value> {
        tracing::trace!(%descriptor, len = text.len(), "decoding");
        let json: Json = serde_json::from_str(text)?;
        self.decode_json(&json, descriptor)
    }

    /// Decodes an already parsed document.
    ///
    /// `null` decodes to [`Value::Null`] under every descriptor.
    pub fn decode_json(&self, json: &Json, descriptor: &TypeDescriptor) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        match descriptor {
            TypeDescriptor::Inferred => Ok(inferred(json)),
            TypeDescriptor::Scalar(kind) => self.scalar(json, *kind),
            TypeDescriptor::Sequence(element) => self.sequence(json, descriptor, element),
            TypeDescriptor::Mapping { key, value } => self.mapping(json, descriptor, key, value),
            TypeDescriptor::Record(record) => self.record(json, record),
        }
    }

    fn blank_as_null(&self, text: &str) -> bool {
        self.options.empty_string_as_null && text.trim().is_empty()
    }

    fn scalar(&self, json: &Json, kind: ScalarKind) -> Result<Value> {
        let value = match (kind, json) {
            (ScalarKind::Str, Json::String(s)) => Value::Str(s.clone()),
            (ScalarKind::Str, Json::Number(n)) => Value::Str(n.to_string()),
            (ScalarKind::Str, Json::Bool(b)) => Value::Str(b.to_string()),

            (ScalarKind::Bool, Json::Bool(b)) => Value::Bool(*b),
            (ScalarKind::Bool, Json::String(s)) if self.blank_as_null(s) => Value::Null,
            (ScalarKind::Bool, Json::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(mismatch(kind.as_str(), json)),
            },

            (ScalarKind::Int, Json::Number(n)) => {
                int_from_number(n).ok_or_else(|| mismatch(kind.as_str(), json))?
            }
            (ScalarKind::Int, Json::String(s)) if self.blank_as_null(s) => Value::Null,
            (ScalarKind::Int, Json::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| mismatch(kind.as_str(), json))?,

            (ScalarKind::Float, Json::Number(n)) => {
                n.as_f64().map(Value::Float).ok_or_else(|| mismatch(kind.as_str(), json))?
            }
            (ScalarKind::Float, Json::String(s)) if self.blank_as_null(s) => Value::Null,
            (ScalarKind::Float, Json::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| mismatch(kind.as_str(), json))?,

            (ScalarKind::Date, Json::String(s)) => match self.dates.parse(s)? {
                Some(date) => Value::Date(date),
                None => Value::Null,
            },
            (ScalarKind::Date, Json::Number(n)) => n
                .as_i64()
                .and_then(|millis| self.dates.from_epoch_millis(millis))
                .map(Value::Date)
                .ok_or_else(|| mismatch(kind.as_str(), json))?,

            _ => return Err(mismatch(kind.as_str(), json)),
        };
        Ok(value)
    }

    fn sequence(
        &self,
        json: &Json,
        descriptor: &TypeDescriptor,
        element: &TypeDescriptor,
    ) -> Result<Value> {
        let items = match json {
            Json::Array(items) => items,
            Json::String(s) if self.blank_as_null(s) => return Ok(Value::Null),
            other => return Err(mismatch(descriptor, other)),
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                self.decode_json(item, element)
                    .map_err(|err| err.at(&i.to_string()))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Seq)
    }

    fn mapping(
        &self,
        json: &Json,
        descriptor: &TypeDescriptor,
        key: &TypeDescriptor,
        value: &TypeDescriptor,
    ) -> Result<Value> {
        let object = match json {
            Json::Object(object) => object,
            Json::String(s) if self.blank_as_null(s) => return Ok(Value::Null),
            other => return Err(mismatch(descriptor, other)),
        };
        let mut map = Mapping::with_capacity(object.len());
        for (name, item) in object {
            let k = self.key(name, key).map_err(|err| err.at(name))?;
            let v = self.decode_json(item, value).map_err(|err| err.at(name))?;
            map.insert(k, v);
        }
        Ok(Value::Map(map))
    }

    /// Narrows an object key (always text in JSON) to the key descriptor.
    fn key(&self, text: &str, descriptor: &TypeDescriptor) -> Result<Key> {
        match descriptor {
            TypeDescriptor::Inferred | TypeDescriptor::Scalar(ScalarKind::Str) => {
                Ok(Key::Str(text.to_string()))
            }
            TypeDescriptor::Scalar(_) if text == "null" => Ok(Key::Null),
            TypeDescriptor::Scalar(kind) => {
                Ok(Key::from(self.scalar(&Json::String(text.to_string()), *kind)?))
            }
            other => Err(CodecError::mismatch(
                format!("{other} key"),
                "string",
            )),
        }
    }

    fn record(&self, json: &Json, descriptor: &Arc<RecordDescriptor>) -> Result<Value> {
        let object = match json {
            Json::Object(object) => object,
            Json::String(s) if self.blank_as_null(s) => return Ok(Value::Null),
            other => return Err(mismatch(format!("record {}", descriptor.name()), other)),
        };
        if self.options.fail_on_unknown_fields {
            check_unknown_fields(object, descriptor)?;
        }

        let mut record = Record::new(descriptor.clone());
        for field in descriptor.fields() {
            let value = match object.get(field.name()) {
                // Absent: the declared default stays.
                None => continue,
                Some(Json::Null) => field
                    .policy()
                    .apply(field.default_value(), field.descriptor()),
                Some(raw) => self
                    .decode_json(raw, field.descriptor())
                    .map_err(|err| err.at(field.name()))?,
            };
            record.set(field.name(), value);
        }
        Ok(Value::Record(record))
    }
}

fn check_unknown_fields(object: &Map<String, Json>, descriptor: &RecordDescriptor) -> Result<()> {
    match object.keys().find(|k| descriptor.field_named(k).is_none()) {
        Some(field) => Err(CodecError::UnknownField {
            path: String::new(),
            record: descriptor.name().to_string(),
            field: field.clone(),
        }),
        None => Ok(()),
    }
}

/// The natural shape of a JSON value, used where no descriptor narrows it.
pub fn inferred(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        Json::String(s) => Value::Str(s.clone()),
        Json::Array(items) => Value::Seq(items.iter().map(inferred).collect()),
        Json::Object(object) => Value::Map(
            object
                .iter()
                .map(|(k, v)| (Key::Str(k.clone()), inferred(v)))
                .collect(),
        ),
    }
}

fn int_from_number(n: &Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return Some(Value::Int(i));
    }
    // Only integral floats within range narrow to int.
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Value::Int(f as i64))
    } else {
        None
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn mismatch(expected: impl ToString, found: &Json) -> CodecError {
    CodecError::mismatch(expected, json_kind(found))
}
