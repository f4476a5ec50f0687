//! What an explicit JSON `null` becomes for a record field.
//!
//! The policy only ever sees a `null` that is present in the document. A key
//! missing from the object leaves the field at its declared default no
//! matter which policy is attached.

use serde::{Deserialize, Serialize};

use crate::descriptor::TypeDescriptor;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NullPolicy {
    /// The field becomes null.
    #[default]
    KeepAsNull,
    /// The field keeps the value it held before decoding.
    ReplaceWithFieldDefault,
    /// The field takes its type's empty value (`""`, `0`, `false`, `[]`, `{}`).
    ReplaceWithEmptyValue,
}

impl NullPolicy {
    /// The effective value of a field whose JSON value is `null`.
    pub fn apply(self, declared_default: &Value, descriptor: &TypeDescriptor) -> Value {
        match self {
            NullPolicy::KeepAsNull => Value::Null,
            NullPolicy::ReplaceWithFieldDefault => declared_default.clone(),
            NullPolicy::ReplaceWithEmptyValue => descriptor.empty_value(),
        }
    }
}
