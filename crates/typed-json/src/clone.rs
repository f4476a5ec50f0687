//! Deep copies by round trip through JSON text.
//!
//! Every clone encodes the value and decodes the text again against a
//! descriptor. The descriptor decides what the copy looks like: with an
//! inferred one, a date nested in a mapping comes back as its text, while
//! an explicit `map<str,date>` restores the date. There is no structural
//! shortcut, so a clone always observes the same coercions as a parse.

use crate::codec::JsonCodec;
use crate::descriptor::{descriptor_of, infer, resolve, Container, TypeDescriptor};
use crate::error::{CodecError, Result};
use crate::typed::JsonType;
use crate::value::Value;

impl JsonCodec {
    /// Clones `value` with a shape inferred from the value itself.
    pub fn clone_value(&self, value: &Value) -> Result<Value> {
        self.clone_as(value, &infer(value))
    }

    pub fn clone_as(&self, value: &Value, descriptor: &TypeDescriptor) -> Result<Value> {
        let text = self.encode(value);
        self.parse_as(&text, descriptor)
    }

    /// Clones a sequence or mapping with explicit element descriptors.
    ///
    /// The container kind is read from `value`; `elements` must match its
    /// arity, or be empty for an unresolved (inferred) clone.
    pub fn clone_generic(&self, value: &Value, elements: &[TypeDescriptor]) -> Result<Value> {
        let container = Container::of(value)
            .ok_or_else(|| CodecError::mismatch("sequence or mapping", value.kind()))?;
        let descriptor = resolve(container, elements)?;
        self.clone_as(value, &descriptor)
    }

    /// Clones a typed value through its type's descriptor.
    pub fn clone<T: JsonType + 'static>(&self, value: &T) -> Result<T> {
        let descriptor = descriptor_of::<T>();
        T::from_value(self.clone_as(&value.to_value(), &descriptor)?)
    }
}
