//! Codec facade.
//!
//! A [`JsonCodec`] holds validated options and the date parser built from
//! them; it has no other state and can be shared across threads. The free
//! functions use a process-wide codec with default options.

use std::sync::OnceLock;

use crate::date::DateParser;
use crate::decode::Decoder;
use crate::descriptor::{descriptor_of, resolve, Container, TypeDescriptor};
use crate::encode::Encoder;
use crate::error::Result;
use crate::options::CodecOptions;
use crate::typed::JsonType;
use crate::value::Value;

#[derive(Debug)]
pub struct JsonCodec {
    options: CodecOptions,
    dates: DateParser,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self {
            options: CodecOptions::default(),
            dates: DateParser::default(),
        }
    }
}

impl JsonCodec {
    /// Builds a codec, rejecting invalid date layouts up front.
    pub fn new(options: CodecOptions) -> Result<Self> {
        let dates = options.date_parser()?;
        tracing::debug!(?options, "codec configured");
        Ok(Self { options, dates })
    }

    /// The shared codec with default options.
    pub fn global() -> &'static JsonCodec {
        static GLOBAL: OnceLock<JsonCodec> = OnceLock::new();
        GLOBAL.get_or_init(JsonCodec::default)
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn dates(&self) -> &DateParser {
        &self.dates
    }

    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.dates)
    }

    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.options, &self.dates)
    }

    pub fn encode(&self, value: &Value) -> String {
        self.encoder().encode(value)
    }

    pub fn to_json<T: JsonType>(&self, value: &T) -> String {
        self.encode(&value.to_value())
    }

    /// Parses `text` into `T`, decoding against `T`'s descriptor.
    pub fn parse<T: JsonType + 'static>(&self, text: &str) -> Result<T> {
        let descriptor = descriptor_of::<T>();
        T::from_value(self.parse_as(text, &descriptor)?)
    }

    /// Parses `text` with the shape the JSON itself has.
    pub fn parse_value(&self, text: &str) -> Result<Value> {
        self.parse_as(text, &TypeDescriptor::Inferred)
    }

    pub fn parse_as(&self, text: &str, descriptor: &TypeDescriptor) -> Result<Value> {
        self.decoder().decode_str(text, descriptor)
    }

    /// Parses a sequence or mapping with explicit element descriptors.
    pub fn parse_generic(
        &self,
        text: &str,
        container: Container,
        elements: &[TypeDescriptor],
    ) -> Result<Value> {
        let descriptor = resolve(container, elements)?;
        self.parse_as(text, &descriptor)
    }
}

pub fn encode(value: &Value) -> String {
    JsonCodec::global().encode(value)
}

pub fn to_json<T: JsonType>(value: &T) -> String {
    JsonCodec::global().to_json(value)
}

pub fn parse<T: JsonType + 'static>(text: &str) -> Result<T> {
    JsonCodec::global().parse(text)
}

pub fn parse_value(text: &str) -> Result<Value> {
    JsonCodec::global().parse_value(text)
}

pub fn parse_as(text: &str, descriptor: &TypeDescriptor) -> Result<Value> {
    JsonCodec::global().parse_as(text, descriptor)
}

pub fn parse_generic(text: &str, container: Container, elements: &[TypeDescriptor]) -> Result<Value> {
    JsonCodec::global().parse_generic(text, container, elements)
}

pub fn clone<T: JsonType + 'static>(value: &T) -> Result<T> {
    JsonCodec::global().clone(value)
}

pub fn clone_value(value: &Value) -> Result<Value> {
    JsonCodec::global().clone_value(value)
}

pub fn clone_as(value: &Value, descriptor: &TypeDescriptor) -> Result<Value> {
    JsonCodec::global().clone_as(value, descriptor)
}

pub fn clone_generic(value: &Value, elements: &[TypeDescriptor]) -> Result<Value> {
    JsonCodec::global().clone_generic(value, elements)
}
