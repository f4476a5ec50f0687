//! Descriptor-driven JSON codec.
//!
//! JSON text is decoded against an explicit [`TypeDescriptor`], so nested
//! generic containers keep their element types (a `map<str,date>` yields
//! dates, not strings). Around that core sit a lenient [`DateParser`],
//! per-field [`NullPolicy`] handling for records, a deterministic encoder and
//! a clone engine that round-trips values through JSON text.
//!
//! ```
//! use std::collections::HashMap;
//! use chrono::NaiveDateTime;
//!
//! let parsed: HashMap<String, NaiveDateTime> =
//!     typed_json::parse(r#"{"arr":"20180102"}"#).unwrap();
//! assert_eq!(parsed["arr"].to_string(), "2018-01-02 00:00:00");
//! ```

pub mod cli;
pub mod clone;
pub mod codec;
pub mod date;
pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod null_policy;
pub mod options;
pub mod typed;
pub mod value;

pub use codec::{
    clone, clone_as, clone_generic, clone_value, encode, parse, parse_as, parse_generic,
    parse_value, to_json, JsonCodec,
};
pub use date::DateParser;
pub use descriptor::{
    descriptor_of, record_descriptor_of, resolve, resolve_checked, Container, DescriptorCache,
    FieldDescriptor, RecordDescriptor, ScalarKind, TypeDescriptor, UnresolvedGeneric,
};
pub use error::{CodecError, Result};
pub use null_policy::NullPolicy;
pub use options::CodecOptions;
pub use typed::JsonType;
pub use value::{Key, Mapping, Record, Value};
