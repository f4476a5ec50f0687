//! Codec error types.

use thiserror::Error;

use crate::descriptor::Container;

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Source text is not well-formed JSON.
    #[error("malformed JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The JSON shape cannot be read as the requested descriptor.
    #[error("type mismatch at \"{path}\": expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// Text matched none of the accepted date layouts.
    #[error("unrecognized date: {text:?}")]
    DateFormat { text: String },

    /// Wrong number of element descriptors for a generic container.
    #[error("{container} takes {expected} element descriptor(s), got {supplied}")]
    Arity {
        container: Container,
        expected: usize,
        supplied: usize,
    },

    #[error("unknown field \"{field}\" for record {record} at \"{path}\"")]
    UnknownField {
        path: String,
        record: String,
        field: String,
    },

    #[error("invalid type signature at offset {position}: {message}")]
    Signature { position: usize, message: String },

    #[error("invalid codec options: {0}")]
    Config(String),
}

impl CodecError {
    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        CodecError::TypeMismatch {
            path: String::new(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Prefixes the JSON-Pointer path of a positional error with `segment`.
    ///
    /// Used while unwinding out of nested sequences, mappings and records so
    /// the outermost error names the full location.
    pub fn at(self, segment: &str) -> Self {
        let escaped = segment.replace('~', "~0").replace('/', "~1");
        match self {
            CodecError::TypeMismatch {
                path,
                expected,
                found,
            } => CodecError::TypeMismatch {
                path: format!("/{escaped}{path}"),
                expected,
                found,
            },
            CodecError::UnknownField {
                path,
                record,
                field,
            } => CodecError::UnknownField {
                path: format!("/{escaped}{path}"),
                record,
                field,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        let message = err.to_string();
        // serde_json appends " at line X column Y"; the position is carried separately.
        let message = match message.rfind(" at line ") {
            Some(idx) => message[..idx].to_string(),
            None => message,
        };
        CodecError::Parse {
            line: err.line(),
            column: err.column(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_builds_pointer_from_inside_out() {
        let err = CodecError::mismatch("int", "string").at("age").at("0").at("a/b");
        match err {
            CodecError::TypeMismatch { path, .. } => assert_eq!(path, "/a~1b/0/age"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_error_keeps_position() {
        let err: CodecError = serde_json::from_str::<serde_json::Value>("{\"a\": }")
            .unwrap_err()
            .into();
        match err {
            CodecError::Parse {
                line,
                column,
                message,
            } => {
                assert_eq!(line, 1);
                assert_eq!(column, 7);
                assert!(!message.contains("at line"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
