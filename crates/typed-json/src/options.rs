//! Codec configuration.
//!
//! Options can be built in code or loaded from a JSON document; every key is
//! optional and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::date::{DateParser, CANONICAL_LAYOUT};
use crate::error::{CodecError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Read `""` as `null` where a sequence, mapping, record, number or
    /// boolean is expected.
    pub empty_string_as_null: bool,

    /// Reject object keys a record does not declare.
    pub fail_on_unknown_fields: bool,

    /// `strftime` layout dates are written in.
    pub date_output_format: String,

    /// Input layouts tried after the built-in ones.
    pub extra_date_formats: Vec<String>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            empty_string_as_null: true,
            fail_on_unknown_fields: false,
            date_output_format: CANONICAL_LAYOUT.to_string(),
            extra_date_formats: Vec::new(),
        }
    }
}

impl CodecOptions {
    /// Loads options from a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(text).map_err(|e| CodecError::Config(e.to_string()))?;
        options.date_parser()?;
        Ok(options)
    }

    /// Builds the date parser these options describe.
    pub fn date_parser(&self) -> Result<DateParser> {
        let mut parser = DateParser::new();
        if self.date_output_format != CANONICAL_LAYOUT {
            parser = parser.with_canonical(&self.date_output_format)?;
        }
        for layout in &self.extra_date_formats {
            parser = parser.with_layout(layout)?;
        }
        Ok(parser)
    }
}
